//! Anonymous author labels.

use rand::Rng;
use rand::seq::SliceRandom;

const PREFIXES: [&str; 5] = ["Anonymous", "Student", "Mindful", "Helper", "Seeker"];

/// Generate a pseudonymous label such as `Seeker_482`.
pub fn anonymous_author() -> String {
    let mut rng = rand::thread_rng();
    let prefix = PREFIXES.choose(&mut rng).copied().unwrap_or("Anonymous");
    format!("{prefix}_{}", rng.gen_range(100..=999))
}

/// Use the supplied author unless it is missing or blank.
pub fn resolve_author(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => anonymous_author(),
    }
}
