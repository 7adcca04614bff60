//! Crisis-phrase detection.
//!
//! A single case-insensitive substring pass over a fixed phrase list. No
//! tokenization, no stemming, no false-positive suppression: a message that
//! merely quotes a phrase is flagged like any other.

/// Phrases presumed indicative of self-harm risk. All lowercase.
pub const CRISIS_PHRASES: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "want to die",
    "self harm",
    "cut myself",
    "hurt myself",
    "no point living",
    "better off dead",
    "ending it all",
    "take my own life",
    "not worth living",
];

/// Appended to every reply whose inbound message was flagged.
pub const CRISIS_NOTICE: &str = "\n\n🚨 I'm concerned about you. Please reach out to a counselor or call the crisis helpline: 988 (US) or your local emergency number. You're not alone.";

/// Case-insensitive substring matcher over a phrase list.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    phrases: Vec<String>,
}

impl KeywordMatcher {
    /// Build a matcher from custom phrases.
    ///
    /// Phrases are lowercased; blank phrases are dropped so they cannot
    /// match every input.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Returns true if any phrase occurs in the lowercased text.
    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(CRISIS_PHRASES)
    }
}
