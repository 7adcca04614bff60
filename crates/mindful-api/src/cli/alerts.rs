//! `mindful alerts` -- print open crisis alerts.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use mindful_types::chat::CrisisAlert;

use crate::state::AppState;

/// Longest message excerpt shown in the table.
const EXCERPT_CHARS: usize = 60;

/// List open crisis alerts as a table or JSON.
pub async fn list_alerts(state: &AppState, json: bool) -> Result<()> {
    let alerts = state.chat_relay.open_alerts().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    if alerts.is_empty() {
        println!();
        println!("  {} No open crisis alerts.", style("✓").green().bold());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", render_table(&alerts));
    println!();
    println!(
        "  {} open alert{}",
        style(alerts.len()).red().bold(),
        if alerts.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn render_table(alerts: &[CrisisAlert]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("When").fg(Color::White),
        Cell::new("Session").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for alert in alerts {
        table.add_row(vec![
            Cell::new(alert.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
            Cell::new(&alert.session_id).fg(Color::Cyan),
            Cell::new(excerpt(&alert.message)),
        ]);
    }

    table
}

/// First `EXCERPT_CHARS` characters of `text` on one line.
fn excerpt(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
    format!("{cut}…")
}
