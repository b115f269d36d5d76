use serde::Serialize;
use tracing::error;

use playwatch_detect::{MonitorError, StatusRecord, WebInterfaceMonitor};

/// One line of `playwatch list`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub name: String,
    pub detail: String,
    pub active: bool,
}

impl VariantRow {
    pub fn active(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            detail: url.to_string(),
            active: true,
        }
    }

    pub fn skipped(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            detail: reason.to_string(),
            active: false,
        }
    }
}

/// Result of one probe tick for one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub player: String,
    pub url: String,
    pub status: StatusRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlayerReport {
    pub fn new(monitor: &WebInterfaceMonitor, error: Option<MonitorError>) -> Self {
        Self {
            player: monitor.name().to_string(),
            url: monitor.endpoint().url.clone(),
            status: monitor.status().clone(),
            error: error.map(|e| e.to_string()),
        }
    }
}

pub fn print_variants(rows: &[VariantRow]) {
    if rows.is_empty() {
        println!("No players configured.");
        return;
    }
    for row in rows {
        println!("{}", format_variant(row));
    }
}

pub fn print_reports(reports: &[PlayerReport]) {
    if reports.is_empty() {
        println!("No players to probe.");
        return;
    }
    for report in reports {
        println!("{}", format_report(report));
    }
}

pub fn print_json(reports: &[PlayerReport]) {
    match serde_json::to_string_pretty(reports) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize report: {e}"),
    }
}

fn format_variant(row: &VariantRow) -> String {
    let marker = if row.active { "active " } else { "skipped" };
    format!("{:<10} {marker}  {}", row.name, row.detail)
}

fn format_report(report: &PlayerReport) -> String {
    let mut out = format!("Player: {} ({})", report.player, report.url);
    if let Some(error) = &report.error {
        out.push_str(&format!("\n  Error:    {error}"));
    }
    match &report.status {
        StatusRecord::Empty => out.push_str("\n  Nothing playing."),
        StatusRecord::Loaded(p) => {
            out.push_str(&format!("\n  State:    {}", p.state));
            out.push_str(&format!(
                "\n  Position: {} / {}",
                format_secs(p.position),
                format_secs(p.duration)
            ));
            out.push_str(&format!("\n  File:     {}", p.file_path));
        }
    }
    out
}

/// `h:mm:ss.s`
fn format_secs(secs: f64) -> String {
    let total = secs.max(0.0);
    let hours = (total / 3600.0).floor() as u64;
    let minutes = ((total % 3600.0) / 60.0).floor() as u64;
    let seconds = total % 60.0;
    format!("{hours}:{minutes:02}:{seconds:04.1}")
}
