//! Result export
//!
//! CSV and plain-text renderings of consolidated results. Forfeited
//! winners never appear in an export.

use chrono::{DateTime, Utc};

use crate::consolidation::ConsolidationView;
use crate::draw::DrawSession;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Text,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
        }
    }
}

/// Export one session in the given format
pub fn export_session(session: &DrawSession, format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => winners_to_csv(session),
        ExportFormat::Text => winners_to_text(session),
    }
}

/// `Name,Prize,Timestamp` rows for the consolidated winners
pub fn winners_to_csv(session: &DrawSession) -> String {
    let timestamp = format_timestamp(session.created_at());
    let label = display_label(session);

    let mut lines = vec!["Name,Prize,Timestamp".to_string()];
    for winner in ConsolidationView::render(session) {
        lines.push(csv_row(&[winner.name.as_str(), label, timestamp.as_str()]));
    }
    lines.join("\n")
}

/// `Draw #,Prize,Winners,Timestamp,Count` rows, one per session
pub fn history_to_csv(sessions: &[DrawSession]) -> String {
    let mut lines = vec!["Draw #,Prize,Winners,Timestamp,Count".to_string()];
    for session in sessions {
        let winners = ConsolidationView::render(session);
        let names: Vec<&str> = winners.iter().map(|w| w.name.as_str()).collect();
        lines.push(csv_row(&[
            session.draw_number().to_string().as_str(),
            display_label(session),
            names.join("; ").as_str(),
            format_timestamp(session.created_at()).as_str(),
            winners.len().to_string().as_str(),
        ]));
    }
    lines.join("\n")
}

/// Numbered plain-text winner list
pub fn winners_to_text(session: &DrawSession) -> String {
    let winners = ConsolidationView::render(session);
    let mut lines = vec![
        format!("Prize: {}", display_label(session)),
        format!("Time: {}", format_timestamp(session.created_at())),
        format!("Winners ({}):", winners.len()),
    ];
    for (i, winner) in winners.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, winner.name));
    }
    lines.join("\n")
}

fn display_label(session: &DrawSession) -> &str {
    if session.prize_label().is_empty() {
        "Prize"
    } else {
        session.prize_label()
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn csv_row(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}
