//! Candidate input parsing
//!
//! Accepts two textual forms:
//! - manual input: comma separated when the text has commas and no newlines,
//!   newline separated otherwise
//! - CSV: first column of every row, quoted cells allowed
//!
//! Both forms are normalized the same way: entries are trimmed, empty
//! entries dropped and duplicates removed keeping the first occurrence.

use std::collections::HashSet;

use crate::draw::{DrawError, DrawResult};

/// Normalize raw entries into unique, trimmed, non-empty names
pub fn normalize<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for entry in entries {
        let name = entry.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}

/// Parse manual text input
pub fn parse_manual(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if text.contains(',') && !text.contains('\n') {
        normalize(text.split(','))
    } else {
        normalize(text.lines())
    }
}

/// Parse CSV content, taking the first column of every row
pub fn parse_csv(content: &str) -> DrawResult<Vec<String>> {
    let mut firsts = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cell = first_cell(line).map_err(|reason| {
            DrawError::validation(format!("CSV parsing error on line {}: {}", line_no + 1, reason))
        })?;
        firsts.push(cell);
    }

    Ok(normalize(firsts))
}

/// Extract the first cell of a CSV row
fn first_cell(line: &str) -> Result<String, &'static str> {
    let trimmed = line.trim_start();

    if let Some(rest) = trimmed.strip_prefix('"') {
        let mut cell = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    return Ok(cell);
                }
            } else {
                cell.push(c);
            }
        }
        return Err("unterminated quoted cell");
    }

    Ok(trimmed.split(',').next().unwrap_or_default().to_string())
}
