//! Parsing the managed block of a status document back into data.

use jiff::Timestamp;

use super::{BEGIN_MARKER, BLOCKERS_HEADING, END_MARKER, STEPS_HEADING};
use crate::models::{Blocker, PlanStatus, StepStatus};

/// One row of the steps table, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub number: u32,
    pub title: String,
    pub status: StepStatus,
    pub notes: Option<String>,
    pub block_reason: Option<String>,
}

/// Raw content of a status document.
///
/// Rows keep the order and numbering found in the file, so callers can
/// decide how to treat gaps or duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDocument {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub status: PlanStatus,
    /// Progress as recorded; derived data, only used for consistency checks
    pub progress: Option<u8>,
    pub current_step: Option<u32>,
    pub last_updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub rows: Vec<StatusRow>,
    pub blockers: Vec<Blocker>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Steps,
    Blockers,
    Other,
}

/// Splits a table line into unescaped cells.
fn split_cells(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut rest = inner;
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '\\' => {
                if let Some(escaped) = rest.chars().next() {
                    cell.push(escaped);
                    rest = &rest[escaped.len_utf8()..];
                }
            }
            '|' => cells.push(std::mem::take(&mut cell)),
            '<' if rest.starts_with("br>") => {
                cell.push('\n');
                rest = &rest["br>".len()..];
            }
            c => cell.push(c),
        }
    }
    if !cell.trim().is_empty() {
        cells.push(cell);
    }

    cells
        .into_iter()
        .map(|c| c.trim_matches([' ', '\t']).to_string())
        .collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Takes the last whitespace-separated token, dropping any leading icon.
fn status_token(cell: &str) -> &str {
    cell.split_whitespace().last().unwrap_or_default()
}

fn parse_step_number(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

fn parse_timestamp(value: &str, line: usize) -> Result<Timestamp, String> {
    value
        .trim()
        .parse()
        .map_err(|e| format!("line {line}: invalid timestamp '{}': {e}", value.trim()))
}

fn parse_row(line: &str, line_no: usize) -> Result<Option<StatusRow>, String> {
    let cells = split_cells(line);
    if cells.is_empty() || is_separator_row(&cells) || cells[0] == "Step" {
        return Ok(None);
    }
    if cells.len() < 3 {
        return Err(format!("line {line_no}: step row needs at least 3 cells"));
    }

    let number = parse_step_number(&cells[0])
        .ok_or_else(|| format!("line {line_no}: invalid step number '{}'", cells[0]))?;
    let status = status_token(&cells[2])
        .parse::<StepStatus>()
        .map_err(|e| format!("line {line_no}: {e}"))?;

    let title = cells[1].clone();
    let notes = cells.get(3).cloned().and_then(non_empty);
    let block_reason = cells.get(4).cloned().and_then(non_empty);

    Ok(Some(StatusRow {
        number,
        title,
        status,
        notes,
        block_reason,
    }))
}

fn parse_blocker(item: &str, line_no: usize) -> Result<Blocker, String> {
    let (text, since) = item
        .rsplit_once(" (since ")
        .ok_or_else(|| format!("line {line_no}: blocker is missing its timestamp"))?;
    let since = since
        .strip_suffix(')')
        .ok_or_else(|| format!("line {line_no}: unterminated blocker timestamp"))?;
    let created_at = parse_timestamp(since, line_no)?;

    let linked = text.strip_prefix("Step ").and_then(|rest| {
        let (number, description) = rest.split_once(": ")?;
        Some((parse_step_number(number)?, description))
    });

    Ok(match linked {
        Some((step, description)) => Blocker {
            description: description.to_string(),
            step: Some(step),
            created_at,
        },
        None => Blocker {
            description: text.to_string(),
            step: None,
            created_at,
        },
    })
}

/// Parses the managed block of a status document.
///
/// # Errors
///
/// Returns a human-readable reason when the markers are missing, a required
/// field is absent, or a line cannot be understood.
pub fn parse_status(content: &str) -> Result<StatusDocument, String> {
    let begin = content
        .find(BEGIN_MARKER)
        .ok_or_else(|| "missing status block begin marker".to_string())?;
    let body = &content[begin + BEGIN_MARKER.len()..];
    let end = body
        .find(END_MARKER)
        .ok_or_else(|| "missing status block end marker".to_string())?;
    let body = &body[..end];
    let first_line = content[..begin].lines().count() + 1;

    let mut name = None;
    let mut code = None;
    let mut status = None;
    let mut progress = None;
    let mut current_step = None;
    let mut last_updated_at = None;
    let mut completed_at = None;
    let mut description: Vec<&str> = Vec::new();
    let mut rows = Vec::new();
    let mut blockers = Vec::new();
    let mut section = Section::Header;

    for (offset, raw) in body.lines().enumerate() {
        let line_no = first_line + offset;
        let line = raw.trim_end();

        if line == STEPS_HEADING {
            section = Section::Steps;
            continue;
        }
        if line == BLOCKERS_HEADING {
            section = Section::Blockers;
            continue;
        }
        if line.starts_with("## ") {
            section = Section::Other;
            continue;
        }

        match section {
            Section::Header => {
                if let Some(title) = line.strip_prefix("# ") {
                    if name.is_none() {
                        name = Some(title.trim().to_string());
                    }
                } else if let Some(quoted) = line.strip_prefix('>') {
                    description.push(quoted.strip_prefix(' ').unwrap_or(quoted));
                } else if let Some(field) = line.strip_prefix("- **") {
                    let (key, value) = field
                        .split_once("**:")
                        .ok_or_else(|| format!("line {line_no}: malformed field"))?;
                    let value = value.trim();
                    match key {
                        "Code" => code = Some(value.to_string()),
                        "Status" => {
                            let without_icon = value
                                .split_once(' ')
                                .map_or(value, |(_icon, label)| label);
                            status = Some(
                                without_icon
                                    .parse::<PlanStatus>()
                                    .or_else(|_| value.parse::<PlanStatus>())
                                    .map_err(|e| format!("line {line_no}: {e}"))?,
                            );
                        }
                        "Progress" => {
                            progress = value
                                .split_once('%')
                                .and_then(|(percent, _)| percent.trim().parse().ok());
                        }
                        "Current Step" => {
                            let number = value.split(" - ").next().unwrap_or(value);
                            current_step = Some(parse_step_number(number).ok_or_else(|| {
                                format!("line {line_no}: invalid current step '{value}'")
                            })?);
                        }
                        "Last Updated" => last_updated_at = Some(parse_timestamp(value, line_no)?),
                        "Completed" => completed_at = Some(parse_timestamp(value, line_no)?),
                        // Unknown fields are hand edits; leave them be.
                        _ => {}
                    }
                }
            }
            Section::Steps => {
                if line.trim_start().starts_with('|') {
                    if let Some(row) = parse_row(line, line_no)? {
                        rows.push(row);
                    }
                }
            }
            Section::Blockers => {
                if let Some(item) = line.trim_start().strip_prefix("- ") {
                    blockers.push(parse_blocker(item, line_no)?);
                }
            }
            Section::Other => {}
        }
    }

    let description = if description.is_empty() {
        None
    } else {
        Some(description.join("\n"))
    };

    Ok(StatusDocument {
        name: name.ok_or_else(|| "missing plan name heading".to_string())?,
        code: code.ok_or_else(|| "missing Code field".to_string())?,
        description,
        status: status.ok_or_else(|| "missing Status field".to_string())?,
        progress,
        current_step,
        last_updated_at: last_updated_at
            .ok_or_else(|| "missing Last Updated field".to_string())?,
        completed_at,
        rows,
        blockers,
    })
}
