use chrono::NaiveDate;
use serde::Serialize;

use crate::model::entry::{Entry, format_decimal, format_hours};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntryJson {
    pub id: u64,
    pub date: String,
    pub time: f64,
    pub customer: String,
    pub project: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: String,
    pub total: f64,
    pub entries: Vec<EntryJson>,
}

#[derive(Serialize)]
pub struct SuggestJson {
    pub field: String,
    pub partial: String,
    pub matches: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn entry_to_json(entry: &Entry) -> EntryJson {
    EntryJson {
        id: entry.id,
        date: entry.date.format("%Y-%m-%d").to_string(),
        time: entry.time,
        customer: entry.customer.clone(),
        project: entry.project.clone(),
        description: entry.description.clone(),
    }
}

pub fn day_to_json<'a>(date: NaiveDate, entries: impl IntoIterator<Item = &'a Entry>) -> DayJson {
    let entries: Vec<EntryJson> = entries.into_iter().map(entry_to_json).collect();
    DayJson {
        date: date.format("%Y-%m-%d").to_string(),
        total: entries.iter().map(|e| e.time).sum(),
        entries,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `  3  1.5h  Acme / Website  design`
pub fn format_entry_line(entry: &Entry) -> String {
    format!(
        "{:>3}  {:>5}  {} / {}  {}",
        entry.id,
        format_hours(entry.time),
        entry.customer,
        entry.project,
        entry.description
    )
}

/// Header, one line per entry, and the day total.
pub fn format_day_listing<'a>(
    date: NaiveDate,
    entries: impl IntoIterator<Item = &'a Entry>,
) -> Vec<String> {
    let mut lines = vec![date.format("%a %Y-%m-%d").to_string()];
    let mut total = 0.0;
    let mut count = 0;
    for entry in entries {
        lines.push(format_entry_line(entry));
        total += entry.time;
        count += 1;
    }
    if count == 0 {
        lines.push("(no items)".to_string());
    } else {
        lines.push(format!("total {}h", format_decimal(total)));
    }
    lines
}
