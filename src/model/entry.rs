use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged block of time.
///
/// Entries are created by the repository (which assigns `id`) and are never
/// edited in place afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: u64,
    pub date: NaiveDate,
    /// Hours spent, in steps of the form's time step (0.5 by default)
    pub time: f64,
    pub customer: String,
    pub project: String,
    pub description: String,
}

/// A validated entry that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub time: f64,
    pub customer: String,
    pub project: String,
    pub description: String,
}

impl EntryDraft {
    pub fn into_entry(self, id: u64) -> Entry {
        Entry {
            id,
            date: self.date,
            time: self.time,
            customer: self.customer,
            project: self.project,
            description: self.description,
        }
    }
}

impl Entry {
    /// Value of a text field, used by autocomplete. `None` for date/time.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Customer => Some(&self.customer),
            Field::Project => Some(&self.project),
            Field::Description => Some(&self.description),
            Field::Date | Field::Time => None,
        }
    }

    pub fn hours_label(&self) -> String {
        format_hours(self.time)
    }
}

/// The fields of the entry form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Date,
    Time,
    Customer,
    Project,
    Description,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Date,
        Field::Time,
        Field::Customer,
        Field::Project,
        Field::Description,
    ];

    /// Fields validated on submit and cleared after it (everything but the date).
    pub const TEXT: [Field; 4] = [
        Field::Time,
        Field::Customer,
        Field::Project,
        Field::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::Time => "Time",
            Field::Customer => "Customer",
            Field::Project => "Project",
            Field::Description => "Description",
        }
    }

    /// Whether values of this field are offered as autocomplete suggestions.
    pub fn completes(self) -> bool {
        matches!(self, Field::Customer | Field::Project | Field::Description)
    }

    pub fn parse(s: &str) -> Option<Field> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Some(Field::Date),
            "time" => Some(Field::Time),
            "customer" => Some(Field::Customer),
            "project" => Some(Field::Project),
            "description" => Some(Field::Description),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

/// Serialized key name for each field in the stored items blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub date: String,
    pub time: String,
    pub customer: String,
    pub project: String,
    pub description: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames {
            date: "date".into(),
            time: "time".into(),
            customer: "customer".into(),
            project: "project".into(),
            description: "description".into(),
        }
    }
}

impl FieldNames {
    pub fn name(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Customer => &self.customer,
            Field::Project => &self.project,
            Field::Description => &self.description,
        }
    }
}

/// Format a number without a trailing `.0` (`2`, `1.5`).
pub fn format_decimal(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Format hours as `2h` or `1.5h`.
pub fn format_hours(hours: f64) -> String {
    format!("{}h", format_decimal(hours))
}

/// Parse a date typed as `YYYY-MM-DD` or `YYYY/MM/DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}
