use std::collections::HashSet;

use crate::model::entry::{Entry, Field};

/// Suggestion dropdown for the text fields of the entry form.
///
/// Closed until [`open`](Self::open) finds at least one match; the active
/// cursor starts unset and wraps in both directions.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteEngine {
    open: Option<OpenState>,
}

#[derive(Debug, Clone)]
struct OpenState {
    field: Field,
    matches: Vec<String>,
    active: Option<usize>,
}

impl AutocompleteEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute matches for `partial` in `field` and open if there are any.
    /// Stays (or becomes) closed for an empty query, a field without
    /// suggestions, or no matches.
    pub fn open(&mut self, field: Field, partial: &str, entries: &[Entry]) {
        if partial.is_empty() || !field.completes() {
            self.close();
            return;
        }
        let matches = find_matches(entries, field, partial);
        if matches.is_empty() {
            self.close();
            return;
        }
        self.open = Some(OpenState {
            field,
            matches,
            active: None,
        });
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Field the dropdown belongs to, if open.
    pub fn field(&self) -> Option<Field> {
        self.open.as_ref().map(|s| s.field)
    }

    pub fn matches(&self) -> &[String] {
        self.open
            .as_ref()
            .map(|s| s.matches.as_slice())
            .unwrap_or(&[])
    }

    pub fn active_index(&self) -> Option<usize> {
        self.open.as_ref().and_then(|s| s.active)
    }

    /// Text of the active match, if any.
    pub fn active_value(&self) -> Option<&str> {
        let state = self.open.as_ref()?;
        state.active.map(|i| state.matches[i].as_str())
    }

    pub fn next(&mut self) {
        if let Some(state) = &mut self.open
            && !state.matches.is_empty()
        {
            let len = state.matches.len();
            state.active = Some(match state.active {
                Some(i) => (i + 1) % len,
                None => 0,
            });
        }
    }

    pub fn previous(&mut self) {
        if let Some(state) = &mut self.open
            && !state.matches.is_empty()
        {
            let len = state.matches.len();
            state.active = Some(match state.active {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            });
        }
    }
}

/// Distinct values of `field` containing `partial`, case-insensitively,
/// sorted by code point. Values differing only in case collapse to the
/// spelling stored first.
pub fn find_matches(entries: &[Entry], field: Field, partial: &str) -> Vec<String> {
    let needle = partial.to_lowercase();
    let mut seen = HashSet::new();
    let mut matches: Vec<String> = entries
        .iter()
        .filter_map(|e| e.text(field))
        .filter(|value| {
            let folded = value.to_lowercase();
            folded.contains(&needle) && seen.insert(folded)
        })
        .map(str::to_string)
        .collect();
    matches.sort();
    matches
}
