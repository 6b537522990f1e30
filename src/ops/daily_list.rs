use chrono::NaiveDate;

use crate::model::entry::Entry;

/// The entries shown for one day, plus the "no items" placeholder flag.
///
/// Invariant: `placeholder` is set exactly when `rows` is empty.
#[derive(Debug, Clone)]
pub struct DailyList {
    date: NaiveDate,
    rows: Vec<Entry>,
    placeholder: bool,
    /// Highlighted row when the list has focus
    selected: usize,
}

impl DailyList {
    pub fn new(date: NaiveDate) -> Self {
        DailyList {
            date,
            rows: Vec::new(),
            placeholder: true,
            selected: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rows(&self) -> &[Entry] {
        &self.rows
    }

    pub fn shows_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn total_hours(&self) -> f64 {
        self.rows.iter().map(|e| e.time).sum()
    }

    /// Replace the rows with the entries of `date`, keeping their order.
    pub fn render_for<'a>(&mut self, date: NaiveDate, entries: impl IntoIterator<Item = &'a Entry>) {
        self.date = date;
        self.rows = entries
            .into_iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect();
        self.placeholder = self.rows.is_empty();
        self.clamp_selection();
    }

    /// Append a newly stored entry. Entries for other days are ignored.
    pub fn add(&mut self, entry: &Entry) {
        if entry.date != self.date {
            return;
        }
        self.rows.push(entry.clone());
        self.placeholder = false;
    }

    /// Drop the row for `id`, if shown.
    pub fn remove(&mut self, id: u64) {
        self.rows.retain(|e| e.id != id);
        if self.rows.is_empty() {
            self.placeholder = true;
        }
        self.clamp_selection();
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }
}
