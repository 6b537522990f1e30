use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, error, info, warn};

use crate::io::store::{KeyValueStore, StoreError};
use crate::model::entry::{Entry, EntryDraft, FieldNames, parse_date};
use crate::parse::{decode_items, encode_items};

/// Store key holding the whole entry collection
pub const ITEMS_KEY: &str = "items";
/// Store key a malformed collection is copied to before it is discarded
pub const BACKUP_KEY: &str = "items.bak";
/// Store key holding the next id to assign. Kept after the last entry is
/// removed so ids are never issued twice.
pub const NEXT_ID_KEY: &str = "items.next_id";

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an entry id given as text ("2", " 2 ", "2.0").
pub fn parse_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|n| *n >= 1.0 && n.fract() == 0.0)
            .map(|n| n as u64)
    })
}

/// The in-memory entry collection, kept in sync with a single store key.
///
/// Every mutation rewrites the whole collection. An empty collection is
/// represented by the key being absent.
pub struct Repository<S: KeyValueStore> {
    store: S,
    names: FieldNames,
    items: Vec<Entry>,
    next_id: u64,
    date: NaiveDate,
}

impl<S: KeyValueStore> Repository<S> {
    /// Load the collection from `store`, with `today` as the selected date.
    ///
    /// Malformed stored data is copied to [`BACKUP_KEY`] and the collection
    /// starts empty.
    pub fn init(mut store: S, names: FieldNames, today: NaiveDate) -> Result<Self, RepositoryError> {
        let items = match store.get(ITEMS_KEY)? {
            None => Vec::new(),
            Some(blob) => match decode_items(&blob, &names) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "stored items are malformed, starting with an empty log");
                    match store.set(BACKUP_KEY, &blob) {
                        Ok(()) => store.remove(ITEMS_KEY)?,
                        Err(e) => error!(error = %e, "could not back up malformed items"),
                    }
                    Vec::new()
                }
            },
        };

        let stored_next = match store.get(NEXT_ID_KEY)? {
            None => 0,
            Some(raw) => parse_id(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "ignoring malformed id counter");
                0
            }),
        };
        let next_id = stored_next.max(items.iter().map(|e| e.id).max().unwrap_or(0) + 1);
        info!(count = items.len(), "loaded entries");

        Ok(Repository {
            store,
            names,
            items,
            next_id,
            date: today,
        })
    }

    // -----------------------------------------------------------------------
    // Selected date
    // -----------------------------------------------------------------------

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The selected date as `YYYY-MM-DD`.
    pub fn current_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Set the selected date from user input (`-` or `/` separated). Empty
    /// input resets to today. Returns whether the date changed.
    pub fn set_date(&mut self, raw: &str) -> Result<bool, RepositoryError> {
        let date = if raw.trim().is_empty() {
            local_today()
        } else {
            parse_date(raw).ok_or_else(|| RepositoryError::InvalidDate(raw.to_string()))?
        };
        Ok(self.select_date(date))
    }

    /// Select `date` directly. Returns whether the date changed.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        let changed = date != self.date;
        self.date = date;
        changed
    }

    /// Move the selected date by `days`.
    pub fn shift_date(&mut self, days: i64) {
        if let Some(date) = self.date.checked_add_signed(Duration::days(days)) {
            self.date = date;
        }
    }

    // -----------------------------------------------------------------------
    // Collection
    // -----------------------------------------------------------------------

    pub fn entries(&self) -> &[Entry] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&Entry> {
        self.items.iter().find(|e| e.id == id)
    }

    pub fn field_names(&self) -> &FieldNames {
        &self.names
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Entries on `date`, in insertion order. The iterator can be cloned to
    /// walk the same selection again.
    pub fn by_date(&self, date: NaiveDate) -> impl Iterator<Item = &Entry> + Clone + '_ {
        self.items.iter().filter(move |e| e.date == date)
    }

    /// Sum of hours logged on `date`.
    pub fn total_hours(&self, date: NaiveDate) -> f64 {
        self.by_date(date).map(|e| e.time).sum()
    }

    /// Store a new entry, assigning it the next id.
    ///
    /// The id counter is written before the collection. If the store rejects
    /// either write, the collection is left as it was.
    pub fn add(&mut self, draft: EntryDraft) -> Result<Entry, RepositoryError> {
        let entry = draft.into_entry(self.next_id);
        self.store
            .set(NEXT_ID_KEY, &(self.next_id + 1).to_string())?;
        self.items.push(entry.clone());
        if let Err(e) = self.save_all() {
            self.items.pop();
            return Err(e.into());
        }
        self.next_id += 1;
        debug!(id = entry.id, date = %entry.date, "added entry");
        Ok(entry)
    }

    /// Remove the entry with `id`. Returns `None` (and writes nothing) if
    /// there is no such entry.
    pub fn remove(&mut self, id: u64) -> Result<Option<Entry>, RepositoryError> {
        let Some(pos) = self.items.iter().position(|e| e.id == id) else {
            debug!(id, "remove: no such entry");
            return Ok(None);
        };
        let entry = self.items.remove(pos);
        if let Err(e) = self.save_all() {
            self.items.insert(pos, entry);
            return Err(e.into());
        }
        debug!(id, "removed entry");
        Ok(Some(entry))
    }

    /// Write the collection to the store, or remove the key when empty.
    pub fn save_all(&mut self) -> Result<(), StoreError> {
        if self.items.is_empty() {
            self.store.remove(ITEMS_KEY)
        } else {
            self.store
                .set(ITEMS_KEY, &encode_items(&self.items, &self.names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn draft(date: NaiveDate, time: f64, customer: &str, project: &str, desc: &str) -> EntryDraft {
        EntryDraft {
            date,
            time,
            customer: customer.into(),
            project: project.into(),
            description: desc.into(),
        }
    }

    fn empty_repo() -> Repository<MemoryStore> {
        Repository::init(MemoryStore::new(), FieldNames::default(), day(1)).unwrap()
    }

    #[test]
    fn init_without_key_is_empty() {
        let repo = empty_repo();
        assert!(repo.entries().is_empty());
        assert_eq!(repo.current_date(), "2024-01-01");
    }

    #[test]
    fn sequential_adds_get_ids_one_to_n() {
        let mut repo = empty_repo();
        let ids: Vec<u64> = (0..5)
            .map(|i| repo.add(draft(day(1), 1.0, "A", "P", &i.to_string())).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn by_date_keeps_insertion_order() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.5, "Acme", "Website", "design")).unwrap();
        repo.add(draft(day(1), 2.0, "Acme", "App", "bugfix")).unwrap();
        repo.add(draft(day(2), 1.0, "Beta", "Ops", "deploy")).unwrap();

        let first: Vec<(u64, &str)> = repo
            .by_date(day(1))
            .map(|e| (e.id, e.description.as_str()))
            .collect();
        assert_eq!(first, vec![(1, "design"), (2, "bugfix")]);

        let second: Vec<u64> = repo.by_date(day(2)).map(|e| e.id).collect();
        assert_eq!(second, vec![3]);
        assert_eq!(repo.by_date(day(9)).count(), 0);
    }

    #[test]
    fn by_date_is_restartable() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.0, "A", "P", "x")).unwrap();
        let iter = repo.by_date(day(1));
        assert_eq!(iter.clone().count(), 1);
        assert_eq!(iter.count(), 1);
    }

    #[test]
    fn remove_keeps_other_entries_and_store() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.0, "A", "P", "one")).unwrap();
        repo.add(draft(day(1), 1.0, "A", "P", "two")).unwrap();

        let removed = repo.remove(1).unwrap().unwrap();
        assert_eq!(removed.description, "one");
        assert_eq!(repo.entries().len(), 1);
        assert_eq!(repo.entries()[0].id, 2);

        let blob = repo.store().get(ITEMS_KEY).unwrap().unwrap();
        let stored = decode_items(&blob, &FieldNames::default()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, 2);
    }

    #[test]
    fn removing_last_entry_removes_key() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.0, "A", "P", "x")).unwrap();
        assert!(repo.store().contains(ITEMS_KEY));
        repo.remove(1).unwrap();
        assert!(!repo.store().contains(ITEMS_KEY));
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.0, "A", "P", "x")).unwrap();
        assert!(repo.remove(42).unwrap().is_none());
        assert_eq!(repo.entries().len(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.0, "A", "P", "one")).unwrap();
        repo.add(draft(day(1), 1.0, "A", "P", "two")).unwrap();
        repo.remove(1).unwrap();
        let third = repo.add(draft(day(1), 1.0, "A", "P", "three")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn ids_are_not_reused_across_reload() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.0, "A", "P", "one")).unwrap();
        repo.add(draft(day(1), 1.0, "A", "P", "two")).unwrap();
        repo.remove(2).unwrap();

        let mut reopened =
            Repository::init(repo.store().clone(), FieldNames::default(), day(1)).unwrap();
        let entry = reopened.add(draft(day(1), 1.0, "A", "P", "three")).unwrap();
        assert_eq!(entry.id, 3);
    }

    #[test]
    fn id_counter_survives_removing_every_entry() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.0, "A", "P", "one")).unwrap();
        repo.remove(1).unwrap();
        assert!(!repo.store().contains(ITEMS_KEY));
        assert_eq!(
            repo.store().get(NEXT_ID_KEY).unwrap().as_deref(),
            Some("2")
        );

        let mut reopened =
            Repository::init(repo.store().clone(), FieldNames::default(), day(1)).unwrap();
        assert!(reopened.entries().is_empty());
        assert_eq!(reopened.add(draft(day(1), 1.0, "A", "P", "x")).unwrap().id, 2);
    }

    #[test]
    fn malformed_id_counter_falls_back_to_stored_max() {
        let blob = r#"[{"id":4,"date":"2024-01-01","time":1,"customer":"A","project":"P","description":"x"}]"#;
        let mut store = MemoryStore::with_value(ITEMS_KEY, blob);
        store.set(NEXT_ID_KEY, "soon").unwrap();
        let mut repo = Repository::init(store, FieldNames::default(), day(1)).unwrap();
        assert_eq!(repo.add(draft(day(1), 1.0, "A", "P", "y")).unwrap().id, 5);
    }

    #[test]
    fn next_id_continues_from_stored_max() {
        let blob = r#"[{"id":4,"date":"2024-01-01","time":1,"customer":"A","project":"P","description":"x"}]"#;
        let store = MemoryStore::with_value(ITEMS_KEY, blob);
        let mut repo = Repository::init(store, FieldNames::default(), day(1)).unwrap();
        let entry = repo.add(draft(day(1), 1.0, "A", "P", "y")).unwrap();
        assert_eq!(entry.id, 5);
    }

    #[test]
    fn malformed_items_are_backed_up_and_reset() {
        let store = MemoryStore::with_value(ITEMS_KEY, "not json {{{");
        let repo = Repository::init(store, FieldNames::default(), day(1)).unwrap();
        assert!(repo.entries().is_empty());
        assert!(!repo.store().contains(ITEMS_KEY));
        assert_eq!(
            repo.store().get(BACKUP_KEY).unwrap().as_deref(),
            Some("not json {{{")
        );
    }

    #[test]
    fn failed_add_leaves_collection_unchanged() {
        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        let mut repo = Repository::init(store, FieldNames::default(), day(1)).unwrap();
        let result = repo.add(draft(day(1), 1.0, "A", "P", "x"));
        assert!(matches!(result, Err(RepositoryError::Store(_))));
        assert!(repo.entries().is_empty());
    }

    #[test]
    fn failed_remove_restores_entry_in_place() {
        let mut repo = Repository::init(MemoryStore::new(), FieldNames::default(), day(1)).unwrap();
        repo.add(draft(day(1), 1.0, "A", "P", "one")).unwrap();
        repo.add(draft(day(1), 1.0, "A", "P", "two")).unwrap();
        repo.store.set_unavailable(true);
        assert!(repo.remove(1).is_err());
        let ids: Vec<u64> = repo.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn set_date_accepts_slashes_and_reports_change() {
        let mut repo = empty_repo();
        assert!(repo.set_date("2024/01/05").unwrap());
        assert_eq!(repo.current_date(), "2024-01-05");
        assert!(!repo.set_date("2024-01-05").unwrap());
    }

    #[test]
    fn set_date_rejects_garbage_and_keeps_date() {
        let mut repo = empty_repo();
        assert!(matches!(
            repo.set_date("31/31/31"),
            Err(RepositoryError::InvalidDate(_))
        ));
        assert_eq!(repo.date(), day(1));
    }

    #[test]
    fn set_date_empty_resets_to_today() {
        let mut repo = empty_repo();
        repo.set_date("").unwrap();
        assert_eq!(repo.date(), local_today());
    }

    #[test]
    fn shift_date_moves_by_days() {
        let mut repo = empty_repo();
        repo.shift_date(1);
        assert_eq!(repo.date(), day(2));
        repo.shift_date(-2);
        assert_eq!(repo.current_date(), "2023-12-31");
    }

    #[test]
    fn total_hours_sums_selected_day() {
        let mut repo = empty_repo();
        repo.add(draft(day(1), 1.5, "A", "P", "x")).unwrap();
        repo.add(draft(day(1), 2.0, "A", "P", "y")).unwrap();
        repo.add(draft(day(2), 4.0, "A", "P", "z")).unwrap();
        assert_eq!(repo.total_hours(day(1)), 3.5);
    }

    #[test]
    fn parse_id_tolerates_text_forms() {
        assert_eq!(parse_id("2"), Some(2));
        assert_eq!(parse_id(" 2 "), Some(2));
        assert_eq!(parse_id("2.0"), Some(2));
        assert_eq!(parse_id("2.5"), None);
        assert_eq!(parse_id("x"), None);
    }
}
