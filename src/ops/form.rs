use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::io::store::KeyValueStore;
use crate::model::entry::{Entry, EntryDraft, Field, format_decimal, parse_date};
use crate::ops::autocomplete::AutocompleteEngine;
use crate::ops::daily_list::DailyList;
use crate::ops::repository::{Repository, RepositoryError};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Text and cursor (byte offset) of one form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInput {
    pub value: String,
    pub cursor: usize,
}

impl FieldInput {
    fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.value, self.cursor) {
            self.value.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    fn delete(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.value, self.cursor) {
            self.value.drain(self.cursor..next);
        }
    }

    fn left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = prev;
        }
    }

    fn right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = next;
        }
    }
}

/// Keys the form reacts to, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Escape,
    Backspace,
    Delete,
    Char(char),
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Added(Entry),
    /// Nothing was stored; these fields need fixing (in form order)
    Invalid(Vec<Field>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub invalid: BTreeSet<Field>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// The collaborators the form drives. Borrowed per call from the owner.
pub struct FormContext<'a, S: KeyValueStore> {
    pub repo: &'a mut Repository<S>,
    pub list: &'a mut DailyList,
    pub autocomplete: &'a mut AutocompleteEngine,
}

impl<S: KeyValueStore> FormContext<'_, S> {
    fn refresh_list(&mut self) {
        let date = self.repo.date();
        self.list.render_for(date, self.repo.entries());
    }
}

/// Parse a time value: a positive, finite number of hours.
pub fn parse_time(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// The entry form: field buffers, focus, and per-field error flags.
#[derive(Debug, Clone)]
pub struct EntryForm {
    inputs: [FieldInput; 5],
    focused: Option<Field>,
    invalid: BTreeSet<Field>,
    time_step: f64,
}

fn slot(field: Field) -> usize {
    field as usize
}

impl EntryForm {
    /// A blank form showing `date`, focused on the first text field.
    pub fn new(date: NaiveDate, time_step: f64) -> Self {
        let mut form = EntryForm {
            inputs: Default::default(),
            focused: Some(Field::Time),
            invalid: BTreeSet::new(),
            time_step,
        };
        form.input_mut(Field::Date)
            .set(date.format("%Y-%m-%d").to_string());
        form
    }

    pub fn input(&self, field: Field) -> &FieldInput {
        &self.inputs[slot(field)]
    }

    fn input_mut(&mut self, field: Field) -> &mut FieldInput {
        &mut self.inputs[slot(field)]
    }

    pub fn value(&self, field: Field) -> &str {
        &self.input(field).value
    }

    /// Replace a field's text, cursor at the end.
    pub fn set_value(&mut self, field: Field, value: &str) {
        self.input_mut(field).set(value);
    }

    pub fn focused(&self) -> Option<Field> {
        self.focused
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Current field values keyed by field.
    pub fn serialize(&self) -> BTreeMap<Field, String> {
        Field::ALL
            .iter()
            .map(|&f| (f, self.value(f).to_string()))
            .collect()
    }

    /// Check every field without touching the error flags.
    fn check(&self) -> Result<EntryDraft, BTreeSet<Field>> {
        let mut invalid = BTreeSet::new();

        let date = parse_date(self.value(Field::Date));
        if date.is_none() {
            invalid.insert(Field::Date);
        }
        let time = parse_time(self.value(Field::Time));
        if time.is_none() {
            invalid.insert(Field::Time);
        }
        for field in [Field::Customer, Field::Project, Field::Description] {
            if self.value(field).is_empty() {
                invalid.insert(field);
            }
        }

        match (date, time) {
            (Some(date), Some(time)) if invalid.is_empty() => Ok(EntryDraft {
                date,
                time,
                customer: self.value(Field::Customer).to_string(),
                project: self.value(Field::Project).to_string(),
                description: self.value(Field::Description).to_string(),
            }),
            _ => Err(invalid),
        }
    }

    /// Validate all fields and flag the invalid ones.
    pub fn validate(&mut self) -> Validation {
        let invalid = self.check().err().unwrap_or_default();
        self.invalid = invalid.clone();
        Validation { invalid }
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// Move focus to `field`. The previous field is blurred first; the new
    /// one gets its cursor at the end and may open autocomplete.
    pub fn focus<S: KeyValueStore>(&mut self, field: Field, ctx: &mut FormContext<'_, S>) {
        if self.focused == Some(field) {
            return;
        }
        self.blur(ctx);
        self.focused = Some(field);
        let input = self.input_mut(field);
        input.cursor = input.value.len();
        self.refresh_autocomplete(ctx);
    }

    /// Focus left the form field: autocomplete closes, the date commits.
    pub fn blur<S: KeyValueStore>(&mut self, ctx: &mut FormContext<'_, S>) {
        if let Some(prev) = self.focused.take() {
            ctx.autocomplete.close();
            if prev == Field::Date {
                self.commit_date(ctx);
            }
        }
    }

    fn refresh_autocomplete<S: KeyValueStore>(&self, ctx: &mut FormContext<'_, S>) {
        match self.focused {
            Some(field) if field.completes() => {
                ctx.autocomplete
                    .open(field, self.value(field), ctx.repo.entries())
            }
            _ => ctx.autocomplete.close(),
        }
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    /// Apply one key to the focused field. Returns the outcome when the key
    /// submitted the form.
    pub fn handle_key<S: KeyValueStore>(
        &mut self,
        key: FormKey,
        ctx: &mut FormContext<'_, S>,
    ) -> Result<Option<SubmitOutcome>, RepositoryError> {
        let Some(field) = self.focused else {
            return Ok(None);
        };

        match field {
            Field::Date => match key {
                FormKey::Up => self.shift_date(1, ctx),
                FormKey::Down => self.shift_date(-1, ctx),
                FormKey::Enter => {
                    self.commit_date(ctx);
                }
                FormKey::Escape => {}
                other => self.edit(field, other),
            },
            Field::Time => match key {
                FormKey::Up => self.step_time(self.time_step),
                FormKey::Down => self.step_time(-self.time_step),
                FormKey::Enter => return self.submit(ctx).map(Some),
                FormKey::Escape => {}
                other => self.edit(field, other),
            },
            _ => match key {
                FormKey::Up => ctx.autocomplete.previous(),
                FormKey::Down => ctx.autocomplete.next(),
                // Open dropdown: fill the active match, or the first one
                FormKey::Enter if ctx.autocomplete.is_open() => {
                    let value = ctx
                        .autocomplete
                        .active_value()
                        .or_else(|| ctx.autocomplete.matches().first().map(String::as_str))
                        .map(str::to_string);
                    if let Some(value) = value {
                        self.input_mut(field).set(value);
                    }
                    ctx.autocomplete.close();
                }
                FormKey::Enter => return self.submit(ctx).map(Some),
                FormKey::Escape => ctx.autocomplete.close(),
                other => {
                    self.edit(field, other);
                    self.refresh_autocomplete(ctx);
                }
            },
        }
        Ok(None)
    }

    fn edit(&mut self, field: Field, key: FormKey) {
        let input = self.input_mut(field);
        match key {
            FormKey::Char(c) if !c.is_control() => input.insert(c),
            FormKey::Backspace => input.backspace(),
            FormKey::Delete => input.delete(),
            FormKey::Left => input.left(),
            FormKey::Right => input.right(),
            FormKey::Home => input.cursor = 0,
            FormKey::End => input.cursor = input.value.len(),
            _ => {}
        }
    }

    /// Add `delta` hours to the time field, never going below zero. An empty
    /// or unparseable value counts as zero.
    pub fn step_time(&mut self, delta: f64) {
        let current = self
            .value(Field::Time)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        let next = ((current + delta).max(0.0) * 1e6).round() / 1e6;
        self.input_mut(Field::Time).set(format_decimal(next));
    }

    // -----------------------------------------------------------------------
    // Date
    // -----------------------------------------------------------------------

    /// Apply the typed date to the repository. Empty input means today.
    /// Invalid input is flagged and left in place for correction.
    pub fn commit_date<S: KeyValueStore>(&mut self, ctx: &mut FormContext<'_, S>) -> bool {
        let raw = self.value(Field::Date).to_string();
        match ctx.repo.set_date(&raw) {
            Ok(changed) => {
                self.invalid.remove(&Field::Date);
                self.input_mut(Field::Date).set(ctx.repo.current_date());
                if changed || ctx.list.date() != ctx.repo.date() {
                    ctx.refresh_list();
                }
                true
            }
            Err(e) => {
                debug!(error = %e, "date rejected");
                self.invalid.insert(Field::Date);
                false
            }
        }
    }

    /// Move the selected date by `days` and show that day.
    pub fn shift_date<S: KeyValueStore>(&mut self, days: i64, ctx: &mut FormContext<'_, S>) {
        ctx.repo.shift_date(days);
        self.invalid.remove(&Field::Date);
        self.input_mut(Field::Date).set(ctx.repo.current_date());
        ctx.refresh_list();
    }

    // -----------------------------------------------------------------------
    // Submit / reset
    // -----------------------------------------------------------------------

    /// Validate and store the entry. On success the text fields are cleared
    /// (the date stays) and focus returns to the first text field; otherwise
    /// focus moves to the first invalid field.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        ctx: &mut FormContext<'_, S>,
    ) -> Result<SubmitOutcome, RepositoryError> {
        ctx.autocomplete.close();
        self.commit_date(ctx);

        let draft = match self.check() {
            Ok(draft) => draft,
            Err(invalid) => {
                let fields: Vec<Field> = invalid.iter().copied().collect();
                debug!(?fields, "entry rejected");
                self.invalid = invalid;
                if let Some(&first) = fields.first() {
                    self.focus(first, ctx);
                }
                return Ok(SubmitOutcome::Invalid(fields));
            }
        };

        let entry = ctx.repo.add(draft)?;
        ctx.list.add(&entry);
        self.invalid.clear();
        self.clear_text_fields();
        self.focus(Field::Time, ctx);
        Ok(SubmitOutcome::Added(entry))
    }

    /// Clear every field and error, select `today`, focus the first text field.
    pub fn reset<S: KeyValueStore>(&mut self, today: NaiveDate, ctx: &mut FormContext<'_, S>) {
        ctx.autocomplete.close();
        self.invalid.clear();
        self.clear_text_fields();
        ctx.repo.select_date(today);
        self.input_mut(Field::Date).set(ctx.repo.current_date());
        ctx.refresh_list();
        self.focused = None;
        self.focus(Field::Time, ctx);
    }

    fn clear_text_fields(&mut self) {
        for field in Field::TEXT {
            self.input_mut(field).set(String::new());
        }
    }
}
