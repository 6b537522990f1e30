use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

use crate::io::logging::init_file_logging;
use crate::io::store::{FileStore, KeyValueStore};
use crate::model::config::AppConfig;
use crate::model::entry::{Field, format_hours};
use crate::ops::autocomplete::AutocompleteEngine;
use crate::ops::daily_list::DailyList;
use crate::ops::form::{EntryForm, FormContext, SubmitOutcome};
use crate::ops::repository::{Repository, RepositoryError, local_today};

use super::input;
use super::render;
use super::theme::Theme;

pub type Store = Box<dyn KeyValueStore>;

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The entry form (the focused field lives in `EntryForm`)
    Form,
    /// The list of entries for the selected day
    List,
}

/// One-line message shown in the status row until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

/// Application context: owns every component and wires them together.
pub struct App {
    pub repo: Repository<Store>,
    pub form: EntryForm,
    pub autocomplete: AutocompleteEngine,
    pub list: DailyList,
    pub focus: Focus,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub show_help: bool,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

/// Tab order of the form fields, followed by the list
const FOCUS_ORDER: [Field; 5] = Field::ALL;

impl App {
    pub fn new(repo: Repository<Store>, config: &AppConfig) -> Self {
        let date = repo.date();
        let mut list = DailyList::new(date);
        list.render_for(date, repo.entries());

        App {
            form: EntryForm::new(date, config.form.time_step),
            autocomplete: AutocompleteEngine::new(),
            list,
            repo,
            focus: Focus::Form,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            show_help: false,
            status: None,
            should_quit: false,
        }
    }

    /// Run `f` with the form and the collaborators it drives.
    pub fn with_form<R>(
        &mut self,
        f: impl FnOnce(&mut EntryForm, &mut FormContext<'_, Store>) -> R,
    ) -> R {
        let mut ctx = FormContext {
            repo: &mut self.repo,
            list: &mut self.list,
            autocomplete: &mut self.autocomplete,
        };
        f(&mut self.form, &mut ctx)
    }

    /// The form field with the cursor, if the form has focus.
    pub fn focused_field(&self) -> Option<Field> {
        match self.focus {
            Focus::Form => self.form.focused(),
            Focus::List => None,
        }
    }

    pub fn focus_field(&mut self, field: Field) {
        self.focus = Focus::Form;
        self.with_form(|form, ctx| form.focus(field, ctx));
    }

    pub fn focus_list(&mut self) {
        self.with_form(|form, ctx| form.blur(ctx));
        self.focus = Focus::List;
    }

    /// Tab: Date → Time → Customer → Project → Description → list → Date
    pub fn focus_next(&mut self) {
        match self.focused_field() {
            Some(field) => match FOCUS_ORDER.iter().position(|&f| f == field) {
                Some(i) if i + 1 < FOCUS_ORDER.len() => self.focus_field(FOCUS_ORDER[i + 1]),
                _ => self.focus_list(),
            },
            None => self.focus_field(FOCUS_ORDER[0]),
        }
    }

    /// Shift+Tab: the reverse of [`focus_next`](Self::focus_next)
    pub fn focus_prev(&mut self) {
        match self.focused_field() {
            Some(field) => match FOCUS_ORDER.iter().position(|&f| f == field) {
                Some(0) | None => self.focus_list(),
                Some(i) => self.focus_field(FOCUS_ORDER[i - 1]),
            },
            None => self.focus_field(FOCUS_ORDER[FOCUS_ORDER.len() - 1]),
        }
    }

    /// Report the result of a submit in the status row.
    pub fn report_submit(&mut self, result: Result<Option<SubmitOutcome>, RepositoryError>) {
        match result {
            Ok(Some(SubmitOutcome::Added(entry))) => {
                info!(id = entry.id, "entry logged");
                self.status = Some(StatusMessage::Info(format!(
                    "Logged {} for {} / {}",
                    format_hours(entry.time),
                    entry.customer,
                    entry.project
                )));
            }
            Ok(Some(SubmitOutcome::Invalid(fields))) => {
                let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
                self.status = Some(StatusMessage::Error(format!(
                    "Missing or invalid: {}",
                    names.join(", ")
                )));
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "could not save entry");
                self.status = Some(StatusMessage::Error(format!("Not saved: {}", e)));
            }
        }
    }

    /// Remove the highlighted entry of the list.
    pub fn remove_selected(&mut self) {
        let Some(id) = self.list.selected_entry().map(|e| e.id) else {
            return;
        };
        match self.repo.remove(id) {
            Ok(Some(entry)) => {
                self.list.remove(id);
                self.status = Some(StatusMessage::Info(format!(
                    "Removed {} for {} / {}",
                    format_hours(entry.time),
                    entry.customer,
                    entry.project
                )));
                if self.list.rows().is_empty() {
                    self.focus_field(Field::Time);
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, id, "could not remove entry");
                self.status = Some(StatusMessage::Error(format!("Not removed: {}", e)));
            }
        }
    }

    /// Clear the form and go back to today.
    pub fn reset(&mut self) {
        self.focus = Focus::Form;
        self.with_form(|form, ctx| form.reset(local_today(), ctx));
    }
}

/// Run the TUI application against the store in `data_dir`
pub fn run(config: &AppConfig, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    init_file_logging(data_dir)?;

    let store: Store = Box::new(FileStore::open(data_dir)?);
    let repo = Repository::init(store, config.fields.clone(), local_today())?;
    let mut app = App::new(repo, config);
    info!(data_dir = %data_dir.display(), "starting tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
