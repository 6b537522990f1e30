use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::config::AppConfig;
use crate::model::entry::EntryDraft;
use crate::ops::repository::Repository;
use crate::tui::app::{App, Store};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// The date every test app is opened on.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// An app with an empty log.
pub fn empty_app() -> App {
    let store: Store = Box::new(MemoryStore::new());
    let repo = Repository::init(store, Default::default(), test_date()).unwrap();
    App::new(repo, &AppConfig::default())
}

/// An app with two entries on the test date and one the day after.
pub fn app_with_entries() -> App {
    let store: Store = Box::new(MemoryStore::new());
    let mut repo = Repository::init(store, Default::default(), test_date()).unwrap();
    let next_day = test_date().succ_opt().unwrap();
    for (date, time, customer, project, description) in [
        (test_date(), 1.5, "Acme", "Website", "design"),
        (test_date(), 2.0, "Acme", "App", "bugfix"),
        (next_day, 1.0, "Beta", "Ops", "deploy"),
    ] {
        repo.add(EntryDraft {
            date,
            time,
            customer: customer.into(),
            project: project.into(),
            description: description.into(),
        })
        .unwrap();
    }
    App::new(repo, &AppConfig::default())
}
