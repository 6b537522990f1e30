use std::path::Path;

use tracing::{debug, info};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::logging::init_stderr_logging;
use crate::io::store::FileStore;
use crate::model::config::AppConfig;
use crate::model::entry::{Field, parse_date};
use crate::ops::autocomplete::{AutocompleteEngine, find_matches};
use crate::ops::daily_list::DailyList;
use crate::ops::form::{EntryForm, FormContext, SubmitOutcome};
use crate::ops::repository::{Repository, local_today, parse_id};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: &AppConfig, data_dir: &Path) -> CmdResult {
    init_stderr_logging();
    let json = cli.json;

    let Some(cmd) = cli.command else {
        return Err("no command given (run `tlg` without arguments for the TUI)".into());
    };

    let mut repo = open_repo(config, data_dir)?;
    debug!(data_dir = %data_dir.display(), entries = repo.entries().len(), "loaded");

    match cmd {
        Commands::Add(args) => cmd_add(&mut repo, config, args, json),
        Commands::List(args) => cmd_list(&repo, args, json),
        Commands::Rm(args) => cmd_rm(&mut repo, args, json),
        Commands::Suggest(args) => cmd_suggest(&repo, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_repo(
    config: &AppConfig,
    data_dir: &Path,
) -> Result<Repository<FileStore>, Box<dyn std::error::Error>> {
    let store = FileStore::open(data_dir)?;
    Ok(Repository::init(store, config.fields.clone(), local_today())?)
}

/// A `--date` argument, or today when absent.
fn resolve_date(raw: Option<&str>) -> Result<chrono::NaiveDate, String> {
    match raw {
        None => Ok(local_today()),
        Some(s) => parse_date(s).ok_or_else(|| format!("invalid date: {} (expected YYYY-MM-DD)", s)),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_add(
    repo: &mut Repository<FileStore>,
    config: &AppConfig,
    args: AddArgs,
    json: bool,
) -> CmdResult {
    // Same validation and storage path as the TUI form
    let mut form = EntryForm::new(repo.date(), config.form.time_step);
    form.set_value(Field::Date, args.date.as_deref().unwrap_or(""));
    form.set_value(Field::Time, &args.time);
    form.set_value(Field::Customer, &args.customer);
    form.set_value(Field::Project, &args.project);
    form.set_value(Field::Description, &args.description);

    let mut list = DailyList::new(repo.date());
    let mut autocomplete = AutocompleteEngine::new();
    let mut ctx = FormContext {
        repo,
        list: &mut list,
        autocomplete: &mut autocomplete,
    };

    match form.submit(&mut ctx)? {
        SubmitOutcome::Added(entry) => {
            info!(id = entry.id, "entry logged");
            if json {
                println!("{}", serde_json::to_string_pretty(&entry_to_json(&entry))?);
            } else {
                println!("{}", entry.id);
            }
            Ok(())
        }
        SubmitOutcome::Invalid(fields) => {
            let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
            Err(format!("missing or invalid: {}", names.join(", ")).into())
        }
    }
}

fn cmd_list(repo: &Repository<FileStore>, args: ListArgs, json: bool) -> CmdResult {
    let date = resolve_date(args.date.as_deref())?;
    if json {
        let day = day_to_json(date, repo.by_date(date));
        println!("{}", serde_json::to_string_pretty(&day)?);
    } else {
        for line in format_day_listing(date, repo.by_date(date)) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_rm(repo: &mut Repository<FileStore>, args: RmArgs, json: bool) -> CmdResult {
    let id = parse_id(&args.id).ok_or_else(|| format!("invalid id: {}", args.id))?;
    let entry = repo
        .remove(id)?
        .ok_or_else(|| format!("entry not found: {}", id))?;
    info!(id, "entry removed");
    if json {
        println!("{}", serde_json::to_string_pretty(&entry_to_json(&entry))?);
    } else {
        println!(
            "removed {}: {} {} / {}",
            entry.id,
            entry.hours_label(),
            entry.customer,
            entry.project
        );
    }
    Ok(())
}

fn cmd_suggest(repo: &Repository<FileStore>, args: SuggestArgs, json: bool) -> CmdResult {
    let field = Field::parse(&args.field)
        .filter(|f| f.completes())
        .ok_or_else(|| {
            format!(
                "no suggestions for field '{}' (use customer, project or description)",
                args.field
            )
        })?;
    let matches = if args.partial.is_empty() {
        Vec::new()
    } else {
        find_matches(repo.entries(), field, &args.partial)
    };

    if json {
        let out = SuggestJson {
            field: field.to_string(),
            partial: args.partial,
            matches,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for value in &matches {
            println!("{}", value);
        }
    }
    Ok(())
}
