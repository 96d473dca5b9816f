//! Command-line front-end for editable encyclopedia descriptions.
//!
//! # Responsibility
//! - Load a session from a SQLite save file, run one command, write it back.
//! - Print the same user-facing messages the in-game UI shows.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use encyclopedia_core::{
    default_log_level, init_logging, report_outcome, save_description, AnnotationSession,
    DescriptionApi, EncyclopediaSettings, ExchangeOutcome, ExchangeService, Notifier,
    SavedDescription, SqliteSaveSlot,
};
use log::{debug, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "encyclopedia")]
#[command(about = "Manage player-written encyclopedia descriptions in a save file")]
#[command(version)]
struct Cli {
    /// Save file holding the descriptions
    #[arg(long, value_name = "FILE", default_value = "campaign.sav")]
    save: PathBuf,
    /// Settings JSON (defaults apply when absent)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Absolute directory for rolling log files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every description
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entity's description
    Get { id: String },
    /// Set one entity's description (empty text clears it)
    Set { id: String, text: String },
    /// Remove one entity's description
    Remove { id: String },
    /// Export all descriptions to the shared JSON file
    Export {
        /// Output file (default: configured export location)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Import and merge descriptions from a JSON file
    Import {
        /// Input file (default: configured export location)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Get { .. } => "get",
            Self::Set { .. } => "set",
            Self::Remove { .. } => "remove",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            bail!("logging init failed: {err}");
        }
    }

    let settings = match cli.settings.as_ref() {
        Some(path) => EncyclopediaSettings::load(path)?,
        None => EncyclopediaSettings::default(),
    };

    let mut slot = SqliteSaveSlot::open(&cli.save)
        .with_context(|| format!("failed to open save file `{}`", cli.save.display()))?;
    let session = AnnotationSession::start();
    session.load_from(&slot)?;
    info!(
        "event=cli_command module=cli status=start command={} save={}",
        cli.command.name(),
        cli.save.display()
    );

    let code = match cli.command {
        Command::List { json } => {
            let mut all: Vec<_> = DescriptionApi::new(Some(&session))
                .get_all_descriptions()
                .into_iter()
                .collect();
            all.sort();
            if json {
                let map: serde_json::Map<_, _> = all
                    .into_iter()
                    .map(|(id, text)| (id, serde_json::Value::String(text)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                for (id, text) in &all {
                    println!("{id}\t{}", text.replace('\n', "\\n"));
                }
                println!("{} description(s)", all.len());
            }
            ExitCode::SUCCESS
        }
        Command::Get { id } => match session.get(&id) {
            Some(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("no description for `{id}`");
                ExitCode::FAILURE
            }
        },
        Command::Set { id, text } => {
            let saved = set_description(&session, &settings, &id, &text)?;
            if saved.truncated {
                eprintln!(
                    "description truncated to {} characters (maxDescriptionLength)",
                    saved.chars
                );
            }
            session.save_to(&mut slot)?;
            ExitCode::SUCCESS
        }
        Command::Remove { id } => {
            if session.remove(&id).is_some() {
                session.save_to(&mut slot)?;
            }
            ExitCode::SUCCESS
        }
        Command::Export { out } => {
            let path = out.unwrap_or_else(|| settings.export_file_path());
            report(ExchangeService::new(path).export(Some(&session)))
        }
        Command::Import { file } => {
            let service = ExchangeService::new(settings.export_file_path());
            let outcome = match file {
                Some(path) => service.import_from(Some(&session), path),
                None => service.import(Some(&session)),
            };
            if outcome.ok {
                session.save_to(&mut slot)?;
            }
            report(outcome)
        }
    };

    session.end();
    Ok(code)
}

/// Stores `text` under the same length policy as the in-game dialog.
fn set_description(
    session: &AnnotationSession,
    settings: &EncyclopediaSettings,
    id: &str,
    text: &str,
) -> Result<SavedDescription> {
    match save_description(session, id, text, settings) {
        Some(saved) => Ok(saved),
        None => bail!("session ended before `{id}` could be saved"),
    }
}

/// Prints messages the way the in-game message log shows them.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn debug(&self, message: &str) {
        debug!("event=notify module=cli level=debug message={message}");
    }
}

fn report(outcome: ExchangeOutcome) -> ExitCode {
    report_outcome(&ConsoleNotifier, &outcome);
    if outcome.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
