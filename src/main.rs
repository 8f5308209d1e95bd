mod app;
mod logging;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use drill::config::Config;
use drill::{Answer, CardId, Storage, clock, review};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drill", about = "Review question/answer flashcards", version)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a card; it is due immediately
    Add { question: String, answer: String },

    /// List cards that are due now, most overdue first
    Due {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Record a verdict for a card
    Mark { id: CardId, verdict: Verdict },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Verdict {
    Correct,
    Incorrect,
}

impl From<Verdict> for Answer {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Correct => Answer::Correct,
            Verdict::Incorrect => Answer::Incorrect,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    config.ensure_dirs()?;
    logging::init(&config)?;

    match cli.command {
        None => run_review(&config),
        Some(Command::Add { question, answer }) => {
            let storage = open_storage(&config)?;
            let id = review::create_card(&storage, &question, &answer, clock::now())?;
            println!("Added card {}", id);
            Ok(())
        }
        Some(Command::Due { json }) => {
            let storage = open_storage(&config)?;
            let cards = review::list_due_cards(&storage, clock::now())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else if cards.is_empty() {
                println!("No cards due");
            } else {
                for card in cards {
                    println!(
                        "{}\tstage {}\t{} correct\t{}\t{}",
                        card.id,
                        card.stage,
                        card.correct_count,
                        clock::format_timestamp(card.next_review),
                        card.question
                    );
                }
            }
            Ok(())
        }
        Some(Command::Mark { id, verdict }) => {
            let storage = open_storage(&config)?;
            let state = review::record_answer(&storage, id, verdict.into(), clock::now())?;
            println!(
                "Card {}: stage {}, {} correct, next review {}",
                id,
                state.stage,
                state.correct_count,
                clock::format_timestamp(state.next_review)
            );
            Ok(())
        }
    }
}

fn open_storage(config: &Config) -> Result<Storage> {
    Storage::open(&config.db_path)
        .with_context(|| format!("Failed to open database: {}", config.db_path.display()))
}

fn run_review(config: &Config) -> Result<()> {
    if config.daily_backup {
        Storage::create_daily_backup(
            &config.db_path,
            clock::now().date(),
            config.backups_to_keep,
        )
        .context("Failed to back up database")?;
    }

    let app = App::new(open_storage(config)?);

    // Ignore SIGINT so Ctrl+C arrives as a key event and the terminal is restored
    #[cfg(unix)]
    unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGINT, || {})?;
    }

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    let stats = result?;
    log::info!(
        "Session ended: {} reviewed, {} correct, {} added",
        stats.reviewed,
        stats.correct,
        stats.added
    );
    println!(
        "Reviewed {} cards ({} correct), added {} in {}s",
        stats.reviewed,
        stats.correct,
        stats.added,
        stats.start_time.elapsed().as_secs()
    );

    Ok(())
}
