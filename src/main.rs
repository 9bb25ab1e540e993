mod engine;
mod favorites;
mod language;
mod models;
mod source;
mod storage;
mod tui;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use engine::{SwipeConfig, SwipeEngine};
use favorites::FavoritesStore;
use language::LanguageStore;
use models::FavoriteKind;
use source::JobSource;
use storage::FilePersister;

const FAVORITES_KEY: &str = "favorites.json";
const LANGUAGE_KEY: &str = "language";

#[derive(Parser)]
#[command(name = "jobdeck")]
#[command(about = "Swipe-based job discovery - fetch, review, and save opportunities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a batch of jobs and swipe through them
    Swipe {
        /// Maximum number of jobs to fetch
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Search term, e.g. "rust engineer"
        #[arg(short, long)]
        search: Option<String>,

        /// Location filter, e.g. "Zurich"
        #[arg(long)]
        location: Option<String>,

        /// Use the bundled sample deck instead of the network
        #[arg(long)]
        sample: bool,
    },

    /// Manage saved jobs
    Favorites {
        #[command(subcommand)]
        command: FavoriteCommands,
    },

    /// Manage the interface language
    Lang {
        #[command(subcommand)]
        command: LangCommands,
    },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// List saved entries
    List {
        /// Filter by kind (job, profile, company)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Remove a saved entry by id
    Remove {
        /// Entry id
        id: String,
    },

    /// Remove all saved entries
    Clear,
}

#[derive(Subcommand)]
enum LangCommands {
    /// List supported languages
    List,

    /// Set the interface language
    Set {
        /// Language code (en, de, fr, it, rm)
        code: String,
    },

    /// Show the active language
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Swipe {
            limit,
            search,
            location,
            sample,
        } => {
            let mut favorites = FavoritesStore::load(FilePersister::for_key(FAVORITES_KEY)?)?;
            let lang = LanguageStore::load(
                FilePersister::for_key(LANGUAGE_KEY)?,
                language::system_locale().as_deref(),
            )?;

            let (batch, job_source) = if sample {
                (source::sample_batch(), None)
            } else {
                let job_source = JobSource::from_env(search, location);
                let batch = job_source.fetch_batch(limit)?;
                (batch, Some(job_source))
            };

            if batch.is_empty() {
                println!("No jobs found.");
                return Ok(());
            }

            let engine = SwipeEngine::new(batch, SwipeConfig::terminal());
            let stats = tui::run_deck(engine, &mut favorites, &lang, job_source.as_ref(), limit)?;

            println!("\nSession:");
            println!("  Reviewed:     {}", stats.total());
            println!("  Liked:        {}", stats.liked);
            println!("  Passed:       {}", stats.passed);
            println!("  Super-liked:  {}", stats.superliked);
            println!("  Saved total:  {}", favorites.len());
        }

        Commands::Favorites { command } => {
            let mut favorites = FavoritesStore::load(FilePersister::for_key(FAVORITES_KEY)?)?;
            match command {
                FavoriteCommands::List { kind } => {
                    let kind = kind.as_deref().map(str::parse::<FavoriteKind>).transpose()?;
                    let entries: Vec<_> = match kind {
                        Some(kind) => favorites.by_kind(kind),
                        None => favorites.iter().collect(),
                    };
                    if entries.is_empty() {
                        println!("No saved entries.");
                    } else {
                        println!(
                            "{:<14} {:<9} {:<30} {:<20} {:<18} {:<12}",
                            "ID", "KIND", "TITLE", "COMPANY", "LOCATION", "ADDED"
                        );
                        println!("{}", "-".repeat(105));
                        for entry in entries {
                            println!(
                                "{:<14} {:<9} {:<30} {:<20} {:<18} {:<12}",
                                truncate(&entry.id, 12),
                                entry.kind.as_str(),
                                truncate(&entry.title, 28),
                                truncate(&entry.company, 18),
                                truncate(&entry.location, 16),
                                entry.date_added.format("%Y-%m-%d")
                            );
                        }
                    }
                }

                FavoriteCommands::Remove { id } => {
                    if !favorites.has(&id) {
                        println!("No saved entry with id '{}'.", id);
                    } else {
                        favorites.remove(&id)?;
                        println!("Removed '{}'.", id);
                    }
                }

                FavoriteCommands::Clear => {
                    let count = favorites.len();
                    favorites.clear()?;
                    println!("Removed {} entries.", count);
                }
            }
        }

        Commands::Lang { command } => {
            let mut lang = LanguageStore::load(
                FilePersister::for_key(LANGUAGE_KEY)?,
                language::system_locale().as_deref(),
            )?;
            match command {
                LangCommands::List => {
                    println!("{:<6} {:<12} {:<12}", "CODE", "LABEL", "NATIVE");
                    println!("{}", "-".repeat(32));
                    for l in language::LANGUAGES {
                        let marker = if l.code == lang.current().code {
                            "*"
                        } else {
                            " "
                        };
                        println!(
                            "{} {:<4} {:<12} {:<12}",
                            marker, l.code, l.label, l.native_label
                        );
                    }
                }

                LangCommands::Set { code } => {
                    let chosen = language::find(&code)
                        .ok_or_else(|| anyhow!("Unsupported language code: {}", code))?;
                    lang.set_language(chosen)?;
                    println!("Language set to {} ({}).", chosen.label, chosen.native_label);
                }

                LangCommands::Show => {
                    let current = lang.current();
                    println!(
                        "{} — {} ({})",
                        current.code, current.label, current.native_label
                    );
                }
            }
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
