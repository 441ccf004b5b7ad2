//! boook CLI
//!
//! Command-line interface for boook - book collection tracking.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use boook_core::{BookStore, Config, Ownership, Profile, ReadingStatus, SlotStorage};

mod commands;
mod editor;
mod lookup;
mod movies;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "boook")]
#[command(about = "boook - local-first book collection tracking")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// First-time setup
    Init,
    /// Manage books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Manage yearly reading goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Manage reading lists
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Show library statistics
    Stats,
    /// Export the collection to a backup file
    Export {
        /// Target file (defaults to boook-backup-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a backup file, replacing the collection
    Import {
        /// Backup file to restore
        path: PathBuf,
    },
    /// Erase all stored data
    Reset,
    /// Browse movies
    Movie {
        #[command(subcommand)]
        command: MovieCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookCommands {
    /// Search the catalog service and add the picked result
    Add {
        /// Free-text search query
        query: String,
        /// Which candidate to add (1-based)
        #[arg(long, default_value_t = 1)]
        pick: usize,
        /// Mark the book as owned
        #[arg(long)]
        owned: bool,
        /// Initial reading status (requires --owned)
        #[arg(long)]
        status: Option<ReadingStatus>,
    },
    /// Add a book from manually entered metadata
    New {
        /// Book title
        #[arg(long)]
        title: String,
        /// Author (repeat for multiple)
        #[arg(long = "author")]
        authors: Vec<String>,
        /// Page count
        #[arg(long)]
        pages: Option<u32>,
        /// Category (repeat for multiple)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// ISBN-13
        #[arg(long)]
        isbn: Option<String>,
        /// Mark the book as owned
        #[arg(long)]
        owned: bool,
        /// Initial reading status (requires --owned)
        #[arg(long)]
        status: Option<ReadingStatus>,
    },
    /// Search the catalog service without adding anything
    Search {
        /// Free-text search query
        query: String,
    },
    /// List books
    #[command(alias = "ls")]
    List {
        /// Filter by ownership
        #[arg(long)]
        ownership: Option<Ownership>,
        /// Filter by reading status
        #[arg(long)]
        status: Option<ReadingStatus>,
        /// Only favorites
        #[arg(long)]
        favorite: bool,
        /// Match title or author (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Match category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show book details and related books
    Show {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// Edit a book interactively
    Edit {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// Toggle a book's favorite flag
    #[command(alias = "fav")]
    Favorite {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// Set a book's ownership
    Own {
        /// Book ID (full UUID or prefix)
        id: String,
        /// New ownership (owned or want_to_have)
        ownership: Ownership,
    },
    /// Set a book's reading status
    Status {
        /// Book ID (full UUID or prefix)
        id: String,
        /// New status (want_to_read, currently_reading or read)
        status: ReadingStatus,
    },
    /// Record reading progress
    Progress {
        /// Book ID (full UUID or prefix)
        id: String,
        /// Current page
        page: u32,
    },
    /// Rate a book 0-5
    Rate {
        /// Book ID (full UUID or prefix)
        id: String,
        /// Rating from 0 to 5
        rating: u8,
    },
    /// Edit a book's notes in $EDITOR
    Note {
        /// Book ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Add a yearly goal
    Add {
        /// Goal year
        #[arg(long)]
        year: i32,
        /// Books to finish
        #[arg(long)]
        target: u32,
    },
    /// List goals
    #[command(alias = "ls")]
    List,
    /// Update a goal
    Update {
        /// Goal ID (full UUID or prefix)
        id: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        target: Option<u32>,
    },
    /// Delete a goal
    #[command(alias = "rm")]
    Delete {
        /// Goal ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Create an empty reading list
    Create {
        /// List name
        name: String,
    },
    /// Show all reading lists
    #[command(alias = "ls")]
    List,
    /// Show one list with its books
    Show {
        /// List ID (full UUID or prefix)
        id: String,
    },
    /// Rename a list
    Rename {
        /// List ID (full UUID or prefix)
        id: String,
        /// New name
        name: String,
    },
    /// Delete a list
    #[command(alias = "rm")]
    Delete {
        /// List ID (full UUID or prefix)
        id: String,
    },
    /// Add a book to a list
    Add {
        /// List ID (full UUID or prefix)
        list_id: String,
        /// Book ID (full UUID or prefix)
        book_id: String,
    },
    /// Remove a book from a list
    Remove {
        /// List ID (full UUID or prefix)
        list_id: String,
        /// Book ID (full UUID or prefix)
        book_id: String,
    },
    /// Replace a list's ordering
    Reorder {
        /// List ID (full UUID or prefix)
        list_id: String,
        /// Book IDs in the new order
        #[arg(num_args = 1..)]
        book_ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum MovieCommands {
    /// Browse popular movies
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search movies by title
    Search {
        /// Free-text search query
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List movie genres
    Genres,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, tmdb_api_key, max_search_results)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match cli.command {
        // Commands that don't need the store
        Commands::Config { command } => handle_config_command(command, &output),
        Commands::Movie { command } => {
            let config = Config::load().context("Failed to load configuration")?;
            handle_movie_command(command, &config, &output).await
        }
        command => {
            let config = Config::load().context("Failed to load configuration")?;
            let mut store = BookStore::open(config.clone());
            let profile = Profile::new(SlotStorage::new(config));

            if matches!(command, Commands::Init) {
                return run_first_time_setup(&profile, &output);
            }

            // First-run onboarding for interactive sessions
            if !profile.is_onboarded() && output.should_prompt() {
                run_first_time_setup(&profile, &output)?;
            }

            match command {
                Commands::Book { command } => {
                    handle_book_command(command, &mut store, &output).await
                }
                Commands::Goal { command } => handle_goal_command(command, &mut store, &output),
                Commands::List { command } => handle_list_command(command, &mut store, &output),
                Commands::Stats => commands::stats::show(&store, &output),
                Commands::Export { output: path } => {
                    commands::backup::export(&store, &profile, path, &output)
                }
                Commands::Import { path } => {
                    commands::backup::import(&mut store, &profile, path, &output)
                }
                Commands::Reset => commands::backup::reset(&profile, &output),
                Commands::Init | Commands::Movie { .. } | Commands::Config { .. } => {
                    unreachable!() // Handled above
                }
            }
        }
    }
}

async fn handle_book_command(
    command: BookCommands,
    store: &mut BookStore,
    output: &Output,
) -> Result<()> {
    match command {
        BookCommands::Add {
            query,
            pick,
            owned,
            status,
        } => commands::book::add(store, query, pick, owned, status, output).await,
        BookCommands::New {
            title,
            authors,
            pages,
            categories,
            isbn,
            owned,
            status,
        } => commands::book::new_manual(
            store, title, authors, pages, categories, isbn, owned, status, output,
        ),
        BookCommands::Search { query } => commands::book::search(store, query, output).await,
        BookCommands::List {
            ownership,
            status,
            favorite,
            search,
            category,
        } => commands::book::list(store, ownership, status, favorite, search, category, output),
        BookCommands::Show { id } => commands::book::show(store, id, output),
        BookCommands::Edit { id } => commands::book::edit(store, id, output),
        BookCommands::Delete { id } => commands::book::delete(store, id, output),
        BookCommands::Favorite { id } => commands::book::favorite(store, id, output),
        BookCommands::Own { id, ownership } => commands::book::own(store, id, ownership, output),
        BookCommands::Status { id, status } => commands::book::status(store, id, status, output),
        BookCommands::Progress { id, page } => commands::book::progress(store, id, page, output),
        BookCommands::Rate { id, rating } => commands::book::rate(store, id, rating, output),
        BookCommands::Note { id } => commands::book::note(store, id, output),
    }
}

fn handle_goal_command(
    command: GoalCommands,
    store: &mut BookStore,
    output: &Output,
) -> Result<()> {
    match command {
        GoalCommands::Add { year, target } => commands::goal::add(store, year, target, output),
        GoalCommands::List => commands::goal::list(store, output),
        GoalCommands::Update { id, year, target } => {
            commands::goal::update(store, id, year, target, output)
        }
        GoalCommands::Delete { id } => commands::goal::delete(store, id, output),
    }
}

fn handle_list_command(
    command: ListCommands,
    store: &mut BookStore,
    output: &Output,
) -> Result<()> {
    match command {
        ListCommands::Create { name } => commands::list::create(store, name, output),
        ListCommands::List => commands::list::list_all(store, output),
        ListCommands::Show { id } => commands::list::show(store, id, output),
        ListCommands::Rename { id, name } => commands::list::rename(store, id, name, output),
        ListCommands::Delete { id } => commands::list::delete(store, id, output),
        ListCommands::Add { list_id, book_id } => {
            commands::list::add_book(store, list_id, book_id, output)
        }
        ListCommands::Remove { list_id, book_id } => {
            commands::list::remove_book(store, list_id, book_id, output)
        }
        ListCommands::Reorder { list_id, book_ids } => {
            commands::list::reorder(store, list_id, book_ids, output)
        }
    }
}

async fn handle_movie_command(
    command: MovieCommands,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        MovieCommands::Popular { page } => commands::movie::popular(config, page, output).await,
        MovieCommands::Search { query, page } => {
            commands::movie::search(config, query, page, output).await
        }
        MovieCommands::Genres => commands::movie::genres(config, output).await,
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Run first-time setup interactively
fn run_first_time_setup(profile: &Profile, output: &Output) -> Result<()> {
    use std::io::{self, Write};

    if profile.is_onboarded() {
        println!();
        println!("Already set up.");
        if let Some(name) = profile.display_name() {
            println!("Hello again, {}!", name);
        }
        return Ok(());
    }

    if !output.should_prompt() {
        // Non-interactive: mark onboarding done without asking anything
        profile.complete_onboarding();
        return Ok(());
    }

    println!();
    println!("Welcome to boook!");
    println!();
    print!("What should we call you? (Enter to skip) ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let name = input.trim();

    if !name.is_empty() {
        profile.set_display_name(name);
    }
    profile.complete_onboarding();

    println!();
    match profile.display_name() {
        Some(name) => println!("All set, {}. Add your first book with: boook book add <query>", name),
        None => println!("All set. Add your first book with: boook book add <query>"),
    }
    println!();

    Ok(())
}
