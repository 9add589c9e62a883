use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Rating,
    Year,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered users.
    Users,
    /// Register a user (no-op when the name already exists).
    Register { name: String },
    /// Remove a user together with all of their movies.
    RemoveUser { name: String },
    #[command(flatten)]
    Movie(MovieCommand),
}

/// Commands acting on the collection of the `--user` session.
#[derive(Subcommand, Debug)]
pub enum MovieCommand {
    /// List the active user's movies.
    List,
    Add {
        title: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        rating: f64,
        #[arg(long)]
        poster: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, value_name = "ID")]
        imdb_id: Option<String>,
    },
    /// Change rating and/or notes of every movie with this title.
    Update {
        title: String,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long, default_value_t = false)]
        clear_notes: bool,
    },
    /// Delete every movie with this title.
    Delete { title: String },
    Stats,
    Search { query: String },
    Sorted {
        #[arg(long, value_enum, default_value_t = SortKey::Rating)]
        by: SortKey,
        #[arg(long, default_value_t = false)]
        newest_first: bool,
    },
    Filter {
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        start_year: Option<i32>,
        #[arg(long)]
        end_year: Option<i32>,
    },
    Random,
    /// Print the title-keyed collection as JSON for the site renderer.
    Export,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Manage a personal movie collection stored in a local SQLite catalog"
)]
pub struct Cli {
    #[arg(
        long,
        env = "MOVIESHELF_DB",
        default_value = "data/movies.db",
        value_name = "PATH",
        help = "Catalog file; its directory is created when missing"
    )]
    pub db: PathBuf,

    #[arg(
        long,
        env = "MOVIESHELF_LOG_DIR",
        default_value = "logs",
        value_name = "DIR"
    )]
    pub log_dir: PathBuf,

    #[arg(
        long,
        env = "MOVIESHELF_LOG_LEVEL",
        value_name = "LEVEL",
        help = "trace|debug|info|warn|error (defaults by build mode)"
    )]
    pub log_level: Option<String>,

    #[arg(
        short,
        long,
        env = "MOVIESHELF_USER",
        help = "User whose collection the command acts on"
    )]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

pub fn parse() -> Cli {
    Cli::parse()
}
