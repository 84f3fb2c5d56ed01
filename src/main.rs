//! autobuild - AI PC build browser for the AutoBuild backend.
//!
//! Normalizes the backend's drifting build payloads into one canonical
//! model, cycles through generated builds, and keeps favorited builds
//! consistent between the remote store and a local per-user cache.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod api;
mod builds;
mod commands;
mod currency;
mod favorites;
mod session;

use session::SessionStore;

#[derive(Parser)]
#[command(name = "autobuild")]
#[command(author, version, about = "AI PC build browser for the AutoBuild backend")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a fresh batch of builds for a use case and budget
    Generate {
        /// Use case (see `autobuild categories`)
        category: String,

        /// Minimum budget in pesos
        #[arg(long)]
        min: Option<f64>,

        /// Maximum budget in pesos
        #[arg(long)]
        max: Option<f64>,

        /// Free-text description of what the PC is for
        #[arg(short, long)]
        needs: Option<String>,
    },

    /// Show the current build of the loaded batch
    Show,

    /// Cycle to the next build of the loaded batch
    Next,

    /// List the available use cases and their minimum budgets
    Categories,

    /// Saved builds
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },

    /// Record the signed-in user id
    Login {
        /// User id reported by the account backend
        user_id: i64,

        /// Browse as guest (favorites stay disabled)
        #[arg(long)]
        guest: bool,
    },

    /// Forget the signed-in user
    Logout,

    /// Clear local state (session, favorites cache, cached rate)
    Clean,
}

#[derive(Subcommand)]
enum FavoritesCommands {
    /// Fetch the remote favorites and print them
    List,

    /// Toggle the current build in the favorites
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = SessionStore::new();

    match cli.command {
        Commands::Generate {
            category,
            min,
            max,
            needs,
        } => commands::generate::execute(&store, &category, min, max, needs),

        Commands::Show => commands::show::execute(&store, false),

        Commands::Next => commands::show::execute(&store, true),

        Commands::Categories => commands::generate::execute_categories(),

        Commands::Favorites { command } => match command {
            FavoritesCommands::List => commands::favorites::execute_list(&store),
            FavoritesCommands::Toggle => commands::favorites::execute_toggle(&store),
        },

        Commands::Login { user_id, guest } => {
            commands::account::execute_login(&store, user_id, guest)
        }

        Commands::Logout => commands::account::execute_logout(&store),

        Commands::Clean => commands::util::execute_clean(),
    }
}
