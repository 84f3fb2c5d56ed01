//! Favorites commands - list the saved builds and toggle the current
//! one.

use anyhow::Result;
use colored::Colorize;
use tabled::{
    settings::{style::Style, Alignment, Modify},
    Table, Tabled,
};

use crate::api::{base_url, HttpFavoritesClient};
use crate::currency;
use crate::favorites::{FavoriteCache, FavoriteSync, SyncError};
use crate::session::SessionStore;

/// Table row for the favorites list.
#[derive(Tabled)]
struct FavoriteRow {
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Parts")]
    parts: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Execute `favorites list`.
pub fn execute_list(store: &SessionStore) -> Result<()> {
    let session = store.load();
    let remote = HttpFavoritesClient::new(&base_url())?;
    let cache = FavoriteCache::new();
    let sync = FavoriteSync::new(&remote, &cache);

    let records = match sync.refresh(session.user.as_ref()) {
        Ok(records) => records,
        Err(SyncError::NotAuthenticated) => {
            print_login_hint();
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if records.is_empty() {
        println!(
            "{} No favorites yet. Like a build with {}.",
            "♡".red(),
            "autobuild favorites toggle".cyan()
        );
        return Ok(());
    }

    let rows: Vec<FavoriteRow> = records
        .iter()
        .map(|record| FavoriteRow {
            saved: record.timestamp.format("%b %e, %Y").to_string(),
            category: record.category.clone(),
            parts: record.parts.len().to_string(),
            total: currency::format_peso(record.total_price),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(tabled::settings::object::Columns::last()).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    println!(
        "{} saved build{}",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );

    Ok(())
}

/// Execute `favorites toggle` on the current build.
pub fn execute_toggle(store: &SessionStore) -> Result<()> {
    let session = store.load();

    let Some(cursor) = session.cursor.as_ref() else {
        println!(
            "{} No builds loaded. Run {} first.",
            "✗".red().bold(),
            "autobuild generate".cyan()
        );
        return Ok(());
    };
    let Some(build) = cursor.current() else {
        println!("{} The last request returned no builds.", "✗".red().bold());
        return Ok(());
    };

    let remote = HttpFavoritesClient::new(&base_url())?;
    let cache = FavoriteCache::new();
    let sync = FavoriteSync::new(&remote, &cache);

    match sync.toggle(
        session.user.as_ref(),
        build,
        cursor.index(),
        &session.category,
        &session.needs,
    ) {
        Ok(true) => println!("{} Added to favorites", "♥".red()),
        Ok(false) => println!("{} Removed from favorites", "♡".red()),
        Err(SyncError::NotAuthenticated) => print_login_hint(),
        Err(err @ SyncError::RemoteWrite(_)) => {
            // Nothing was cached, so the toggle can simply be retried.
            println!("{} {}", "✗".red().bold(), err);
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

fn print_login_hint() {
    println!(
        "{} Favorites need an account. Run {}.",
        "✗".red().bold(),
        "autobuild login <user-id>".cyan()
    );
}
