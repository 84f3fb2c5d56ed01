//! Show command - print the current build, optionally cycling first.

use anyhow::Result;
use colored::Colorize;
use tabled::{
    settings::{style::Style, Alignment, Modify},
    Table, Tabled,
};

use crate::api::{base_url, HttpFavoritesClient};
use crate::builds::Build;
use crate::currency::{self, RateCache};
use crate::favorites::{FavoriteCache, FavoriteSync};
use crate::session::{Session, SessionStore};

/// Table row for the parts list.
#[derive(Tabled)]
struct PartRow {
    #[tabled(rename = "Part Type")]
    part_type: String,
    #[tabled(rename = "Component Name")]
    name: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Price")]
    price: String,
}

/// Execute the show command. With `advance` the cursor moves to the
/// next build of the batch first ("Generate Again").
pub fn execute(store: &SessionStore, advance: bool) -> Result<()> {
    let mut session = store.load();

    let shown = {
        let Some(cursor) = session.cursor.as_mut() else {
            println!(
                "{} No builds loaded. Run {} first.",
                "✗".red().bold(),
                "autobuild generate".cyan()
            );
            return Ok(());
        };

        if cursor.is_empty() {
            println!("{} The last request returned no builds.", "✗".red().bold());
            return Ok(());
        }

        if advance {
            cursor.advance();
        }

        cursor
            .current()
            .map(|build| (build.clone(), cursor.index(), cursor.len()))
    };

    if let Some((build, index, total)) = shown {
        print_build(&build, index, total, &session);
    }

    if advance {
        store.save(&session)?;
    }

    Ok(())
}

/// Render one build: header, parts table, total, liked-state.
pub fn print_build(build: &Build, index: usize, total: usize, session: &Session) {
    println!(
        "{}  {}",
        format!("Build {} of {}", index + 1, total).bold(),
        build.category_label().dimmed()
    );
    if !build.needs.is_empty() {
        println!("\"{}\"", build.needs.italic());
    }
    if !build.description.is_empty() {
        println!("{}", build.description.dimmed());
    }

    if build.parts.is_empty() {
        println!("{} This build has no parts.", "✗".red().bold());
    } else {
        let rows: Vec<PartRow> = build
            .parts
            .iter()
            .map(|part| PartRow {
                part_type: part.display_type.clone(),
                name: part.name.clone(),
                vendor: part.vendor.clone(),
                price: currency::format_peso(part.price),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(tabled::settings::object::Columns::last()).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    let mut total_line = format!("Total: {}", currency::format_peso(build.total_price));
    if let Some(rate) = currency::current_rate(&RateCache::new()) {
        total_line.push_str(&format!(
            " (≈ {:.2} converted)",
            currency::convert(build.total_price, rate)
        ));
    }
    println!("{}", total_line.green().bold());

    if let Some(range) = session.budget_range {
        println!(
            "Budget: {} – {}",
            currency::format_peso(range.min),
            currency::format_peso(range.max)
        );
    }
    if let Some(note) = &session.budget_note {
        println!("{} {}", "!".yellow().bold(), note);
    }

    if let Ok(remote) = HttpFavoritesClient::new(&base_url()) {
        let cache = FavoriteCache::new();
        let sync = FavoriteSync::new(&remote, &cache);
        if sync.is_liked(session.user.as_ref(), index, build.total_price) {
            println!("{} In your favorites", "♥".red());
        }
    }
}
