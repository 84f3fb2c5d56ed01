//! Generate command - request a fresh batch of builds.

use anyhow::Result;
use colored::Colorize;
use tabled::{
    settings::{style::Style, Alignment, Modify},
    Table, Tabled,
};

use crate::api::{base_url, BuildRequest, BuildsClient};
use crate::builds::{load_collection, BuildCursor};
use crate::currency;
use crate::session::SessionStore;

/// Execute the generate command.
pub fn execute(
    store: &SessionStore,
    category: &str,
    min: Option<f64>,
    max: Option<f64>,
    needs: Option<String>,
) -> Result<()> {
    let client = BuildsClient::new(&base_url())?;

    // A ceiling below the use case's floor can never be satisfied;
    // refuse it up front the way the request form does.
    if let Some(max) = max {
        let floor = client
            .categories()
            .ok()
            .and_then(|categories| {
                categories
                    .into_iter()
                    .find(|c| c.name.eq_ignore_ascii_case(category))
            })
            .map(|c| c.min_price);

        if let Some(floor) = floor {
            if max < floor {
                anyhow::bail!(
                    "Maximum cannot be below the minimum price of {} for {}",
                    currency::format_peso(floor),
                    category
                );
            }
        }
    }

    let request = BuildRequest {
        description: category.to_string(),
        min,
        max,
        detailed_needs: needs.clone(),
    };

    let payload = client.generate(&request)?;
    let collection = load_collection(&payload);

    if collection.builds.is_empty() {
        println!(
            "{} The backend returned no builds for this request.",
            "✗".red().bold()
        );
    } else {
        println!(
            "{} Loaded {} build{}",
            "✓".green().bold(),
            collection.builds.len(),
            if collection.builds.len() == 1 { "" } else { "s" }
        );
    }

    let mut session = store.load();
    session.category = category.to_string();
    session.needs = needs.unwrap_or_default();
    session.budget_range = collection.budget_range;
    session.budget_note = collection.budget_note.clone();
    session.cursor = Some(BuildCursor::new(collection.builds));
    store.save(&session)?;

    if let Some(cursor) = session.cursor.as_ref() {
        if let Some(build) = cursor.current() {
            super::show::print_build(build, cursor.index(), cursor.len(), &session);
        }
    }

    Ok(())
}

/// Table row for the use-case list.
#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Use Case")]
    name: String,
    #[tabled(rename = "Minimum")]
    min_price: String,
}

/// Execute the categories command.
pub fn execute_categories() -> Result<()> {
    let client = BuildsClient::new(&base_url())?;
    let categories = client.categories()?;

    if categories.is_empty() {
        println!("{} No use cases available.", "✗".red().bold());
        return Ok(());
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            min_price: currency::format_peso(c.min_price),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(tabled::settings::object::Columns::last()).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    Ok(())
}
