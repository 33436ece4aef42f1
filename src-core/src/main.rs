// Catalogue It - personal collection cataloguing
// Entry point and command-line surface

use anyhow::Context;
use catalogue_it::app::AppState;
use catalogue_it::config::ICON_CATEGORIES;
use catalogue_it::database::ItemFilter;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Catalogue your personal collections
#[derive(Parser, Debug)]
#[command(name = "catalogue-it")]
#[command(version, about = "Catalogue your personal collections")]
struct Args {
    /// Directory holding the database, photos and settings
    #[arg(long, default_value = "catalogue-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalogues with owned and wishlist counts
    List,
    /// Create the example "My Collection" catalogue
    Sample,
    /// Show a catalogue's fields and items
    Show {
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a catalogue with all of its items and photos
    Delete { id: String },
    /// List the curated catalogue icons
    Icons,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalogue_it=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Icons => {
            for (category, icons) in ICON_CATEGORIES {
                println!("{}", category);
                for icon in icons.iter() {
                    println!("  {}", icon);
                }
            }
        }
        Command::List => {
            let state = open(&args.data_dir).await?;
            let summaries = state.catalogues.list_summaries().await?;
            if summaries.is_empty() {
                println!("No catalogues");
            }
            for summary in summaries {
                println!(
                    "{}  {} [{}] {}  owned: {}  wishlist: {}",
                    summary.catalogue.id,
                    summary.catalogue.name,
                    summary.catalogue.icon_name,
                    summary.catalogue.color_hex,
                    summary.owned_count,
                    summary.wishlist_count
                );
            }
        }
        Command::Sample => {
            let state = open(&args.data_dir).await?;
            let (catalogue, _) = state.catalogues.create_sample_catalogue().await?;
            println!("Created {} ({})", catalogue.name, catalogue.id);
        }
        Command::Show { id, json } => {
            let state = open(&args.data_dir).await?;
            let (catalogue, definitions) = state
                .catalogues
                .get_catalogue(&id)
                .await
                .context("catalogue lookup failed")?;
            let items = state.items.list_items(&id, ItemFilter::All).await?;

            if json {
                let output = serde_json::json!({
                    "catalogue": catalogue,
                    "fields": definitions,
                    "items": items,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            println!("{} [{}] {}", catalogue.name, catalogue.icon_name, catalogue.color_hex);
            println!("Fields:");
            for definition in &definitions {
                println!(
                    "  {}. {} ({}, {})",
                    definition.sort_order + 1,
                    definition.name,
                    definition.field_type,
                    definition.field_type.icon()
                );
            }

            for (heading, filter) in [("Owned", ItemFilter::Owned), ("Wishlist", ItemFilter::Wishlist)] {
                println!("{}:", heading);
                for detail in items.iter().filter(|d| filter.matches(&d.item)) {
                    println!("  {} ({} photos)", detail.display_name(), detail.photos.len());
                    for value in &detail.values {
                        println!("    {}: {}", value.field_name, value.display_value());
                    }
                    if let Some(notes) = &detail.item.notes {
                        println!("    Notes: {}", notes);
                    }
                }
            }
        }
        Command::Delete { id } => {
            let state = open(&args.data_dir).await?;
            state.catalogues.delete_catalogue(&id).await?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

async fn open(data_dir: &Path) -> anyhow::Result<AppState> {
    AppState::initialize(data_dir.to_path_buf())
        .await
        .with_context(|| format!("failed to open data directory {:?}", data_dir))
}
