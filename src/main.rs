use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use housing_search::config::{SearchConfig, DEFAULT_API_URL, DEFAULT_PAGE_SIZE};
use housing_search::error::SearchError;
use housing_search::search::{
    FetchOutcome, FilterCriteria, FormValues, HttpListingClient, ListStatus, Progress,
    QuickFilter, SearchController,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Search STALS accommodations and export what was loaded
#[derive(Debug, Parser)]
#[command(name = "housing-search", version)]
struct Args {
    /// Base URL of the listing API
    #[arg(long, env = "STALS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Listings per page (1-100)
    #[arg(long, env = "STALS_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u8,

    /// Request timeout in seconds; unset waits as long as the transport does
    #[arg(long, env = "STALS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Accommodation name to search for
    #[arg(long)]
    name: Option<String>,

    /// Barangay to search in
    #[arg(long, conflicts_with = "suggest")]
    barangay: Option<String>,

    /// Type filter: ALL, APARTMENT, BEDSPACER, DORMITORY, HOTEL or TRANSIENT
    #[arg(long = "type", value_name = "TYPE")]
    accommodation_type: Option<String>,

    /// Price bracket: all, below-1000, one-to-two, two-to-three, three-to-four, above-four
    #[arg(long, value_name = "RANGE")]
    price: Option<String>,

    /// Show barangays matching this text and search in the first one
    #[arg(long, value_name = "TEXT")]
    suggest: Option<String>,

    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Write the export document for the loaded listings to PATH, or to a
    /// timestamped file when PATH is omitted
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    export: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = SearchConfig::new(&args.api_url, args.page_size, args.timeout_secs)?;

    info!("🏠 STALS accommodation search");
    info!("Listing API: {}", config.api_url);

    let criteria = FilterCriteria::with_page_size(config.page_size);
    let client = HttpListingClient::new(config)?;
    let controller = SearchController::new(Arc::new(client), criteria);

    let mut barangay = args.barangay.clone();
    if let Some(text) = &args.suggest {
        let suggestions = controller.barangay_suggestions().await?;
        let matches = suggestions.matching(text);
        if matches.is_empty() {
            warn!("No barangay matches '{}'", text);
        }
        for suggestion in &matches {
            println!(
                "   {}[{}]{}",
                suggestion.before, suggestion.matched, suggestion.after
            );
        }
        barangay = suggestions.resolve(text).map(str::to_string);
    }

    if let Some(kind) = &args.accommodation_type {
        controller.quick_filter(QuickFilter::parse("type", kind)?);
    }
    if let Some(range) = &args.price {
        controller.quick_filter(QuickFilter::parse("price_range", range)?);
    }

    let form = FormValues {
        name: args.name.clone(),
        barangay,
        ..FormValues::default()
    };

    match controller.submit(form).await {
        Ok(outcome) => info!(?outcome, "First page requested"),
        Err(SearchError::Validation(errors)) => {
            for error in errors.errors() {
                eprintln!("{}: {}", error.field, error.message);
            }
            anyhow::bail!("Search filters rejected");
        }
        Err(e) => warn!("{}", e),
    }

    for _ in 1..args.pages {
        match controller.load_more().await {
            Ok(FetchOutcome::Loaded { has_more: false, .. }) => break,
            Ok(FetchOutcome::Loaded { .. }) => {}
            Ok(FetchOutcome::Skipped) | Ok(FetchOutcome::Stale) => break,
            Err(e) => {
                warn!("{} (showing what was loaded so far)", e);
                break;
            }
        }
    }

    let view = controller.snapshot();
    match view.status {
        ListStatus::NoResults => println!("No accommodations match these filters."),
        ListStatus::EmptySoFar => {
            println!("No accommodations on the pages loaded so far, try --pages to load more.");
        }
        ListStatus::NotLoaded | ListStatus::Loading => {
            println!("Listings could not be loaded.");
        }
        ListStatus::Results => {
            for (i, listing) in view.accumulated.items().enumerate() {
                println!("{}. {} (P{})", i + 1, listing.name, listing.price);
                if let Some(address) = &listing.address {
                    println!("   {}", address);
                }
                println!("   {} rooms, {}", listing.num_of_rooms, listing.location);
                println!("   Contact: {}", listing.contact_number);
                println!();
            }
            info!(
                "✅ Loaded {} listings{}",
                view.accumulated.item_count(),
                if view.progress == Progress::Exhausted {
                    ""
                } else {
                    ", more available"
                }
            );
        }
    }

    if let Some(output) = &args.export {
        let path = output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("stals-export-{}.json", Utc::now().format("%Y%m%dT%H%M%S")))
        });
        let document = controller.export();
        let json = serde_json::to_string_pretty(&document)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        info!("💾 Saved export with {} rows to {}", document.rows.len(), path.display());
    }

    Ok(())
}
