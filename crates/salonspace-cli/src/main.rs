use anyhow::Result;
use clap::{Parser, Subcommand};
use salonspace_catalog::Catalog;
use salonspace_core::{AvailabilityMode, FilterCriteria};
use salonspace_session::Session;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "salonspace")]
#[command(about = "SalonSpace booking demo command-line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web UI.
    Serve {
        /// Address to bind, e.g. 0.0.0.0:8000
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: String,
    },
    /// Print the catalog, optionally narrowed by filter flags.
    List {
        /// Case-insensitive location substring
        #[arg(long)]
        location: Option<String>,
        /// Price ceiling in whole dollars per hour
        #[arg(long)]
        max_price: Option<u32>,
        /// Minimum rating, 0 means no constraint
        #[arg(long)]
        min_rating: Option<f64>,
        /// Required amenity tag, repeatable; matched by substring
        #[arg(long = "amenity")]
        amenities: Vec<String>,
        /// Only listings available today
        #[arg(long)]
        today: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::List {
        location: None,
        max_price: None,
        min_rating: None,
        amenities: Vec::new(),
        today: false,
    }) {
        Commands::Serve { addr } => {
            println!("serving SalonSpace demo on http://{addr}");
            salonspace_web::serve(&addr, Session::seed()?).await?;
        }
        Commands::List {
            location,
            max_price,
            min_rating,
            amenities,
            today,
        } => {
            let defaults = FilterCriteria::default();
            let criteria = FilterCriteria {
                location: location.unwrap_or_default(),
                max_price_per_hour: max_price.unwrap_or(defaults.max_price_per_hour),
                availability: if today {
                    AvailabilityMode::Today
                } else {
                    AvailabilityMode::Any
                },
                min_rating: min_rating.unwrap_or(0.0),
                amenities,
            };
            let catalog = Catalog::seed()?;
            let listings = catalog.filter(&criteria);
            if listings.is_empty() {
                println!("no listings match the given filters");
            }
            for listing in &listings {
                println!(
                    "{}. {} (${}/hr, {:.1} stars, {} reviews)",
                    listing.id, listing.name, listing.price_per_hour, listing.rating,
                    listing.review_count
                );
                println!("   {}", listing.location);
                if listing.available_today {
                    println!("   available today");
                } else if let Some(next) = &listing.next_available {
                    println!("   next available: {next}");
                }
                println!("   amenities: {}", listing.amenities.join(", "));
            }
            println!("{} spaces found", listings.len());
        }
    }

    Ok(())
}
