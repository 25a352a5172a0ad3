//! Seed catalog of salon listings plus the filter-and-match engine.

use salonspace_core::{FilterCriteria, Listing};
use serde::Deserialize;
use thiserror::Error;

pub const CRATE_NAME: &str = "salonspace-catalog";

/// Amenity tags offered by the filter panel. Listings may carry variants
/// of these (e.g. "Valet Parking"), which is why matching is by substring.
pub const AMENITY_OPTIONS: [&str; 9] = [
    "WiFi",
    "Parking",
    "Coffee",
    "Styling Tools",
    "Color Station",
    "Wash Basin",
    "Air Conditioning",
    "Music System",
    "Reception Area",
];

const SEED_YAML: &str = include_str!("../seed/salons.yaml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed seed catalog: {0}")]
    Seed(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct SeedFile {
    listings: Vec<Listing>,
}

/// In-memory, read-only listing catalog. There is no backing store; the
/// seed data ships embedded in the binary.
#[derive(Debug, Clone)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    /// Loads the embedded seed catalog.
    pub fn seed() -> Result<Self, CatalogError> {
        let parsed: SeedFile = serde_yaml::from_str(SEED_YAML)?;
        Ok(Self {
            listings: parsed.listings,
        })
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Convenience wrapper over [`apply`] using this catalog as the input.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Listing> {
        apply(&self.listings, criteria)
    }
}

/// Narrows `catalog` to the listings satisfying every active constraint in
/// `criteria`, preserving catalog order.
///
/// The engine is pure and total: it is always evaluated against the full
/// catalog (never a previously filtered subset), so relaxing a constraint
/// restores previously excluded listings without any filter history. Empty
/// or out-of-range criteria fields act as no-ops rather than errors.
pub fn apply(catalog: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    let criteria = criteria.clone().sanitized();
    catalog
        .iter()
        .filter(|listing| matches(listing, &criteria))
        .cloned()
        .collect()
}

fn matches(listing: &Listing, criteria: &FilterCriteria) -> bool {
    matches_location(listing, &criteria.location)
        && listing.price_per_hour <= criteria.max_price_per_hour
        && matches_availability(listing, criteria)
        && matches_rating(listing, criteria.min_rating)
        && matches_amenities(listing, &criteria.amenities)
}

fn matches_location(listing: &Listing, query: &str) -> bool {
    query.is_empty() || contains_ignore_case(&listing.location, query)
}

fn matches_availability(listing: &Listing, criteria: &FilterCriteria) -> bool {
    !criteria.availability.filters_today() || listing.available_today
}

fn matches_rating(listing: &Listing, min_rating: f64) -> bool {
    min_rating <= 0.0 || listing.rating >= min_rating
}

// Required tags match by case-insensitive substring: requiring "Parking"
// accepts "Valet Parking", requiring "station" accepts "Color Station".
fn matches_amenities(listing: &Listing, required: &[String]) -> bool {
    required.iter().all(|wanted| {
        listing
            .amenities
            .iter()
            .any(|tag| contains_ignore_case(tag, wanted))
    })
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
