//! End-to-end filter scenarios over the embedded seed catalog.

use salonspace_catalog::{apply, Catalog};
use salonspace_core::{AvailabilityMode, FilterCriteria};

fn names(criteria: &FilterCriteria) -> Vec<String> {
    let catalog = Catalog::seed().expect("seed catalog");
    apply(catalog.listings(), criteria)
        .into_iter()
        .map(|l| l.name)
        .collect()
}

#[test]
fn combined_criteria_compose_as_logical_and() {
    // Affordable, highly rated, available today, with a color station.
    let criteria = FilterCriteria {
        max_price_per_hour: 50,
        min_rating: 4.8,
        availability: AvailabilityMode::Today,
        amenities: vec!["Color Station".into()],
        ..FilterCriteria::default()
    };
    assert_eq!(names(&criteria), ["Luxe Beauty Studio", "Artisan Beauty Bar"]);
}

#[test]
fn relaxing_a_constraint_restores_excluded_listings() {
    let tight = FilterCriteria {
        max_price_per_hour: 50,
        min_rating: 4.8,
        ..FilterCriteria::default()
    };
    let relaxed = FilterCriteria {
        max_price_per_hour: 60,
        min_rating: 4.8,
        ..FilterCriteria::default()
    };
    assert_eq!(names(&tight), ["Luxe Beauty Studio", "Artisan Beauty Bar"]);
    // Raising the ceiling brings Serenity Spa Suite (55/4.9) back without
    // any filter history: the engine always starts from the full catalog.
    assert_eq!(
        names(&relaxed),
        ["Luxe Beauty Studio", "Serenity Spa Suite", "Artisan Beauty Bar"]
    );
}

#[test]
fn location_and_amenity_queries_are_substring_based() {
    let criteria = FilterCriteria {
        location: "ca".into(),
        amenities: vec!["parking".into(), "wifi".into()],
        ..FilterCriteria::default()
    };
    // Every seed listing is in CA and has WiFi plus a parking variant.
    assert_eq!(names(&criteria).len(), 6);

    let narrowed = FilterCriteria {
        location: "pasadena".into(),
        amenities: vec!["free parking".into()],
        ..FilterCriteria::default()
    };
    assert_eq!(names(&narrowed), ["Artisan Beauty Bar"]);
}

#[test]
fn empty_catalog_is_handled() {
    let criteria = FilterCriteria::default();
    assert!(apply(&[], &criteria).is_empty());
}
