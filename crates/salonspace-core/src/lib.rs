//! Core domain model for the SalonSpace booking demo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CRATE_NAME: &str = "salonspace-core";

/// Default price ceiling for a fresh filter session, in whole dollars.
/// Chosen above every seed listing's rate so the default criteria match
/// the full catalog.
pub const DEFAULT_MAX_PRICE_PER_HOUR: u32 = 200;

/// A bookable salon space record, immutable once loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub location: String,
    pub rating: f64,
    pub review_count: u32,
    pub price_per_hour: u32,
    pub image_url: String,
    pub amenities: Vec<String>,
    pub available_today: bool,
    /// Display label for the next open slot; only meaningful when
    /// `available_today` is false.
    #[serde(default)]
    pub next_available: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityMode {
    #[default]
    Any,
    Today,
    Week,
    Flexible,
}

impl AvailabilityMode {
    /// Only `Today` has an observable filtering effect; `Week` and
    /// `Flexible` are accepted from the UI but intentionally filter
    /// nothing.
    pub fn filters_today(self) -> bool {
        matches!(self, AvailabilityMode::Today)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityMode::Any => "any",
            AvailabilityMode::Today => "today",
            AvailabilityMode::Week => "week",
            AvailabilityMode::Flexible => "flexible",
        }
    }
}

/// Active filter constraints for one browsing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub location: String,
    pub max_price_per_hour: u32,
    pub availability: AvailabilityMode,
    pub min_rating: f64,
    pub amenities: Vec<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            location: String::new(),
            max_price_per_hour: DEFAULT_MAX_PRICE_PER_HOUR,
            availability: AvailabilityMode::Any,
            min_rating: 0.0,
            amenities: Vec::new(),
        }
    }
}

impl FilterCriteria {
    /// Normalizes malformed input so the filter engine stays total:
    /// a NaN or negative rating bound means "no constraint", and blank
    /// amenity tags are dropped.
    pub fn sanitized(mut self) -> Self {
        if !self.min_rating.is_finite() || self.min_rating < 0.0 {
            self.min_rating = 0.0;
        }
        self.amenities.retain(|tag| !tag.trim().is_empty());
        self
    }

    /// Whether any constraint beyond the always-applied price ceiling is
    /// engaged, mirroring the filter panel's "Active" badge.
    pub fn is_active(&self) -> bool {
        !self.location.is_empty()
            || !self.amenities.is_empty()
            || self.min_rating > 0.0
            || self.availability != AvailabilityMode::Any
            || self.max_price_per_hour != DEFAULT_MAX_PRICE_PER_HOUR
    }

    /// Resets every control to its session-start default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Wizard accumulator for an in-progress, not-yet-confirmed booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub date: String,
    pub time: String,
    pub duration_hours: u32,
    pub client_name: String,
    pub service_type: String,
}

impl BookingDraft {
    pub fn total_cost(&self, price_per_hour: u32) -> u32 {
        price_per_hour * self.duration_hours
    }

    pub fn has_schedule(&self) -> bool {
        !self.date.is_empty() && !self.time.is_empty() && self.duration_hours > 0
    }

    pub fn has_details(&self) -> bool {
        !self.client_name.is_empty() && !self.service_type.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

/// A confirmed booking, session-local only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub listing_id: String,
    pub listing_name: String,
    pub date: String,
    pub time: String,
    pub duration_hours: u32,
    pub client_name: String,
    pub service_type: String,
    pub total_cost: u32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Renter,
    Owner,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Renter => "renter",
            UserRole::Owner => "owner",
        }
    }
}

/// Mock-authenticated user for one session. No credentials are verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_match_session_start_values() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.location, "");
        assert_eq!(criteria.max_price_per_hour, 200);
        assert_eq!(criteria.availability, AvailabilityMode::Any);
        assert_eq!(criteria.min_rating, 0.0);
        assert!(criteria.amenities.is_empty());
        assert!(!criteria.is_active());
    }

    #[test]
    fn sanitize_treats_bad_rating_as_unconstrained() {
        let criteria = FilterCriteria {
            min_rating: f64::NAN,
            amenities: vec!["WiFi".into(), "  ".into()],
            ..FilterCriteria::default()
        }
        .sanitized();
        assert_eq!(criteria.min_rating, 0.0);
        assert_eq!(criteria.amenities, vec!["WiFi".to_string()]);

        let negative = FilterCriteria {
            min_rating: -2.5,
            ..FilterCriteria::default()
        }
        .sanitized();
        assert_eq!(negative.min_rating, 0.0);
    }

    #[test]
    fn clear_restores_defaults() {
        let mut criteria = FilterCriteria {
            location: "Pasadena".into(),
            max_price_per_hour: 60,
            availability: AvailabilityMode::Today,
            min_rating: 4.0,
            amenities: vec!["Coffee".into()],
        };
        assert!(criteria.is_active());
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn draft_total_cost_is_rate_times_duration() {
        let draft = BookingDraft {
            duration_hours: 3,
            ..BookingDraft::default()
        };
        assert_eq!(draft.total_cost(45), 135);
    }

    #[test]
    fn only_today_mode_filters() {
        assert!(AvailabilityMode::Today.filters_today());
        assert!(!AvailabilityMode::Any.filters_today());
        assert!(!AvailabilityMode::Week.filters_today());
        assert!(!AvailabilityMode::Flexible.filters_today());
    }
}
