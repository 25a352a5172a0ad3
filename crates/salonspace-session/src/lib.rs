//! Session context and booking wizard for the SalonSpace demo.
//!
//! All mutable state for one browsing session lives in [`Session`]: the
//! active filter criteria, the mock-authenticated user, the in-progress
//! booking wizard, and the confirmed booking list. The UI layer owns the
//! single mutable instance and re-renders after each transition; nothing
//! here persists beyond the process.

use chrono::Utc;
use salonspace_catalog::{Catalog, CatalogError};
use salonspace_core::{
    Booking, BookingDraft, BookingStatus, FilterCriteria, Listing, SessionUser, UserRole,
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub const CRATE_NAME: &str = "salonspace-session";

/// Hourly slots offered by the wizard's schedule step.
pub const TIME_SLOTS: [&str; 10] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

pub const SERVICE_TYPES: [&str; 8] = [
    "Hair Styling",
    "Hair Coloring",
    "Hair Cut",
    "Nail Services",
    "Makeup",
    "Facial",
    "Massage",
    "Other",
];

pub const MAX_DURATION_HOURS: u32 = 8;
pub const DEFAULT_DURATION_HOURS: u32 = 2;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("sign in before booking a space")]
    NotAuthenticated,
    #[error("unknown listing id {0}")]
    UnknownListing(String),
    #[error("name and email are both required")]
    EmptyCredentials,
    #[error("no booking in progress")]
    NoActiveBooking,
    #[error(transparent)]
    Booking(#[from] BookingError),
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("step \"{0}\" is incomplete")]
    IncompleteStep(&'static str),
    #[error("booking can only be confirmed from the final step")]
    NotAtConfirmStep,
}

/// The three linear wizard steps. Transitions are forward/backward only;
/// stepping back from `Schedule` or forward from `Confirm` is a no-op
/// boundary rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Schedule,
    Details,
    Confirm,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Schedule => 1,
            WizardStep::Details => 2,
            WizardStep::Confirm => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Schedule => "Date & Time",
            WizardStep::Details => "Service Details",
            WizardStep::Confirm => "Confirm",
        }
    }
}

/// In-progress booking for a single listing.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    listing: Listing,
    step: WizardStep,
    draft: BookingDraft,
}

impl BookingWizard {
    fn new(listing: Listing) -> Self {
        Self {
            listing,
            step: WizardStep::Schedule,
            draft: BookingDraft {
                duration_hours: DEFAULT_DURATION_HOURS,
                ..BookingDraft::default()
            },
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    pub fn total_cost(&self) -> u32 {
        self.draft.total_cost(self.listing.price_per_hour)
    }

    /// Whether the current step holds enough data to move forward,
    /// mirroring the original wizard's next-button gating.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Schedule => self.draft.has_schedule(),
            WizardStep::Details => self.draft.has_details(),
            WizardStep::Confirm => false,
        }
    }

    pub fn advance(&mut self) -> Result<(), BookingError> {
        match self.step {
            WizardStep::Schedule => {
                if !self.draft.has_schedule() {
                    return Err(BookingError::IncompleteStep(WizardStep::Schedule.label()));
                }
                self.step = WizardStep::Details;
            }
            WizardStep::Details => {
                if !self.draft.has_details() {
                    return Err(BookingError::IncompleteStep(WizardStep::Details.label()));
                }
                self.step = WizardStep::Confirm;
            }
            WizardStep::Confirm => {}
        }
        Ok(())
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::Schedule => WizardStep::Schedule,
            WizardStep::Details => WizardStep::Schedule,
            WizardStep::Confirm => WizardStep::Details,
        };
    }

    fn confirm(self) -> Result<Booking, BookingError> {
        if self.step != WizardStep::Confirm {
            return Err(BookingError::NotAtConfirmStep);
        }
        // The step gates already enforced completeness on the way here.
        let total_cost = self.total_cost();
        Ok(Booking {
            id: Uuid::new_v4(),
            listing_id: self.listing.id,
            listing_name: self.listing.name,
            date: self.draft.date,
            time: self.draft.time,
            duration_hours: self.draft.duration_hours,
            client_name: self.draft.client_name,
            service_type: self.draft.service_type,
            total_cost,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        })
    }
}

/// One browsing session's worth of mutable state.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    criteria: FilterCriteria,
    user: Option<SessionUser>,
    wizard: Option<BookingWizard>,
    bookings: Vec<Booking>,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            criteria: FilterCriteria::default(),
            user: None,
            wizard: None,
            bookings: Vec::new(),
        }
    }

    /// Fresh session over the embedded seed catalog.
    pub fn seed() -> Result<Self, CatalogError> {
        Ok(Self::new(Catalog::seed()?))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replaces the criteria snapshot. The next render recomputes from the
    /// full catalog, so relaxing a constraint restores excluded listings.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria.sanitized();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    /// The listings the grid should currently show.
    pub fn visible_listings(&self) -> Vec<Listing> {
        self.catalog.filter(&self.criteria)
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Mock sign-in: any non-empty name/email pair is accepted. No
    /// credential is verified and no token exists.
    pub fn login(
        &mut self,
        name: &str,
        email: &str,
        role: UserRole,
    ) -> Result<&SessionUser, SessionError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(SessionError::EmptyCredentials);
        }
        info!(name, role = role.as_str(), "session login");
        self.user = Some(SessionUser {
            name: name.to_string(),
            email: email.to_string(),
            role,
        });
        Ok(self.user.as_ref().expect("just set"))
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.wizard = None;
    }

    /// Opens the booking wizard for a listing, gated by the mock auth flag.
    pub fn begin_booking(&mut self, listing_id: &str) -> Result<&BookingWizard, SessionError> {
        if !self.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        let listing = self
            .catalog
            .get(listing_id)
            .ok_or_else(|| SessionError::UnknownListing(listing_id.to_string()))?
            .clone();
        self.wizard = Some(BookingWizard::new(listing));
        Ok(self.wizard.as_ref().expect("just set"))
    }

    pub fn wizard(&self) -> Option<&BookingWizard> {
        self.wizard.as_ref()
    }

    pub fn wizard_mut(&mut self) -> Option<&mut BookingWizard> {
        self.wizard.as_mut()
    }

    pub fn advance_booking(&mut self) -> Result<(), SessionError> {
        let wizard = self.wizard.as_mut().ok_or(SessionError::NoActiveBooking)?;
        wizard.advance()?;
        Ok(())
    }

    pub fn back_booking(&mut self) -> Result<(), SessionError> {
        let wizard = self.wizard.as_mut().ok_or(SessionError::NoActiveBooking)?;
        wizard.back();
        Ok(())
    }

    /// Confirms the in-progress booking and appends it to the session
    /// list. No overlap check against existing bookings for the same
    /// listing/slot is performed.
    pub fn confirm_booking(&mut self) -> Result<&Booking, SessionError> {
        let open = self.wizard.as_ref().ok_or(SessionError::NoActiveBooking)?;
        if open.step() != WizardStep::Confirm {
            // Leave the wizard open so the user can finish the step.
            return Err(BookingError::NotAtConfirmStep.into());
        }
        let wizard = self.wizard.take().expect("checked above");
        let booking = wizard.confirm()?;
        info!(
            listing = %booking.listing_name,
            total_cost = booking.total_cost,
            "booking confirmed"
        );
        self.bookings.push(booking);
        Ok(self.bookings.last().expect("just pushed"))
    }

    pub fn cancel_booking(&mut self) {
        self.wizard = None;
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }
}
