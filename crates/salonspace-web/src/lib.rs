//! Axum + Askama web UI for the SalonSpace demo.
//!
//! The UI is a thin presentation of one in-memory [`Session`]: handlers
//! lock the session, apply the requested transition, and re-render. There
//! is no database and nothing survives a restart.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Form, Path as AxumPath, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use salonspace_catalog::AMENITY_OPTIONS;
use salonspace_core::{AvailabilityMode, FilterCriteria, Listing, UserRole};
use salonspace_session::{Session, SessionError, MAX_DURATION_HOURS, SERVICE_TYPES, TIME_SLOTS};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub const CRATE_NAME: &str = "salonspace-web";

pub struct AppState {
    session: RwLock<Session>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

/// Filter controls as they arrive from the sidebar form / query string.
/// Absent or malformed fields fall back to the no-constraint defaults so
/// hand-edited URLs cannot break the page.
#[derive(Debug, Deserialize, Default)]
struct BrowseQuery {
    location: Option<String>,
    max_price: Option<u32>,
    availability: Option<String>,
    min_rating: Option<f64>,
    amenities: Option<String>,
}

impl BrowseQuery {
    fn into_criteria(self) -> FilterCriteria {
        let defaults = FilterCriteria::default();
        FilterCriteria {
            location: self.location.unwrap_or_default(),
            max_price_per_hour: self.max_price.unwrap_or(defaults.max_price_per_hour),
            availability: self
                .availability
                .as_deref()
                .map(parse_availability)
                .unwrap_or_default(),
            min_rating: self.min_rating.unwrap_or(0.0),
            amenities: self
                .amenities
                .as_deref()
                .map(split_tags)
                .unwrap_or_default(),
        }
        .sanitized()
    }
}

// Unknown modes act as "any" rather than failing the request.
fn parse_availability(raw: &str) -> AvailabilityMode {
    match raw {
        "today" => AvailabilityMode::Today,
        "week" => AvailabilityMode::Week,
        "flexible" => AvailabilityMode::Flexible,
        _ => AvailabilityMode::Any,
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    name: String,
    email: String,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct LoginQuery {
    #[serde(default)]
    error: Option<u8>,
}

/// Wizard form posts carry only the fields of the step being submitted.
#[derive(Debug, Deserialize, Default)]
struct WizardForm {
    date: Option<String>,
    time: Option<String>,
    duration_hours: Option<u32>,
    client_name: Option<String>,
    service_type: Option<String>,
}

#[derive(Debug, Clone)]
struct CardView {
    id: String,
    name: String,
    location: String,
    rating: String,
    review_count: u32,
    price_per_hour: u32,
    image_url: String,
    shown_amenities: Vec<String>,
    more_amenities: usize,
    available_today: bool,
    next_available: String,
    description: String,
}

impl CardView {
    fn from_listing(listing: &Listing) -> Self {
        let shown_amenities = listing.amenities.iter().take(4).cloned().collect::<Vec<_>>();
        Self {
            id: listing.id.clone(),
            name: listing.name.clone(),
            location: listing.location.clone(),
            rating: format!("{:.1}", listing.rating),
            review_count: listing.review_count,
            price_per_hour: listing.price_per_hour,
            image_url: listing.image_url.clone(),
            more_amenities: listing.amenities.len().saturating_sub(shown_amenities.len()),
            shown_amenities,
            available_today: listing.available_today,
            next_available: listing.next_available.clone().unwrap_or_default(),
            description: listing.description.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct HeaderView {
    signed_in: bool,
    user_name: String,
    user_role: String,
}

impl HeaderView {
    fn from_session(session: &Session) -> Self {
        match session.user() {
            Some(user) => Self {
                signed_in: true,
                user_name: user.name.clone(),
                user_role: user.role.as_str().to_string(),
            },
            None => Self {
                signed_in: false,
                user_name: String::new(),
                user_role: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct OptionView {
    value: String,
    label: String,
    selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    header: HeaderView,
    cards: Vec<CardView>,
    result_count: usize,
    filters_active: bool,
    location: String,
    max_price: u32,
    min_rating: u32,
    amenities_csv: String,
    availability_options: Vec<OptionView>,
    amenity_options: Vec<String>,
}

#[derive(Template)]
#[template(path = "listing_detail.html")]
struct ListingDetailTemplate {
    header: HeaderView,
    card: CardView,
    amenities: Vec<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    header: HeaderView,
    show_error: bool,
}

#[derive(Template)]
#[template(path = "booking_wizard.html")]
struct BookingWizardTemplate {
    header: HeaderView,
    step: u8,
    step_label: String,
    listing_name: String,
    listing_location: String,
    listing_rating: String,
    listing_review_count: u32,
    price_per_hour: u32,
    date: String,
    time: String,
    duration_hours: u32,
    client_name: String,
    service_type: String,
    total_cost: u32,
    can_advance: bool,
    time_slots: Vec<OptionView>,
    service_types: Vec<OptionView>,
    durations: Vec<OptionView>,
}

#[derive(Debug, Clone)]
struct BookingView {
    listing_name: String,
    date: String,
    time: String,
    duration_hours: u32,
    client_name: String,
    service_type: String,
    total_cost: u32,
    status: String,
    created_at: String,
}

#[derive(Template)]
#[template(path = "bookings.html")]
struct BookingsTemplate {
    header: HeaderView,
    bookings: Vec<BookingView>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/listings/{id}", get(listing_detail_handler))
        .route("/listings/{id}/book", post(book_start_handler))
        .route("/login", get(login_page_handler).post(login_submit_handler))
        .route("/logout", post(logout_handler))
        .route("/book", get(wizard_page_handler))
        .route("/book/next", post(wizard_next_handler))
        .route("/book/back", post(wizard_back_handler))
        .route("/book/cancel", post(wizard_cancel_handler))
        .route("/book/confirm", post(wizard_confirm_handler))
        .route("/bookings", get(bookings_handler))
        .route("/api/listings", get(api_listings_handler))
        .with_state(Arc::new(state))
}

pub async fn serve(addr: &str, session: Session) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app(AppState::new(session))).await?;
    Ok(())
}

async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Response {
    let criteria = query.into_criteria();
    let mut session = state.session.write().await;
    session.set_criteria(criteria);

    let criteria = session.criteria().clone();
    let cards = session
        .visible_listings()
        .iter()
        .map(CardView::from_listing)
        .collect::<Vec<_>>();
    let availability_options = [
        (AvailabilityMode::Any, "Any time"),
        (AvailabilityMode::Today, "Available today"),
        (AvailabilityMode::Week, "This week"),
        (AvailabilityMode::Flexible, "Flexible"),
    ]
    .into_iter()
    .map(|(mode, label)| OptionView {
        value: mode.as_str().to_string(),
        label: label.to_string(),
        selected: criteria.availability == mode,
    })
    .collect();

    render_html(IndexTemplate {
        header: HeaderView::from_session(&session),
        result_count: cards.len(),
        cards,
        filters_active: criteria.is_active(),
        location: criteria.location.clone(),
        max_price: criteria.max_price_per_hour,
        min_rating: criteria.min_rating as u32,
        amenities_csv: criteria.amenities.join(", "),
        availability_options,
        amenity_options: AMENITY_OPTIONS.iter().map(ToString::to_string).collect(),
    })
}

async fn api_listings_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Response {
    let criteria = query.into_criteria();
    let session = state.session.read().await;
    let listings = salonspace_catalog::apply(session.catalog().listings(), &criteria);
    Json(listings).into_response()
}

async fn listing_detail_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
) -> Response {
    let session = state.session.read().await;
    match session.catalog().get(&id) {
        Some(listing) => render_html(ListingDetailTemplate {
            header: HeaderView::from_session(&session),
            card: CardView::from_listing(listing),
            amenities: listing.amenities.clone(),
        }),
        None => (StatusCode::NOT_FOUND, Html("Listing not found".to_string())).into_response(),
    }
}

async fn login_page_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Response {
    let session = state.session.read().await;
    render_html(LoginTemplate {
        header: HeaderView::from_session(&session),
        show_error: query.error.is_some(),
    })
}

async fn login_submit_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let role = match form.role.as_deref() {
        Some("owner") => UserRole::Owner,
        _ => UserRole::Renter,
    };
    let mut session = state.session.write().await;
    match session.login(&form.name, &form.email, role) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(_) => Redirect::to("/login?error=1").into_response(),
    }
}

async fn logout_handler(State(state): State<Arc<AppState>>) -> Response {
    state.session.write().await.logout();
    Redirect::to("/").into_response()
}

async fn book_start_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
) -> Response {
    let mut session = state.session.write().await;
    match session.begin_booking(&id) {
        Ok(_) => Redirect::to("/book").into_response(),
        Err(SessionError::NotAuthenticated) => Redirect::to("/login").into_response(),
        Err(SessionError::UnknownListing(_)) => {
            (StatusCode::NOT_FOUND, Html("Listing not found".to_string())).into_response()
        }
        Err(err) => server_error(anyhow::anyhow!(err)),
    }
}

async fn wizard_page_handler(State(state): State<Arc<AppState>>) -> Response {
    let session = state.session.read().await;
    let Some(wizard) = session.wizard() else {
        return Redirect::to("/").into_response();
    };

    let draft = wizard.draft();
    let listing = wizard.listing();
    let time_slots = TIME_SLOTS
        .iter()
        .map(|slot| OptionView {
            value: slot.to_string(),
            label: slot.to_string(),
            selected: draft.time == *slot,
        })
        .collect();
    let service_types = SERVICE_TYPES
        .iter()
        .map(|service| OptionView {
            value: service.to_string(),
            label: service.to_string(),
            selected: draft.service_type == *service,
        })
        .collect();
    let durations = (1..=MAX_DURATION_HOURS)
        .map(|hours| OptionView {
            value: hours.to_string(),
            label: if hours == 1 {
                "1 hour".to_string()
            } else {
                format!("{hours} hours")
            },
            selected: draft.duration_hours == hours,
        })
        .collect();

    render_html(BookingWizardTemplate {
        header: HeaderView::from_session(&session),
        step: wizard.step().number(),
        step_label: wizard.step().label().to_string(),
        listing_name: listing.name.clone(),
        listing_location: listing.location.clone(),
        listing_rating: format!("{:.1}", listing.rating),
        listing_review_count: listing.review_count,
        price_per_hour: listing.price_per_hour,
        date: draft.date.clone(),
        time: draft.time.clone(),
        duration_hours: draft.duration_hours,
        client_name: draft.client_name.clone(),
        service_type: draft.service_type.clone(),
        total_cost: wizard.total_cost(),
        can_advance: wizard.can_advance(),
        time_slots,
        service_types,
        durations,
    })
}

async fn wizard_next_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<WizardForm>,
) -> Response {
    let mut session = state.session.write().await;
    let Some(wizard) = session.wizard_mut() else {
        return Redirect::to("/").into_response();
    };
    apply_wizard_form(wizard.draft_mut(), form);
    // An incomplete step keeps the wizard where it is; the re-rendered
    // page shows the disabled state.
    let _ = session.advance_booking();
    Redirect::to("/book").into_response()
}

fn apply_wizard_form(draft: &mut salonspace_core::BookingDraft, form: WizardForm) {
    if let Some(date) = form.date {
        draft.date = date;
    }
    if let Some(time) = form.time {
        draft.time = time;
    }
    if let Some(hours) = form.duration_hours {
        draft.duration_hours = hours.clamp(1, MAX_DURATION_HOURS);
    }
    if let Some(client_name) = form.client_name {
        draft.client_name = client_name;
    }
    if let Some(service_type) = form.service_type {
        draft.service_type = service_type;
    }
}

async fn wizard_back_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session.write().await;
    match session.back_booking() {
        Ok(()) => Redirect::to("/book").into_response(),
        Err(_) => Redirect::to("/").into_response(),
    }
}

async fn wizard_cancel_handler(State(state): State<Arc<AppState>>) -> Response {
    state.session.write().await.cancel_booking();
    Redirect::to("/").into_response()
}

async fn wizard_confirm_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session.write().await;
    match session.confirm_booking() {
        Ok(_) => Redirect::to("/bookings").into_response(),
        Err(SessionError::NoActiveBooking) => Redirect::to("/").into_response(),
        Err(_) => Redirect::to("/book").into_response(),
    }
}

async fn bookings_handler(State(state): State<Arc<AppState>>) -> Response {
    let session = state.session.read().await;
    let bookings = session
        .bookings()
        .iter()
        .map(|booking| BookingView {
            listing_name: booking.listing_name.clone(),
            date: booking.date.clone(),
            time: booking.time.clone(),
            duration_hours: booking.duration_hours,
            client_name: booking.client_name.clone(),
            service_type: booking.service_type.clone(),
            total_cost: booking.total_cost,
            status: "confirmed".to_string(),
            created_at: booking.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        })
        .collect();
    render_html(BookingsTemplate {
        header: HeaderView::from_session(&session),
        bookings,
    })
}

fn render_html<T: Template>(tpl: T) -> Response {
    match tpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => server_error(anyhow::anyhow!(err.to_string())),
    }
}

fn server_error(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("Server error: {}", err)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState::new(Session::seed().expect("seed catalog")))
    }

    async fn body_text(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn index_lists_the_full_seed_catalog() {
        let app = test_app();
        let resp = app.oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = body_text(resp).await;
        assert!(text.contains("Luxe Beauty Studio"));
        assert!(text.contains("Artisan Beauty Bar"));
        assert!(text.contains("6 spaces found"));
    }

    #[tokio::test]
    async fn index_applies_query_filters() {
        let app = test_app();
        let resp = app
            .oneshot(get("/?max_price=50&min_rating=4.8"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = body_text(resp).await;
        assert!(text.contains("Luxe Beauty Studio"));
        assert!(text.contains("Artisan Beauty Bar"));
        assert!(!text.contains("Serenity Spa Suite"));
        assert!(text.contains("2 spaces found"));
    }

    #[tokio::test]
    async fn index_shows_no_results_panel() {
        let app = test_app();
        let resp = app.oneshot(get("/?location=zanzibar")).await.unwrap();
        let text = body_text(resp).await;
        assert!(text.contains("No salons found"));
    }

    #[tokio::test]
    async fn detail_page_renders_or_404s() {
        let app = test_app();
        let found = app.clone().oneshot(get("/listings/4")).await.unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        assert!(body_text(found).await.contains("Serenity Spa Suite"));

        let missing = app.oneshot(get("/listings/99")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn booking_redirects_to_login_when_signed_out() {
        let app = test_app();
        let resp = app.oneshot(post_empty("/listings/1/book")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn login_rejects_blank_credentials() {
        let app = test_app();
        let resp = app
            .oneshot(post_form("/login", "name=&email=dana%40example.com"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/login?error=1");
    }

    #[tokio::test]
    async fn full_booking_flow_over_http() {
        let app = test_app();

        let login = app
            .clone()
            .oneshot(post_form(
                "/login",
                "name=Dana+Styles&email=dana%40example.com&role=renter",
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::SEE_OTHER);
        assert_eq!(login.headers()[header::LOCATION], "/");

        let start = app
            .clone()
            .oneshot(post_empty("/listings/1/book"))
            .await
            .unwrap();
        assert_eq!(start.headers()[header::LOCATION], "/book");

        let step1 = app.clone().oneshot(get("/book")).await.unwrap();
        let text = body_text(step1).await;
        assert!(text.contains("Step 1 of 3"));
        assert!(text.contains("Luxe Beauty Studio"));

        // Advance without a date: the wizard stays on step 1.
        let stuck = app.clone().oneshot(post_empty("/book/next")).await.unwrap();
        assert_eq!(stuck.status(), StatusCode::SEE_OTHER);
        let still_step1 = app.clone().oneshot(get("/book")).await.unwrap();
        assert!(body_text(still_step1).await.contains("Step 1 of 3"));

        app.clone()
            .oneshot(post_form(
                "/book/next",
                "date=2026-09-01&time=10%3A00&duration_hours=3",
            ))
            .await
            .unwrap();
        let step2 = app.clone().oneshot(get("/book")).await.unwrap();
        assert!(body_text(step2).await.contains("Step 2 of 3"));

        app.clone()
            .oneshot(post_form(
                "/book/next",
                "client_name=Alex+Rivera&service_type=Hair+Styling",
            ))
            .await
            .unwrap();
        let step3 = app.clone().oneshot(get("/book")).await.unwrap();
        let text = body_text(step3).await;
        assert!(text.contains("Step 3 of 3"));
        assert!(text.contains("$135"));

        let confirm = app
            .clone()
            .oneshot(post_empty("/book/confirm"))
            .await
            .unwrap();
        assert_eq!(confirm.headers()[header::LOCATION], "/bookings");

        let bookings = app.oneshot(get("/bookings")).await.unwrap();
        let text = body_text(bookings).await;
        assert!(text.contains("Luxe Beauty Studio"));
        assert!(text.contains("Alex Rivera"));
        assert!(text.contains("$135"));
    }

    #[tokio::test]
    async fn api_listings_returns_filtered_json() {
        let app = test_app();
        let resp = app
            .oneshot(get("/api/listings?availability=today"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let listings: Vec<Listing> =
            serde_json::from_slice(&resp.into_body().collect().await.unwrap().to_bytes()).unwrap();
        assert_eq!(listings.len(), 4);
        assert!(listings.iter().all(|l| l.available_today));
    }
}
