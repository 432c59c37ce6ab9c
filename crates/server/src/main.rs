// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;
mod store;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use cabride::{Actor, ActorRole, CoreError};
use cabride_domain::{
    DomainError, Driver, ParticipantId, Ride, RideId, Rider, available_locations, calculate_fare,
    validate_route,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use session::{SessionActor, Sessions};
use std::sync::Arc;
use store::{Store, StoreError};
use tokio::sync::Mutex;
use tracing::info;

/// Cabride Server - authoritative HTTP backend for the ride platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The authoritative ride store.
    store: Arc<Mutex<Store>>,
    /// Live bearer sessions.
    sessions: Arc<Mutex<Sessions>>,
}

/// Standard `{data: ...}` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Enveloped<T> {
    /// The wrapped payload.
    data: T,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorBody {
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorBody> = Json(ErrorBody {
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        let status: StatusCode = match err {
            DomainError::DriverBusy => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        let status: StatusCode = match &err {
            StoreError::Domain(DomainError::DriverBusy) => StatusCode::CONFLICT,
            StoreError::Domain(_) => StatusCode::BAD_REQUEST,
            StoreError::Core(core_err) => match core_err {
                CoreError::RideNotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::UnauthorizedActor { .. } => StatusCode::FORBIDDEN,
                CoreError::DomainViolation(DomainError::DriverBusy)
                | CoreError::OngoingRideExists
                | CoreError::AlreadyRated { .. }
                | CoreError::DriverAlreadyAssigned { .. }
                | CoreError::NoDriverAssigned { .. }
                | CoreError::MissingFare { .. } => StatusCode::CONFLICT,
                CoreError::DomainViolation(_) => StatusCode::BAD_REQUEST,
            },
            StoreError::DuplicateEmail(_) | StoreError::NoDriverAvailable => StatusCode::CONFLICT,
            StoreError::ParticipantNotFound(_) => StatusCode::NOT_FOUND,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Request body for rider registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRiderRequest {
    /// Display name.
    name: String,
    /// Contact email.
    email: String,
    /// Ten-digit phone number.
    phone: String,
}

/// Request body for driver registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterDriverRequest {
    /// Display name.
    name: String,
    /// Contact email.
    email: String,
    /// Ten-digit phone number.
    phone: String,
    /// Driving license number.
    license_number: String,
    /// Vehicle descriptor shown to riders.
    vehicle_details: String,
}

/// Request body for login.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoginRequest {
    /// Contact email.
    email: String,
    /// "rider" or "driver".
    role: String,
}

/// Response body for login.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoginResponse {
    /// Opaque bearer token.
    token: String,
    /// The logged-in participant.
    participant: Value,
}

/// Request body for booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRequest {
    /// Pickup location.
    source: String,
    /// Drop location.
    destination: String,
    /// The booking rider, must match the session.
    rider_id: i64,
}

/// Request body for rating submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingRequest {
    /// The concluded ride.
    ride_id: i64,
    /// The rating rider, must match the session.
    rater_id: i64,
    /// Score in 1..=5.
    score: u8,
    /// Free-form comments.
    #[serde(default)]
    comments: String,
}

/// Query parameters for fare estimation.
#[derive(Debug, Deserialize)]
struct EstimateQuery {
    /// Pickup location.
    source: String,
    /// Drop location.
    destination: String,
}

/// Query parameters for the driver status toggle.
#[derive(Debug, Deserialize)]
struct StatusQuery {
    /// Target status, AVAILABLE or OFFLINE.
    status: String,
}

/// Ride representation on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RideDto {
    /// The ride identifier.
    ride_id: i64,
    /// Pickup location.
    source: String,
    /// Drop location.
    destination: String,
    /// The fare, once priced.
    fare: Option<f64>,
    /// Current lifecycle status.
    status: String,
    /// Assigned driver's display name.
    driver_name: Option<String>,
    /// Assigned driver's vehicle descriptor.
    vehicle_details: Option<String>,
    /// Booking timestamp.
    booking_time: String,
}

/// Builds the wire representation of a ride, joining driver details.
fn ride_to_dto(ride: &Ride, store: &Store) -> RideDto {
    RideDto {
        ride_id: ride.id.value(),
        source: ride.source.clone(),
        destination: ride.destination.clone(),
        fare: ride.fare,
        status: ride.status.as_str().to_string(),
        driver_name: ride
            .driver_id
            .and_then(|id| store.driver_name(id))
            .map(ToString::to_string),
        vehicle_details: ride
            .driver_id
            .and_then(|id| store.driver_vehicle(id))
            .map(ToString::to_string),
        booking_time: ride.booked_at.to_rfc3339(),
    }
}

/// Rider entry in the participant listing, legacy `userId` key.
fn rider_to_participant(rider: &Rider) -> Value {
    json!({
        "userId": rider.id.value(),
        "name": rider.name,
        "email": rider.email,
        "phone": rider.phone,
    })
}

/// Driver entry in the participant listing, legacy `driverId` key.
fn driver_to_participant(driver: &Driver) -> Value {
    json!({
        "driverId": driver.id.value(),
        "name": driver.name,
        "email": driver.email,
        "phone": driver.phone,
        "vehicleDetails": driver.vehicle_details,
    })
}

/// Parses a role string into an `ActorRole`.
fn parse_role(role_str: &str) -> Result<ActorRole, HttpError> {
    match role_str.to_lowercase().as_str() {
        "rider" => Ok(ActorRole::Rider),
        "driver" => Ok(ActorRole::Driver),
        _ => Err(HttpError::bad_request(format!(
            "Invalid role: '{role_str}'. Must be 'rider' or 'driver'"
        ))),
    }
}

/// Handler for POST `/auth/register/rider`.
async fn handle_register_rider(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRiderRequest>,
) -> Result<Json<Enveloped<Value>>, HttpError> {
    info!(email = %req.email, "Handling rider registration");
    let mut store = app_state.store.lock().await;
    let rider: Rider = store.register_rider(&req.name, &req.email, &req.phone)?;
    drop(store);
    Ok(Json(Enveloped {
        data: rider_to_participant(&rider),
    }))
}

/// Handler for POST `/auth/register/driver`.
async fn handle_register_driver(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterDriverRequest>,
) -> Result<Json<Enveloped<Value>>, HttpError> {
    info!(email = %req.email, "Handling driver registration");
    let mut store = app_state.store.lock().await;
    let driver: Driver = store.register_driver(
        &req.name,
        &req.email,
        &req.phone,
        &req.license_number,
        &req.vehicle_details,
    )?;
    drop(store);
    Ok(Json(Enveloped {
        data: driver_to_participant(&driver),
    }))
}

/// Handler for POST `/auth/login`.
///
/// Credential mechanics are out of scope; a registered email is the whole
/// check. Mints a fresh bearer token for the session.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, role = %req.role, "Handling login");
    let role: ActorRole = parse_role(&req.role)?;

    let store = app_state.store.lock().await;
    let (participant_id, participant): (ParticipantId, Value) = match role {
        ActorRole::Rider => {
            let rider = store.rider_by_email(&req.email).ok_or_else(|| HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: format!("No rider registered with email: {}", req.email),
            })?;
            (rider.id, rider_to_participant(rider))
        }
        ActorRole::Driver => {
            let driver = store.driver_by_email(&req.email).ok_or_else(|| HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: format!("No driver registered with email: {}", req.email),
            })?;
            (driver.id, driver_to_participant(driver))
        }
    };
    drop(store);

    let mut sessions = app_state.sessions.lock().await;
    let token: String = sessions.mint(participant_id, role);
    drop(sessions);

    Ok(Json(LoginResponse { token, participant }))
}

/// Handler for POST `/auth/logout`.
///
/// Revokes the presented bearer token. The extractor has already
/// validated it, so revocation cannot miss.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    headers: axum::http::HeaderMap,
) -> Json<Enveloped<String>> {
    info!(participant_id = actor.participant_id.value(), "Handling logout");
    if let Some(token) = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        let mut sessions = app_state.sessions.lock().await;
        sessions.revoke(token);
        drop(sessions);
    }
    Json(Enveloped {
        data: String::from("Logged out"),
    })
}

/// Handler for GET `/participants`.
///
/// Riders are emitted under the legacy `userId` key and drivers under
/// `driverId`, the record vintages clients must tolerate.
async fn handle_participants(
    AxumState(app_state): AxumState<AppState>,
) -> Json<Enveloped<Vec<Value>>> {
    let store = app_state.store.lock().await;
    let mut entries: Vec<Value> = store.riders().map(rider_to_participant).collect();
    entries.extend(store.drivers().map(driver_to_participant));
    drop(store);
    Json(Enveloped { data: entries })
}

/// Handler for GET `/rides/locations`.
async fn handle_locations() -> Json<Enveloped<Vec<String>>> {
    Json(Enveloped {
        data: available_locations(),
    })
}

/// Handler for GET `/rides/estimate`.
///
/// Returns a bare JSON number, the one unenveloped success payload.
/// Degenerate routes are rejected the same way booking rejects them.
async fn handle_estimate(Query(query): Query<EstimateQuery>) -> Result<Json<f64>, HttpError> {
    let (source, destination): (String, String) =
        validate_route(&query.source, &query.destination)?;
    let fare: f64 = calculate_fare(&source, &destination)?;
    Ok(Json(fare))
}

/// Handler for POST `/rides/book`.
async fn handle_book(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<BookRequest>,
) -> Result<Json<Enveloped<RideDto>>, HttpError> {
    info!(
        rider_id = req.rider_id,
        source = %req.source,
        destination = %req.destination,
        "Handling booking"
    );
    if actor.role != ActorRole::Rider {
        return Err(HttpError::forbidden("Only riders may book rides"));
    }
    if actor.participant_id.value() != req.rider_id {
        return Err(HttpError::forbidden(
            "Booking rider does not match the session",
        ));
    }

    let mut store = app_state.store.lock().await;
    let ride: Ride = store.book_ride(
        actor.participant_id,
        &req.source,
        &req.destination,
        chrono::Utc::now(),
    )?;
    let dto: RideDto = ride_to_dto(&ride, &store);
    drop(store);
    Ok(Json(Enveloped { data: dto }))
}

/// Handler for GET `/rides/history`.
async fn handle_history(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Enveloped<Vec<RideDto>>>, HttpError> {
    if actor.role != ActorRole::Rider {
        return Err(HttpError::forbidden("Ride history is a rider view"));
    }
    let store = app_state.store.lock().await;
    let rides: Vec<RideDto> = store
        .rider_history(actor.participant_id)
        .into_iter()
        .map(|ride| ride_to_dto(ride, &store))
        .collect();
    drop(store);
    Ok(Json(Enveloped { data: rides }))
}

/// Handler for GET `/rides/history/{driver_id}`.
async fn handle_driver_history(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_actor): SessionActor,
    Path(driver_id): Path<i64>,
) -> Result<Json<Enveloped<Vec<RideDto>>>, HttpError> {
    let store = app_state.store.lock().await;
    let rides: Vec<RideDto> = store
        .driver_history(ParticipantId::new(driver_id))?
        .into_iter()
        .map(|ride| ride_to_dto(ride, &store))
        .collect();
    drop(store);
    Ok(Json(Enveloped { data: rides }))
}

/// Handler for GET `/rides/active-request/{driver_id}`.
///
/// Returns the bare ride, or bare `null` when the driver has no
/// assignment.
async fn handle_active_ride(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_actor): SessionActor,
    Path(driver_id): Path<i64>,
) -> Result<Json<Option<RideDto>>, HttpError> {
    let store = app_state.store.lock().await;
    let dto: Option<RideDto> = store
        .active_ride(ParticipantId::new(driver_id))?
        .map(|ride| ride_to_dto(ride, &store));
    drop(store);
    Ok(Json(dto))
}

/// Handler for PUT `/rides/{ride_id}/start`.
async fn handle_start_trip(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_actor): SessionActor,
    Path(ride_id): Path<i64>,
) -> Result<Json<Enveloped<RideDto>>, HttpError> {
    info!(ride_id, "Handling start trip");
    let mut store = app_state.store.lock().await;
    let ride: Ride = store.start_trip(RideId::new(ride_id), chrono::Utc::now())?;
    let dto: RideDto = ride_to_dto(&ride, &store);
    drop(store);
    Ok(Json(Enveloped { data: dto }))
}

/// Handler for PUT `/rides/{ride_id}/end`.
///
/// Idempotent: ending an already concluded ride returns the stored
/// terminal record with 200.
async fn handle_end_ride(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(ride_id): Path<i64>,
) -> Result<Json<Enveloped<RideDto>>, HttpError> {
    info!(ride_id, "Handling end ride");
    let mut store = app_state.store.lock().await;
    let ride: Ride = store.end_ride(
        RideId::new(ride_id),
        Actor::new(actor.participant_id, actor.role),
        chrono::Utc::now(),
    )?;
    let dto: RideDto = ride_to_dto(&ride, &store);
    drop(store);
    Ok(Json(Enveloped { data: dto }))
}

/// Handler for POST `/ratings/submit`.
async fn handle_submit_rating(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<RatingRequest>,
) -> Result<Json<Enveloped<String>>, HttpError> {
    info!(ride_id = req.ride_id, score = req.score, "Handling rating");
    if actor.participant_id.value() != req.rater_id {
        return Err(HttpError::forbidden(
            "Rating rider does not match the session",
        ));
    }
    let mut store = app_state.store.lock().await;
    store.submit_rating(
        RideId::new(req.ride_id),
        actor.participant_id,
        req.score,
        &req.comments,
        chrono::Utc::now(),
    )?;
    drop(store);
    Ok(Json(Enveloped {
        data: String::from("Rating submitted"),
    }))
}

/// Handler for GET `/drivers/{driver_id}/status`.
async fn handle_driver_status(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_actor): SessionActor,
    Path(driver_id): Path<i64>,
) -> Result<Json<String>, HttpError> {
    let store = app_state.store.lock().await;
    let status = store.driver_status(ParticipantId::new(driver_id))?;
    drop(store);
    Ok(Json(status.as_str().to_string()))
}

/// Handler for PUT `/drivers/{driver_id}/status`.
///
/// Only the opt-in poles may be requested; BUSY is derived, never set.
async fn handle_set_driver_status(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(driver_id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Enveloped<String>>, HttpError> {
    info!(driver_id, status = %query.status, "Handling driver status toggle");
    if actor.role != ActorRole::Driver || actor.participant_id.value() != driver_id {
        return Err(HttpError::forbidden(
            "Drivers may only toggle their own status",
        ));
    }
    let opted_in: bool = match query.status.to_uppercase().as_str() {
        "AVAILABLE" => true,
        "OFFLINE" => false,
        other => {
            return Err(HttpError::bad_request(format!(
                "Invalid target status: '{other}'. Must be 'AVAILABLE' or 'OFFLINE'"
            )));
        }
    };
    let mut store = app_state.store.lock().await;
    let status = store.set_driver_opt_in(ParticipantId::new(driver_id), opted_in)?;
    drop(store);
    Ok(Json(Enveloped {
        data: status.as_str().to_string(),
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register/rider", post(handle_register_rider))
        .route("/auth/register/driver", post(handle_register_driver))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/participants", get(handle_participants))
        .route("/rides/locations", get(handle_locations))
        .route("/rides/estimate", get(handle_estimate))
        .route("/rides/book", post(handle_book))
        .route("/rides/history", get(handle_history))
        .route("/rides/history/{driver_id}", get(handle_driver_history))
        .route("/rides/active-request/{driver_id}", get(handle_active_ride))
        .route("/rides/{ride_id}/start", put(handle_start_trip))
        .route("/rides/{ride_id}/end", put(handle_end_ride))
        .route("/ratings/submit", post(handle_submit_rating))
        .route(
            "/drivers/{driver_id}/status",
            get(handle_driver_status).put(handle_set_driver_status),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Cabride Server");

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(Store::new())),
        sessions: Arc::new(Mutex::new(Sessions::default())),
    };
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use cabride_domain::Receipt;
    use tower::ServiceExt;

    /// Helper to create empty test app state.
    fn create_test_app_state() -> AppState {
        AppState {
            store: Arc::new(Mutex::new(Store::new())),
            sessions: Arc::new(Mutex::new(Sessions::default())),
        }
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_rider(app: &Router) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/auth/register/rider",
            None,
            Some(json!({
                "name": "Meera Iyer",
                "email": "meera@example.com",
                "phone": "9876543210",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["data"].clone()
    }

    async fn register_driver(app: &Router) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/auth/register/driver",
            None,
            Some(json!({
                "name": "Dhanush Kumar",
                "email": "dhanush@example.com",
                "phone": "9123456780",
                "licenseNumber": "TN0920260001",
                "vehicleDetails": "TN-09-1234 Swift",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["data"].clone()
    }

    async fn login(app: &Router, email: &str, role: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": email, "role": role })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Registers both participants, logs in, and brings the driver into
    /// the AVAILABLE pool.
    async fn bootstrap(app: &Router) -> (String, String, i64) {
        register_rider(app).await;
        let driver = register_driver(app).await;
        let driver_id = driver["driverId"].as_i64().unwrap();
        let rider_token = login(app, "meera@example.com", "rider").await;
        let driver_token = login(app, "dhanush@example.com", "driver").await;
        let (status, _) = send(
            app,
            "PUT",
            &format!("/drivers/{driver_id}/status?status=AVAILABLE"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        (rider_token, driver_token, driver_id)
    }

    async fn book(app: &Router, rider_token: &str) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/rides/book",
            Some(rider_token),
            Some(json!({
                "source": "Adyar",
                "destination": "Guindy",
                "riderId": 1,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["data"].clone()
    }

    #[tokio::test]
    async fn test_register_rider_rejects_bad_phone() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = send(
            &app,
            "POST",
            "/auth/register/rider",
            None,
            Some(json!({
                "name": "Meera Iyer",
                "email": "meera@example.com",
                "phone": "12345",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("phone"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let app: Router = build_router(create_test_app_state());
        register_rider(&app).await;
        let (status, _) = send(
            &app,
            "POST",
            "/auth/register/rider",
            None,
            Some(json!({
                "name": "Other Person",
                "email": "MEERA@example.com",
                "phone": "9876543211",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_with_unknown_email_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());
        let (status, _) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "role": "rider" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_participants_use_legacy_identifier_keys() {
        let app: Router = build_router(create_test_app_state());
        register_rider(&app).await;
        register_driver(&app).await;

        let (status, body) = send(&app, "GET", "/participants", None, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0]["userId"].is_i64());
        assert!(entries[0]["id"].is_null());
        assert!(entries[1]["driverId"].is_i64());
    }

    #[tokio::test]
    async fn test_estimate_returns_a_bare_number() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) =
            send(&app, "GET", "/rides/estimate?source=Adyar&destination=Guindy", None, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body, json!(70.0));
    }

    #[tokio::test]
    async fn test_estimate_rejects_unknown_location() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) =
            send(&app, "GET", "/rides/estimate?source=Adyar&destination=Mars", None, None).await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("Mars"));
    }

    #[tokio::test]
    async fn test_estimate_rejects_identical_endpoints() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) =
            send(&app, "GET", "/rides/estimate?source=Adyar&destination=adyar", None, None).await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("different"));
    }

    #[tokio::test]
    async fn test_locations_are_enveloped_and_sorted() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = send(&app, "GET", "/rides/locations", None, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let locations = body["data"].as_array().unwrap();
        assert!(locations.len() > 10);
        assert_eq!(locations[0], "Adyar");
    }

    #[tokio::test]
    async fn test_booking_requires_a_session() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = send(
            &app,
            "POST",
            "/rides/book",
            None,
            Some(json!({ "source": "Adyar", "destination": "Guindy", "riderId": 1 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert!(body["message"].as_str().unwrap().contains("Authorization"));
    }

    #[tokio::test]
    async fn test_rejection_of_a_stale_token_carries_a_message_body() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = send(
            &app,
            "GET",
            "/rides/history",
            Some("session_0_0"),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert!(body["message"].as_str().unwrap().contains("unknown token"));
    }

    #[tokio::test]
    async fn test_logout_revokes_the_session() {
        let app: Router = build_router(create_test_app_state());
        register_rider(&app).await;
        let rider_token = login(&app, "meera@example.com", "rider").await;

        let (status, _) = send(&app, "POST", "/auth/logout", Some(&rider_token), None).await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(&app, "GET", "/rides/history", Some(&rider_token), None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_booking_without_available_driver_conflicts() {
        let app: Router = build_router(create_test_app_state());
        register_rider(&app).await;
        let rider_token = login(&app, "meera@example.com", "rider").await;

        let (status, body) = send(
            &app,
            "POST",
            "/rides/book",
            Some(&rider_token),
            Some(json!({ "source": "Adyar", "destination": "Guindy", "riderId": 1 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert!(body["message"].as_str().unwrap().contains("No cabs"));
    }

    #[tokio::test]
    async fn test_booking_assigns_the_available_driver_and_fixes_the_fare() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, _, _) = bootstrap(&app).await;

        let ride = book(&app, &rider_token).await;
        assert_eq!(ride["status"], "ASSIGNED");
        assert_eq!(ride["fare"], json!(70.0));
        assert_eq!(ride["driverName"], "Dhanush Kumar");
        assert_eq!(ride["vehicleDetails"], "TN-09-1234 Swift");
    }

    #[tokio::test]
    async fn test_second_booking_while_ongoing_conflicts() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, _, _) = bootstrap(&app).await;
        book(&app, &rider_token).await;

        let (status, body) = send(
            &app,
            "POST",
            "/rides/book",
            Some(&rider_token),
            Some(json!({ "source": "Adyar", "destination": "Velachery", "riderId": 1 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(
            body["message"],
            "You already have an ongoing ride! Complete it before booking a new one."
        );
    }

    #[tokio::test]
    async fn test_assigned_driver_is_busy_and_toggle_is_rejected() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, driver_token, driver_id) = bootstrap(&app).await;
        book(&app, &rider_token).await;

        let (status, body) = send(
            &app,
            "GET",
            &format!("/drivers/{driver_id}/status"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body, json!("BUSY"));

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/drivers/{driver_id}/status?status=OFFLINE"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_active_request_is_bare_ride_or_null() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, driver_token, driver_id) = bootstrap(&app).await;

        let (status, body) = send(
            &app,
            "GET",
            &format!("/rides/active-request/{driver_id}"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(body.is_null());

        book(&app, &rider_token).await;
        let (_, body) = send(
            &app,
            "GET",
            &format!("/rides/active-request/{driver_id}"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(body["status"], "ASSIGNED");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_end_ride_is_idempotent() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, driver_token, _) = bootstrap(&app).await;
        let ride = book(&app, &rider_token).await;
        let ride_id = ride["rideId"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/rides/{ride_id}/end"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data"]["status"], "PAID");
        assert_eq!(body["data"]["fare"], json!(70.0));

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/rides/{ride_id}/end"),
            Some(&rider_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data"]["status"], "PAID");
    }

    #[tokio::test]
    async fn test_ending_releases_the_driver_to_available() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, driver_token, driver_id) = bootstrap(&app).await;
        let ride = book(&app, &rider_token).await;
        let ride_id = ride["rideId"].as_i64().unwrap();

        send(
            &app,
            "PUT",
            &format!("/rides/{ride_id}/end"),
            Some(&driver_token),
            None,
        )
        .await;

        let (_, body) = send(
            &app,
            "GET",
            &format!("/drivers/{driver_id}/status"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(body, json!("AVAILABLE"));
    }

    #[tokio::test]
    async fn test_start_trip_moves_the_ride_in_progress() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, driver_token, _) = bootstrap(&app).await;
        let ride = book(&app, &rider_token).await;
        let ride_id = ride["rideId"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/rides/{ride_id}/start"),
            Some(&driver_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data"]["status"], "IN_PROGRESS");
    }

    #[tokio::test]
    async fn test_stranger_cannot_end_a_ride() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, _, _) = bootstrap(&app).await;
        let ride = book(&app, &rider_token).await;
        let ride_id = ride["rideId"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "POST",
            "/auth/register/rider",
            None,
            Some(json!({
                "name": "Arun Prasad",
                "email": "arun@example.com",
                "phone": "9000000001",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(body["data"]["userId"].is_i64());
        let stranger_token = login(&app, "arun@example.com", "rider").await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/rides/{ride_id}/end"),
            Some(&stranger_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rating_flow_rejects_duplicates() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, driver_token, _) = bootstrap(&app).await;
        let ride = book(&app, &rider_token).await;
        let ride_id = ride["rideId"].as_i64().unwrap();

        // Rating before conclusion is a lifecycle violation.
        let (status, _) = send(
            &app,
            "POST",
            "/ratings/submit",
            Some(&rider_token),
            Some(json!({ "rideId": ride_id, "raterId": 1, "score": 5, "comments": "" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);

        send(
            &app,
            "PUT",
            &format!("/rides/{ride_id}/end"),
            Some(&driver_token),
            None,
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            "/ratings/submit",
            Some(&rider_token),
            Some(json!({ "rideId": ride_id, "raterId": 1, "score": 5, "comments": "Great" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["data"], "Rating submitted");

        let (status, _) = send(
            &app,
            "POST",
            "/ratings/submit",
            Some(&rider_token),
            Some(json!({ "rideId": ride_id, "raterId": 1, "score": 3, "comments": "" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_rating_score_out_of_bounds_is_rejected() {
        let app: Router = build_router(create_test_app_state());
        let (rider_token, driver_token, _) = bootstrap(&app).await;
        let ride = book(&app, &rider_token).await;
        let ride_id = ride["rideId"].as_i64().unwrap();
        send(
            &app,
            "PUT",
            &format!("/rides/{ride_id}/end"),
            Some(&driver_token),
            None,
        )
        .await;

        let (status, _) = send(
            &app,
            "POST",
            "/ratings/submit",
            Some(&rider_token),
            Some(json!({ "rideId": ride_id, "raterId": 1, "score": 6, "comments": "" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    mod engine_bridge {
        //! End-to-end scenario driving the real router through the client
        //! engine, with the router standing in for the transport.

        use super::*;
        use cabride_engine::{
            BackendError, BookRideRequest, Credentials, FareEstimate, FareEstimator,
            IdentityResolver, RatingSubmission, RideBackend, RideCompleted, driver_watch,
            driver_watch::DriverSession, rider_watch, submit_rating,
        };
        use std::future::Future;
        use std::time::Duration;

        /// A backend that drives the in-process router directly.
        #[derive(Clone)]
        struct RouterBackend {
            app: Router,
            token: String,
        }

        impl RouterBackend {
            async fn call(
                &self,
                method: &str,
                uri: &str,
                body: Option<Value>,
            ) -> Result<Value, BackendError> {
                let mut builder = Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Authorization", format!("Bearer {}", self.token));
                if body.is_some() {
                    builder = builder.header("content-type", "application/json");
                }
                let request = match body {
                    Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
                    None => builder.body(Body::empty()).unwrap(),
                };
                let response = self.app.clone().oneshot(request).await.map_err(|err| {
                    BackendError::Transport {
                        message: err.to_string(),
                    }
                })?;
                let status = response.status();
                let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                    .await
                    .map_err(|err| BackendError::Transport {
                        message: err.to_string(),
                    })?;
                let value: Value = if bytes.is_empty() {
                    Value::Null
                } else {
                    serde_json::from_slice(&bytes).map_err(|err| BackendError::Malformed {
                        message: err.to_string(),
                    })?
                };
                if status.is_success() {
                    return Ok(value);
                }
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Err(BackendError::Status {
                    code: status.as_u16(),
                    message,
                })
            }
        }

        impl RideBackend for RouterBackend {
            fn list_participants(
                &self,
            ) -> impl Future<Output = Result<Value, BackendError>> + Send {
                self.call("GET", "/participants", None)
            }

            async fn fare_estimate(
                &self,
                source: &str,
                destination: &str,
            ) -> Result<Value, BackendError> {
                self.call(
                    "GET",
                    &format!("/rides/estimate?source={source}&destination={destination}"),
                    None,
                )
                .await
            }

            async fn book_ride(&self, request: &BookRideRequest) -> Result<Value, BackendError> {
                let body = serde_json::to_value(request).map_err(|err| {
                    BackendError::Malformed {
                        message: err.to_string(),
                    }
                })?;
                self.call("POST", "/rides/book", Some(body)).await
            }

            fn ride_history(&self) -> impl Future<Output = Result<Value, BackendError>> + Send {
                self.call("GET", "/rides/history", None)
            }

            async fn driver_ride_history(
                &self,
                driver_id: ParticipantId,
            ) -> Result<Value, BackendError> {
                self.call("GET", &format!("/rides/history/{}", driver_id.value()), None)
                    .await
            }

            async fn active_ride(
                &self,
                driver_id: ParticipantId,
            ) -> Result<Value, BackendError> {
                self.call(
                    "GET",
                    &format!("/rides/active-request/{}", driver_id.value()),
                    None,
                )
                .await
            }

            async fn end_ride(&self, ride_id: RideId) -> Result<Value, BackendError> {
                self.call("PUT", &format!("/rides/{}/end", ride_id.value()), None)
                    .await
            }

            async fn submit_rating(
                &self,
                submission: &RatingSubmission,
            ) -> Result<Value, BackendError> {
                let body = serde_json::to_value(submission).map_err(|err| {
                    BackendError::Malformed {
                        message: err.to_string(),
                    }
                })?;
                self.call("POST", "/ratings/submit", Some(body)).await
            }
        }

        #[tokio::test(start_paused = true)]
        #[allow(clippy::too_many_lines)]
        async fn test_full_ride_lifecycle_through_the_engine() {
            let app: Router = build_router(create_test_app_state());
            let (rider_token, driver_token, driver_id) = bootstrap(&app).await;

            let rider_backend = Arc::new(RouterBackend {
                app: app.clone(),
                token: rider_token.clone(),
            });
            let driver_backend = Arc::new(RouterBackend {
                app: app.clone(),
                token: driver_token,
            });

            // Identity resolution through the legacy userId key.
            let resolver = IdentityResolver::new(Arc::clone(&rider_backend));
            let identity = resolver
                .resolve(Some(&Credentials {
                    email: "meera@example.com".to_string(),
                    token: rider_token,
                }))
                .await
                .unwrap();
            assert_eq!(identity.display_name, "Meera Iyer");

            // Estimate, then book with the priced estimate in hand.
            let estimator = FareEstimator::new(Arc::clone(&rider_backend));
            let estimate = estimator.estimate("Adyar", "Guindy").await;
            assert_eq!(estimate, FareEstimate::Priced(70.0));

            let submitter =
                cabride_engine::RideRequestSubmitter::new(Arc::clone(&rider_backend));
            let confirmation = submitter
                .submit(&identity, "Adyar", "Guindy", estimate)
                .await
                .unwrap();
            assert_eq!(confirmation.fare, 70.0);
            assert_eq!(confirmation.driver_name.as_deref(), Some("Dhanush Kumar"));

            // Driver poll adopts the assignment and goes BUSY.
            let driver_session = Arc::new(tokio::sync::Mutex::new(DriverSession {
                opted_in: true,
                active_ride: None,
            }));
            let driver_handle = driver_watch::spawn(
                Arc::clone(&driver_backend),
                ParticipantId::new(driver_id),
                Arc::clone(&driver_session),
                Duration::from_secs(5),
            );
            tokio::time::sleep(Duration::from_secs(6)).await;
            assert_eq!(
                driver_session.lock().await.status(),
                cabride_domain::DriverStatus::Busy
            );

            // Rider waits for the conclusion while the driver ends the ride.
            let (rider_handle, mut events) =
                rider_watch::spawn(Arc::clone(&rider_backend), Duration::from_secs(3));

            let outcome =
                driver_watch::end_active_ride(driver_backend.as_ref(), &driver_session)
                    .await
                    .unwrap();
            let cabride_engine::EndRideOutcome::Completed(snapshot) = outcome else {
                panic!("expected this session to conclude the ride");
            };
            assert_eq!(snapshot.fare, Some(70.0));
            assert_eq!(
                driver_session.lock().await.status(),
                cabride_domain::DriverStatus::Available
            );

            let completed: RideCompleted = events.recv().await.unwrap();
            assert_eq!(completed.ride_id, confirmation.ride_id);
            assert_eq!(completed.fare, Some(70.0));
            rider_handle.stopped().await;

            // Receipt splits the fixed fare 80/18/2.
            let receipt: Receipt = Receipt::from_fare(completed.fare.unwrap());
            assert_eq!(receipt.base, 56.0);
            assert_eq!(receipt.tax, 12.6);
            assert_eq!(receipt.service_fee, 1.4);
            assert_eq!(receipt.total, 70.0);

            // Feedback closes the loop.
            submit_rating(
                rider_backend.as_ref(),
                &RatingSubmission {
                    ride_id: completed.ride_id.value(),
                    rater_id: identity.id.value(),
                    score: 5,
                    comments: "Smooth ride".to_string(),
                },
            )
            .await
            .unwrap();

            driver_handle.stop();
            driver_handle.stopped().await;
        }

        #[tokio::test]
        async fn test_unavailable_estimate_blocks_submission_without_a_ride() {
            let app: Router = build_router(create_test_app_state());
            let (rider_token, _, _) = bootstrap(&app).await;
            let backend = Arc::new(RouterBackend {
                app: app.clone(),
                token: rider_token.clone(),
            });

            // Unknown destination: the estimator degrades to Unavailable.
            let estimator = FareEstimator::new(Arc::clone(&backend));
            let estimate = estimator.estimate("Adyar", "Atlantis").await;
            assert_eq!(estimate, FareEstimate::Unavailable);

            let resolver = IdentityResolver::new(Arc::clone(&backend));
            let identity = resolver
                .resolve(Some(&Credentials {
                    email: "meera@example.com".to_string(),
                    token: rider_token,
                }))
                .await
                .unwrap();

            let submitter = cabride_engine::RideRequestSubmitter::new(Arc::clone(&backend));
            let err = submitter
                .submit(&identity, "Adyar", "Atlantis", estimate)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                cabride_engine::EngineError::Validation { .. }
            ));

            // No ride was created.
            let history = backend.ride_history().await.unwrap();
            assert_eq!(history["data"].as_array().unwrap().len(), 0);
        }

        #[tokio::test]
        async fn test_unresolvable_identity_blocks_booking() {
            let app: Router = build_router(create_test_app_state());
            let (rider_token, _, _) = bootstrap(&app).await;
            let backend = Arc::new(RouterBackend {
                app,
                token: rider_token.clone(),
            });

            let resolver = IdentityResolver::new(Arc::clone(&backend));
            let err = resolver
                .resolve(Some(&Credentials {
                    email: "ghost@example.com".to_string(),
                    token: rider_token,
                }))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                cabride_engine::EngineError::Unauthenticated { .. }
            ));
        }
    }
}
