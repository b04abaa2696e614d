#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use flyhas_api::metrics::Metrics;
use flyhas_api::middleware::auth::CustomerClaims;
use flyhas_api::sessions::SeatSessionRegistry;
use flyhas_api::state::{AppState, AuthConfig};
use flyhas_api::app;
use flyhas_core::payment::PaymentGateway;
use flyhas_core::repository::{FlightRepository, ReservationRepository};
use flyhas_core::search::FlightSearchQuery;
use flyhas_core::CheckoutSubmitter;
use flyhas_shared::{
    City, CreatedReservation, FlightDetail, FlightSummary, PaymentRequest, ReservationEntry,
    ReservationSummary, ResourceId, SeatRecord,
};
use flyhas_store::app_config::BookingRules;

pub const JWT_SECRET: &str = "test-secret";
pub const FLIGHT_ID: i64 = 42;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub fn flight_summary() -> FlightSummary {
    FlightSummary {
        id: ResourceId::Numeric(FLIGHT_ID),
        origin: "London".to_string(),
        destination: "Paris".to_string(),
        departure_time: chrono::NaiveDate::from_ymd_opt(2030, 5, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0)),
        arrival_time: None,
    }
}

/// 1A and 3C are free, 2B is already booked.
pub fn flight_detail() -> FlightDetail {
    FlightDetail {
        flight: flight_summary(),
        seats: vec![
            SeatRecord { id: ResourceId::Numeric(1), seat_number: "1A".to_string(), reserved: false },
            SeatRecord { id: ResourceId::Numeric(2), seat_number: "2B".to_string(), reserved: true },
            SeatRecord { id: ResourceId::Numeric(3), seat_number: "3C".to_string(), reserved: false },
        ],
    }
}

pub struct FakeFlights;

#[async_trait]
impl FlightRepository for FakeFlights {
    async fn list_cities(&self) -> Result<Vec<City>, BoxError> {
        Ok(vec![City {
            id: ResourceId::Numeric(1),
            name: "London".to_string(),
            country: Some("United Kingdom".to_string()),
            image_path: None,
        }])
    }

    async fn search_flights(&self, query: &FlightSearchQuery) -> Result<Vec<FlightSummary>, BoxError> {
        if query.origin == "London" {
            Ok(vec![flight_summary()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn get_flight(&self, id: &ResourceId) -> Result<FlightDetail, BoxError> {
        if *id == ResourceId::Numeric(FLIGHT_ID) {
            Ok(flight_detail())
        } else {
            Err(format!("no flight {}", id).into())
        }
    }
}

#[derive(Default)]
pub struct FakeReservations {
    pub submitted: Mutex<Vec<Vec<ReservationEntry>>>,
    pub history_for: Mutex<Vec<String>>,
}

#[async_trait]
impl ReservationRepository for FakeReservations {
    async fn submit_reservation(&self, entries: &[ReservationEntry]) -> Result<Vec<CreatedReservation>, BoxError> {
        self.submitted.lock().unwrap().push(entries.to_vec());
        Ok(entries
            .iter()
            .enumerate()
            .map(|(i, _)| CreatedReservation {
                id: ResourceId::Numeric(100 + i as i64),
                reservation_code: Some(format!("FH{}", 100 + i)),
            })
            .collect())
    }

    async fn my_reservations(&self, email: &str) -> Result<Vec<ReservationSummary>, BoxError> {
        self.history_for.lock().unwrap().push(email.to_string());
        Ok(vec![ReservationSummary {
            id: ResourceId::Numeric(100),
            reservation_code: Some("FH100".to_string()),
            seat: None,
            extra: Default::default(),
        }])
    }
}

#[derive(Default)]
pub struct FakePayments {
    pub decline: bool,
    pub charged: Mutex<Vec<PaymentRequest>>,
}

#[async_trait]
impl PaymentGateway for FakePayments {
    async fn checkout(&self, payment: &PaymentRequest) -> Result<(), BoxError> {
        if self.decline {
            return Err("card declined".into());
        }
        self.charged.lock().unwrap().push(payment.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub reservations: Arc<FakeReservations>,
    pub payments: Arc<FakePayments>,
    pub metrics: Arc<Metrics>,
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(BookingRules::default(), FakePayments::default())
}

pub fn build_test_app_with(rules: BookingRules, payments: FakePayments) -> TestApp {
    let reservations = Arc::new(FakeReservations::default());
    let payments = Arc::new(payments);
    let metrics = Arc::new(Metrics::new().unwrap());

    let state = AppState {
        flights: Arc::new(FakeFlights),
        reservations: reservations.clone(),
        checkout: Arc::new(CheckoutSubmitter::new(
            reservations.clone(),
            payments.clone(),
            rules.fares(),
        )),
        sessions: Arc::new(SeatSessionRegistry::new(
            rules.hold_seconds,
            rules.seat_page_bounds(),
            metrics.clone(),
        )),
        auth: AuthConfig { secret: JWT_SECRET.to_string() },
        rules,
        metrics: metrics.clone(),
    };

    TestApp { router: app(state), reservations, payments, metrics }
}

pub fn bearer_token(sub: &str, email: Option<&str>) -> String {
    let claims = CustomerClaims {
        sub: sub.to_string(),
        email: email.map(str::to_string),
        role: Some("CUSTOMER".to_string()),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes())).unwrap()
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

/// Opens a seat session on the fake flight and returns its id.
pub async fn open_session(app: &Router, passengers: i64) -> String {
    let response = post_json(
        app,
        "/v1/seat-sessions",
        json!({ "flightId": FLIGHT_ID, "passengerCount": passengers }),
    )
    .await;
    let body = expect_json(response, StatusCode::CREATED).await;
    body["sessionId"].as_str().unwrap().to_string()
}

pub fn valid_passenger(first_name: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "birthDate": "1990-12-10",
        "nationalId": "12345678901"
    })
}

pub fn valid_card() -> Value {
    json!({
        "cardNumber": "4111111111111111",
        "expiryDate": "12/99",
        "cvv": "123"
    })
}
