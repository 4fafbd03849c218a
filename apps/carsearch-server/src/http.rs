//! Routes.
//!
//! - `GET  /api/car/v1/random`, `/random-cars`: generated cars, nothing indexed.
//! - `POST /api/car/v1/echo`: textual form of the posted car.
//! - `GET  /api/car/v1/count`
//! - `POST /api/car/v1`, `GET|PUT /api/car/v1/:id`: save, lookup, update.
//! - `GET  /api/car/v1/find-json`: JSON `{brand, color}` body, price descending.
//! - `GET  /api/car/v1/cars/:brand/:color`, `/cars?brand&color`: validated filters.
//! - `GET  /api/car/v1/cars/date?first_release_date=YYYY-MM-DD`
//! - `GET  /health`: `{ "ready": bool, "count": n | null }`, never gated.
//!
//! Every `/api` route answers 503 until bootstrap has marked the service ready.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, Request, State};
use axum::http::header::{HeaderName, SERVER};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use carsearch_core::generator::CarGenerator;
use carsearch_core::types::Car;
use carsearch_index::TantivyCarIndex;
use carsearch_service::{CarQueryService, Readiness};

use crate::error::{ApiError, ErrorBody};

const PREFIX: &str = "/api/car/v1";

#[derive(Clone)]
pub struct AppState {
    pub service: CarQueryService<TantivyCarIndex>,
    pub readiness: Readiness,
}

impl AppState {
    pub fn new(service: CarQueryService<TantivyCarIndex>, readiness: Readiness) -> Self { Self { service, readiness } }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(PREFIX, axum::routing::post(save_car))
        .route(&format!("{PREFIX}/random"), get(random_car))
        .route(&format!("{PREFIX}/random-cars"), get(random_cars))
        .route(&format!("{PREFIX}/echo"), axum::routing::post(echo))
        .route(&format!("{PREFIX}/count"), get(count))
        .route(&format!("{PREFIX}/find-json"), get(find_json))
        .route(&format!("{PREFIX}/cars"), get(cars_by_param))
        .route(&format!("{PREFIX}/cars/date"), get(cars_by_release_date))
        .route(&format!("{PREFIX}/cars/:brand/:color"), get(cars_by_path))
        .route(&format!("{PREFIX}/:id"), get(get_car).put(update_car))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_ready));

    Router::new().merge(api).route("/health", get(health)).with_state(state)
}

/// Serve the router at `addr` (e.g. `"0.0.0.0:8080"`).
pub async fn serve(state: AppState, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await
}

async fn require_ready(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.readiness.is_ready() {
        let body = ErrorBody::new("Index is still loading");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }
    next.run(request).await
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.is_ready();
    let count = if ready { state.service.count().await.ok() } else { None };
    Json(json!({ "ready": ready, "count": count }))
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<i64>,
    size: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct BrandColorParams {
    brand: String,
    color: String,
    page: Option<i64>,
    size: Option<i64>,
}

/// Only `brand` and `color` are read; any other car fields are ignored.
#[derive(Debug, Deserialize)]
struct BrandColorBody {
    brand: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseDateParams {
    first_release_date: String,
}

async fn random_car() -> Json<Car> { Json(CarGenerator::from_entropy().generate()) }

async fn random_cars() -> Json<Vec<Car>> { Json(CarGenerator::from_entropy().generate_random_count(1..10)) }

async fn echo(car: Result<Json<Car>, JsonRejection>) -> Result<String, ApiError> {
    let Json(car) = car?;
    tracing::info!("Car is {}", car);
    Ok(car.to_string())
}

async fn count(State(state): State<AppState>) -> Result<String, ApiError> {
    let n = state.service.count().await?;
    Ok(format!("There are : {} cars.", n))
}

async fn save_car(State(state): State<AppState>, car: Result<Json<Car>, JsonRejection>) -> Result<String, ApiError> {
    let Json(car) = car?;
    let saved = state.service.save(car).await?;
    Ok(format!("Saved with ID : {}", saved.id.unwrap_or_default()))
}

async fn get_car(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Option<Car>>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.service.by_id(&id).await?))
}

async fn update_car(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    car: Result<Json<Car>, JsonRejection>,
) -> Result<String, ApiError> {
    let Path(id) = id?;
    let Json(car) = car?;
    let updated = state.service.update(&id, car).await?;
    Ok(format!("Updated car with ID : {}", updated.id.unwrap_or(id)))
}

async fn find_json(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<BrandColorBody>, JsonRejection>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let Query(params) = params?;
    let Json(body) = body?;
    let page = state.service.by_brand_and_color(&body.brand, &body.color, params.page, params.size).await?;
    Ok(Json(page.into_content()))
}

async fn cars_by_path(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> impl IntoResponse {
    let headers = [(SERVER, "carsearch"), (HeaderName::from_static("x-custom-header"), "Custom Response Header")];
    (headers, filter_by_path(&state, path, params).await)
}

async fn filter_by_path(
    state: &AppState,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let Path((brand, color)) = path?;
    let Query(params) = params?;
    let page = state.service.by_brand_color_path(&brand, &color, params.page, params.size).await?;
    Ok(Json(page.into_content()))
}

async fn cars_by_param(
    State(state): State<AppState>,
    params: Result<Query<BrandColorParams>, QueryRejection>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let Query(params) = params?;
    let page = state.service.by_param(&params.brand, &params.color, params.page, params.size).await?;
    Ok(Json(page.into_content()))
}

async fn cars_by_release_date(
    State(state): State<AppState>,
    params: Result<Query<ReleaseDateParams>, QueryRejection>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(state.service.by_release_date_after(&params.first_release_date).await?))
}
