//! carsearch-server
//!
//! HTTP surface for the car catalog: axum routes under `/api/car/v1`, a
//! readiness gate in front of them and `/health`.

pub mod error;
pub mod http;

pub use error::{ApiError, ErrorBody};
pub use http::{router, serve, AppState};
