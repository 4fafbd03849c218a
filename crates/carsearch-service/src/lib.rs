//! carsearch-service
//!
//! Composes the validator, the generator and any `CarIndex`: the request-time
//! `CarQueryService` and the startup `Bootstrap`.

pub mod bootstrap;
pub mod query;

pub use bootstrap::{Bootstrap, BootstrapReport, Readiness};
pub use query::CarQueryService;
