//! carsearch-core
//!
//! Domain types, the `CarIndex` seam, the query validator, the record
//! generator and configuration shared by the index, service and server crates.

pub mod config;
pub mod error;
pub mod generator;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{Error, FilterField, Result};
pub use types::{Car, CarFilter, FilterInput, Page, PageRequest, Sort, SortField, Direction};
