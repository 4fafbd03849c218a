//! carsearch-index
//!
//! The tantivy-backed `CarIndex`: schema and document mapping in
//! `tantivy_utils`, query construction in `search`, writes in `index`.

pub mod index;
pub mod search;
pub mod tantivy_utils;

pub use index::TantivyCarIndex;
