//! Domain types shared by the index, the query service and the HTTP app.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CarId = String;

/// A catalog record.
///
/// - `id`: unset until the first successful save, then assigned by the index
///   and stable for the lifetime of the record
/// - `brand`/`color`: free text matched by exact equality
/// - `price`: positive, used as the default sort key of the JSON filter
/// - `first_release_date`: calendar date, target of range queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(default)]
    pub id: Option<CarId>,
    pub brand: String,
    pub color: String,
    pub price: u64,
    pub first_release_date: NaiveDate,
}

impl Car {
    pub fn new(brand: impl Into<String>, color: impl Into<String>, price: u64, first_release_date: NaiveDate) -> Self {
        Self { id: None, brand: brand.into(), color: color.into(), price, first_release_date }
    }

    pub fn with_id(mut self, id: impl Into<CarId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Car{{id={}, brand={}, color={}, price={}, firstReleaseDate={}}}",
            self.id.as_deref().unwrap_or("null"),
            self.brand,
            self.color,
            self.price,
            self.first_release_date.format("%Y-%m-%d"),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Price,
    FirstReleaseDate,
}

impl SortField {
    /// Name of the fast field backing this sort key in the index schema.
    pub fn field_name(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::FirstReleaseDate => "first_release_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    pub fn desc(field: SortField) -> Self { Self { field, direction: Direction::Desc } }
    pub fn asc(field: SortField) -> Self { Self { field, direction: Direction::Asc } }
}

pub const DEFAULT_PAGE: usize = 0;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Offset pagination. `sort: None` means insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn of(page: usize, size: usize) -> Self { Self { page, size, sort: None } }

    pub fn sorted(page: usize, size: usize, sort: Sort) -> Self { Self { page, size, sort: Some(sort) } }

    pub fn offset(&self) -> usize { self.page.saturating_mul(self.size) }
}

impl Default for PageRequest {
    fn default() -> Self { Self::of(DEFAULT_PAGE, DEFAULT_PAGE_SIZE) }
}

/// Raw caller parameters, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterInput {
    pub brand: Option<String>,
    pub color: Option<String>,
    pub first_release_date: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<Sort>,
}

/// A validated filter, consumed once by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarFilter {
    pub brand: Option<String>,
    pub color: Option<String>,
    pub date_after: Option<NaiveDate>,
    pub page: PageRequest,
}

/// One page of results plus the number of documents matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub page: usize,
    pub size: usize,
}

impl<T> Page<T> {
    pub fn empty(request: &PageRequest) -> Self {
        Self { content: Vec::new(), total_elements: 0, page: request.page, size: request.size }
    }

    pub fn into_content(self) -> Vec<T> { self.content }
}
