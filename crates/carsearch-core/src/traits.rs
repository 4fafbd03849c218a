use chrono::NaiveDate;

use crate::error::Result;
use crate::types::{Car, CarFilter, Page, PageRequest};

/// The document store holding cars. Implementations own no record state of
/// their own beyond the store; every call is a round-trip.
pub trait CarIndex: Send + Sync {
    /// Assigns an id when `car.id` is unset, otherwise replaces the stored
    /// document with the same id. A replaced car keeps its place in
    /// insertion order.
    fn save(&self, car: Car) -> Result<Car>;
    fn save_all(&self, cars: Vec<Car>) -> Result<Vec<Car>>;
    fn delete_all(&self) -> Result<()>;
    fn count(&self) -> Result<u64>;
    fn find_by_id(&self, id: &str) -> Result<Option<Car>>;
    fn search(&self, filter: &CarFilter) -> Result<Page<Car>>;

    fn find_by_brand_and_color(&self, brand: &str, color: &str, page: &PageRequest) -> Result<Page<Car>> {
        let filter = CarFilter {
            brand: Some(brand.to_string()),
            color: Some(color.to_string()),
            date_after: None,
            page: *page,
        };
        self.search(&filter)
    }

    /// Unbounded: returns every car released strictly after `date`.
    fn find_by_first_release_date_after(&self, date: NaiveDate) -> Result<Vec<Car>>;
}

