use std::sync::Arc;

use carsearch_core::error::{Error, FilterField, Result};
use carsearch_core::traits::CarIndex;
use carsearch_core::types::{Car, CarFilter, FilterInput, Page, Sort, SortField};
use carsearch_core::validation::{parse_date, validate, validate_page, validate_text_field};

/// Answers catalog queries: validates caller input, then runs the index
/// call on the blocking pool. A validation failure never reaches the index.
pub struct CarQueryService<I> {
    index: Arc<I>,
}

impl<I> Clone for CarQueryService<I> {
    fn clone(&self) -> Self { Self { index: Arc::clone(&self.index) } }
}

impl<I: CarIndex + 'static> CarQueryService<I> {
    pub fn new(index: Arc<I>) -> Self { Self { index } }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&I) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || op(index.as_ref()))
            .await
            .map_err(Error::index_unavailable)?
    }

    /// `Ok(None)` when no car has this id.
    pub async fn by_id(&self, id: &str) -> Result<Option<Car>> {
        let id = id.to_string();
        self.blocking(move |index| index.find_by_id(&id)).await
    }

    /// JSON-body filter: both fields required, sorted by price descending.
    pub async fn by_brand_and_color(&self, brand: &str, color: &str, page: Option<i64>, size: Option<i64>) -> Result<Page<Car>> {
        let mut request = validate_page(page, size)?;
        request.sort = Some(Sort::desc(SortField::Price));
        let filter = CarFilter { brand: Some(brand.to_string()), color: Some(color.to_string()), date_after: None, page: request };
        self.search(filter).await
    }

    /// Path-segment filter: color is validated, insertion order.
    pub async fn by_brand_color_path(&self, brand: &str, color: &str, page: Option<i64>, size: Option<i64>) -> Result<Page<Car>> {
        validate_text_field(FilterField::Color, color)?;
        let request = validate_page(page, size)?;
        let filter = CarFilter { brand: Some(brand.to_string()), color: Some(color.to_string()), date_after: None, page: request };
        self.search(filter).await
    }

    /// Query-parameter filter: color, then brand, are validated.
    pub async fn by_param(&self, brand: &str, color: &str, page: Option<i64>, size: Option<i64>) -> Result<Page<Car>> {
        let input = FilterInput {
            brand: Some(brand.to_string()),
            color: Some(color.to_string()),
            page,
            size,
            ..Default::default()
        };
        self.search(validate(&input)?).await
    }

    /// Every car released strictly after `date` (`YYYY-MM-DD`); not paginated.
    pub async fn by_release_date_after(&self, date: &str) -> Result<Vec<Car>> {
        let date = parse_date(date)?;
        self.blocking(move |index| index.find_by_first_release_date_after(date)).await
    }

    pub async fn search(&self, filter: CarFilter) -> Result<Page<Car>> {
        self.blocking(move |index| index.search(&filter)).await
    }

    pub async fn count(&self) -> Result<u64> {
        self.blocking(|index| index.count()).await
    }

    pub async fn save(&self, car: Car) -> Result<Car> {
        self.blocking(move |index| index.save(car)).await
    }

    /// Saves `car` under `id`, whatever id the body carried.
    pub async fn update(&self, id: &str, car: Car) -> Result<Car> {
        self.save(car.with_id(id)).await
    }
}
