//! Synthetic car records.
//!
//! Each `CarGenerator` owns its RNG; there is no process-wide generator, so
//! callers that need independent streams create one generator each. Seeded
//! generators are deterministic, which the tests rely on.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

use crate::types::Car;

pub const BRANDS: &[&str] = &["Toyota", "Honda", "BMW", "Mercedes", "Ford", "Hyundai", "Mitsubishi", "Nissan", "Audi"];
pub const COLORS: &[&str] = &["white", "black", "red", "silver", "blue", "grey", "green", "yellow"];
pub const PRICE_RANGE: RangeInclusive<u64> = 5_000..=100_000;

/// Bounds of generated release dates, inclusive.
pub fn release_date_range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or(NaiveDate::MIN),
    )
}

pub struct CarGenerator<R = StdRng> {
    rng: R,
}

impl<R: Rng> CarGenerator<R> {
    pub fn new(rng: R) -> Self { Self { rng } }

    pub fn generate(&mut self) -> Car {
        // Pools are non-empty constants.
        let brand = BRANDS.choose(&mut self.rng).copied().unwrap_or("Toyota");
        let color = COLORS.choose(&mut self.rng).copied().unwrap_or("white");
        let price = self.rng.gen_range(PRICE_RANGE);
        let (start, end) = release_date_range();
        let span = (end - start).num_days();
        let first_release_date = start + Duration::days(self.rng.gen_range(0..=span));
        Car::new(brand, color, price, first_release_date)
    }

    pub fn generate_batch(&mut self, count: usize) -> Vec<Car> {
        (0..count).map(|_| self.generate()).collect()
    }

    /// A batch whose length is drawn from `count`, e.g. `1..10`. An empty
    /// range yields no cars.
    pub fn generate_random_count(&mut self, count: std::ops::Range<usize>) -> Vec<Car> {
        if count.is_empty() {
            return Vec::new();
        }
        let n = self.rng.gen_range(count);
        self.generate_batch(n)
    }
}

impl CarGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self { Self::new(StdRng::seed_from_u64(seed)) }

    pub fn from_entropy() -> Self { Self::new(StdRng::from_entropy()) }
}
