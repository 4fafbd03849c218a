//! A `CarIndex` wrapper over an in-RAM tantivy index that records calls and
//! injects failures.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use carsearch_core::error::{Error, Result};
use carsearch_core::traits::CarIndex;
use carsearch_core::types::{Car, CarFilter, Page};
use carsearch_index::TantivyCarIndex;

pub struct RecordingIndex {
    inner: TantivyCarIndex,
    calls: AtomicUsize,
    save_all_calls: AtomicUsize,
    fail_clear: AtomicBool,
    failing_bulk_saves: AtomicUsize,
    bulk_save_delay: Option<Duration>,
    slow_bulk_saves: AtomicUsize,
    slow_bulk_save_delay: Duration,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self {
            inner: TantivyCarIndex::create_in_ram(50_000_000).expect("ram index"),
            calls: AtomicUsize::new(0),
            save_all_calls: AtomicUsize::new(0),
            fail_clear: AtomicBool::new(false),
            failing_bulk_saves: AtomicUsize::new(0),
            bulk_save_delay: None,
            slow_bulk_saves: AtomicUsize::new(0),
            slow_bulk_save_delay: Duration::ZERO,
        }
    }

    pub fn failing_clear(self) -> Self {
        self.fail_clear.store(true, Ordering::SeqCst);
        self
    }

    /// The next `n` bulk saves fail without writing anything.
    pub fn failing_bulk_saves(self, n: usize) -> Self {
        self.failing_bulk_saves.store(n, Ordering::SeqCst);
        self
    }

    /// Failing bulk saves stall for `delay` before reporting the failure.
    pub fn stalling(mut self, delay: Duration) -> Self {
        self.bulk_save_delay = Some(delay);
        self
    }

    /// The next `n` bulk saves that are not failing succeed after `delay`.
    pub fn slow_bulk_saves(mut self, n: usize, delay: Duration) -> Self {
        self.slow_bulk_saves.store(n, Ordering::SeqCst);
        self.slow_bulk_save_delay = delay;
        self
    }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    pub fn save_all_calls(&self) -> usize { self.save_all_calls.load(Ordering::SeqCst) }

    fn record(&self) { self.calls.fetch_add(1, Ordering::SeqCst); }
}

impl CarIndex for RecordingIndex {
    fn save(&self, car: Car) -> Result<Car> {
        self.record();
        self.inner.save(car)
    }

    fn save_all(&self, cars: Vec<Car>) -> Result<Vec<Car>> {
        self.record();
        self.save_all_calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failing_bulk_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            if let Some(delay) = self.bulk_save_delay {
                std::thread::sleep(delay);
            }
            return Err(Error::IndexUnavailable("injected bulk failure".to_string()));
        }
        let slow = self
            .slow_bulk_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if slow {
            std::thread::sleep(self.slow_bulk_save_delay);
        }
        self.inner.save_all(cars)
    }

    fn delete_all(&self) -> Result<()> {
        self.record();
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(Error::IndexUnavailable("injected clear failure".to_string()));
        }
        self.inner.delete_all()
    }

    fn count(&self) -> Result<u64> {
        self.record();
        self.inner.count()
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Car>> {
        self.record();
        self.inner.find_by_id(id)
    }

    fn search(&self, filter: &CarFilter) -> Result<Page<Car>> {
        self.record();
        self.inner.search(filter)
    }

    fn find_by_first_release_date_after(&self, date: NaiveDate) -> Result<Vec<Car>> {
        self.record();
        self.inner.find_by_first_release_date_after(date)
    }
}
