use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::AllQuery;
use tantivy::{Index, IndexReader, IndexWriter, Order, ReloadPolicy, TantivyDocument, Term};

use carsearch_core::error::{Error, Result as CoreResult};
use carsearch_core::traits::CarIndex;
use carsearch_core::types::{Car, CarFilter, Page, PageRequest};

use crate::search::{collect_all, collect_page, term_query};
use crate::tantivy_utils::{build_schema, CarFields, SEQ};

/// A `CarIndex` over an embedded tantivy index.
///
/// Writes go through a single writer guarded by a mutex and are committed
/// per call; the reader is reloaded after every commit so a query issued
/// after a write returns observes it.
pub struct TantivyCarIndex {
	reader: IndexReader,
	writer: Mutex<IndexWriter>,
	fields: CarFields,
	next_seq: AtomicU64,
}

impl TantivyCarIndex {
	pub fn create_in_ram(writer_heap_bytes: usize) -> Result<Self> {
		Self::from_index(Index::create_in_ram(build_schema()), writer_heap_bytes)
	}

	/// Opens the index stored under `index_dir`, creating it if absent.
	pub fn open_or_create(index_dir: &Path, writer_heap_bytes: usize) -> Result<Self> {
		std::fs::create_dir_all(index_dir)?;
		let directory = MmapDirectory::open(index_dir)?;
		let index = Index::open_or_create(directory, build_schema())?;
		Self::from_index(index, writer_heap_bytes)
	}

	fn from_index(index: Index, writer_heap_bytes: usize) -> Result<Self> {
		let fields = CarFields::from_schema(&index.schema())?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		let writer = index.writer(writer_heap_bytes)?;
		let this = Self { reader, writer: Mutex::new(writer), fields, next_seq: AtomicU64::new(0) };
		let last = this.last_seq()?;
		this.next_seq.store(last.map_or(0, |s| s + 1), Ordering::SeqCst);
		tracing::debug!(docs = this.reader.searcher().num_docs(), "opened car index");
		Ok(this)
	}

	fn last_seq(&self) -> Result<Option<u64>> {
		let searcher = self.reader.searcher();
		if searcher.num_docs() == 0 {
			return Ok(None);
		}
		let top = searcher.search(&AllQuery, &TopDocs::with_limit(1).order_by_fast_field::<u64>(SEQ, Order::Desc))?;
		Ok(top.first().map(|(seq, _)| *seq))
	}

	fn lock_writer(&self) -> Result<MutexGuard<'_, IndexWriter>> {
		self.writer.lock().map_err(|_| anyhow!("index writer lock poisoned"))
	}

	fn take_seq(&self) -> u64 { self.next_seq.fetch_add(1, Ordering::SeqCst) }

	fn new_id() -> String { uuid::Uuid::new_v4().simple().to_string() }

	/// The committed document stored under `id`, if any.
	fn committed_doc(&self, id: &str) -> Result<Option<TantivyDocument>> {
		let searcher = self.reader.searcher();
		let query = term_query(self.fields.id, id);
		let top = searcher.search(query.as_ref(), &TopDocs::with_limit(1))?;
		match top.first() {
			Some((_, addr)) => Ok(Some(searcher.doc(*addr)?)),
			None => Ok(None),
		}
	}

	/// Stages `car` on `writer`, replacing any document with the same id. A
	/// replacement keeps the insertion position of the document it replaces.
	fn stage(&self, writer: &IndexWriter, car: Car) -> Result<Car> {
		let (id, seq) = match car.id.clone().filter(|id| !id.is_empty()) {
			Some(id) => {
				let committed = self.committed_doc(&id)?.and_then(|doc| self.fields.seq_of(&doc));
				let seq = committed.unwrap_or_else(|| self.take_seq());
				(id, seq)
			}
			None => (Self::new_id(), self.take_seq()),
		};
		writer.delete_term(Term::from_field_text(self.fields.id, &id));
		writer.add_document(self.fields.to_document(&car, &id, seq))?;
		Ok(Car { id: Some(id), ..car })
	}

	fn commit(&self, mut writer: MutexGuard<'_, IndexWriter>) -> Result<()> {
		writer.commit()?;
		drop(writer);
		self.reader.reload()?;
		Ok(())
	}

	fn save_inner(&self, car: Car) -> Result<Car> {
		let writer = self.lock_writer()?;
		let saved = self.stage(&writer, car)?;
		self.commit(writer)?;
		Ok(saved)
	}

	fn save_all_inner(&self, cars: Vec<Car>) -> Result<Vec<Car>> {
		let mut writer = self.lock_writer()?;
		let mut saved = Vec::with_capacity(cars.len());
		for car in cars {
			match self.stage(&writer, car) {
				Ok(car) => saved.push(car),
				Err(err) => {
					writer.rollback()?;
					return Err(err);
				}
			}
		}
		// Nothing staged above becomes visible unless this commit succeeds.
		self.commit(writer)?;
		tracing::debug!(count = saved.len(), "bulk save committed");
		Ok(saved)
	}

	fn delete_all_inner(&self) -> Result<()> {
		let writer = self.lock_writer()?;
		writer.delete_all_documents()?;
		self.commit(writer)
	}

	fn find_by_id_inner(&self, id: &str) -> Result<Option<Car>> {
		self.committed_doc(id)?.map(|doc| self.fields.from_document(&doc)).transpose()
	}
}

impl CarIndex for TantivyCarIndex {
	fn save(&self, car: Car) -> CoreResult<Car> {
		self.save_inner(car).map_err(Error::index_unavailable)
	}

	fn save_all(&self, cars: Vec<Car>) -> CoreResult<Vec<Car>> {
		self.save_all_inner(cars).map_err(Error::index_unavailable)
	}

	fn delete_all(&self) -> CoreResult<()> {
		self.delete_all_inner().map_err(Error::index_unavailable)
	}

	fn count(&self) -> CoreResult<u64> {
		Ok(self.reader.searcher().num_docs())
	}

	fn find_by_id(&self, id: &str) -> CoreResult<Option<Car>> {
		self.find_by_id_inner(id).map_err(Error::index_unavailable)
	}

	fn search(&self, filter: &CarFilter) -> CoreResult<Page<Car>> {
		collect_page(&self.reader.searcher(), &self.fields, filter).map_err(Error::index_unavailable)
	}

	fn find_by_first_release_date_after(&self, date: NaiveDate) -> CoreResult<Vec<Car>> {
		let filter = CarFilter { brand: None, color: None, date_after: Some(date), page: PageRequest::default() };
		collect_all(&self.reader.searcher(), &self.fields, &filter).map_err(Error::index_unavailable)
	}
}
