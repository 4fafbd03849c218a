//! Query construction against the car schema.
//!
//! Brand and color become term queries on raw (untokenized) fields, the release
//! date an exclusive lower-bound range, all combined with `Occur::Must`.
//! Pages are cut with offset/limit on the top-docs collector and ordered by a
//! fast field: the requested sort key, or `seq` for insertion order.

use anyhow::Result;
use std::ops::Bound;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, RangeQuery, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::{DateTime, DocAddress, Order, Searcher, TantivyDocument, Term};

use carsearch_core::types::{Car, CarFilter, Direction, Page, PageRequest, SortField};

use crate::tantivy_utils::{date_to_tantivy, CarFields, SEQ};

pub fn build_query(fields: &CarFields, filter: &CarFilter) -> Box<dyn Query> {
	let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
	if let Some(brand) = &filter.brand {
		clauses.push((Occur::Must, term_query(fields.brand, brand)));
	}
	if let Some(color) = &filter.color {
		clauses.push((Occur::Must, term_query(fields.color, color)));
	}
	if let Some(after) = filter.date_after {
		let lower = Term::from_field_date(fields.first_release_date, date_to_tantivy(after));
		clauses.push((Occur::Must, Box::new(RangeQuery::new(Bound::Excluded(lower), Bound::Unbounded))));
	}
	if clauses.is_empty() {
		Box::new(AllQuery)
	} else {
		Box::new(BooleanQuery::new(clauses))
	}
}

pub fn term_query(field: tantivy::schema::Field, value: &str) -> Box<dyn Query> {
	Box::new(TermQuery::new(Term::from_field_text(field, value), IndexRecordOption::Basic))
}

fn order(direction: Direction) -> Order {
	match direction {
		Direction::Asc => Order::Asc,
		Direction::Desc => Order::Desc,
	}
}

/// Addresses of one page of hits, ordered by the page's sort key. `limit`
/// must already be capped to the hits remaining after the page offset.
fn page_addresses(searcher: &Searcher, query: &dyn Query, page: &PageRequest, limit: usize) -> Result<Vec<DocAddress>> {
	let top = TopDocs::with_limit(limit).and_offset(page.offset());
	let addresses = match page.sort {
		Some(sort) => match sort.field {
			SortField::Price => searcher
				.search(query, &top.order_by_fast_field::<u64>(sort.field.field_name(), order(sort.direction)))?
				.into_iter()
				.map(|(_, addr)| addr)
				.collect(),
			SortField::FirstReleaseDate => searcher
				.search(query, &top.order_by_fast_field::<DateTime>(sort.field.field_name(), order(sort.direction)))?
				.into_iter()
				.map(|(_, addr)| addr)
				.collect(),
		},
		None => searcher
			.search(query, &top.order_by_fast_field::<u64>(SEQ, Order::Asc))?
			.into_iter()
			.map(|(_, addr)| addr)
			.collect(),
	};
	Ok(addresses)
}

pub fn collect_page(searcher: &Searcher, fields: &CarFields, filter: &CarFilter) -> Result<Page<Car>> {
	let query = build_query(fields, filter);
	let total = searcher.search(query.as_ref(), &Count)? as u64;
	let page = &filter.page;
	// TopDocs rejects a zero limit; an offset past the end has nothing to return.
	if page.size == 0 || page.offset() as u64 >= total {
		return Ok(Page { total_elements: total, ..Page::empty(page) });
	}
	// The collector preallocates for `limit + offset`, so the limit never exceeds
	// the hits actually left.
	let remaining = usize::try_from(total - page.offset() as u64).unwrap_or(usize::MAX);
	let limit = page.size.min(remaining);
	let mut content = Vec::with_capacity(limit);
	for addr in page_addresses(searcher, query.as_ref(), page, limit)? {
		let doc: TantivyDocument = searcher.doc(addr)?;
		content.push(fields.from_document(&doc)?);
	}
	Ok(Page { content, total_elements: total, page: page.page, size: page.size })
}

/// Every hit of `filter`, in insertion order, regardless of its page settings.
pub fn collect_all(searcher: &Searcher, fields: &CarFields, filter: &CarFilter) -> Result<Vec<Car>> {
	let query = build_query(fields, filter);
	let total = searcher.search(query.as_ref(), &Count)?;
	if total == 0 {
		return Ok(Vec::new());
	}
	let unbounded = CarFilter { page: PageRequest::of(0, total), ..filter.clone() };
	Ok(collect_page(searcher, fields, &unbounded)?.into_content())
}
