use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use tantivy::schema::{DateOptions, Field, Schema, Value, FAST, INDEXED, STORED, STRING};
use tantivy::{doc, DateTime, TantivyDocument};

use carsearch_core::types::Car;

pub const ID: &str = "id";
pub const BRAND: &str = "brand";
pub const COLOR: &str = "color";
pub const PRICE: &str = "price";
pub const FIRST_RELEASE_DATE: &str = "first_release_date";
/// Monotonic write counter; sorting on it yields insertion order.
pub const SEQ: &str = "seq";

const SECONDS_PER_DAY: i64 = 86_400;
/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	// STRING keeps brand and color as single raw tokens: equality, not full-text.
	schema_builder.add_text_field(ID, STRING | STORED);
	schema_builder.add_text_field(BRAND, STRING | STORED);
	schema_builder.add_text_field(COLOR, STRING | STORED);
	schema_builder.add_u64_field(PRICE, INDEXED | STORED | FAST);
	let date_options = DateOptions::from(INDEXED).set_stored().set_fast();
	schema_builder.add_date_field(FIRST_RELEASE_DATE, date_options);
	schema_builder.add_u64_field(SEQ, FAST | STORED);
	schema_builder.build()
}

pub fn date_to_tantivy(date: NaiveDate) -> DateTime {
	let days = i64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE);
	DateTime::from_timestamp_secs(days * SECONDS_PER_DAY)
}

pub fn date_from_tantivy(value: DateTime) -> Option<NaiveDate> {
	let days = value.into_timestamp_secs().div_euclid(SECONDS_PER_DAY);
	let days = i32::try_from(days).ok()?;
	NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

#[derive(Debug, Clone, Copy)]
pub struct CarFields {
	pub id: Field,
	pub brand: Field,
	pub color: Field,
	pub price: Field,
	pub first_release_date: Field,
	pub seq: Field,
}

impl CarFields {
	pub fn from_schema(schema: &Schema) -> Result<Self> {
		Ok(Self {
			id: schema.get_field(ID)?,
			brand: schema.get_field(BRAND)?,
			color: schema.get_field(COLOR)?,
			price: schema.get_field(PRICE)?,
			first_release_date: schema.get_field(FIRST_RELEASE_DATE)?,
			seq: schema.get_field(SEQ)?,
		})
	}

	pub fn to_document(&self, car: &Car, id: &str, seq: u64) -> TantivyDocument {
		doc!(
			self.id => id,
			self.brand => car.brand.as_str(),
			self.color => car.color.as_str(),
			self.price => car.price,
			self.first_release_date => date_to_tantivy(car.first_release_date),
			self.seq => seq,
		)
	}

	pub fn seq_of(&self, doc: &TantivyDocument) -> Option<u64> {
		doc.get_first(self.seq).and_then(|v| v.as_u64())
	}

	pub fn from_document(&self, doc: &TantivyDocument) -> Result<Car> {
		let text = |field: Field, name: &str| -> Result<String> {
			doc.get_first(field)
				.and_then(|v| v.as_str())
				.map(str::to_string)
				.ok_or_else(|| anyhow!("stored document is missing '{}'", name))
		};
		let price = doc
			.get_first(self.price)
			.and_then(|v| v.as_u64())
			.ok_or_else(|| anyhow!("stored document is missing '{}'", PRICE))?;
		let first_release_date = doc
			.get_first(self.first_release_date)
			.and_then(|v| v.as_datetime())
			.and_then(date_from_tantivy)
			.ok_or_else(|| anyhow!("stored document is missing '{}'", FIRST_RELEASE_DATE))?;
		Ok(Car {
			id: Some(text(self.id, ID)?),
			brand: text(self.brand, BRAND)?,
			color: text(self.color, COLOR)?,
			price,
			first_release_date,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use carsearch_core::types::SortField;

	#[test]
	fn date_conversion_round_trips_across_epoch() {
		for (y, m, d) in [(1970, 1, 1), (1969, 12, 31), (2000, 2, 29), (2023, 12, 31)] {
			let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
			assert_eq!(date_from_tantivy(date_to_tantivy(date)), Some(date));
		}
		let day_after_epoch = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
		assert_eq!(date_to_tantivy(day_after_epoch).into_timestamp_secs(), SECONDS_PER_DAY);
	}

	#[test]
	fn document_round_trip_keeps_fields() {
		let schema = build_schema();
		let fields = CarFields::from_schema(&schema).unwrap();
		let car = Car::new("Audi", "grey", 31_000, NaiveDate::from_ymd_opt(2011, 5, 17).unwrap());
		let doc = fields.to_document(&car, "car-1", 3);
		let restored = fields.from_document(&doc).unwrap();
		assert_eq!(restored, car.with_id("car-1"));
		assert_eq!(fields.seq_of(&doc), Some(3));
	}

	#[test]
	fn sort_fields_name_schema_fast_fields() {
		let schema = build_schema();
		for sort in [SortField::Price, SortField::FirstReleaseDate] {
			let entry = schema.get_field_entry(schema.get_field(sort.field_name()).unwrap());
			assert!(entry.is_fast(), "{} is not a fast field", sort.field_name());
		}
		assert_eq!(SortField::Price.field_name(), PRICE);
		assert_eq!(SortField::FirstReleaseDate.field_name(), FIRST_RELEASE_DATE);
	}
}
