//! Guards applied to caller parameters before any query reaches the index.

use chrono::NaiveDate;

use crate::error::{Error, FilterField, Result};
use crate::types::{CarFilter, FilterInput, PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value made only of decimal digits, e.g. `"12345"`. Empty is not numeric.
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Shared rule for brand and color: free text, never purely numeric.
pub fn validate_text_field(field: FilterField, value: &str) -> Result<()> {
    if is_numeric(value) {
        return Err(Error::InvalidFilterField { field, value: value.to_string() });
    }
    Ok(())
}

pub fn validate_page(page: Option<i64>, size: Option<i64>) -> Result<PageRequest> {
    let page = match page {
        None => DEFAULT_PAGE,
        Some(p) => usize::try_from(p).map_err(|_| Error::InvalidPagination(format!("page must be >= 0, got {p}")))?,
    };
    let size = match size {
        None => DEFAULT_PAGE_SIZE,
        Some(s) if s >= 1 => usize::try_from(s).map_err(|_| Error::InvalidPagination(format!("size out of range: {s}")))?,
        Some(s) => return Err(Error::InvalidPagination(format!("size must be >= 1, got {s}"))),
    };
    Ok(PageRequest::of(page, size))
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|source| Error::InvalidDate { value: value.to_string(), source })
}

/// Validates every present field of `input`, color before brand.
pub fn validate(input: &FilterInput) -> Result<CarFilter> {
    if let Some(color) = &input.color {
        validate_text_field(FilterField::Color, color)?;
    }
    if let Some(brand) = &input.brand {
        validate_text_field(FilterField::Brand, brand)?;
    }
    let mut page = validate_page(input.page, input.size)?;
    page.sort = input.sort;
    let date_after = input.first_release_date.as_deref().map(parse_date).transpose()?;
    Ok(CarFilter { brand: input.brand.clone(), color: input.color.clone(), date_after, page })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Sort, SortField};

    #[test]
    fn numeric_detection() {
        assert!(is_numeric("7"));
        assert!(is_numeric("12345"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("white"));
        assert!(!is_numeric("12a"));
        assert!(!is_numeric("-12"));
        assert!(!is_numeric("1.5"));
    }

    #[test]
    fn numeric_color_rejected_with_message() {
        let err = validate_text_field(FilterField::Color, "7").unwrap_err();
        assert_eq!(err.to_string(), "Invalid color : 7");
        assert!(err.is_client_error());
    }

    #[test]
    fn numeric_brand_rejected_with_message() {
        let err = validate_text_field(FilterField::Brand, "12345").unwrap_err();
        assert!(matches!(err, Error::InvalidFilterField { field: FilterField::Brand, .. }));
        assert_eq!(err.to_string(), "Invalid brand : 12345");
    }

    #[test]
    fn color_checked_before_brand() {
        let input = FilterInput { brand: Some("1".into()), color: Some("2".into()), ..Default::default() };
        let err = validate(&input).unwrap_err();
        assert_eq!(err.to_string(), "Invalid color : 2");
    }

    #[test]
    fn defaults_applied() {
        let filter = validate(&FilterInput::default()).unwrap();
        assert_eq!(filter.page, PageRequest::of(0, 10));
        assert!(filter.brand.is_none() && filter.color.is_none() && filter.date_after.is_none());
    }

    #[test]
    fn pagination_bounds() {
        assert!(validate_page(Some(0), Some(1)).is_ok());
        assert!(matches!(validate_page(Some(-1), None), Err(Error::InvalidPagination(_))));
        assert!(matches!(validate_page(None, Some(0)), Err(Error::InvalidPagination(_))));
        assert_eq!(validate_page(Some(3), Some(25)).unwrap().offset(), 75);
    }

    #[test]
    fn date_must_be_iso_calendar_date() {
        assert_eq!(parse_date("2020-01-01").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        for bad in ["2020/01/01", "01-01-2020", "2020-13-01", "yesterday", ""] {
            assert!(matches!(parse_date(bad), Err(Error::InvalidDate { .. })), "accepted {bad}");
        }
    }

    #[test]
    fn full_input_validates() {
        let input = FilterInput {
            brand: Some("Toyota".into()),
            color: Some("white".into()),
            first_release_date: Some("2019-06-30".into()),
            page: Some(2),
            size: Some(5),
            sort: Some(Sort::desc(SortField::Price)),
        };
        let filter = validate(&input).unwrap();
        assert_eq!(filter.brand.as_deref(), Some("Toyota"));
        assert_eq!(filter.date_after, NaiveDate::from_ymd_opt(2019, 6, 30));
        assert_eq!(filter.page, PageRequest::sorted(2, 5, Sort::desc(SortField::Price)));
    }
}
