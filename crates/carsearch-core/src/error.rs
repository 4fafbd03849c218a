use std::fmt;
use thiserror::Error;

/// Free-text filter fields that share the non-numeric rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Brand,
    Color,
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Brand => f.write_str("brand"),
            FilterField::Color => f.write_str("color"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid {field} : {value}")]
    InvalidFilterField { field: FilterField, value: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid date : {value}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Malformed request input: an unparseable query string, path or body.
    #[error("Invalid request : {0}")]
    InvalidRequest(String),

    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),
}

impl Error {
    pub fn index_unavailable(err: impl fmt::Display) -> Self { Error::IndexUnavailable(err.to_string()) }

    /// True for errors caused by caller input rather than by the index.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidFilterField { .. }
                | Error::InvalidPagination(_)
                | Error::InvalidDate { .. }
                | Error::InvalidRequest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
