//! Optional query parameter assembly
//!
//! The exchange's GET endpoints take ordered lists of optional parameters.
//! Only provided parameters are included: the first is prefixed with `?`,
//! subsequent ones with `&`, preserving declaration order. Values are not
//! URL-encoded beyond what the transport does implicitly.

use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Wire format for date parameters (`2023-01-25T00:00:00Z`)
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Incrementally built query string
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    buf: String,
}

impl QueryParams {
    /// Create an empty query string
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn push(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.buf.push(if self.buf.is_empty() { '?' } else { '&' });
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(&value.to_string());
        self
    }

    /// Append a parameter only if a value was provided
    pub fn push_opt(&mut self, key: &str, value: Option<impl Display>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append a date parameter, formatted as ISO-8601 `%Y-%m-%dT%H:%M:%SZ`
    pub fn push_date(&mut self, key: &str, value: DateTime<Utc>) -> &mut Self {
        self.push(key, value.format(DATE_FORMAT))
    }

    /// Append a date parameter only if a value was provided
    pub fn push_date_opt(&mut self, key: &str, value: Option<DateTime<Utc>>) -> &mut Self {
        if let Some(value) = value {
            self.push_date(key, value);
        }
        self
    }

    /// Append a comma-joined list parameter
    pub fn push_list<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.push(key, joined)
    }

    /// The assembled query string (empty if no parameters were provided)
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Whether any parameter has been provided
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Display for QueryParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.buf)
    }
}
