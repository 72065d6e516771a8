//! # Filter & Query Pipeline
//!
//! `envquery` is the filtering core shared by the data-browsing surfaces of
//! an environmental-data dashboard (explore, search, compare). It holds a
//! normalized list of active filter criteria, applies those criteria plus
//! free-text search against in-memory collections of heterogeneous records,
//! and translates the same criteria into URL query parameters for
//! server-side filtering.
//!
//! The pipeline degrades gracefully rather than erroring: a record that
//! cannot be evaluated for a criterion simply does not match, and a
//! malformed criterion is treated as inactive. Errors are reserved for the
//! I/O-backed edges of the crate (record sources, search history, boundary
//! files).

pub mod datasets;
pub mod engine;
mod error;
pub mod filter;
pub mod geo;
pub mod history;
pub mod params;
pub mod record;
pub mod request;
pub mod source;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::engine::{MatchOptions, filter_records, matches_search_text};
pub use crate::error::Error;
pub use crate::filter::{Condition, Criterion, FieldConfig, FilterSet, Operator};
pub use crate::params::{ParamEncoding, QueryParams, encode};
pub use crate::record::Record;
pub use crate::request::{QueryMode, RequestBuilder};

/// Result type for pipeline operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Range to use in filters.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Range<T: PartialEq> {
    /// The filter's lower bound.
    #[serde(flatten)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Lower<T>>,

    /// The filter's upper bound.
    #[serde(flatten)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Upper<T>>,
}

/// Range lower bound comparision options.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum Lower<T: PartialEq> {
    /// Lower bound compare is greater than the specified value.
    #[serde(rename = "gt")]
    Exclusive(T),

    /// Lower bound compare is greater than or equal to.
    #[serde(rename = "gte")]
    Inclusive(T),
}

/// Range upper bound comparision options.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum Upper<T: PartialEq> {
    /// Upper bound compare is less than the specified value.
    #[serde(rename = "lt")]
    Exclusive(T),

    /// Upper bound compare is less than or equal to.
    #[serde(rename = "lte")]
    Inclusive(T),
}

impl<T: PartialEq> Range<T> {
    /// Create a new range filter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Specify a 'greater-than' lower bound for the filter.
    #[must_use]
    pub fn gt(mut self, gt: T) -> Self {
        self.lower = Some(Lower::Exclusive(gt));
        self
    }

    /// Specify a 'greater-than-or-equal' lower bound for the filter.
    #[must_use]
    pub fn ge(mut self, ge: T) -> Self {
        self.lower = Some(Lower::Inclusive(ge));
        self
    }

    /// Specify a 'less-than' upper bound for the filter.
    #[must_use]
    pub fn lt(mut self, lt: T) -> Self {
        self.upper = Some(Upper::Exclusive(lt));
        self
    }

    /// Specify a 'less-than-or-equal' upper bound for the filter.
    #[must_use]
    pub fn le(mut self, le: T) -> Self {
        self.upper = Some(Upper::Inclusive(le));
        self
    }

    /// Check if the range contains the value.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialOrd,
    {
        let lower_ok = match &self.lower {
            Some(Lower::Exclusive(lower)) => value > lower,
            Some(Lower::Inclusive(lower)) => value >= lower,
            None => true,
        };
        if !lower_ok {
            return false;
        }

        match &self.upper {
            Some(Upper::Exclusive(upper)) => value < upper,
            Some(Upper::Inclusive(upper)) => value <= upper,
            None => true,
        }
    }
}

/// Date range used by `between-dates-inclusive` filters. Both bounds are
/// inclusive.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DateRange {
    /// The filter's lower bound.
    #[serde(rename = "from")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<DateTime<Utc>>,

    /// The filter's upper bound.
    #[serde(rename = "to")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Create a new date range filter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Specify the start of the date range (inclusive).
    #[must_use]
    pub const fn start(mut self, start: DateTime<Utc>) -> Self {
        self.lower = Some(start);
        self
    }

    /// Specify the end of the date range (inclusive).
    #[must_use]
    pub const fn end(mut self, end: DateTime<Utc>) -> Self {
        self.upper = Some(end);
        self
    }

    /// Check if the range contains the date.
    #[must_use]
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        if let Some(lower) = &self.lower
            && date < lower
        {
            return false;
        }
        if let Some(upper) = &self.upper
            && date > upper
        {
            return false;
        }
        true
    }
}
