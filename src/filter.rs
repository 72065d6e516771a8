//! # Filters
//!
//! The filter model: typed criteria, per-field configuration, and the
//! [`FilterSet`] holding the active criteria for a UI session.
//!
//! A criterion's value shape is enforced at construction time rather than
//! validated ad hoc at evaluation time: each [`Condition`] variant carries
//! the typed payload its comparison needs.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::params::ParamEncoding;
use crate::{DateRange, Range};

/// Operator kinds a field can declare. A [`FieldConfig`] names the operator
/// its field uses when a criterion is built from a loose UI value.
#[derive(Clone, Copy, Debug, Default, Display, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    /// Strict equality on a primitive value.
    #[default]
    Equals,

    /// Substring match on a string field.
    Contains,

    /// Array field shares at least one element with the criterion values.
    ContainsOneOf,

    /// Criterion values contain the field value.
    EqualsOneOf,

    /// Numeric field within an inclusive range.
    Between,

    /// Date-parseable field within an inclusive range.
    BetweenDatesInclusive,
}

/// A typed filter condition. Each variant carries the payload its
/// comparison needs, so a `between` criterion cannot exist without its
/// bounds and a `-one-of` criterion cannot exist without its array.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "operator", content = "value", rename_all = "kebab-case")]
pub enum Condition {
    /// Strict equality on a primitive value.
    Equals(Value),

    /// Substring match on a string field. Case-sensitive in the reference
    /// behavior; see [`crate::MatchOptions`].
    Contains(String),

    /// Array field shares at least one element with these values.
    ContainsOneOf(Vec<Value>),

    /// These values contain the field value.
    EqualsOneOf(Vec<Value>),

    /// Numeric field within the range (inclusive at both ends when built
    /// via [`Criterion::between`]).
    Between(Range<f64>),

    /// Date-parseable field within the range, inclusive at both ends.
    BetweenDatesInclusive(DateRange),
}

impl Condition {
    /// The operator kind of this condition.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        match self {
            Self::Equals(_) => Operator::Equals,
            Self::Contains(_) => Operator::Contains,
            Self::ContainsOneOf(_) => Operator::ContainsOneOf,
            Self::EqualsOneOf(_) => Operator::EqualsOneOf,
            Self::Between(_) => Operator::Between,
            Self::BetweenDatesInclusive(_) => Operator::BetweenDatesInclusive,
        }
    }

    /// Whether the condition carries enough state to filter on. A null
    /// operand, empty text, or empty array marks the criterion inactive:
    /// it always matches, so incomplete UI state never over-filters.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Equals(value) => !value.is_null(),
            Self::Contains(text) => !text.is_empty(),
            Self::ContainsOneOf(values) | Self::EqualsOneOf(values) => !values.is_empty(),
            Self::Between(range) => range.lower.is_some() || range.upper.is_some(),
            Self::BetweenDatesInclusive(range) => range.lower.is_some() || range.upper.is_some(),
        }
    }
}

/// One active filter: a field name and the condition applied to it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Criterion {
    /// Name of the record attribute being filtered.
    pub field: String,

    /// The typed condition for the field.
    #[serde(flatten)]
    pub condition: Condition,
}

impl Criterion {
    /// Create a criterion from a field name and condition.
    #[must_use]
    pub fn new(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }

    /// Strict equality criterion.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Condition::Equals(value.into()))
    }

    /// Substring-match criterion.
    #[must_use]
    pub fn contains(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(field, Condition::Contains(text.into()))
    }

    /// Array-overlap criterion.
    #[must_use]
    pub fn contains_one_of(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, Condition::ContainsOneOf(values))
    }

    /// Membership criterion.
    #[must_use]
    pub fn equals_one_of(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, Condition::EqualsOneOf(values))
    }

    /// Inclusive numeric range criterion.
    #[must_use]
    pub fn between(field: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(field, Condition::Between(Range::new().ge(min).le(max)))
    }

    /// Inclusive date range criterion.
    #[must_use]
    pub fn between_dates(
        field: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>,
    ) -> Self {
        Self::new(
            field,
            Condition::BetweenDatesInclusive(DateRange::new().start(start).end(end)),
        )
    }
}

/// Per-field filter configuration, sourced from page-level configuration.
/// `label` is UI-only and unused by the pipeline.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldConfig {
    /// The record attribute this configuration applies to.
    pub field: String,

    /// Human-readable name for UI display.
    pub label: String,

    /// The operator the field uses when a criterion is built from a loose
    /// value.
    pub operator: Operator,

    /// Query-string encoding strategy for server-mode requests. Absent
    /// means a single `field=value` pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<ParamEncoding>,
}

impl FieldConfig {
    /// Create a configuration for a field.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            operator,
            encoding: None,
        }
    }

    /// Set the query-string encoding strategy for the field.
    #[must_use]
    pub fn encoding(mut self, encoding: ParamEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Build a typed criterion from a loose UI value using the field's
    /// declared operator. Returns `None` when the value shape does not
    /// suit the operator, so a malformed criterion degrades to inactive
    /// rather than erroring.
    #[must_use]
    pub fn criterion(&self, value: Value) -> Option<Criterion> {
        let condition = match self.operator {
            Operator::Equals => {
                if value.is_null() {
                    None
                } else {
                    Some(Condition::Equals(value))
                }
            }
            Operator::Contains => value.as_str().map(|s| Condition::Contains(s.to_string())),
            Operator::ContainsOneOf => {
                value.as_array().map(|a| Condition::ContainsOneOf(a.clone()))
            }
            Operator::EqualsOneOf => value.as_array().map(|a| Condition::EqualsOneOf(a.clone())),
            Operator::Between => number_pair(&value)
                .map(|(min, max)| Condition::Between(Range::new().ge(min).le(max))),
            Operator::BetweenDatesInclusive => date_pair(&value).map(|(start, end)| {
                Condition::BetweenDatesInclusive(DateRange::new().start(start).end(end))
            }),
        };

        let Some(condition) = condition else {
            warn!(field = %self.field, operator = %self.operator, "criterion value shape mismatch");
            return None;
        };
        Some(Criterion::new(self.field.clone(), condition))
    }
}

// An ordered [min, max] pair of numbers.
fn number_pair(value: &Value) -> Option<(f64, f64)> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let min = pair[0].as_f64()?;
    let max = pair[1].as_f64()?;
    if min > max {
        return None;
    }
    Some((min, max))
}

// An ordered [start, end] pair of date-parseable strings.
fn date_pair(value: &Value) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let start = crate::engine::parse_date(pair[0].as_str()?)?;
    let end = crate::engine::parse_date(pair[1].as_str()?)?;
    if start > end {
        return None;
    }
    Some((start, end))
}

/// The canonical set of active criteria for a UI session: ordered, with at
/// most one criterion per field. [`FilterSet::set`] upserts by field so the
/// invariant holds structurally rather than by caller discipline.
///
/// The filtering engine and query-param encoder are pure functions of this
/// set's contents and never mutate it.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct FilterSet {
    criteria: Vec<Criterion>,
}

impl FilterSet {
    /// Create an empty filter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { criteria: Vec::new() }
    }

    /// Upsert a criterion by field, replacing any existing criterion for
    /// that field in place (the field keeps its position in the set).
    pub fn set(&mut self, criterion: Criterion) {
        if let Some(existing) =
            self.criteria.iter_mut().find(|c| c.field == criterion.field)
        {
            *existing = criterion;
        } else {
            self.criteria.push(criterion);
        }
    }

    /// Remove the criterion for a field, if any.
    pub fn remove(&mut self, field: &str) -> Option<Criterion> {
        let index = self.criteria.iter().position(|c| c.field == field)?;
        Some(self.criteria.remove(index))
    }

    /// Empty the set.
    pub fn clear(&mut self) {
        self.criteria.clear();
    }

    /// The active criteria, in insertion order.
    #[must_use]
    pub fn active(&self) -> &[Criterion] {
        &self.criteria
    }

    /// The criterion for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.field == field)
    }

    /// Whether no criteria are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Number of active criteria.
    #[must_use]
    pub fn len(&self) -> usize {
        self.criteria.len()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.iter()
    }
}

impl From<Vec<Criterion>> for FilterSet {
    fn from(criteria: Vec<Criterion>) -> Self {
        let mut set = Self::new();
        for criterion in criteria {
            set.set(criterion);
        }
        set
    }
}
