//! # Filtering Engine
//!
//! Applies free-text search and criterion predicates against an in-memory
//! record collection with AND semantics. The filter is stable: records keep
//! their original relative order. Evaluation never panics or errors on
//! malformed records: a record that cannot be evaluated for a criterion
//! does not match it.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::filter::{Condition, Criterion};
use crate::record::Record;

/// Options controlling predicate evaluation.
///
/// The reference behavior is inconsistent on purpose: `contains` criteria
/// match case-sensitively while free-text search is case-insensitive. The
/// default preserves that behavior; set `case_insensitive_contains` to
/// align the two paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchOptions {
    /// Evaluate `contains` criteria case-insensitively.
    pub case_insensitive_contains: bool,
}

/// Filter a record collection with conjunction semantics.
///
/// Records are first narrowed by free-text search (when `search_text` is
/// non-empty), then a record is retained only if every criterion matches.
/// Inactive criteria are skipped. Order is preserved; an empty input yields
/// an empty output.
#[must_use]
pub fn filter_records(
    records: &[Record], criteria: &[Criterion], options: MatchOptions, search_text: Option<&str>,
) -> Vec<Record> {
    records
        .iter()
        .filter(|record| {
            if let Some(text) = search_text
                && !matches_search_text(record, text)
            {
                return false;
            }
            criteria.iter().all(|criterion| evaluate(criterion, record, options))
        })
        .cloned()
        .collect()
}

/// Free-text search across an entire record regardless of schema: the
/// record is serialized to JSON and searched for `text` as a
/// case-insensitive substring. Empty text always matches.
#[must_use]
pub fn matches_search_text(record: &Record, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    record.to_json().to_lowercase().contains(&text.to_lowercase())
}

/// Decide whether one record satisfies one criterion.
///
/// A missing field or a type mismatch is a non-match, never an error. An
/// inactive criterion (null/empty operand) always matches so incomplete UI
/// state does not over-filter.
#[must_use]
pub fn evaluate(criterion: &Criterion, record: &Record, options: MatchOptions) -> bool {
    if !criterion.condition.is_active() {
        return true;
    }
    let Some(field_value) = record.get(&criterion.field) else {
        return false;
    };

    match &criterion.condition {
        Condition::Equals(value) => value_eq(field_value, value),
        Condition::Contains(text) => {
            let Some(haystack) = field_value.as_str() else {
                return false;
            };
            if options.case_insensitive_contains {
                haystack.to_lowercase().contains(&text.to_lowercase())
            } else {
                haystack.contains(text.as_str())
            }
        }
        Condition::ContainsOneOf(values) => {
            let Some(elements) = field_value.as_array() else {
                return false;
            };
            elements.iter().any(|e| values.iter().any(|v| value_eq(e, v)))
        }
        Condition::EqualsOneOf(values) => values.iter().any(|v| value_eq(field_value, v)),
        Condition::Between(range) => {
            let Some(number) = as_number(field_value) else {
                return false;
            };
            range.contains(&number)
        }
        Condition::BetweenDatesInclusive(range) => {
            let Some(date) = field_value.as_str().and_then(parse_date) else {
                return false;
            };
            range.contains(&date)
        }
    }
}

// Strict equality, with numbers compared numerically so `20` and `20.0`
// (e.g. a JSON fixture vs a sniffed CSV cell) compare equal.
fn value_eq(a: &Value, b: &Value) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

// Numeric view of a value. Numeric strings are accepted so delimited
// sources that keep cells as text still range-filter correctly.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a date field: RFC 3339 first, then a plain `YYYY-MM-DD` date
/// (taken as midnight UTC).
#[must_use]
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::filter::Criterion;

    fn tree(species: &str, dbh: f64) -> Record {
        Record::from_value(json!({ "species": species, "dbh": dbh })).expect("should be object")
    }

    #[test]
    fn equals_matches_strictly() {
        let record = tree("Oak", 20.0);
        let options = MatchOptions::default();

        assert!(evaluate(&Criterion::equals("species", "Oak"), &record, options));
        assert!(!evaluate(&Criterion::equals("species", "oak"), &record, options));
        assert!(evaluate(&Criterion::equals("dbh", 20), &record, options));
    }

    #[test]
    fn missing_field_is_non_match() {
        let record = tree("Oak", 20.0);
        assert!(!evaluate(
            &Criterion::equals("height", 10),
            &record,
            MatchOptions::default()
        ));
    }

    #[test]
    fn contains_is_case_sensitive_by_default() {
        let record = tree("Coast Live Oak", 20.0);

        let criterion = Criterion::contains("species", "oak");
        assert!(!evaluate(&criterion, &record, MatchOptions::default()));
        assert!(evaluate(
            &criterion,
            &record,
            MatchOptions { case_insensitive_contains: true }
        ));

        // free-text search stays case-insensitive either way
        assert!(matches_search_text(&record, "OAK"));
        assert!(matches_search_text(&record, "oak"));
    }

    #[test]
    fn one_of_variants() {
        let record = Record::from_value(json!({
            "species": "Oak",
            "tags": ["street", "protected"],
        }))
        .expect("should be object");
        let options = MatchOptions::default();

        assert!(evaluate(
            &Criterion::equals_one_of("species", vec![json!("Oak"), json!("Pine")]),
            &record,
            options
        ));
        assert!(evaluate(
            &Criterion::contains_one_of("tags", vec![json!("protected"), json!("heritage")]),
            &record,
            options
        ));
        assert!(!evaluate(
            &Criterion::contains_one_of("tags", vec![json!("heritage")]),
            &record,
            options
        ));
        // scalar field never matches an array-overlap criterion
        assert!(!evaluate(
            &Criterion::contains_one_of("species", vec![json!("Oak")]),
            &record,
            options
        ));
    }

    #[test]
    fn between_is_inclusive_both_ends() {
        let options = MatchOptions::default();
        let criterion = Criterion::between("dbh", 15.0, 25.0);

        assert!(evaluate(&criterion, &tree("Oak", 15.0), options));
        assert!(evaluate(&criterion, &tree("Oak", 25.0), options));
        assert!(!evaluate(&criterion, &tree("Pine", 30.0), options));

        // numeric strings still range-filter
        let text_record =
            Record::from_value(json!({ "dbh": "20" })).expect("should be object");
        assert!(evaluate(&criterion, &text_record, options));
    }

    #[test]
    fn between_dates_parses_both_forms() {
        let record = Record::from_value(json!({ "observed": "2024-06-15" }))
            .expect("should be object");
        let criterion = Criterion::between_dates(
            "observed",
            parse_date("2024-06-01").expect("should parse"),
            parse_date("2024-06-30T23:59:59Z").expect("should parse"),
        );
        assert!(evaluate(&criterion, &record, MatchOptions::default()));

        let outside = Record::from_value(json!({ "observed": "2024-07-01T00:00:00Z" }))
            .expect("should be object");
        assert!(!evaluate(&criterion, &outside, MatchOptions::default()));
    }

    #[test]
    fn inactive_criterion_always_matches() {
        let record = tree("Oak", 20.0);
        let criterion = Criterion::equals_one_of("species", vec![]);
        assert!(evaluate(&criterion, &record, MatchOptions::default()));
    }

    #[test]
    fn empty_search_text_passes_through() {
        assert!(matches_search_text(&tree("Oak", 20.0), ""));
    }
}
