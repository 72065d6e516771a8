//! # Query Parameters
//!
//! Translates active criteria into URL query parameters for server-mode
//! requests. Each field picks one of three encoding strategies (or the
//! default single `field=value` pair):
//!
//! - array-string: values joined with a separator, `source=a,b`
//! - repeated: one pair per value, `source=a&source=b`
//! - min/max: two pairs from a range, `min_dbh=10&max_dbh=50`
//!
//! A strategy that does not suit the criterion's value shape falls back to
//! the default encoding rather than failing the request.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::filter::{Condition, Criterion, FieldConfig};
use crate::{Lower, Upper};

/// Query-string encoding strategy for a field.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ParamEncoding {
    /// Join array values with a separator into one `field=v1,v2` pair.
    ArrayString {
        /// Separator between values. Defaults to `,`.
        #[serde(skip_serializing_if = "Option::is_none")]
        separator: Option<String>,
    },

    /// Emit one `field=v` pair per array value.
    Repeated,

    /// Emit two pairs from a range value, one for each bound.
    MinMax {
        /// Parameter name for the lower bound. Defaults to `min_<field>`.
        #[serde(skip_serializing_if = "Option::is_none")]
        min_param: Option<String>,

        /// Parameter name for the upper bound. Defaults to `max_<field>`.
        #[serde(skip_serializing_if = "Option::is_none")]
        max_param: Option<String>,
    },
}

impl ParamEncoding {
    /// Array-string encoding with the default `,` separator.
    #[must_use]
    pub const fn array_string() -> Self {
        Self::ArrayString { separator: None }
    }

    /// Array-string encoding with a custom separator.
    #[must_use]
    pub fn array_string_with(separator: impl Into<String>) -> Self {
        Self::ArrayString {
            separator: Some(separator.into()),
        }
    }

    /// Min/max encoding with names derived from the field.
    #[must_use]
    pub const fn min_max() -> Self {
        Self::MinMax {
            min_param: None,
            max_param: None,
        }
    }

    /// Min/max encoding with custom parameter names.
    #[must_use]
    pub fn min_max_with(min_param: impl Into<String>, max_param: impl Into<String>) -> Self {
        Self::MinMax {
            min_param: Some(min_param.into()),
            max_param: Some(max_param.into()),
        }
    }
}

/// An ordered list of query parameter pairs. Values are percent-encoded as
/// they are appended; `Display` produces the final query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a pair, percent-encoding the value.
    pub fn append(&mut self, field: impl Into<String>, value: &str) {
        self.pairs.push((field.into(), urlencoding::encode(value).into_owned()));
    }

    // Append a pair whose value is already encoded (joined array values
    // keep their separator literal).
    fn append_encoded(&mut self, field: impl Into<String>, value: String) {
        self.pairs.push((field.into(), value));
    }

    /// Whether any pairs have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs in append order, values still percent-encoded.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Decoded values for a key, in append order. Splitting repeated keys
    /// this way reproduces the array a `Repeated`-encoded criterion was
    /// built from.
    #[must_use]
    pub fn values(&self, field: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == field)
            .map(|(_, value)| {
                urlencoding::decode(value).map_or_else(|_| value.clone(), |v| v.into_owned())
            })
            .collect()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, value) in &self.pairs {
            if !first {
                write!(f, "&")?;
            }
            first = false;
            write!(f, "{field}={value}")?;
        }
        Ok(())
    }
}

/// Serialize criteria into query parameters using each field's configured
/// strategy. Pair order follows criteria order; no deduplication across
/// fields is performed. Inactive criteria are skipped.
#[must_use]
pub fn encode(criteria: &[Criterion], configs: &[FieldConfig]) -> QueryParams {
    let mut params = QueryParams::new();

    for criterion in criteria {
        if !criterion.condition.is_active() {
            continue;
        }
        let encoding =
            configs.iter().find(|c| c.field == criterion.field).and_then(|c| c.encoding.as_ref());

        match (encoding, &criterion.condition) {
            (
                Some(ParamEncoding::ArrayString { separator }),
                Condition::ContainsOneOf(values) | Condition::EqualsOneOf(values),
            ) => {
                let separator = separator.as_deref().unwrap_or(",");
                let joined = values
                    .iter()
                    .map(|v| urlencoding::encode(&scalar_string(v)).into_owned())
                    .collect::<Vec<_>>()
                    .join(separator);
                params.append_encoded(criterion.field.clone(), joined);
            }
            (
                Some(ParamEncoding::Repeated),
                Condition::ContainsOneOf(values) | Condition::EqualsOneOf(values),
            ) => {
                for value in values {
                    params.append(criterion.field.clone(), &scalar_string(value));
                }
            }
            (Some(ParamEncoding::MinMax { min_param, max_param }), Condition::Between(range)) => {
                let min_param = min_param
                    .clone()
                    .unwrap_or_else(|| format!("min_{}", criterion.field));
                let max_param = max_param
                    .clone()
                    .unwrap_or_else(|| format!("max_{}", criterion.field));
                if let Some(Lower::Inclusive(min) | Lower::Exclusive(min)) = &range.lower {
                    params.append(min_param, &number_string(*min));
                }
                if let Some(Upper::Inclusive(max) | Upper::Exclusive(max)) = &range.upper {
                    params.append(max_param, &number_string(*max));
                }
            }
            (
                Some(ParamEncoding::MinMax { min_param, max_param }),
                Condition::BetweenDatesInclusive(range),
            ) => {
                let min_param = min_param
                    .clone()
                    .unwrap_or_else(|| format!("min_{}", criterion.field));
                let max_param = max_param
                    .clone()
                    .unwrap_or_else(|| format!("max_{}", criterion.field));
                if let Some(start) = &range.lower {
                    params.append(min_param, &start.to_rfc3339());
                }
                if let Some(end) = &range.upper {
                    params.append(max_param, &end.to_rfc3339());
                }
            }
            (encoding, condition) => {
                if encoding.is_some() {
                    warn!(
                        field = %criterion.field,
                        "encoding strategy does not suit criterion value, using default"
                    );
                }
                params.append(criterion.field.clone(), &default_value(condition));
            }
        }
    }

    params
}

// Default single-pair rendering of a condition's operand.
fn default_value(condition: &Condition) -> String {
    match condition {
        Condition::Equals(value) => scalar_string(value),
        Condition::Contains(text) => text.clone(),
        Condition::ContainsOneOf(values) | Condition::EqualsOneOf(values) => {
            values.iter().map(scalar_string).collect::<Vec<_>>().join(",")
        }
        Condition::Between(range) => {
            let mut parts = Vec::new();
            if let Some(Lower::Inclusive(min) | Lower::Exclusive(min)) = &range.lower {
                parts.push(number_string(*min));
            }
            if let Some(Upper::Inclusive(max) | Upper::Exclusive(max)) = &range.upper {
                parts.push(number_string(*max));
            }
            parts.join(",")
        }
        Condition::BetweenDatesInclusive(range) => {
            let mut parts = Vec::new();
            if let Some(start) = &range.lower {
                parts.push(start.to_rfc3339());
            }
            if let Some(end) = &range.upper {
                parts.push(end.to_rfc3339());
            }
            parts.join(",")
        }
    }
}

// Plain string form of a scalar value (no JSON quoting).
fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Render whole numbers without a trailing `.0`.
fn number_string(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::filter::Operator;

    fn config(field: &str, operator: Operator, encoding: ParamEncoding) -> FieldConfig {
        FieldConfig::new(field, field, operator).encoding(encoding)
    }

    #[test]
    fn array_string_joins_with_separator() {
        let configs = vec![config("source", Operator::EqualsOneOf, ParamEncoding::array_string())];
        let criteria = vec![Criterion::equals_one_of("source", vec![json!("a"), json!("b")])];

        assert_eq!(encode(&criteria, &configs).to_string(), "source=a,b");

        let configs =
            vec![config("source", Operator::EqualsOneOf, ParamEncoding::array_string_with("|"))];
        assert_eq!(encode(&criteria, &configs).to_string(), "source=a|b");
    }

    #[test]
    fn repeated_emits_one_pair_per_value() {
        let configs = vec![config("source", Operator::EqualsOneOf, ParamEncoding::Repeated)];
        let criteria = vec![Criterion::equals_one_of("source", vec![json!("a"), json!("b")])];

        let params = encode(&criteria, &configs);
        assert_eq!(params.to_string(), "source=a&source=b");
        assert_eq!(params.values("source"), vec!["a", "b"]);
    }

    #[test]
    fn min_max_emits_two_pairs() {
        let configs = vec![config("dbh", Operator::Between, ParamEncoding::min_max())];
        let criteria = vec![Criterion::between("dbh", 10.0, 50.0)];

        assert_eq!(encode(&criteria, &configs).to_string(), "min_dbh=10&max_dbh=50");

        let configs =
            vec![config("dbh", Operator::Between, ParamEncoding::min_max_with("lo", "hi"))];
        assert_eq!(encode(&criteria, &configs).to_string(), "lo=10&hi=50");
    }

    #[test]
    fn default_encoding_is_single_pair() {
        let criteria = vec![Criterion::equals("species", "Oak")];
        assert_eq!(encode(&criteria, &[]).to_string(), "species=Oak");
    }

    #[test]
    fn mismatched_strategy_falls_back_to_default() {
        // min/max strategy on a scalar criterion
        let configs = vec![config("species", Operator::Equals, ParamEncoding::min_max())];
        let criteria = vec![Criterion::equals("species", "Oak")];
        assert_eq!(encode(&criteria, &configs).to_string(), "species=Oak");
    }

    #[test]
    fn values_are_percent_encoded() {
        let criteria = vec![Criterion::equals("species", "Coast Live Oak")];
        assert_eq!(encode(&criteria, &[]).to_string(), "species=Coast%20Live%20Oak");
    }

    #[test]
    fn pair_order_follows_criteria_order() {
        let configs = vec![config("dbh", Operator::Between, ParamEncoding::min_max())];
        let criteria = vec![
            Criterion::equals("species", "Oak"),
            Criterion::between("dbh", 10.0, 50.0),
            Criterion::equals("condition", "Good"),
        ];
        assert_eq!(
            encode(&criteria, &configs).to_string(),
            "species=Oak&min_dbh=10&max_dbh=50&condition=Good"
        );
    }

    #[test]
    fn inactive_criteria_are_skipped() {
        let criteria = vec![Criterion::equals_one_of("source", vec![])];
        assert!(encode(&criteria, &[]).is_empty());
    }
}
