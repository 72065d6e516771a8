//! Server Mode
//!
//! These tests exercise the query-param encoder and request builder the
//! way a server-mode page does: the active criteria become URL query
//! parameters using each field's configured encoding strategy.

use envquery::{
    Criterion, FieldConfig, FilterSet, Operator, ParamEncoding, QueryMode, RequestBuilder, encode,
};
use serde_json::json;

#[test]
fn array_string_encoding() {
    let configs = vec![
        FieldConfig::new("source", "Source", Operator::EqualsOneOf)
            .encoding(ParamEncoding::array_string()),
    ];
    let criteria = vec![Criterion::equals_one_of("source", vec![json!("a"), json!("b")])];

    assert_eq!(encode(&criteria, &configs).to_string(), "source=a,b");
}

#[test]
fn repeated_encoding_round_trips() {
    let configs = vec![
        FieldConfig::new("source", "Source", Operator::EqualsOneOf)
            .encoding(ParamEncoding::Repeated),
    ];
    let values = vec![json!("a"), json!("b"), json!("c")];
    let criteria = vec![Criterion::equals_one_of("source", values.clone())];

    let params = encode(&criteria, &configs);
    assert_eq!(params.to_string(), "source=a&source=b&source=c");

    // splitting the repeated key reproduces the original array, in order
    let decoded = params.values("source");
    assert_eq!(decoded, vec!["a", "b", "c"]);
}

#[test]
fn min_max_encoding() {
    let configs = vec![
        FieldConfig::new("dbh", "Diameter", Operator::Between).encoding(ParamEncoding::min_max()),
    ];
    let criteria = vec![Criterion::between("dbh", 10.0, 50.0)];

    assert_eq!(encode(&criteria, &configs).to_string(), "min_dbh=10&max_dbh=50");
}

#[test]
fn unconfigured_field_uses_default_encoding() {
    let criteria = vec![Criterion::equals("species", "Oak")];
    assert_eq!(encode(&criteria, &[]).to_string(), "species=Oak");
}

#[test]
fn server_request_carries_filters_pagination_and_static_params() {
    // --------------------------------------------------
    // The page assembles its filters from UI interaction.
    // --------------------------------------------------
    let configs = vec![
        FieldConfig::new("source", "Source", Operator::EqualsOneOf)
            .encoding(ParamEncoding::Repeated),
        FieldConfig::new("dbh", "Diameter", Operator::Between).encoding(ParamEncoding::min_max()),
    ];

    let mut filters = FilterSet::new();
    filters.set(Criterion::equals_one_of("source", vec![json!("city"), json!("county")]));
    filters.set(Criterion::between("dbh", 10.0, 50.0));

    // --------------------------------------------------
    // In server mode the request URL carries everything.
    // --------------------------------------------------
    let url = RequestBuilder::new("https://api.example.org/trees")
        .mode(QueryMode::Server)
        .filters(&filters)
        .configs(configs.clone())
        .static_param("format", "json")
        .paginate(25, 0)
        .build();

    assert_eq!(
        url,
        "https://api.example.org/trees?source=city&source=county&min_dbh=10&max_dbh=50&format=json&limit=25&offset=0"
    );

    // --------------------------------------------------
    // In client mode the same filters stay off the wire.
    // --------------------------------------------------
    let url = RequestBuilder::new("data/trees.json")
        .mode(QueryMode::Client)
        .filters(&filters)
        .configs(configs)
        .build();

    assert_eq!(url, "data/trees.json");
}
