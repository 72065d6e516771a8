//! # Data Requests
//!
//! Builds the request URL for a data-browsing page. In server mode the
//! active criteria become query parameters (plus pagination); in client
//! mode the already-fetched records are filtered in memory and the URL
//! carries only static parameters. The pipeline never performs the fetch
//! itself; issuing, cancelling, and retrying requests belongs to the
//! data-fetch collaborator.

use derive_more::Display;

use crate::filter::{Criterion, FieldConfig, FilterSet};
use crate::params::{QueryParams, encode};

/// Where filtering happens for a page.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum QueryMode {
    /// Criteria become query parameters on the request.
    Server,

    /// Criteria drive the in-memory filtering engine; the request fetches
    /// the full collection.
    #[default]
    Client,
}

/// Builder for a page's data request.
#[derive(Clone, Debug, Default)]
pub struct RequestBuilder {
    source: String,
    mode: QueryMode,
    criteria: Vec<Criterion>,
    configs: Vec<FieldConfig>,
    static_params: Vec<(String, String)>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl RequestBuilder {
    /// Create a builder for the given data source path or URL.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the query mode.
    #[must_use]
    pub const fn mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use the active criteria from a filter set.
    #[must_use]
    pub fn filters(mut self, filters: &FilterSet) -> Self {
        self.criteria = filters.active().to_vec();
        self
    }

    /// Set the field configurations used to encode criteria.
    #[must_use]
    pub fn configs(mut self, configs: Vec<FieldConfig>) -> Self {
        self.configs = configs;
        self
    }

    /// Add a static query parameter, appended after any filter parameters.
    #[must_use]
    pub fn static_param(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_params.push((field.into(), value.into()));
        self
    }

    /// Set pagination. Applied in server mode only.
    #[must_use]
    pub const fn paginate(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// The query parameters for the request.
    #[must_use]
    pub fn params(&self) -> QueryParams {
        let mut params = if self.mode == QueryMode::Server {
            encode(&self.criteria, &self.configs)
        } else {
            QueryParams::new()
        };

        for (field, value) in &self.static_params {
            params.append(field.clone(), value);
        }

        if self.mode == QueryMode::Server {
            if let Some(limit) = self.limit {
                params.append("limit", &limit.to_string());
            }
            if let Some(offset) = self.offset {
                params.append("offset", &offset.to_string());
            }
        }

        params
    }

    /// The full request URL: the cleaned source plus the query string.
    #[must_use]
    pub fn build(&self) -> String {
        let source = clean_url(&self.source);
        let params = self.params();
        if params.is_empty() {
            source
        } else {
            format!("{source}?{params}")
        }
    }
}

/// Remove a trailing slash from a URL.
#[must_use]
pub fn clean_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// Collapse duplicate slashes in a path.
#[must_use]
pub fn clean_path(path: &str) -> String {
    let mut cleaned = String::with_capacity(path.len());
    let mut last_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !last_slash {
                cleaned.push(c);
            }
            last_slash = true;
        } else {
            cleaned.push(c);
            last_slash = false;
        }
    }
    cleaned
}
