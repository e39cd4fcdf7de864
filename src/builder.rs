//! Fluent URL builder.
//!
//! # Responsibilities
//! - Accumulate path parameters and query values for one build
//! - Normalize every input to strings before rendering
//! - Defer the first input error until `build()` so chains stay unbroken
//!
//! # Design Decisions
//! - Struct parameters go through serde instead of reflection: any
//!   `T: Serialize` flattens via `serde_json::to_value`, so serde rename
//!   attributes decide the key and nested shapes are rejected
//! - Single- and multi-value query maps merge into one sorted map, making
//!   repeated builds byte-identical
//! - The builder is a local accumulator, not shared between threads

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{RouteError, RouteResult};
use crate::group::Group;

/// A scalar or list query value accepted by [`UrlBuilder::with_query`].
#[derive(Debug, Clone)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Many(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for QueryValue {
    fn from(values: &[&str]) -> Self {
        QueryValue::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Per-call accumulator of path and query parameters.
///
/// Every `with_*` method consumes and returns the builder; the first input
/// error is remembered and surfaced only by [`UrlBuilder::build`], so
/// chained calls never check intermediate results.
pub struct UrlBuilder {
    group: Group,
    route: String,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    multi_query: HashMap<String, Vec<String>>,
    error: Option<RouteError>,
}

impl UrlBuilder {
    pub(crate) fn new(group: Group, route: &str) -> Self {
        Self {
            group,
            route: route.to_string(),
            params: HashMap::new(),
            query: HashMap::new(),
            multi_query: HashMap::new(),
            error: None,
        }
    }

    /// Sets one path parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Sets every pair of a map-like input as path parameters.
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in params {
            self.params.insert(key.into(), value.to_string());
        }
        self
    }

    /// Extracts path parameters from any serializable struct.
    ///
    /// The value must serialize to an object; scalar fields are
    /// stringified, `None` fields are skipped, and nested arrays/objects
    /// defer an unsupported-shape error to `build()`.
    pub fn with_struct<T: Serialize>(mut self, value: &T) -> Self {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(err) => {
                self.defer(RouteError::UnsupportedParam {
                    key: std::any::type_name::<T>().to_string(),
                    detail: err.to_string(),
                });
                return self;
            }
        };

        let object = match json {
            serde_json::Value::Object(object) => object,
            other => {
                self.defer(RouteError::UnsupportedParam {
                    key: std::any::type_name::<T>().to_string(),
                    detail: format!("expected an object, got {}", value_kind(&other)),
                });
                return self;
            }
        };

        for (key, field) in object {
            match scalar_to_string(&field) {
                Some(text) => {
                    self.params.insert(key, text);
                }
                None if field.is_null() => {}
                None => {
                    self.defer(RouteError::UnsupportedParam {
                        key,
                        detail: format!("nested {} is not a path parameter", value_kind(&field)),
                    });
                    return self;
                }
            }
        }
        self
    }

    /// Sets a query key from a scalar or a list. Lists are tracked as
    /// multi-value keys.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let key = key.into();
        match value.into() {
            QueryValue::One(value) => {
                self.query.insert(key, value);
            }
            QueryValue::Many(values) => {
                self.multi_query.insert(key, values);
            }
        }
        self
    }

    /// Appends values to a multi-value query key.
    pub fn with_query_values<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.multi_query
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Renders the final URL, surfacing any input error deferred along the
    /// chain.
    pub fn build(self) -> RouteResult<String> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut queries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in self.query {
            queries.entry(key).or_default().push(value);
        }
        for (key, values) in self.multi_query {
            queries.entry(key).or_default().extend(values);
        }

        self.group.render(&self.route, &self.params, &queries)
    }

    /// Panicking variant of [`UrlBuilder::build`].
    pub fn must_build(self) -> String {
        self.build().unwrap_or_else(|err| panic!("{}", err))
    }

    fn defer(&mut self, error: RouteError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
