//! Query-string parameters for API calls.
//!
//! A `Query` is an ordered mapping from parameter name to either a scalar or
//! a list of scalars. Lists encode with indexed keys (`tags[0]=a&tags[1]=b`),
//! which is what the Roomping API expects for multi-valued filters.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A JSON value that cannot be expressed as a query parameter.
#[derive(Debug, Error)]
#[error("query parameter `{key}` cannot hold {kind}")]
pub struct QueryError {
    pub key: String,
    pub kind: &'static str,
}

/// Value of a single query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from!(&str, String, &String, bool, i32, i64, u32, u64, usize, f64);

impl<T: ToString> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Ordered query parameters. Inserting an existing key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Flatten into unencoded `(key, value)` pairs in insertion order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len());
        for (key, value) in &self.params {
            match value {
                QueryValue::Scalar(v) => pairs.push((key.clone(), v.clone())),
                QueryValue::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        pairs.push((format!("{key}[{i}]"), item.clone()));
                    }
                }
            }
        }
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl TryFrom<Map<String, Value>> for Query {
    type Error = QueryError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut query = Query::new();
        for (key, value) in map {
            let value = match value {
                Value::Array(items) => {
                    let items = items
                        .into_iter()
                        .map(|item| scalar_text(&key, item))
                        .collect::<Result<Vec<_>, _>>()?;
                    QueryValue::List(items)
                }
                other => QueryValue::Scalar(scalar_text(&key, other)?),
            };
            query.insert(key, value);
        }
        Ok(query)
    }
}

fn scalar_text(key: &str, value: Value) -> Result<String, QueryError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        Value::Array(_) => Err(QueryError {
            key: key.to_string(),
            kind: "a nested array",
        }),
        Value::Object(_) => Err(QueryError {
            key: key.to_string(),
            kind: "an object",
        }),
    }
}
