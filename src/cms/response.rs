//! GraphQL response envelope and result-set unwrapping.

use super::error::{CmsError, GraphQlError};
use super::query::Query;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Parsed response body: `{data: {...}}` or `{errors: [...]}`.
#[derive(Debug, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,

    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl RawResponse {
    /// The `errors` list, when present and non-empty.
    pub fn take_errors(&mut self) -> Option<Vec<GraphQlError>> {
        self.errors.take().filter(|errors| !errors.is_empty())
    }
}

/// The values of a response's `data` fields, in the order the document
/// requested them (a document can ask for several named result sets, such
/// as `Articles` followed by `Articles_aggregated`).
#[derive(Debug, Clone, Default)]
pub struct ResultSets {
    query: &'static str,
    sets: Vec<Value>,
}

impl ResultSets {
    pub fn from_response(query: &Query, response: RawResponse) -> Self {
        let sets = response
            .data
            .map(|data| data.into_iter().map(|(_, value)| value).collect())
            .unwrap_or_default();
        Self {
            query: query.name,
            sets,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.sets.get(index)
    }

    /// Deserialize every record of result set `index`.
    ///
    /// A missing or `null` set yields no records; a single object is treated
    /// as a one-record set.
    pub fn records<T: DeserializeOwned>(&self, index: usize) -> Result<Vec<T>, CmsError> {
        let decode = |value: &Value| {
            T::deserialize(value).map_err(|err| CmsError::Shape {
                query: self.query,
                message: format!("result set {index}: {err}"),
            })
        };
        match self.sets.get(index) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().map(decode).collect(),
            Some(value) => decode(value).map(|record| vec![record]),
        }
    }

    /// Deserialize the first record of result set `index`, if any.
    pub fn first_record<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>, CmsError> {
        let first = match self.sets.get(index) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => match items.first() {
                Some(item) => item,
                None => return Ok(None),
            },
            Some(value) => value,
        };
        T::deserialize(first)
            .map(Some)
            .map_err(|err| CmsError::Shape {
                query: self.query,
                message: format!("result set {index}: {err}"),
            })
    }
}
