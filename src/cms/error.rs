//! CMS access error types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One entry of a GraphQL `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQlError {
    /// `extensions.code`, when the server reports one (e.g. `GRAPHQL_VALIDATION_FAILED`).
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors surfaced by the data access layer.
///
/// Empty results are not errors: widgets turn them into empty renders.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS request failed")]
    Transport(#[from] reqwest::Error),

    #[error("CMS response is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("CMS query `{query}` failed: {}", join_errors(.errors))]
    Query {
        query: &'static str,
        errors: Vec<GraphQlError>,
    },

    #[error("unexpected shape in `{query}` result: {message}")]
    Shape {
        query: &'static str,
        message: String,
    },
}

fn join_errors(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
