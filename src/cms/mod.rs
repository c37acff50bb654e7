//! Headless CMS access: query catalog, GraphQL transport and entity types.
//!
//! ```text
//! widget ──► GraphQl::get_data(query, variables)
//!                 │
//!                 ├── fetch_data(): POST <endpoint>/graphql?  {query, variables}
//!                 │       ├── {errors: [...]}  → CmsError::Query (logged)
//!                 │       └── {data: {...}}    → RawResponse
//!                 │
//!                 └── ResultSets: data's top-level values, in document order
//! ```

mod api;
mod client;
mod error;
pub mod query;
mod response;
pub mod types;

pub use api::{ApiConfigError, CmsApi};
pub use client::{CmsClient, GraphQl};
pub use error::CmsError;
#[cfg(test)]
pub use response::RawResponse;
