//! GraphQL transport.

use super::api::CmsApi;
use super::error::CmsError;
use super::query::Query;
use super::response::{RawResponse, ResultSets};
use crate::log;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Data access seam used by the widgets.
///
/// Implementors only provide [`GraphQl::fetch_data`]; error-list handling and
/// result-set unwrapping are shared.
#[async_trait]
pub trait GraphQl: Send + Sync {
    /// Execute one document and return the parsed response body.
    async fn fetch_data(&self, query: &Query, variables: Value) -> Result<RawResponse, CmsError>;

    /// Execute one document and unwrap its `data` payload.
    ///
    /// A non-empty `errors` list is logged in full and turned into
    /// [`CmsError::Query`].
    async fn get_data(&self, query: &Query, variables: Value) -> Result<ResultSets, CmsError> {
        let mut response = self.fetch_data(query, variables).await?;
        if let Some(errors) = response.take_errors() {
            let dump = serde_json::to_string_pretty(&errors).unwrap_or_default();
            log!("error"; "query `{}` returned errors:\n{}", query.name, dump);
            return Err(CmsError::Query {
                query: query.name,
                errors,
            });
        }
        Ok(ResultSets::from_response(query, response))
    }
}

/// reqwest-backed client for one endpoint.
///
/// No timeout and no retry: a widget waits as long as the transport does.
pub struct CmsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CmsClient {
    pub fn new(api: &CmsApi) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: api.graphql_endpoint(),
        })
    }
}

#[async_trait]
impl GraphQl for CmsClient {
    async fn fetch_data(&self, query: &Query, variables: Value) -> Result<RawResponse, CmsError> {
        let body = json!({
            "query": query.document,
            "variables": variables,
        });
        // status is not checked: GraphQL servers report failures in the body
        let text = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .text()
            .await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::query::{ARTICLE, ARTICLE_LIST};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> CmsClient {
        CmsClient::new(&CmsApi::new(&server.uri(), "demo").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_posts_query_and_variables() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "query": ARTICLE.document,
                "variables": { "project": "demo", "slug": "hello" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "Articles": [{ "title": "Hello" }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let sets = client
            .get_data(&ARTICLE, json!({ "project": "demo", "slug": "hello" }))
            .await
            .unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets.get(0).unwrap()[0]["title"], "Hello");
    }

    #[tokio::test]
    async fn test_result_sets_keep_document_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":{"Articles":[],"Articles_aggregated":[{"count":{"id":0}}]}}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let sets = client.get_data(&ARTICLE_LIST, json!({})).await.unwrap();
        assert_eq!(sets.len(), 2);
        assert!(sets.get(0).unwrap().as_array().unwrap().is_empty());
        assert_eq!(sets.get(1).unwrap()[0]["count"]["id"], 0);
    }

    #[tokio::test]
    async fn test_graphql_errors_fail_the_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{
                    "message": "Cannot query field \"nope\"",
                    "extensions": { "code": "GRAPHQL_VALIDATION_FAILED" }
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_data(&ARTICLE, json!({})).await.unwrap_err();
        match err {
            CmsError::Query { query, errors } => {
                assert_eq!(query, "Article");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].code(), Some("GRAPHQL_VALIDATION_FAILED"));
            }
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_data(&ARTICLE, json!({})).await.unwrap_err();
        assert!(matches!(err, CmsError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Reserve a port, then free it so nothing answers there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let uri = format!("http://127.0.0.1:{port}");
        let client = CmsClient::new(&CmsApi::new(&uri, "demo").unwrap()).unwrap();
        let err = client.get_data(&ARTICLE, json!({})).await.unwrap_err();
        assert!(matches!(err, CmsError::Transport(_)));
    }
}
