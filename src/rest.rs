//! Client for the upstream REST service
//!
//! Only GETs are issued. Query parameters are kept in a [`BTreeMap`] so the
//! serialized query string is always in the same order for the same input.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{GatewayError, Result};

/// Query parameters for a collection fetch, serialized in key order
pub type QueryParams = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment unless the base ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the absolute URL for `path` with `query` appended in canonical order
    pub fn endpoint(&self, path: &str, query: &QueryParams) -> Result<Url> {
        let relative = path.trim_start_matches('/');
        let mut url = self
            .base_url
            .join(relative)
            .map_err(|e| GatewayError::InvalidArgument(format!("bad resource path {path:?}: {e}")))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        Ok(url)
    }

    /// Fetch a collection resource, e.g. `/posts?_limit=1`
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_collection<T>(&self, path: &str, query: &QueryParams) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, query)?;
        let body = self.get(path, url).await?;

        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch a single record via `GET <path>?id=<id>`
    ///
    /// The upstream answers with a list, but a bare record is accepted too.
    /// Only a record whose `id` equals `id` counts; none is
    /// [`GatewayError::NotFound`].
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_by_id<T>(&self, path: &str, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let query = QueryParams::from([("id".to_string(), id.to_string())]);
        let url = self.endpoint(path, &query)?;
        let body = self.get(path, url).await?;

        let decode_error = |e: serde_json::Error| GatewayError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        };

        let candidates = match serde_json::from_slice::<Value>(&body).map_err(decode_error)? {
            Value::Array(records) => records,
            record @ Value::Object(_) => vec![record],
            other => {
                return Err(GatewayError::Decode {
                    path: path.to_string(),
                    message: format!("expected a record or a list of records, got {other}"),
                })
            }
        };

        let record = candidates
            .into_iter()
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id));

        match record {
            Some(record) => serde_json::from_value(record).map_err(decode_error),
            None => {
                debug!("no matching record in upstream response");
                Err(GatewayError::NotFound {
                    path: path.to_string(),
                    id: id.to_string(),
                })
            }
        }
    }

    async fn get(&self, path: &str, url: Url) -> Result<Vec<u8>> {
        debug!(%url, "GET");

        let response = self.http.get(url).send().await.map_err(|e| {
            warn!(error = %e, "upstream transport failure");
            GatewayError::Upstream {
                path: path.to_string(),
                status: None,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "upstream returned non-success status");
            return Err(GatewayError::Upstream {
                path: path.to_string(),
                status: Some(status.as_u16()),
                message: format!("HTTP {status}"),
            });
        }

        let body = response.bytes().await.map_err(|e| GatewayError::Upstream {
            path: path.to_string(),
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    async fn users_endpoint(body: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("id", "user0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn user(id: &str) -> Value {
        json!({ "id": id, "handle": format!("{id}-handle"), "firstName": "First", "lastName": "Last" })
    }

    fn client(base: &str) -> RestClient {
        RestClient::new(base.parse().unwrap())
    }

    #[test]
    fn test_endpoint_without_query_has_no_question_mark() {
        let url = client("http://localhost:3101")
            .endpoint("/posts", &QueryParams::new())
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3101/posts");
    }

    #[test]
    fn test_endpoint_orders_query_parameters() {
        let mut query = QueryParams::new();
        query.insert("_skip".to_string(), "10".to_string());
        query.insert("_limit".to_string(), "5".to_string());

        let url = client("http://localhost:3101").endpoint("/posts", &query).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3101/posts?_limit=5&_skip=10");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let url = client("http://example.com/api")
            .endpoint("/users", &QueryParams::from([("id".to_string(), "user 1".to_string())]))
            .unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/users?id=user+1");
    }

    #[tokio::test]
    async fn test_fetch_by_id_picks_the_matching_record() {
        let server = users_endpoint(json!([user("user7"), user("user0")])).await;

        let found: User = RestClient::new(server.uri().parse().unwrap())
            .fetch_by_id("/users", "user0")
            .await
            .unwrap();
        assert_eq!(found.id, "user0");
    }

    #[tokio::test]
    async fn test_fetch_by_id_rejects_a_record_with_another_id() {
        let server = users_endpoint(user("user7")).await;

        let result: Result<User> = RestClient::new(server.uri().parse().unwrap())
            .fetch_by_id("/users", "user0")
            .await;
        assert_eq!(
            result,
            Err(GatewayError::NotFound {
                path: "/users".to_string(),
                id: "user0".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_by_id_decode_error_names_the_missing_field() {
        let server = users_endpoint(json!([{ "id": "user0", "handle": "h", "firstName": "F" }])).await;

        let result: Result<User> = RestClient::new(server.uri().parse().unwrap())
            .fetch_by_id("/users", "user0")
            .await;
        match result {
            Err(GatewayError::Decode { path, message }) => {
                assert_eq!(path, "/users");
                assert!(message.contains("lastName"), "{message}");
            }
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_upstream_error_without_status() {
        // nothing listens on port 1
        let result: Result<Vec<Value>> = client("http://127.0.0.1:1")
            .fetch_collection("/posts", &QueryParams::new())
            .await;
        match result {
            Err(GatewayError::Upstream { path, status, .. }) => {
                assert_eq!(path, "/posts");
                assert_eq!(status, None);
            }
            other => panic!("expected an upstream error, got {other:?}"),
        }
    }
}
