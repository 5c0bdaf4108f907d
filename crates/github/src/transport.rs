//! reqwest-backed HTTP transport with retry.

use crate::config::ClientConfig;
use crate::error::{GithubError, GithubResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Issues HTTP requests on behalf of the API modules.
///
/// Every request carries the bearer token, GitHub's media type, and the
/// pinned API version. Retryable statuses and timeouts are replayed with
/// exponential backoff per [`crate::config::RetryConfig`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    pub fn new(config: Arc<ClientConfig>) -> GithubResult<Self> {
        let mut headers = header::HeaderMap::new();
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| {
                GithubError::Config("token contains characters not valid in a header".to_string())
            })?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            header::HeaderName::from_static("x-github-api-version"),
            header::HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GithubResult<T> {
        debug!(path, "GET");
        let url = self.url(path)?;
        self.send(self.client.get(url)).await
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> GithubResult<T> {
        debug!(path, "GET with query");
        let url = self.url(path)?;
        self.send(self.client.get(url).query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GithubResult<T> {
        debug!(path, "POST");
        let url = self.url(path)?;
        self.send(self.client.post(url).json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GithubResult<T> {
        debug!(path, "PUT");
        let url = self.url(path)?;
        self.send(self.client.put(url).json(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GithubResult<T> {
        debug!(path, "PATCH");
        let url = self.url(path)?;
        self.send(self.client.patch(url).json(body)).await
    }

    /// DELETE carrying a JSON body. The contents endpoint expects the commit
    /// message and blob sha in the payload.
    pub async fn delete_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GithubResult<T> {
        debug!(path, "DELETE");
        let url = self.url(path)?;
        self.send(self.client.delete(url).json(body)).await
    }

    fn url(&self, path: &str) -> GithubResult<url::Url> {
        Ok(self.config.base_url.join(path)?)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> GithubResult<T> {
        let response = self.execute(builder).await?;
        Ok(response.json().await?)
    }

    /// Send the request, replaying it on retryable failures until the policy
    /// runs out of attempts.
    async fn execute(&self, builder: RequestBuilder) -> GithubResult<Response> {
        let policy = &self.config.retry;
        let mut attempt = 0;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| GithubError::Config("request body cannot be replayed".to_string()))?;

            match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt < policy.max_retries && policy.retries_on(status) {
                        let delay = policy.backoff(attempt);
                        warn!(
                            status,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "request rejected, will retry"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    let retry_after = response
                        .headers()
                        .get(header::RETRY_AFTER)
                        .and_then(|value| value.to_str().ok())
                        .and_then(|value| value.parse().ok());
                    let body = response.text().await.unwrap_or_default();
                    return Err(GithubError::from_response(status, &body, retry_after));
                }
                Err(e) if attempt < policy.max_retries && e.is_timeout() => {
                    let delay = policy.backoff(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "request timed out, will retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Serialize, Deserialize)]
    struct Echo {
        message: String,
    }

    fn transport(server: &MockServer) -> HttpTransport {
        transport_with_retry(server, RetryConfig::no_retry())
    }

    fn transport_with_retry(server: &MockServer, retry: RetryConfig) -> HttpTransport {
        let config = Arc::new(ClientConfig {
            base_url: url::Url::parse(&server.uri()).unwrap(),
            token: "test-token".to_string(),
            user_agent: "hubcap-test".to_string(),
            timeout: Duration::from_secs(5),
            retry,
        });
        HttpTransport::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_required_headers_on_every_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", "application/vnd.github+json"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .and(header("User-Agent", "hubcap-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "authorized"
            })))
            .mount(&server)
            .await;

        let result: Echo = transport(&server).get("/user").await.unwrap();
        assert_eq!(result.message, "authorized");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_typed_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;

        let result: GithubResult<Echo> = transport(&server).get("/repos/acme/missing").await;
        match result {
            Err(GithubError::NotFound(message)) => assert_eq!(message, "Not Found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transient_status_is_replayed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "recovered"})),
            )
            .mount(&server)
            .await;

        let retry = RetryConfig {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            ..Default::default()
        };
        let result: Echo = transport_with_retry(&server, retry)
            .get("/flaky")
            .await
            .unwrap();
        assert_eq!(result.message, "recovered");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_replayed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bad"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"message": "Validation Failed"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let retry = RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            ..Default::default()
        };
        let result: GithubResult<Echo> = transport_with_retry(&server, retry).get("/bad").await;
        assert!(matches!(result, Err(GithubError::Api { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/acme/widgets/git/blobs"))
            .and(body_partial_json(serde_json::json!({"message": "blob"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"message": "created"})),
            )
            .mount(&server)
            .await;

        let body = Echo {
            message: "blob".to_string(),
        };
        let result: Echo = transport(&server)
            .post("/repos/acme/widgets/git/blobs", &body)
            .await
            .unwrap();
        assert_eq!(result.message, "created");
    }

    #[tokio::test]
    async fn test_patch_request() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/repos/acme/widgets/git/refs/heads/main"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "moved"})),
            )
            .mount(&server)
            .await;

        let body = Echo {
            message: "ref".to_string(),
        };
        let result: Echo = transport(&server)
            .patch("/repos/acme/widgets/git/refs/heads/main", &body)
            .await
            .unwrap();
        assert_eq!(result.message, "moved");
    }

    #[tokio::test]
    async fn test_delete_carries_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/repos/acme/widgets/contents/old.txt"))
            .and(body_partial_json(serde_json::json!({"message": "drop old"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "deleted"})),
            )
            .mount(&server)
            .await;

        let body = Echo {
            message: "drop old".to_string(),
        };
        let result: Echo = transport(&server)
            .delete_json("/repos/acme/widgets/contents/old.txt", &body)
            .await
            .unwrap();
        assert_eq!(result.message, "deleted");
    }
}
