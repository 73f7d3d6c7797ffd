//! HTTP post source.

use std::time::Duration;

use async_trait::async_trait;
use feedkit_core::{Comment, FetchResult, Post, PostId, PostSource, User, UserId};
use reqwest::{Client, Response};
use tracing::{debug, instrument, warn};

use crate::{
    config::{ClientConfig, RetryConfig},
    error::{SourceError, SourceResult},
};

/// Remote post source backed by `reqwest`.
#[derive(Debug)]
pub struct HttpPostSource {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl HttpPostSource {
    /// Create a post source with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> SourceResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a post source from explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: ClientConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SourceError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url,
            retry: config.retry,
        })
    }

    /// Set a custom base URL (for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Make a GET request, retrying transient failures with backoff.
    #[instrument(skip(self))]
    async fn get<R>(&self, endpoint: &str) -> SourceResult<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let mut delay = Duration::from_millis(self.retry.initial_delay_ms);
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, endpoint, "requesting remote feed");

            let result = self.client.get(&url).send().await;

            match result {
                Ok(response) => match handle_response(response).await {
                    Ok(data) => return Ok(data),
                    Err(e) if e.is_retryable() && attempts < self.retry.max_attempts => {
                        warn!(
                            attempt = attempts,
                            delay_ms = delay.as_millis(),
                            error = %e,
                            "retrying feed request"
                        );
                        tokio::time::sleep(delay).await;
                        delay =
                            std::cmp::min(delay * 2, Duration::from_millis(self.retry.max_delay_ms));
                    }
                    Err(e) => return Err(e),
                },
                Err(e) if (e.is_timeout() || e.is_connect()) && attempts < self.retry.max_attempts => {
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "retrying after connection error"
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, Duration::from_millis(self.retry.max_delay_ms));
                }
                Err(e) => return Err(SourceError::Http(e)),
            }
        }
    }
}

/// Decode a response body, distinguishing empty bodies from other failures.
async fn handle_response<R>(response: Response) -> SourceResult<R>
where
    R: serde::de::DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(SourceError::Status {
            code: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    if bytes.is_empty() {
        return Err(SourceError::EmptyBody);
    }

    serde_json::from_slice(&bytes).map_err(SourceError::from)
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch_posts(&self) -> FetchResult<Vec<Post>> {
        self.get("/posts").await.map_err(|e| e.to_fetch_error())
    }

    async fn fetch_user(&self, user_id: UserId) -> FetchResult<User> {
        self.get(&format!("/users/{user_id}"))
            .await
            .map_err(|e| e.to_fetch_error())
    }

    async fn fetch_comments(&self, post_id: PostId) -> FetchResult<Vec<Comment>> {
        self.get(&format!("/posts/{post_id}/comments"))
            .await
            .map_err(|e| e.to_fetch_error())
    }
}

#[cfg(test)]
mod tests {
    use feedkit_core::FetchError;
    use feedkit_testkit::{comments_body, init_test_tracing, posts_body, user_body};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn quick_retry() -> ClientConfig {
        ClientConfig {
            retry: RetryConfig {
                max_attempts: 1,
                initial_delay_ms: 10,
                max_delay_ms: 100,
            },
            ..ClientConfig::default()
        }
    }

    fn source_for(server: &MockServer, config: ClientConfig) -> HttpPostSource {
        HttpPostSource::with_config(config)
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn fetch_posts_preserves_remote_order() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts_body(&[3, 1, 2])))
            .mount(&server)
            .await;

        let source = source_for(&server, quick_retry());
        let posts = source.fetch_posts().await.unwrap();

        let ids: Vec<_> = posts.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn fetch_user_hits_user_endpoint() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_body(7)))
            .mount(&server)
            .await;

        let source = source_for(&server, quick_retry());
        let user = source.fetch_user(UserId(7)).await.unwrap();
        assert_eq!(user.id, UserId(7));
    }

    #[tokio::test]
    async fn fetch_comments_hits_comments_endpoint() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts/4/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(comments_body(4, 2)))
            .mount(&server)
            .await;

        let source = source_for(&server, quick_retry());
        let comments = source.fetch_comments(PostId(4)).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.post_id == PostId(4)));
    }

    #[tokio::test]
    async fn empty_body_classifies_as_empty_response() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let source = source_for(&server, quick_retry());
        let err = source.fetch_posts().await.unwrap_err();
        assert_eq!(err, FetchError::EmptyResponse);
    }

    #[tokio::test]
    async fn undecodable_body_classifies_as_empty_response() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let source = source_for(&server, quick_retry());
        let err = source.fetch_posts().await.unwrap_err();
        assert_eq!(err, FetchError::EmptyResponse);
    }

    #[tokio::test]
    async fn server_error_classifies_as_other() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = source_for(&server, quick_retry());
        let err = source.fetch_posts().await.unwrap_err();
        assert_eq!(err, FetchError::other("HTTP status 500"));
    }

    #[tokio::test]
    async fn connection_refused_classifies_as_no_connectivity() {
        init_test_tracing();

        let source = HttpPostSource::with_config(quick_retry())
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let err = source.fetch_posts().await.unwrap_err();
        assert_eq!(err, FetchError::NoConnectivity);
    }

    #[tokio::test]
    async fn transient_server_error_is_retried() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts_body(&[1])))
            .mount(&server)
            .await;

        let config = ClientConfig {
            retry: RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 10,
                max_delay_ms: 50,
            },
            ..ClientConfig::default()
        };

        let source = source_for(&server, config);
        let posts = source.fetch_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        init_test_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            retry: RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 10,
                max_delay_ms: 50,
            },
            ..ClientConfig::default()
        };

        let source = source_for(&server, config);
        let err = source.fetch_posts().await.unwrap_err();
        assert_eq!(err, FetchError::other("HTTP status 404"));
    }
}
