//! HTTP transport layer for the Semaphore SDK.

use crate::config::ClientConfig;
use crate::error::{SemaphoreError, SemaphoreResult};
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> SemaphoreResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref token) = config.api_token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| SemaphoreError::Config("Invalid API token format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("semaphore-mcp/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(SemaphoreError::Http)?;

        Ok(Self { client, config })
    }

    /// Configuration this transport was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a URL for the given path, keeping any path prefix on the base URL.
    fn build_url(&self, path: &str) -> SemaphoreResult<url::Url> {
        let mut base = self.config.base_url.clone();
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and return the body text of a successful response.
    ///
    /// Non-2xx responses are turned into typed errors carrying status and body.
    async fn execute(&self, request_builder: RequestBuilder) -> SemaphoreResult<String> {
        let response = request_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        warn!(status = status.as_u16(), "Semaphore API returned an error");
        Err(SemaphoreError::from_response(status.as_u16(), &body))
    }

    /// Parse a response body; empty bodies (204) parse as JSON `null`.
    fn parse<T: DeserializeOwned>(body: &str) -> SemaphoreResult<T> {
        if body.trim().is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SemaphoreResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        let body = self.execute(self.client.get(url)).await?;
        Self::parse(&body)
    }

    /// Execute a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> SemaphoreResult<String> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request (text)");

        self.execute(
            self.client
                .get(url)
                .header(header::ACCEPT, "text/plain, */*"),
        )
        .await
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SemaphoreResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let body = self.execute(self.client.post(url).json(body)).await?;
        Self::parse(&body)
    }

    /// Execute a POST request without a response body.
    pub async fn post_no_response<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SemaphoreResult<()> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request (no response)");

        self.execute(self.client.post(url).json(body)).await?;
        Ok(())
    }

    /// Execute a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SemaphoreResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "PUT request");

        let body = self.execute(self.client.put(url).json(body)).await?;
        Self::parse(&body)
    }

    /// Execute a DELETE request without a response body.
    pub async fn delete_no_response(&self, path: &str) -> SemaphoreResult<()> {
        let url = self.build_url(path)?;
        debug!(url = %url, "DELETE request (no response)");

        self.execute(self.client.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
        value: i32,
    }

    #[derive(Debug, Serialize)]
    struct TestRequest {
        name: String,
    }

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            base_url: url::Url::parse(base_url).unwrap(),
            api_token: None,
            timeout: Duration::from_secs(30),
        })
    }

    fn create_config_with_auth(base_url: &str, token: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            base_url: url::Url::parse(base_url).unwrap(),
            api_token: Some(token.to_string()),
            timeout: Duration::from_secs(30),
        })
    }

    #[tokio::test]
    async fn test_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "success".to_string(),
                value: 42,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: TestResponse = transport.get("/api/test").await.unwrap();
        assert_eq!(result.message, "success");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_post_request_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/projects"))
            .and(body_json(serde_json::json!({"name": "test"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(TestResponse {
                message: "created".to_string(),
                value: 1,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let request = TestRequest {
            name: "test".to_string(),
        };
        let result: TestResponse = transport.post("/api/projects", &request).await.unwrap();
        assert_eq!(result.message, "created");
    }

    #[tokio::test]
    async fn test_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "authorized".to_string(),
                value: 100,
            }))
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new(create_config_with_auth(&server.uri(), "test-token")).unwrap();

        let result: TestResponse = transport.get("/api/user").await.unwrap();
        assert_eq!(result.message, "authorized");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new(create_config_with_auth(&server.uri(), "bad-token")).unwrap();

        let result: SemaphoreResult<Value> = transport.get("/api/projects").await;
        match result {
            Err(SemaphoreError::Authentication { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("Expected Authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_on_400() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/bad"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "Bad Request"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: SemaphoreResult<Value> = transport.post("/api/bad", &()).await;
        match result {
            Err(SemaphoreError::Validation { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_on_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/project/99"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: SemaphoreResult<Value> = transport.get("/api/project/99").await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_empty_body_parses_as_null() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/project/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: Value = transport
            .put("/api/project/1", &serde_json::json!({"id": 1}))
            .await
            .unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn test_delete_request() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/project/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        transport.delete_no_response("/api/project/3").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_text_returns_body_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/project/1/tasks/7/raw_output"))
            .respond_with(ResponseTemplate::new(200).set_body_string("line one\nline two\n"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let text = transport
            .get_text("/api/project/1/tasks/7/raw_output")
            .await
            .unwrap();
        assert_eq!(text, "line one\nline two\n");
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_connectivity_error() {
        // Port 9 (discard) is not expected to be listening locally.
        let transport = HttpTransport::new(create_config("http://127.0.0.1:9")).unwrap();

        let result: SemaphoreResult<Value> = transport.get("/api/ping").await;
        assert!(result.unwrap_err().is_connectivity());
    }

    #[tokio::test]
    async fn test_build_url() {
        let transport = HttpTransport::new(create_config("http://localhost:3000")).unwrap();

        let url = transport.build_url("/api/projects").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/projects");
    }

    #[tokio::test]
    async fn test_build_url_keeps_path_prefix() {
        let transport =
            HttpTransport::new(create_config("https://ops.example.com/semaphore")).unwrap();

        let url = transport.build_url("/api/projects").unwrap();
        assert_eq!(url.as_str(), "https://ops.example.com/semaphore/api/projects");
    }
}
