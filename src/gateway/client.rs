//! reqwest-backed implementation of [`RemoteGateway`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue, RETRY_AFTER};
use reqwest::multipart::Form;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::RemoteGateway;
use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::credential::Credential;
use super::error::GatewayError;
use super::request::{RemoteRequest, RequestBody};
use super::retry_after::retry_after_secs;
use crate::config::GatewayConfig;
use crate::user_agent;

/// HTTP gateway to the remote item-tracking REST API.
///
/// Holds no per-caller state: the credential is passed to every
/// [`call`](RemoteGateway::call) and attached to that request only. The
/// underlying connection pool is shared by all calls on one instance, which
/// is not observable by callers.
///
/// # Example
///
/// ```no_run
/// use cbql_gateway::gateway::{Credential, HttpGateway, RemoteGateway, RemoteRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = HttpGateway::new("https://codebeamer.example.com/cb/api")?;
/// let credential = Credential::new("Bearer eyJ...");
/// let projects = gateway
///     .call(&credential, RemoteRequest::get("v3/projects"))
///     .await?;
/// println!("{projects}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Creates a gateway with default timeouts (30s connect, 5min read).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`GatewayError::ClientBuild`] if the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_timeouts(base_url, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a gateway from validated configuration.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::with_timeouts(
            &config.base_url,
            config.connect_timeout_secs,
            config.read_timeout_secs,
        )
    }

    /// Creates a gateway with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        base_url: &str,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_gateway_user_agent())
            .build()
            .map_err(|source| GatewayError::ClientBuild { source })?;
        Ok(Self { client, base_url })
    }

    /// Returns the normalized base URL (always ends in `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path and query parameters against the base URL.
    fn endpoint(&self, request: &RemoteRequest) -> Result<Url, GatewayError> {
        let relative = request.path.trim_start_matches('/');
        let mut url = self
            .base_url
            .join(relative)
            .map_err(|_| GatewayError::invalid_url(format!("{}{relative}", self.base_url)))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    #[instrument(skip(self, credential, request), fields(method = %request.method, path = %request.path))]
    async fn call(
        &self,
        credential: &Credential,
        request: RemoteRequest,
    ) -> Result<Value, GatewayError> {
        let url = self.endpoint(&request)?;
        let url_text = url.to_string();

        let mut auth = HeaderValue::from_bytes(credential.expose().as_bytes())
            .map_err(|_| GatewayError::InvalidCredential)?;
        auth.set_sensitive(true);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(AUTHORIZATION, auth);
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(fields) => {
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value));
                builder.multipart(form)
            }
        };

        debug!("sending remote request");
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::transport(&url_text, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let header = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok());
            let retry_after_secs = retry_after_secs(header);
            warn!(retry_after_secs, "remote service rate limited the request");
            return Err(GatewayError::rate_limited(retry_after_secs));
        }

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    debug!(%error, "failed to read error response body");
                    String::new()
                }
            };
            debug!(status = status.as_u16(), "remote service returned an error status");
            return Err(GatewayError::remote(status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transport(&url_text, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::decode(url_text, e.to_string()))
    }
}

/// Parses the base URL and guarantees a trailing `/` so relative joins keep
/// the full base path (`.../cb/api` + `v3/items` → `.../cb/api/v3/items`).
fn normalize_base_url(base_url: &str) -> Result<Url, GatewayError> {
    let trimmed = base_url.trim();
    let mut url = Url::parse(trimmed).map_err(|_| GatewayError::invalid_url(trimmed))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(GatewayError::invalid_url(trimmed));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn test_normalize_base_url_appends_slash() {
        let url = normalize_base_url("https://cb.example.com/cb/api").unwrap();
        assert_eq!(url.as_str(), "https://cb.example.com/cb/api/");
    }

    #[test]
    fn test_normalize_base_url_rejects_non_http() {
        assert!(matches!(
            normalize_base_url("ftp://cb.example.com"),
            Err(GatewayError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(GatewayError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_tolerates_leading_slash() {
        let gateway = HttpGateway::new("https://cb.example.com/cb/api").unwrap();
        let with_slash = gateway
            .endpoint(&RemoteRequest::get("/v3/items/query"))
            .unwrap();
        let without = gateway
            .endpoint(&RemoteRequest::get("v3/items/query"))
            .unwrap();
        assert_eq!(with_slash.as_str(), "https://cb.example.com/cb/api/v3/items/query");
        assert_eq!(with_slash, without);
    }

    #[test]
    fn test_endpoint_appends_query_params() {
        let gateway = HttpGateway::new("https://cb.example.com").unwrap();
        let url = gateway
            .endpoint(&RemoteRequest::put("v3/items/fields").query_param("atomic", "false"))
            .unwrap();
        assert_eq!(url.as_str(), "https://cb.example.com/v3/items/fields?atomic=false");
    }

    #[tokio::test]
    async fn test_call_forwards_credential_verbatim() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/projects"))
            .and(header("Authorization", "Bearer abc.def"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let gateway = HttpGateway::new(&mock_server.uri()).unwrap();
        let result = gateway
            .call(&Credential::new("Bearer abc.def"), RemoteRequest::get("v3/projects"))
            .await
            .unwrap();

        assert_eq!(result, json!([{"id": 1}]));
    }

    #[tokio::test]
    async fn test_call_sends_json_body_and_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v3/items/fields"))
            .and(query_param("atomic", "true"))
            .and(body_json(json!([{"itemId": 5}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let gateway = HttpGateway::new(&mock_server.uri()).unwrap();
        let request = RemoteRequest::put("v3/items/fields")
            .query_param("atomic", "true")
            .json(json!([{"itemId": 5}]));
        let result = gateway.call(&Credential::new("t"), request).await.unwrap();

        assert_eq!(result, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_call_empty_success_body_is_null() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v3/items/9"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let gateway = HttpGateway::new(&mock_server.uri()).unwrap();
        let result = gateway
            .call(&Credential::new("t"), RemoteRequest::delete("v3/items/9"))
            .await
            .unwrap();

        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_call_forwards_non_ascii_credential_bytes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let gateway = HttpGateway::new(&mock_server.uri()).unwrap();
        gateway
            .call(&Credential::new("Bearer tök€n"), RemoteRequest::get("v3/projects"))
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let auth = requests[0].headers.get("authorization").unwrap();
        assert_eq!(auth.as_bytes(), "Bearer tök€n".as_bytes());
    }

    #[tokio::test]
    async fn test_call_unreadable_error_body_keeps_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/projects"))
            .respond_with(
                ResponseTemplate::new(502)
                    .insert_header("content-encoding", "gzip")
                    .set_body_string("not gzip data"),
            )
            .mount(&mock_server)
            .await;

        let gateway = HttpGateway::new(&mock_server.uri()).unwrap();
        let result = gateway
            .call(&Credential::new("t"), RemoteRequest::get("v3/projects"))
            .await;

        match result {
            Err(GatewayError::Remote { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.is_empty());
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_call_rejects_header_unsafe_credential_before_io() {
        let gateway = HttpGateway::new("http://127.0.0.1:9").unwrap();
        let result = tokio_test::block_on(
            gateway.call(&Credential::new("bad\nvalue"), RemoteRequest::get("v3/projects")),
        );
        assert!(matches!(result, Err(GatewayError::InvalidCredential)));
    }
}
