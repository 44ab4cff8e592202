use std::env;
use std::sync::Arc;
use std::time::Duration;

use admin_types::ApiEnvelope;
use reqwest::{Client, Method, RequestBuilder, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;
use crate::notice::Notifier;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Hostnames allowed over plain http.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

const ERROR_FALLBACK: &str = "An error occurred";
const SUCCESS_FALLBACK: &str = "Operation completed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` for admin API access.
///
/// Every request carries JSON content headers, the configured bearer token and
/// a User-Agent. Mutating requests report their outcome through the
/// [`Notifier`].
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    http: Client,
    user_agent: String,
    notifier: Arc<Notifier>,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        validate_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = config.token.as_deref().filter(|token| !token.is_empty()) {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::InvalidToken)?;
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            user_agent: format!("admin-panel/0.1; {}", env::consts::OS),
            notifier: Arc::new(Notifier::new()),
        })
    }

    /// Share a notifier with other clients or the UI layer.
    pub fn with_notifier(mut self, notifier: Arc<Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Build a request for an API-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Send a JSON request and decode the response envelope.
    pub async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method.clone(), path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(method, builder).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.send_json::<T, Value>(Method::GET, path, query, None).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, &[], Some(body)).await
    }

    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, path, &[], Some(body)).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>, ApiError> {
        self.send_json::<T, Value>(Method::DELETE, path, &[], None).await
    }

    /// Send a prepared request and decode the response envelope.
    ///
    /// Non-GET requests raise a notice: success envelopes produce a success
    /// notice, failures (including transport errors) an error notice. Non-2xx
    /// statuses are returned as [`ApiError::Status`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        builder: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let notify = method != Method::GET;

        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(%method, error = %error, "request failed before a response arrived");
                if notify {
                    self.notifier.show_response(&ApiEnvelope::<Value>::default(), ERROR_FALLBACK);
                }
                return Err(ApiError::Network(error));
            }
        };

        let status = response.status();
        let text = response.text().await?;
        // A 2xx body must be an envelope; error bodies are best effort.
        let envelope: ApiEnvelope<Value> = if text.trim().is_empty() {
            ApiEnvelope::default()
        } else {
            match serde_json::from_str(&text) {
                Ok(envelope) => envelope,
                Err(error) if status.is_success() => return Err(ApiError::Decode(error)),
                Err(_) => ApiEnvelope::default(),
            }
        };

        if !status.is_success() {
            debug!(%method, status = status.as_u16(), "request rejected");
            if notify {
                self.notifier.show_response(&envelope, ERROR_FALLBACK);
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                envelope,
            });
        }

        if notify && envelope.is_success() {
            self.notifier.show_response(&envelope, SUCCESS_FALLBACK);
        }
        decode_data(envelope)
    }
}

fn decode_data<T: DeserializeOwned>(envelope: ApiEnvelope<Value>) -> Result<ApiEnvelope<T>, ApiError> {
    let data = envelope.data.map(serde_json::from_value::<T>).transpose()?;
    Ok(ApiEnvelope {
        status_code: envelope.status_code,
        success: envelope.success,
        message: envelope.message,
        data,
    })
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: http or https
/// - otherwise: https only
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| invalid("missing host".into()))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http"
            if LOCALHOST_DOMAINS
                .iter()
                .any(|allowed| host.eq_ignore_ascii_case(allowed)) =>
        {
            Ok(())
        }
        other => Err(invalid(format!("scheme '{other}' is not allowed for host '{host}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::Severity;
    use crate::notice::tests::RecordingSink;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> (AdminClient, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let client = AdminClient::new(ClientConfig {
            base_url: format!("{}/api/", server.uri()),
            timeout: Duration::from_secs(2),
            token: token.map(str::to_string),
        })
        .unwrap()
        .with_notifier(Arc::new(Notifier::with_sink(sink.clone())));
        (client, sink)
    }

    #[test]
    fn base_url_rules() {
        assert!(validate_base_url("http://localhost:7000/api").is_ok());
        assert!(validate_base_url("https://admin.example.com/api").is_ok());
        assert!(matches!(
            validate_base_url("http://admin.example.com/api"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(validate_base_url("not a url").is_err());
    }

    #[tokio::test]
    async fn get_sends_token_and_query_without_notice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/roles"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200,
                "message": "ok",
                "data": [{"role_code": "R1"}]
            })))
            .mount(&server)
            .await;

        let (client, sink) = client_for(&server, Some("secret-token"));
        let envelope: ApiEnvelope = client.get_json("/roles", &[("page", "2".into())]).await.unwrap();
        assert_eq!(envelope.data, Some(json!([{"role_code": "R1"}])));
        assert!(sink.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mutating_success_raises_success_notice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/roles"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "message": "Role created"
            })))
            .mount(&server)
            .await;

        let (client, sink) = client_for(&server, None);
        let _: ApiEnvelope = client.post_json("/roles", &json!({"name": "Ops"})).await.unwrap();
        let notices = sink.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Success);
        assert_eq!(notices[0].detail, "Role created");
    }

    #[tokio::test]
    async fn rejected_request_returns_status_and_error_notice() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/roles/R1"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "statusCode": 403,
                "message": ["forbidden", "missing permission"]
            })))
            .mount(&server)
            .await;

        let (client, sink) = client_for(&server, None);
        let error = client.delete_json::<Value>("/roles/R1").await.unwrap_err();
        assert_eq!(error.status(), Some(403));
        assert_eq!(error.to_string(), "HTTP 403: forbidden, missing permission");
        let notices = sink.notices.lock().unwrap();
        assert_eq!(notices[0].severity, Severity::Error);
        assert_eq!(notices[0].detail, "forbidden, missing permission");
    }

    #[tokio::test]
    async fn send_json_carries_query_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/users/U1"))
            .and(query_param("notify", "false"))
            .and(body_json(json!({"name": "Ada"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200,
                "data": {"user_code": "U1"}
            })))
            .mount(&server)
            .await;

        let (client, sink) = client_for(&server, None);
        let envelope: ApiEnvelope = client
            .send_json(Method::PATCH, "/users/U1", &[("notify", "false".into())], Some(&json!({"name": "Ada"})))
            .await
            .unwrap();
        assert_eq!(envelope.data, Some(json!({"user_code": "U1"})));
        assert_eq!(sink.notices.lock().unwrap()[0].detail, "Operation completed");
    }

    #[tokio::test]
    async fn success_with_non_envelope_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/roles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"role_code": "R1"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"statusCode": "200", "data": []})))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, None);
        let bare_array = client.get_json::<Value>("/roles", &[]).await;
        assert!(matches!(bare_array, Err(ApiError::Decode(_))));
        let string_status = client.get_json::<Value>("/users", &[]).await;
        assert!(matches!(string_status, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn rejected_request_with_unexpected_body_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/menu"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!(["gateway"])))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, None);
        let error = client.get_json::<Value>("/menu", &[]).await.unwrap_err();
        assert_eq!(error.status(), Some(502));
    }

    #[tokio::test]
    async fn success_with_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/menu"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, None);
        let result = client.get_json::<Value>("/menu", &[]).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
