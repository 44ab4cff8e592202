//! Cached site metadata shared by the login screen and the layout shell.

use std::sync::{PoisonError, RwLock};

use admin_types::SiteInfo;
use tracing::{error, warn};

use crate::services::SiteInfoService;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteInfoState {
    pub site_info: Option<SiteInfo>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct SiteInfoStore {
    state: RwLock<SiteInfoState>,
}

impl SiteInfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SiteInfoState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update(&self, apply: impl FnOnce(&mut SiteInfoState)) {
        apply(&mut self.state.write().unwrap_or_else(PoisonError::into_inner));
    }

    /// Fetch site info. Only a `statusCode` of 200 replaces the cached value;
    /// anything else is recorded in `error`.
    pub async fn fetch(&self, service: &SiteInfoService) {
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });

        let outcome = service.get().await;
        self.update(|state| {
            match outcome {
                Ok(envelope) if envelope.status_code == Some(200) => {
                    state.site_info = envelope.data;
                }
                Ok(envelope) => {
                    warn!(status = ?envelope.status_code, "site info request did not succeed");
                    state.error = Some("Failed to fetch site info".to_string());
                }
                Err(err) => {
                    error!(error = %err, "error fetching site info");
                    state.error = Some(err.to_string());
                }
            }
            state.loading = false;
        });
    }

    fn field(&self, pick: impl FnOnce(&SiteInfo) -> Option<&String>) -> Option<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.site_info.as_ref().and_then(pick).cloned()
    }

    pub fn site_name(&self) -> Option<String> {
        self.field(|info| info.site_name.as_ref())
    }

    pub fn favicon(&self) -> Option<String> {
        self.field(|info| info.favicon.as_ref())
    }

    pub fn site_logo(&self) -> Option<String> {
        self.field(|info| info.site_logo.as_ref())
    }

    pub fn login_image(&self) -> Option<String> {
        self.field(|info| info.img_login.as_ref())
    }

    pub fn site_description(&self) -> String {
        self.field(|info| info.site_description.as_ref()).unwrap_or_default()
    }

    pub fn contact_email(&self) -> String {
        self.field(|info| info.contact_email.as_ref()).unwrap_or_default()
    }

    pub fn phone(&self) -> String {
        self.field(|info| info.phone.as_ref()).unwrap_or_default()
    }

    pub fn address(&self) -> String {
        self.field(|info| info.address.as_ref()).unwrap_or_default()
    }
}

/// Absolute URL for an uploaded asset. Paths already starting with `http` pass through.
pub fn full_asset_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{base_url}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AdminClient, ClientConfig};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service_replying(template: ResponseTemplate) -> (MockServer, SiteInfoService) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web-settings/info-site"))
            .respond_with(template)
            .mount(&server)
            .await;
        let client = AdminClient::new(ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        })
        .unwrap();
        (server, SiteInfoService::new(Arc::new(client)))
    }

    #[test]
    fn asset_urls() {
        assert_eq!(full_asset_url("http://localhost:7000/api", "/uploads/logo.png"), "http://localhost:7000/api/uploads/logo.png");
        assert_eq!(full_asset_url("http://localhost:7000/api", "https://cdn.example.com/logo.png"), "https://cdn.example.com/logo.png");
    }

    #[tokio::test]
    async fn fetch_stores_data_on_status_200() {
        let (_server, service) = service_replying(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "data": {"site_name": "Back Office", "phone": "+62 21 555"}
        })))
        .await;

        let store = SiteInfoStore::new();
        store.fetch(&service).await;
        let state = store.snapshot();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(store.site_name().as_deref(), Some("Back Office"));
        assert_eq!(store.phone(), "+62 21 555");
        assert_eq!(store.address(), "");
        assert!(store.site_logo().is_none());
    }

    #[tokio::test]
    async fn fetch_records_error_without_status_200() {
        let (_server, service) =
            service_replying(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {}}))).await;

        let store = SiteInfoStore::new();
        store.fetch(&service).await;
        let state = store.snapshot();
        assert_eq!(state.error.as_deref(), Some("Failed to fetch site info"));
        assert!(state.site_info.is_none());
    }
}
