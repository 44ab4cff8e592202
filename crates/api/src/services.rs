//! Endpoint wrappers over [`AdminClient`].
//!
//! These are direct pass-throughs: they pick the path, shape the body, and
//! hand back the decoded envelope without further interpretation.

use std::sync::Arc;

use admin_types::{ApiEnvelope, SiteInfo};
use reqwest::Method;
use serde_json::{Value, json};

use crate::client::AdminClient;
use crate::error::ApiError;

/// Authentication and profile endpoints.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<AdminClient>,
}

impl AuthService {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<ApiEnvelope, ApiError> {
        self.client
            .post_json("/auth/login", &json!({ "email": email, "password": password }))
            .await
    }

    /// Current user profile, including the granted `menus`.
    pub async fn me(&self) -> Result<ApiEnvelope, ApiError> {
        self.client.get_json("/auth/me", &[]).await
    }

    pub async fn update_profile(&self, payload: &Value) -> Result<ApiEnvelope, ApiError> {
        self.client.patch_json("/users", payload).await
    }

    /// Log out, optionally with an explicit token instead of the configured one.
    pub async fn logout(&self, token: Option<&str>) -> Result<ApiEnvelope, ApiError> {
        let mut builder = self.client.request(Method::POST, "/auth/logout").json(&json!({}));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        self.client.execute(Method::POST, builder).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<ApiEnvelope, ApiError> {
        self.client.post_json("/auth/forgot-password", &json!({ "email": email })).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<ApiEnvelope, ApiError> {
        self.client
            .post_json(
                "/auth/reset-password",
                &json!({ "token": token, "newPassword": new_password }),
            )
            .await
    }
}

/// REST collections exposed by the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Menus,
    SubMenus,
    Roles,
    Permissions,
    RolePermissions,
    Users,
    Positions,
    UserPositions,
    Templates,
    TemplateEvents,
    MailConfig,
    Loggings,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Menus,
        Resource::SubMenus,
        Resource::Roles,
        Resource::Permissions,
        Resource::RolePermissions,
        Resource::Users,
        Resource::Positions,
        Resource::UserPositions,
        Resource::Templates,
        Resource::TemplateEvents,
        Resource::MailConfig,
        Resource::Loggings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Resource::Menus => "/menu",
            Resource::SubMenus => "/subMenus",
            Resource::Roles => "/roles",
            Resource::Permissions => "/permissions",
            Resource::RolePermissions => "/rolePermission",
            Resource::Users => "/users",
            Resource::Positions => "/position",
            Resource::UserPositions => "/user-position",
            Resource::Templates => "/template",
            Resource::TemplateEvents => "/template-event",
            Resource::MailConfig => "/mail-config",
            Resource::Loggings => "/loggings",
        }
    }

    /// Look a resource up by its endpoint name, with or without the leading slash.
    pub fn from_name(name: &str) -> Option<Resource> {
        let name = name.trim_start_matches('/');
        Resource::ALL
            .into_iter()
            .find(|resource| resource.path()[1..].eq_ignore_ascii_case(name))
    }
}

/// Paging parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
        }
    }
}

impl ListQuery {
    /// Query pairs; an empty search term is omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = self.search.as_deref().filter(|search| !search.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// CRUD calls for one [`Resource`].
#[derive(Debug, Clone)]
pub struct ResourceService {
    client: Arc<AdminClient>,
    resource: Resource,
}

impl ResourceService {
    pub fn new(client: Arc<AdminClient>, resource: Resource) -> Self {
        Self { client, resource }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    fn item_path(&self, code: &str) -> String {
        format!("{}/{}", self.resource.path(), code)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ApiEnvelope, ApiError> {
        self.client.get_json(self.resource.path(), &query.to_pairs()).await
    }

    pub async fn get(&self, code: &str) -> Result<ApiEnvelope, ApiError> {
        self.client.get_json(&self.item_path(code), &[]).await
    }

    pub async fn create(&self, body: &Value) -> Result<ApiEnvelope, ApiError> {
        self.client.post_json(self.resource.path(), body).await
    }

    pub async fn update(&self, code: &str, body: &Value) -> Result<ApiEnvelope, ApiError> {
        self.client.patch_json(&self.item_path(code), body).await
    }

    pub async fn delete(&self, code: &str) -> Result<ApiEnvelope, ApiError> {
        self.client.delete_json(&self.item_path(code)).await
    }
}

/// Public site metadata.
#[derive(Debug, Clone)]
pub struct SiteInfoService {
    client: Arc<AdminClient>,
}

impl SiteInfoService {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub async fn get(&self) -> Result<ApiEnvelope<SiteInfo>, ApiError> {
        self.client.get_json("/web-settings/info-site", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> Arc<AdminClient> {
        Arc::new(
            AdminClient::new(ClientConfig {
                base_url: format!("{}/api", server.uri()),
                timeout: Duration::from_secs(2),
                token: Some("configured".into()),
            })
            .unwrap(),
        )
    }

    #[test]
    fn list_query_omits_empty_search() {
        let mut query = ListQuery::default();
        assert_eq!(query.to_pairs(), vec![("page", "1".to_string()), ("limit", "10".to_string())]);
        query.search = Some(String::new());
        assert_eq!(query.to_pairs().len(), 2);
        query.search = Some("ops".into());
        assert_eq!(query.to_pairs()[2], ("search", "ops".to_string()));
    }

    #[test]
    fn resources_resolve_by_endpoint_name() {
        assert_eq!(Resource::from_name("roles"), Some(Resource::Roles));
        assert_eq!(Resource::from_name("/subMenus"), Some(Resource::SubMenus));
        assert_eq!(Resource::from_name("submenus"), Some(Resource::SubMenus));
        assert_eq!(Resource::from_name("user-position"), Some(Resource::UserPositions));
        assert_eq!(Resource::from_name("widgets"), None);
        assert!(Resource::ALL.iter().all(|resource| Resource::from_name(resource.path()) == Some(*resource)));
    }

    #[tokio::test]
    async fn list_and_update_hit_resource_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/subMenus"))
            .and(query_param("limit", "10"))
            .and(query_param_is_missing("search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"statusCode": 200, "data": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/subMenus/S01"))
            .and(body_json(json!({"name": "Menus", "status": "active"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"statusCode": 200})))
            .expect(1)
            .mount(&server)
            .await;

        let service = ResourceService::new(client(&server).await, Resource::SubMenus);
        service.list(&ListQuery::default()).await.unwrap();
        service
            .update("S01", &json!({"name": "Menus", "status": "active"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn logout_prefers_explicit_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .and(header("authorization", "Bearer explicit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"statusCode": 200})))
            .expect(1)
            .mount(&server)
            .await;

        AuthService::new(client(&server).await).logout(Some("explicit")).await.unwrap();
    }

    #[tokio::test]
    async fn site_info_decodes_typed_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/web-settings/info-site"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200,
                "data": {"site_name": "Back Office", "favicon": "/uploads/icon.png"}
            })))
            .mount(&server)
            .await;

        let envelope = SiteInfoService::new(client(&server).await).get().await.unwrap();
        let info = envelope.data.unwrap();
        assert_eq!(info.site_name.as_deref(), Some("Back Office"));
        assert!(info.phone.is_none());
    }
}
