use admin_api::{ApiError, AuthService};
use admin_types::PermissionGrant;

/// Supplier of the current user's menu grant.
#[async_trait::async_trait]
pub trait PermissionSource: Send + Sync {
    async fn fetch_grant(&self) -> Result<PermissionGrant, PermissionSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PermissionSourceError {
    #[error("permission source unavailable: {0}")]
    Unavailable(#[from] ApiError),

    #[error("malformed permission response: {reason}")]
    Malformed { reason: String },
}

/// Reads the grant from the `menus` field of the `/auth/me` profile.
#[derive(Debug, Clone)]
pub struct ApiPermissionSource {
    auth: AuthService,
}

impl ApiPermissionSource {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

#[async_trait::async_trait]
impl PermissionSource for ApiPermissionSource {
    async fn fetch_grant(&self) -> Result<PermissionGrant, PermissionSourceError> {
        let envelope = self.auth.me().await?;
        let data = envelope.data.ok_or_else(|| PermissionSourceError::Malformed {
            reason: "profile response has no data".into(),
        })?;
        serde_json::from_value(data).map_err(|error| PermissionSourceError::Malformed {
            reason: error.to_string(),
        })
    }
}
