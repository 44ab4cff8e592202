use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard response wrapper returned by every admin API endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T = Value> {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<ApiMessage>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Default for ApiEnvelope<T> {
    fn default() -> Self {
        Self {
            status_code: None,
            success: None,
            message: None,
            data: None,
        }
    }
}

impl<T> ApiEnvelope<T> {
    /// A response counts as successful when it reports status 200 or `success: true`.
    pub fn is_success(&self) -> bool {
        self.status_code == Some(200) || self.success == Some(true)
    }

    /// The message text, with list messages joined by `", "`.
    pub fn message_text(&self) -> Option<String> {
        self.message.as_ref().map(ApiMessage::joined)
    }
}

/// Servers send either a single message or a list of validation messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    Text(String),
    Lines(Vec<String>),
}

impl ApiMessage {
    pub fn joined(&self) -> String {
        match self {
            ApiMessage::Text(text) => text.clone(),
            ApiMessage::Lines(lines) => lines.join(", "),
        }
    }
}

/// Public site metadata served by `/web-settings/info-site`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub site_logo: Option<String>,
    #[serde(default)]
    pub img_login: Option<String>,
    #[serde(default)]
    pub site_description: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
