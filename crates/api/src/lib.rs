//! Admin API client utilities.
//!
//! This crate provides a lightweight client for the remote admin API and the
//! thin service wrappers built on it. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults (JSON, timeout, bearer token)
//! - Validating the configured base URL
//! - Decoding the standard `{ statusCode, success, message, data }` envelope
//! - Raising success/error notices for mutating requests
//!
//! The primary entry point is [`AdminClient`]. Services such as
//! [`AuthService`] and [`ResourceService`] wrap it per endpoint family.
//!
//! # Example
//!
//! ```ignore
//! use admin_api::{AdminClient, ClientConfig, Resource, ResourceService, ListQuery};
//! use std::sync::Arc;
//!
//! async fn roles() -> Result<(), admin_api::ApiError> {
//!     let client = Arc::new(AdminClient::new(ClientConfig::default())?);
//!     let roles = ResourceService::new(client, Resource::Roles);
//!     let page = roles.list(&ListQuery::default()).await?;
//!     println!("{:?}", page.data);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
pub mod notice;
pub mod services;
pub mod site_info;

pub use client::{AdminClient, ClientConfig};
pub use error::ApiError;
pub use notice::{Notice, NoticeSink, Notifier, Severity, TracingSink};
pub use services::{AuthService, ListQuery, Resource, ResourceService, SiteInfoService};
pub use site_info::{SiteInfoState, SiteInfoStore, full_asset_url};
