//! Shared type definitions for the admin panel crates.
//!
//! The navigation core, the API client and the CLI all exchange these
//! values. Everything here is plain data with serde support; behavior lives
//! in the crates that own it.

pub mod envelope;
pub mod grant;
pub mod menu;

pub use envelope::{ApiEnvelope, ApiMessage, SiteInfo};
pub use grant::{GrantedMenu, GrantedSubMenu, PermissionGrant};
pub use menu::{BreadcrumbEntry, MenuKey, MenuNode};
