use admin_types::MenuKey;
use tracing::debug;

/// Layout state that highlights and expands the active menu entry.
///
/// Implementations must be idempotent; the navigation core never reads the
/// state back.
pub trait ActiveStatePublisher: Send + Sync {
    fn set_active_key(&self, key: &MenuKey);
}

/// Publisher for headless use that only logs the key.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPublisher;

impl ActiveStatePublisher for TracingPublisher {
    fn set_active_key(&self, key: &MenuKey) {
        debug!(%key, "active menu key");
    }
}
