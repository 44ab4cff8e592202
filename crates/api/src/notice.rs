//! User-facing notices (toasts) raised from API responses.
//!
//! A [`Notifier`] forwards notices to an installed [`NoticeSink`]. Automatic
//! response notices can be switched off, for example while a screen performs
//! a batch of writes and reports the outcome itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use admin_types::ApiEnvelope;
use tracing::{info, warn};

const DEFAULT_LIFE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub life: Duration,
}

impl Notice {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
            life: DEFAULT_LIFE,
        }
    }

    /// Success or error notice describing an API response.
    pub fn for_response<T>(envelope: &ApiEnvelope<T>, fallback: &str) -> Self {
        let detail = envelope.message_text().unwrap_or_else(|| fallback.to_string());
        if envelope.is_success() {
            Self::new(Severity::Success, "Success", detail)
        } else {
            Self::new(Severity::Error, "Error", detail)
        }
    }
}

/// Destination for notices, typically the UI toast area.
pub trait NoticeSink: Send + Sync {
    fn show(&self, notice: Notice);
}

/// Sink that writes notices to the log. Used by headless front ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn show(&self, notice: Notice) {
        match notice.severity {
            Severity::Error | Severity::Warn => warn!(summary = %notice.summary, detail = %notice.detail, "notice"),
            Severity::Success | Severity::Info => info!(summary = %notice.summary, detail = %notice.detail, "notice"),
        }
    }
}

pub struct Notifier {
    sink: RwLock<Option<Arc<dyn NoticeSink>>>,
    auto_enabled: AtomicBool,
}

impl Default for Notifier {
    fn default() -> Self {
        Self {
            sink: RwLock::new(None),
            auto_enabled: AtomicBool::new(true),
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("has_sink", &self.sink().is_some())
            .field("auto_enabled", &self.auto_enabled())
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Arc<dyn NoticeSink>) -> Self {
        let notifier = Self::default();
        notifier.set_sink(sink);
        notifier
    }

    pub fn set_sink(&self, sink: Arc<dyn NoticeSink>) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    /// Enable or disable automatic response notices. Manual notices are unaffected.
    pub fn set_auto(&self, enabled: bool) {
        self.auto_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn auto_enabled(&self) -> bool {
        self.auto_enabled.load(Ordering::Relaxed)
    }

    fn sink(&self) -> Option<Arc<dyn NoticeSink>> {
        self.sink.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Deliver a notice; without a sink the notice is logged instead.
    pub fn show(&self, notice: Notice) {
        match self.sink() {
            Some(sink) => sink.show(notice),
            None => info!(summary = %notice.summary, detail = %notice.detail, "notice without sink"),
        }
    }

    /// Automatic notice for an API response. Skipped without a sink or when auto notices are off.
    pub fn show_response<T>(&self, envelope: &ApiEnvelope<T>, fallback: &str) {
        if !self.auto_enabled() {
            return;
        }
        if let Some(sink) = self.sink() {
            sink.show(Notice::for_response(envelope, fallback));
        }
    }

    /// Explicit notice for an API response, regardless of the auto toggle.
    pub fn show_manual<T>(&self, envelope: &ApiEnvelope<T>, fallback: &str) {
        if let Some(sink) = self.sink() {
            sink.show(Notice::for_response(envelope, fallback));
        }
    }
}
