//! Opening one vendor result in a new browsing context.
//!
//! The dispatcher never talks to a browser directly. It drives a
//! [`BrowsingContextHost`], which lets the real system browser and test
//! doubles share the same popup-blocker handling.

use partfinder_core::VendorResult;

/// Window features requested for every new tab. The new context gets no
/// reference to the opener and no referrer.
pub const WINDOW_FEATURES: &str = "noopener,noreferrer";

/// `rel` applied to the synthetic link used by the fallback path.
pub const LINK_REL: &str = "noopener noreferrer";

/// Liveness of a browsing context right after it was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle {
    /// `Some(true)` closed, `Some(false)` open, `None` indeterminate.
    closed: Option<bool>,
}

impl WindowHandle {
    #[must_use]
    pub fn live() -> Self {
        Self {
            closed: Some(false),
        }
    }

    #[must_use]
    pub fn closed() -> Self {
        Self { closed: Some(true) }
    }

    #[must_use]
    pub fn indeterminate() -> Self {
        Self { closed: None }
    }

    /// Only a handle that positively reports itself open counts as live.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.closed == Some(false)
    }
}

/// Something that can create browsing contexts.
pub trait BrowsingContextHost {
    /// Request a new browsing context for `url` with `features`.
    ///
    /// Returns `None` when the request was refused outright.
    fn open_window(&self, url: &str, features: &str) -> Option<WindowHandle>;

    /// Create a transient `target="_blank"` link with `rel`, activate it,
    /// and remove it. Returns whether a context was created.
    fn activate_link(&self, url: &str, rel: &str) -> bool;
}

impl<H: BrowsingContextHost + ?Sized> BrowsingContextHost for &H {
    fn open_window(&self, url: &str, features: &str) -> Option<WindowHandle> {
        (**self).open_window(url, features)
    }

    fn activate_link(&self, url: &str, rel: &str) -> bool {
        (**self).activate_link(url, rel)
    }
}

/// Opens URLs as new tabs, falling back to link activation when the
/// window request looks blocked.
///
/// Each call creates at most one browsing context and never retries.
#[derive(Debug, Clone)]
pub struct TabDispatcher<H> {
    host: H,
}

impl<H: BrowsingContextHost> TabDispatcher<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Open `url` in a new tab. Returns `true` if a context was created.
    ///
    /// A blank `url` is a no-op that reports failure.
    pub fn open_url(&self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            tracing::warn!("no URL provided; nothing to open");
            return false;
        }

        match self.host.open_window(url, WINDOW_FEATURES) {
            Some(handle) if handle.is_live() => {
                tracing::debug!(url, "opened new tab");
                true
            }
            blocked => {
                tracing::debug!(
                    url,
                    handle = ?blocked,
                    "window request looks blocked; falling back to link activation"
                );
                let opened = self.host.activate_link(url, LINK_REL);
                if !opened {
                    tracing::info!(url, "tab was blocked");
                }
                opened
            }
        }
    }

    /// Open one vendor result. Results that are not ready are refused
    /// without touching the host.
    pub fn open_result(&self, result: &VendorResult) -> bool {
        if !result.is_ready() {
            tracing::debug!(vendor = %result.vendor, "refusing to open pending result");
            return false;
        }
        self.open_url(&result.url)
    }
}
