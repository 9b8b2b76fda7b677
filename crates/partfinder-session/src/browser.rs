//! The user's real web browser as a [`BrowsingContextHost`].

use crate::dispatcher::{BrowsingContextHost, WindowHandle};

/// Opens tabs in the system's default browser.
///
/// Every tab is a fresh request to the browser with no handle back to this
/// process, so the opened page can never reach its opener. The window path
/// goes through `webbrowser`; the link fallback hands the URL to the OS
/// handler through `open`, which some setups honour when a direct browser
/// launch fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowsingContextHost for SystemBrowser {
    fn open_window(&self, url: &str, features: &str) -> Option<WindowHandle> {
        match webbrowser::open(url) {
            Ok(()) => Some(WindowHandle::live()),
            Err(e) => {
                tracing::warn!(url, features, error = %e, "browser launch failed");
                None
            }
        }
    }

    fn activate_link(&self, url: &str, rel: &str) -> bool {
        match open::that_detached(url) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(url, rel, error = %e, "OS link handler failed");
                false
            }
        }
    }
}
