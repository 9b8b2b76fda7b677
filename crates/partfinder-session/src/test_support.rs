//! Test doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use partfinder_client::ClientError;
use partfinder_core::{ResultStatus, SearchResponse, VendorResult};
use tokio::sync::oneshot;

use crate::dispatcher::{BrowsingContextHost, WindowHandle};
use crate::orchestrator::SearchBackend;

pub(crate) fn ready(vendor: &str, url: &str) -> VendorResult {
    VendorResult {
        vendor: vendor.to_string(),
        url: url.to_string(),
        status: ResultStatus::Ready,
        method: "instant".to_string(),
        pricing: None,
        eta: None,
        logo_url: None,
    }
}

pub(crate) fn pending(vendor: &str, url: &str) -> VendorResult {
    VendorResult {
        status: ResultStatus::Pending,
        method: "scraping".to_string(),
        ..ready(vendor, url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowOutcome {
    Live,
    Closed,
    Indeterminate,
    Refused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostCall {
    Window { url: String, features: String },
    Link { url: String, rel: String },
}

/// Host that answers window requests from a script (then `Live` once the
/// script runs out) and records every call.
pub(crate) struct ScriptedHost {
    script: Mutex<VecDeque<WindowOutcome>>,
    links_blocked: bool,
    calls: Mutex<Vec<HostCall>>,
}

impl ScriptedHost {
    pub(crate) fn new(script: Vec<WindowOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            links_blocked: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every window request is refused and every link activation fails.
    pub(crate) fn blocking_everything() -> Self {
        Self::new(Vec::new()).with_all_windows_refused().with_links_blocked()
    }

    pub(crate) fn with_links_blocked(mut self) -> Self {
        self.links_blocked = true;
        self
    }

    fn with_all_windows_refused(self) -> Self {
        self.script
            .lock()
            .unwrap()
            .extend(std::iter::repeat_n(WindowOutcome::Refused, 64));
        self
    }

    pub(crate) fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn window_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Window { url, .. } => Some(url),
                HostCall::Link { .. } => None,
            })
            .collect()
    }
}

impl BrowsingContextHost for ScriptedHost {
    fn open_window(&self, url: &str, features: &str) -> Option<WindowHandle> {
        self.calls.lock().unwrap().push(HostCall::Window {
            url: url.to_string(),
            features: features.to_string(),
        });
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(WindowOutcome::Live);
        match outcome {
            WindowOutcome::Live => Some(WindowHandle::live()),
            WindowOutcome::Closed => Some(WindowHandle::closed()),
            WindowOutcome::Indeterminate => Some(WindowHandle::indeterminate()),
            WindowOutcome::Refused => None,
        }
    }

    fn activate_link(&self, url: &str, rel: &str) -> bool {
        self.calls.lock().unwrap().push(HostCall::Link {
            url: url.to_string(),
            rel: rel.to_string(),
        });
        !self.links_blocked
    }
}

pub(crate) fn makita_response() -> SearchResponse {
    serde_json::from_value(serde_json::json!({
        "parsed": { "brand": "Makita", "model": "DTD152", "part": "brush" },
        "results": [
            {
                "vendor": "eBay",
                "url": "https://www.ebay.ca/sch/i.html?_nkw=Makita+DTD152+brush",
                "status": "ready",
                "method": "instant"
            },
            {
                "vendor": "Amazon",
                "url": "https://www.amazon.ca/s?k=Makita+DTD152+brush",
                "status": "ready",
                "method": "instant"
            }
        ]
    }))
    .unwrap()
}

pub(crate) fn response_with(results: Vec<VendorResult>) -> SearchResponse {
    SearchResponse {
        parsed: partfinder_core::ParsedQuery::default(),
        results,
    }
}

type Reply = Result<SearchResponse, ClientError>;

/// Backend whose replies are queued ahead of time; every call records the
/// query it received.
pub(crate) struct QueuedBackend {
    replies: Mutex<VecDeque<Reply>>,
    queries: Mutex<Vec<String>>,
}

impl QueuedBackend {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for QueuedBackend {
    async fn search(&self, query: &str, _vendors: Option<&[String]>) -> Reply {
        self.queries.lock().unwrap().push(query.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected backend call")
    }
}

/// Backend that holds each request open until the test releases it, so
/// responses can be delivered out of order.
pub(crate) struct GatedBackend {
    gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
}

impl GatedBackend {
    /// Returns the backend plus one sender per expected request, in call
    /// order.
    pub(crate) fn new(requests: usize) -> (Self, Vec<oneshot::Sender<Reply>>) {
        let mut senders = Vec::with_capacity(requests);
        let mut receivers = VecDeque::with_capacity(requests);
        for _ in 0..requests {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        (
            Self {
                gates: Mutex::new(receivers),
            },
            senders,
        )
    }
}

#[async_trait]
impl SearchBackend for GatedBackend {
    async fn search(&self, _query: &str, _vendors: Option<&[String]>) -> Reply {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected backend call");
        gate.await.expect("test dropped the reply sender")
    }
}

pub(crate) fn server_error() -> ClientError {
    ClientError::UnexpectedStatus {
        status: 500,
        url: "http://localhost:8000/api/search".to_string(),
        detail: Some("boom".to_string()),
    }
}
