//! Glue between the search session, the backend, and tab dispatch.
//!
//! [`SearchOrchestrator`] is the explicit session context: it owns the
//! session state, the recovery advisor, and the dispatcher, and is the only
//! writer of that state. Locks are never held across an `.await`, so two
//! searches may overlap; the session's generation check decides which
//! response lands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use partfinder_client::{ClientError, PartfinderClient};
use partfinder_core::{project, AppConfig, BulkOpenPolicy, SearchResponse, VendorResult};

use crate::advisor::PopupRecoveryAdvisor;
use crate::bulk::{BulkOpenCoordinator, BulkOpenReport, ScheduledRecovery};
use crate::dispatcher::{BrowsingContextHost, TabDispatcher};
use crate::session::{SearchPhase, SearchSession};

/// Message shown to the user for any transport failure. The underlying
/// error is logged, not displayed.
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed. Please try again.";

/// The parsing/search backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        query: &str,
        vendors: Option<&[String]>,
    ) -> Result<SearchResponse, ClientError>;
}

#[async_trait]
impl SearchBackend for PartfinderClient {
    async fn search(
        &self,
        query: &str,
        vendors: Option<&[String]>,
    ) -> Result<SearchResponse, ClientError> {
        PartfinderClient::search(self, query, vendors).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    /// Vendor filter sent with every search.
    pub vendors: Option<Vec<String>>,
    pub bulk_open_policy: BulkOpenPolicy,
    pub recovery_delay: Duration,
}

impl OrchestratorOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            vendors: config.vendors.clone(),
            bulk_open_policy: config.bulk_open_policy,
            recovery_delay: Duration::from_millis(config.recovery_delay_ms),
        }
    }
}

/// What a bulk open would do, for callers that confirm first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOpenPlan {
    pub ready: usize,
    pub requires_confirmation: bool,
}

pub struct SearchOrchestrator<B, H> {
    backend: B,
    dispatcher: TabDispatcher<H>,
    coordinator: BulkOpenCoordinator,
    session: Mutex<SearchSession>,
    advisor: Mutex<PopupRecoveryAdvisor>,
    bulk_pass: AtomicU64,
    vendors: Option<Vec<String>>,
    bulk_open_policy: BulkOpenPolicy,
}

impl<B: SearchBackend, H: BrowsingContextHost> SearchOrchestrator<B, H> {
    pub fn new(backend: B, host: H, options: OrchestratorOptions) -> Self {
        Self {
            backend,
            dispatcher: TabDispatcher::new(host),
            coordinator: BulkOpenCoordinator::new(options.recovery_delay),
            session: Mutex::new(SearchSession::new()),
            advisor: Mutex::new(PopupRecoveryAdvisor::new()),
            bulk_pass: AtomicU64::new(0),
            vendors: options.vendors,
            bulk_open_policy: options.bulk_open_policy,
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, SearchSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_advisor(&self) -> MutexGuard<'_, PopupRecoveryAdvisor> {
        self.advisor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one search and return the phase the session ends up in.
    ///
    /// Blank input issues no request and leaves the phase unchanged. A
    /// response for a query that was superseded while in flight is dropped.
    pub async fn search(&self, raw: &str) -> SearchPhase {
        let ticket = self.lock_session().submit(raw);
        let Some(ticket) = ticket else {
            tracing::debug!("ignoring blank query");
            return self.phase();
        };

        let reply = self
            .backend
            .search(ticket.query(), self.vendors.as_deref())
            .await;

        let mut session = self.lock_session();
        match reply {
            Ok(response) => {
                let projection = project(response);
                tracing::info!(
                    query = ticket.query(),
                    results = projection.results.len(),
                    ready = projection.ready_count(),
                    "search finished"
                );
                session.resolve(&ticket, projection);
            }
            Err(e) => {
                tracing::error!(query = ticket.query(), error = %e, "search failed");
                session.fail(&ticket, SEARCH_FAILED_MESSAGE);
            }
        }
        session.phase()
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.lock_session().phase()
    }

    /// Copy of the current session state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SearchSession {
        self.lock_session().clone()
    }

    /// How many tabs a bulk open would attempt right now, or `None` when
    /// there is no successful result set.
    #[must_use]
    pub fn plan_open_all(&self) -> Option<BulkOpenPlan> {
        let session = self.lock_session();
        if session.phase() != SearchPhase::Success {
            return None;
        }
        let ready = session
            .results()
            .map_or(0, |results| results.iter().filter(|r| r.is_ready()).count());
        Some(BulkOpenPlan {
            ready,
            requires_confirmation: self.bulk_open_policy == BulkOpenPolicy::ConfirmFirst,
        })
    }

    /// Open every ready result of the current successful search.
    ///
    /// Returns `None` when the session is not in `Success`. Under
    /// `ConfirmFirst` the caller is expected to have confirmed
    /// [`Self::plan_open_all`] before calling this. Each pass supersedes any
    /// recovery still scheduled by an earlier pass.
    pub fn open_all(&self) -> Option<BulkOpenReport> {
        let results = {
            let session = self.lock_session();
            if session.phase() != SearchPhase::Success {
                tracing::debug!(phase = %session.phase(), "open all ignored outside success");
                return None;
            }
            session
                .results()
                .map(<[VendorResult]>::to_vec)
                .unwrap_or_default()
        };

        let outcome = self.coordinator.open_all(&self.dispatcher, &results);
        let pass = self.bulk_pass.fetch_add(1, Ordering::SeqCst) + 1;
        Some(self.coordinator.report(outcome, pass))
    }

    /// Open the result at `index` of the current successful search.
    pub fn open_one(&self, index: usize) -> bool {
        let result = {
            let session = self.lock_session();
            if session.phase() != SearchPhase::Success {
                return false;
            }
            session.results().and_then(|results| results.get(index)).cloned()
        };
        match result {
            Some(result) => self.dispatcher.open_result(&result),
            None => {
                tracing::warn!(index, "no result at index");
                false
            }
        }
    }

    /// Wait out the recovery delay, then show the advisor unless a newer
    /// bulk-open pass has started. Returns whether the advisor was shown.
    pub async fn settle_recovery(&self, scheduled: ScheduledRecovery) -> bool {
        if !scheduled.delay.is_zero() {
            tokio::time::sleep(scheduled.delay).await;
        }
        if self.bulk_pass.load(Ordering::SeqCst) != scheduled.pass {
            tracing::debug!(pass = scheduled.pass, "recovery superseded by newer pass");
            return false;
        }
        self.lock_advisor().show(scheduled.notice);
        true
    }

    #[must_use]
    pub fn advisor(&self) -> PopupRecoveryAdvisor {
        self.lock_advisor().clone()
    }

    pub fn dismiss_advisor(&self) {
        self.lock_advisor().dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::AdvisorState;
    use crate::test_support::{
        makita_response, pending, ready, response_with, server_error, GatedBackend,
        QueuedBackend, ScriptedHost, WindowOutcome,
    };

    fn options() -> OrchestratorOptions {
        OrchestratorOptions {
            vendors: None,
            bulk_open_policy: BulkOpenPolicy::OpenImmediately,
            recovery_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn makita_scenario_opens_both_tabs_without_advisor() {
        let backend = QueuedBackend::new(vec![Ok(makita_response())]);
        let host = ScriptedHost::new(vec![WindowOutcome::Live, WindowOutcome::Live]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        let phase = orchestrator.search("Makita DTD152 brush").await;
        assert_eq!(phase, SearchPhase::Success);

        let snapshot = orchestrator.snapshot();
        let parsed = snapshot.parsed().expect("parsed query");
        assert_eq!(parsed.brand.as_deref(), Some("Makita"));
        assert_eq!(parsed.model.as_deref(), Some("DTD152"));
        assert_eq!(parsed.part.as_deref(), Some("brush"));

        let report = orchestrator.open_all().expect("success allows open all");
        assert_eq!(report.outcome.attempted, 2);
        assert_eq!(report.outcome.opened, 2);
        assert!(report.recovery.is_none());
        assert_eq!(orchestrator.advisor().state(), AdvisorState::Hidden);
        assert_eq!(host.window_urls().len(), 2);
    }

    #[tokio::test]
    async fn blank_query_issues_no_request() {
        let backend = QueuedBackend::new(vec![]);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        assert_eq!(orchestrator.search("").await, SearchPhase::Idle);
        assert_eq!(orchestrator.search("   ").await, SearchPhase::Idle);
        assert!(orchestrator.backend.queries().is_empty());
    }

    #[tokio::test]
    async fn blank_query_keeps_prior_success() {
        let backend = QueuedBackend::new(vec![Ok(makita_response())]);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        orchestrator.search("makita brush").await;
        assert_eq!(orchestrator.search(" ").await, SearchPhase::Success);
        assert_eq!(orchestrator.backend.queries(), ["makita brush"]);
    }

    #[tokio::test]
    async fn server_error_enters_error_with_generic_message() {
        let backend = QueuedBackend::new(vec![Ok(makita_response()), Err(server_error())]);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        orchestrator.search("makita brush").await;
        let phase = orchestrator.search("dewalt switch").await;

        assert_eq!(phase, SearchPhase::Error);
        let snapshot = orchestrator.snapshot();
        assert!(snapshot.results().is_none());
        assert!(snapshot.parsed().is_none());
        assert_eq!(snapshot.error_message(), Some(SEARCH_FAILED_MESSAGE));
        assert!(orchestrator.open_all().is_none());
    }

    #[tokio::test]
    async fn same_query_twice_hits_backend_twice() {
        let backend = QueuedBackend::new(vec![Ok(makita_response()), Ok(makita_response())]);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        orchestrator.search("Makita DTD152 brush").await;
        orchestrator.search("Makita DTD152 brush").await;

        assert_eq!(orchestrator.backend.queries().len(), 2);
    }

    #[tokio::test]
    async fn late_response_for_superseded_query_is_discarded() {
        let (backend, mut senders) = GatedBackend::new(2);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        let first_reply = senders.remove(0);
        let second_reply = senders.remove(0);

        let first = orchestrator.search("makita brush");
        let second = orchestrator.search("dewalt switch");
        let deliver = async {
            tokio::task::yield_now().await;
            // Newer query answers first, then the stale one arrives.
            second_reply
                .send(Ok(response_with(vec![ready("Amazon", "https://amazon.example.com")])))
                .ok();
            tokio::task::yield_now().await;
            first_reply.send(Ok(makita_response())).ok();
        };

        let (_, second_phase, ()) = tokio::join!(first, second, deliver);

        assert_eq!(second_phase, SearchPhase::Success);
        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.query(), Some("dewalt switch"));
        let vendors: Vec<&str> = snapshot
            .results()
            .unwrap()
            .iter()
            .map(|r| r.vendor.as_str())
            .collect();
        assert_eq!(vendors, ["Amazon"]);
    }

    #[tokio::test]
    async fn late_failure_for_superseded_query_is_discarded() {
        let (backend, mut senders) = GatedBackend::new(2);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        let first_reply = senders.remove(0);
        let second_reply = senders.remove(0);

        let first = orchestrator.search("makita brush");
        let second = orchestrator.search("dewalt switch");
        let deliver = async {
            tokio::task::yield_now().await;
            first_reply.send(Err(server_error())).ok();
            tokio::task::yield_now().await;
            second_reply.send(Ok(makita_response())).ok();
        };

        let _ = tokio::join!(first, second, deliver);

        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.phase(), SearchPhase::Success);
        assert!(snapshot.error_message().is_none());
    }

    #[tokio::test]
    async fn shortfall_shows_advisor_until_dismissed() {
        let backend = QueuedBackend::new(vec![Ok(makita_response())]);
        let host = ScriptedHost::new(vec![WindowOutcome::Live, WindowOutcome::Refused])
            .with_links_blocked();
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        orchestrator.search("Makita DTD152 brush").await;
        let report = orchestrator.open_all().unwrap();
        assert_eq!(report.outcome.attempted, 2);
        assert_eq!(report.outcome.opened, 1);

        let scheduled = report.recovery.expect("shortfall schedules recovery");
        assert!(orchestrator.settle_recovery(scheduled).await);
        let advisor = orchestrator.advisor();
        assert!(advisor.is_visible());
        assert!(advisor.guidance().unwrap().contains("opened 1 of 2 tabs"));

        orchestrator.dismiss_advisor();
        assert_eq!(orchestrator.advisor().state(), AdvisorState::Hidden);
    }

    #[tokio::test]
    async fn newer_pass_supersedes_scheduled_recovery() {
        let backend = QueuedBackend::new(vec![Ok(makita_response())]);
        let host = ScriptedHost::blocking_everything();
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        orchestrator.search("Makita DTD152 brush").await;
        let stale = orchestrator.open_all().unwrap().recovery.unwrap();
        let fresh = orchestrator.open_all().unwrap().recovery.unwrap();

        assert!(!orchestrator.settle_recovery(stale).await);
        assert!(!orchestrator.advisor().is_visible());
        assert!(orchestrator.settle_recovery(fresh).await);
        assert!(orchestrator.advisor().is_visible());
    }

    #[tokio::test]
    async fn pending_results_never_reach_the_host() {
        let backend = QueuedBackend::new(vec![Ok(response_with(vec![
            pending("KMS Tools", "https://kms.example.com"),
            ready("eBay", "https://ebay.example.com"),
            pending("Canadian Tire", "https://ct.example.com"),
        ]))]);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(backend, &host, options());

        orchestrator.search("grinder bearing").await;
        assert!(!orchestrator.open_one(0));
        assert!(orchestrator.open_one(1));
        assert!(!orchestrator.open_one(2));
        assert!(!orchestrator.open_one(9));

        let report = orchestrator.open_all().unwrap();
        assert_eq!(report.outcome.attempted, 1);
        assert_eq!(
            host.window_urls(),
            ["https://ebay.example.com", "https://ebay.example.com"]
        );
    }

    #[tokio::test]
    async fn plan_reflects_policy_and_ready_count() {
        let backend = QueuedBackend::new(vec![Ok(makita_response())]);
        let host = ScriptedHost::new(vec![]);
        let orchestrator = SearchOrchestrator::new(
            backend,
            &host,
            OrchestratorOptions {
                bulk_open_policy: BulkOpenPolicy::ConfirmFirst,
                ..options()
            },
        );

        assert!(orchestrator.plan_open_all().is_none());
        orchestrator.search("Makita DTD152 brush").await;
        assert_eq!(
            orchestrator.plan_open_all(),
            Some(BulkOpenPlan {
                ready: 2,
                requires_confirmation: true
            })
        );
        assert!(host.calls().is_empty());
    }
}
