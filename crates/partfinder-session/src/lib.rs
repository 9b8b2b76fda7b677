//! Search-session orchestration and multi-tab dispatch.
//!
//! - [`SearchSession`]: lifecycle state of one query, gated by request
//!   generation.
//! - [`TabDispatcher`]: opens a single URL with popup-blocker fallback.
//! - [`BulkOpenCoordinator`]: opens every ready result in one synchronous pass.
//! - [`PopupRecoveryAdvisor`]: guidance after a blocked bulk open.
//! - [`SearchOrchestrator`]: owns all of the above plus the backend.

pub mod advisor;
pub mod browser;
pub mod bulk;
pub mod dispatcher;
pub mod orchestrator;
pub mod session;

#[cfg(test)]
mod test_support;

pub use advisor::{AdvisorState, PopupRecoveryAdvisor, RecoveryNotice};
pub use browser::SystemBrowser;
pub use bulk::{BulkOpenCoordinator, BulkOpenOutcome, BulkOpenReport, ScheduledRecovery};
pub use dispatcher::{BrowsingContextHost, TabDispatcher, WindowHandle};
pub use orchestrator::{
    BulkOpenPlan, OrchestratorOptions, SearchBackend, SearchOrchestrator, SEARCH_FAILED_MESSAGE,
};
pub use session::{SearchPhase, SearchSession, SearchTicket};
