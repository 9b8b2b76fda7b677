//! Opening every ready result in one pass.
//!
//! Browsers only allow several popups when every open call happens
//! synchronously inside the same user gesture. [`BulkOpenCoordinator::open_all`]
//! is therefore a plain synchronous loop; nothing in it may await or sleep.

use std::time::Duration;

use partfinder_core::VendorResult;

use crate::advisor::RecoveryNotice;
use crate::dispatcher::{BrowsingContextHost, TabDispatcher};

/// Counts from one bulk-open pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOpenOutcome {
    /// Ready results the pass tried to open.
    pub attempted: usize,
    /// Tabs that were actually created.
    pub opened: usize,
}

impl BulkOpenOutcome {
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.attempted.saturating_sub(self.opened)
    }

    #[must_use]
    pub fn needs_recovery(&self) -> bool {
        self.opened < self.attempted
    }

    /// The notice for the recovery advisor, present only on a shortfall.
    #[must_use]
    pub fn recovery_notice(&self) -> Option<RecoveryNotice> {
        self.needs_recovery()
            .then(|| RecoveryNotice::new(self.attempted, self.opened))
    }
}

/// A recovery activation waiting out its delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRecovery {
    pub notice: RecoveryNotice,
    pub delay: Duration,
    /// Bulk-open pass that produced the shortfall.
    pub pass: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOpenReport {
    pub outcome: BulkOpenOutcome,
    pub recovery: Option<ScheduledRecovery>,
}

#[derive(Debug, Clone)]
pub struct BulkOpenCoordinator {
    recovery_delay: Duration,
}

impl BulkOpenCoordinator {
    /// `recovery_delay` keeps the recovery prompt from competing with the
    /// browser's own blocked-popup indicator.
    #[must_use]
    pub fn new(recovery_delay: Duration) -> Self {
        Self { recovery_delay }
    }

    /// Dispatch every ready result once, in order.
    ///
    /// Pending results are skipped and not counted. Tabs already opened stay
    /// open when later ones are blocked.
    pub fn open_all<H: BrowsingContextHost>(
        &self,
        dispatcher: &TabDispatcher<H>,
        results: &[VendorResult],
    ) -> BulkOpenOutcome {
        let mut attempted = 0;
        let mut opened = 0;

        for result in results.iter().filter(|r| r.is_ready()) {
            attempted += 1;
            if dispatcher.open_result(result) {
                opened += 1;
            }
        }

        let outcome = BulkOpenOutcome { attempted, opened };
        if outcome.needs_recovery() {
            tracing::warn!(attempted, opened, "some tabs were blocked");
        } else {
            tracing::info!(attempted, opened, "bulk open finished");
        }
        outcome
    }

    /// Attach a recovery schedule to `outcome` when it fell short.
    #[must_use]
    pub fn report(&self, outcome: BulkOpenOutcome, pass: u64) -> BulkOpenReport {
        let recovery = outcome.recovery_notice().map(|notice| ScheduledRecovery {
            notice,
            delay: self.recovery_delay,
            pass,
        });
        BulkOpenReport { outcome, recovery }
    }
}
