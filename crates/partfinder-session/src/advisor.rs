//! Guidance shown after a bulk-open pass lost tabs to the popup blocker.

/// Counts carried into the advisor. Only constructible from a bulk-open
/// shortfall, see [`crate::BulkOpenOutcome::recovery_notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryNotice {
    attempted: usize,
    opened: usize,
}

impl RecoveryNotice {
    pub(crate) fn new(attempted: usize, opened: usize) -> Self {
        Self { attempted, opened }
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened
    }

    #[must_use]
    pub fn blocked(&self) -> usize {
        self.attempted.saturating_sub(self.opened)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvisorState {
    #[default]
    Hidden,
    Visible(RecoveryNotice),
}

/// Hidden until a shortfall is reported, then visible until dismissed.
///
/// There is no timeout and the advisor never reopens tabs itself.
#[derive(Debug, Clone, Default)]
pub struct PopupRecoveryAdvisor {
    state: AdvisorState,
}

impl PopupRecoveryAdvisor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> AdvisorState {
        self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self.state, AdvisorState::Visible(_))
    }

    /// Show guidance for `notice`, replacing any notice already shown.
    pub fn show(&mut self, notice: RecoveryNotice) {
        tracing::debug!(
            attempted = notice.attempted,
            opened = notice.opened,
            "showing popup recovery guidance"
        );
        self.state = AdvisorState::Visible(notice);
    }

    /// Close or acknowledge: always returns to `Hidden`.
    pub fn dismiss(&mut self) {
        self.state = AdvisorState::Hidden;
    }

    /// Guidance text for the visible notice.
    #[must_use]
    pub fn guidance(&self) -> Option<String> {
        match self.state {
            AdvisorState::Hidden => None,
            AdvisorState::Visible(notice) => Some(guidance_text(&notice)),
        }
    }
}

fn guidance_text(notice: &RecoveryNotice) -> String {
    format!(
        "Pop-up blocked: opened {opened} of {attempted} tabs.\n\
         \n\
         Your browser blocked {blocked} tab(s). To open them all:\n\
         \x20 1. Allow pop-ups for this site in your browser settings.\n\
         \x20 2. Run \"open all\" again.\n\
         \n\
         Or open the remaining results one at a time.",
        opened = notice.opened,
        attempted = notice.attempted,
        blocked = notice.blocked(),
    )
}
