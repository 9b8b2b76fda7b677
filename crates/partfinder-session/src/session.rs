//! Lifecycle state of one search session.
//!
//! The session moves `Idle → Loading → Success | Error` and re-enters
//! `Loading` on every submit. Each submit hands out a [`SearchTicket`]
//! stamped with a monotonically increasing generation; a response is only
//! applied while its ticket is still the newest one, so a slow reply for a
//! superseded query can never overwrite fresher state.

use partfinder_core::{ParsedQuery, Projection, VendorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::Idle => write!(f, "idle"),
            SearchPhase::Loading => write!(f, "loading"),
            SearchPhase::Success => write!(f, "success"),
            SearchPhase::Error => write!(f, "error"),
        }
    }
}

/// Proof that a request was issued for a particular submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The trimmed query this ticket was issued for.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    query: Option<String>,
    parsed: Option<ParsedQuery>,
    results: Option<Vec<VendorResult>>,
    phase: SearchPhase,
    error_message: Option<String>,
    generation: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: None,
            parsed: None,
            results: None,
            phase: SearchPhase::Idle,
            error_message: None,
            generation: 0,
        }
    }

    /// Start a search for `raw`.
    ///
    /// Blank input is rejected: returns `None` and leaves the session
    /// untouched. Otherwise the trimmed query is stored immediately, any
    /// error is cleared, the phase becomes `Loading` (from any phase,
    /// including `Loading`), and a fresh ticket is returned.
    pub fn submit(&mut self, raw: &str) -> Option<SearchTicket> {
        let query = raw.trim();
        if query.is_empty() {
            return None;
        }

        self.generation += 1;
        self.query = Some(query.to_string());
        self.error_message = None;
        self.phase = SearchPhase::Loading;

        Some(SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    /// Apply a successful response. Returns `false` (and changes nothing)
    /// when `ticket` has been superseded.
    pub fn resolve(&mut self, ticket: &SearchTicket, projection: Projection) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                query = %ticket.query,
                "discarding stale search response"
            );
            return false;
        }

        self.parsed = Some(projection.parsed);
        self.results = Some(projection.results);
        self.error_message = None;
        self.phase = SearchPhase::Success;
        true
    }

    /// Apply a failed response: results and parsed metadata are cleared and
    /// `message` is stored verbatim. Returns `false` when `ticket` has been
    /// superseded.
    pub fn fail(&mut self, ticket: &SearchTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                query = %ticket.query,
                "discarding stale search failure"
            );
            return false;
        }

        self.parsed = None;
        self.results = None;
        self.error_message = Some(message.into());
        self.phase = SearchPhase::Error;
        true
    }

    fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation && self.phase == SearchPhase::Loading
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// The last submitted query, trimmed.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub fn parsed(&self) -> Option<&ParsedQuery> {
        self.parsed.as_ref()
    }

    #[must_use]
    pub fn results(&self) -> Option<&[VendorResult]> {
        self.results.as_deref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
