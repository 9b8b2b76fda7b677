//! Projection of a raw `/api/search` response into the shape the tab
//! dispatcher and the display layer consume.

use crate::types::{ParsedQuery, SearchResponse, VendorResult};

/// Parsed metadata plus the ordered result set of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub parsed: ParsedQuery,
    pub results: Vec<VendorResult>,
}

impl Projection {
    /// Number of results the dispatcher may open.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ready()).count()
    }
}

/// Project a backend response.
///
/// Order and membership are passed through unchanged: no reordering,
/// filtering, or deduplication. A pricing block that is negative or has
/// `min > max` is dropped so the row renders without a price.
#[must_use]
pub fn project(response: SearchResponse) -> Projection {
    let results = response
        .results
        .into_iter()
        .map(|mut result| {
            if let Some(pricing) = result.pricing {
                if !pricing.is_valid() {
                    tracing::warn!(
                        vendor = %result.vendor,
                        min = pricing.min,
                        max = pricing.max,
                        "dropping invalid price range"
                    );
                    result.pricing = None;
                }
            }
            result
        })
        .collect();

    Projection {
        parsed: response.parsed,
        results,
    }
}
