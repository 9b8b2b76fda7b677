//! Text helpers shared by everything that renders search state.

use chrono::{DateTime, Utc};

use crate::types::{Favorite, ParsedQuery, PriceRange};

/// Format a price range as `"$12.50 - $30.00"`.
#[must_use]
pub fn format_price_range(pricing: &PriceRange) -> String {
    format!("${:.2} - ${:.2}", pricing.min, pricing.max)
}

/// One-line summary of the parsed query: `"Makita DTD152 → brush"`.
///
/// Returns `None` when the parser extracted nothing.
#[must_use]
pub fn parsed_summary(parsed: &ParsedQuery) -> Option<String> {
    let head: Vec<&str> = [parsed.brand.as_deref(), parsed.model.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();
    let part = parsed.part.as_deref().filter(|s| !s.trim().is_empty());

    match (head.is_empty(), part) {
        (true, None) => None,
        (true, Some(part)) => Some(format!("\u{2192} {part}")),
        (false, None) => Some(head.join(" ")),
        (false, Some(part)) => Some(format!("{} \u{2192} {part}", head.join(" "))),
    }
}

/// Human-friendly age of a history entry relative to `now`.
///
/// Under a minute is `"Just now"`, under an hour `"N min ago"`, under a day
/// `"N hr ago"`, otherwise the calendar date.
#[must_use]
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if minutes < 1440 {
        format!("{} hr ago", minutes / 60)
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Favorite label with its order count, e.g. `"DTD152 brushes (3x)"`.
#[must_use]
pub fn favorite_label(favorite: &Favorite) -> String {
    if favorite.times_ordered > 0 {
        format!("{} ({}x)", favorite.part_description, favorite.times_ordered)
    } else {
        favorite.part_description.clone()
    }
}
