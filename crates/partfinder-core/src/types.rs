//! Wire types for the parts-search backend.
//!
//! Every struct models a JSON body exchanged with `/api/search`,
//! `/api/history`, or `/api/favorites`. Optional fields default to `None`
//! and unknown fields are ignored, so newer backends can add keys without
//! breaking the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /api/search
// ---------------------------------------------------------------------------

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendors: Option<Vec<String>>,
}

/// Structured fields the backend parser extracted from the raw query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub part: Option<String>,
    /// Echo of the submitted text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_query: Option<String>,
}

/// Whether a vendor result can be opened right away.
///
/// The backend emits `"ready"` for openable URLs and `"processing"` or
/// `"failed"` for the rest; everything that is not `"ready"` is `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ResultStatus {
    Ready,
    Pending,
}

impl From<String> for ResultStatus {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("ready") {
            ResultStatus::Ready
        } else {
            ResultStatus::Pending
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Ready => write!(f, "ready"),
            ResultStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Price range reported for a vendor, in the vendor's listing currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Returns `true` when both bounds are finite, non-negative, and ordered.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// One row per vendor attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorResult {
    pub vendor: String,
    /// Vendor search page. May be empty for results that never resolved.
    #[serde(default)]
    pub url: String,
    pub status: ResultStatus,
    /// How the backend produced the URL (`"instant"`, `"scraping"`, ...).
    /// Displayed verbatim; never validated.
    #[serde(default)]
    pub method: String,
    /// A block missing a bound or holding non-numeric values reads as `None`
    /// so one vendor cannot sink the whole response.
    #[serde(default, deserialize_with = "lenient_pricing::deserialize")]
    pub pricing: Option<PriceRange>,
    /// Time hint for results still processing, e.g. `"2s"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    #[serde(default, alias = "logoUrl")]
    pub logo_url: Option<String>,
}

impl VendorResult {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == ResultStatus::Ready
    }
}

/// Body returned by `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub parsed: ParsedQuery,
    #[serde(default)]
    pub results: Vec<VendorResult>,
}

// ---------------------------------------------------------------------------
// /api/history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    #[serde(with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Body returned by `GET /api/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body returned by `DELETE /api/history`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deleted_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// /api/favorites
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Backend document id; older servers send it as `_id`.
    #[serde(alias = "_id")]
    pub id: String,
    pub part_description: String,
    pub search_query: String,
    #[serde(default)]
    pub times_ordered: u32,
    #[serde(default, with = "lenient_timestamp::option")]
    pub last_ordered: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preferred_vendor: Option<String>,
}

/// Body of `POST /api/favorites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteCreate {
    pub part_description: String,
    pub search_query: String,
}

/// Body returned by `GET /api/favorites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesResponse {
    #[serde(default)]
    pub favorites: Vec<Favorite>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body returned by `DELETE /api/favorites/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFavoriteResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deleted_id: Option<String>,
}

mod lenient_pricing {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    use super::PriceRange;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Bounds {
            #[serde(default)]
            min: Option<f64>,
            #[serde(default)]
            max: Option<f64>,
        },
        Other(IgnoredAny),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PriceRange>, D::Error> {
        let wire: Option<Wire> = Option::deserialize(deserializer)?;
        Ok(match wire {
            Some(Wire::Bounds {
                min: Some(min),
                max: Some(max),
            }) => Some(PriceRange { min, max }),
            Some(Wire::Bounds { min, max }) => {
                tracing::warn!(?min, ?max, "ignoring incomplete price range");
                None
            }
            Some(Wire::Other(_)) => {
                tracing::warn!("ignoring malformed price range");
                None
            }
            None => None,
        })
    }
}

/// Timestamps from the backend are ISO 8601, but naive values (no offset)
/// are common because the server stores UTC without a zone. Naive values
/// are read as UTC.
mod lenient_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
            }
        }
    }
}
