//! Reverse ETL sync domain types

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Handle to a triggered Reverse ETL sync
///
/// Created once the start request succeeds. The identifier is fixed for the
/// lifetime of the handle. The start time is kept as Segment sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncHandle {
    sync_id: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    started_at: Option<String>,
}

impl SyncHandle {
    pub fn new(sync_id: impl Into<String>, started_at: Option<String>) -> Self {
        Self {
            sync_id: sync_id.into(),
            started_at,
        }
    }

    /// Remote identifier of the sync
    pub fn id(&self) -> &str {
        &self.sync_id
    }

    /// When Segment reports the sync started, as sent
    pub fn started_at(&self) -> Option<&str> {
        self.started_at.as_deref()
    }

    /// Start time, if Segment sent a recognisable timestamp
    pub fn started_at_utc(&self) -> Option<DateTime<Utc>> {
        self.started_at.as_deref().and_then(parse_timestamp)
    }
}

/// Sync status code as reported by Segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    Pending,
    InProgress,
    Success,
    Fail,
    #[serde(other)]
    Unknown,
}

impl SyncState {
    /// No further transition happens after a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Fail)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Fail => "FAIL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sample of a sync's progress
///
/// Every field is optional: Segment omits most of them until the sync has
/// moved past the corresponding phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_id: Option<String>,
    #[serde(default, rename = "syncStatus", skip_serializing_if = "Option::is_none")]
    pub status: Option<SyncState>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub extract_phase: Option<ExtractPhase>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub load_phase: Option<LoadPhase>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl SyncStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(SyncState::is_terminal)
    }

    pub fn is_successful(&self) -> bool {
        self.status == Some(SyncState::Success)
    }

    /// Status code for messages, `"UNAVAILABLE"` when Segment sent none
    pub fn state_label(&self) -> &'static str {
        self.status.map_or("UNAVAILABLE", SyncState::as_str)
    }

    /// Time between start and finish, when both timestamps are readable
    pub fn run_time(&self) -> Option<TimeDelta> {
        let started = parse_timestamp(self.started_at.as_deref()?)?;
        let finished = parse_timestamp(self.finished_at.as_deref()?)?;
        Some(finished - started)
    }
}

/// Extraction counters from the warehouse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPhase {
    #[serde(default, deserialize_with = "count", skip_serializing_if = "Option::is_none")]
    pub added_count: Option<u64>,
    #[serde(default, deserialize_with = "count", skip_serializing_if = "Option::is_none")]
    pub updated_count: Option<u64>,
    #[serde(default, deserialize_with = "count", skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<u64>,
    #[serde(default, deserialize_with = "count", skip_serializing_if = "Option::is_none")]
    pub extract_count: Option<u64>,
}

/// Delivery counters towards the destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPhase {
    #[serde(default, deserialize_with = "count", skip_serializing_if = "Option::is_none")]
    pub deliver_success_count: Option<u64>,
    #[serde(default, deserialize_with = "count", skip_serializing_if = "Option::is_none")]
    pub deliver_failure_count: Option<u64>,
}

/// Parses an RFC 3339 timestamp, or a zone-less one read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Decodes an optional field, dropping it instead of failing when its shape
/// is unexpected. Only `syncId` and `syncStatus` may fail a response.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Valid(value)) => Some(value),
        _ => None,
    })
}

/// Segment sends counters either as JSON numbers or as decimal strings;
/// anything else reads as unknown.
fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}
