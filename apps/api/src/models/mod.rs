// Tracked record types: jobs applied to and target companies under research.
// Both collections share one generic store/collection/handler stack via `Record`.

pub mod job;
pub mod target;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use job::Job;
pub use target::Target;

/// A record persisted as one element of a collection's JSON array.
///
/// `Fields` is the request shape for both add and update: every known field
/// optional, any `id` in the body ignored, unknown keys collected as extras.
/// Add fills absent fields with the record's defaults and drops extras;
/// update overlays every present key onto the stored record.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Fields: DeserializeOwned + Send + 'static;

    /// Human-readable name used in response messages ("Job", "Target").
    const NAME: &'static str;
    /// Backing file name inside the data directory.
    const FILE_NAME: &'static str;

    fn id(&self) -> i64;

    /// The single record written when the backing file is missing or unreadable.
    fn seed(now: DateTime<Utc>) -> Self;

    fn from_fields(id: i64, fields: Self::Fields, now: DateTime<Utc>) -> Self;

    fn apply_patch(&mut self, patch: Self::Fields);
}

/// Next id for a new record: the current time in milliseconds, bumped past the
/// largest existing id so ids stay unique and increasing within a collection.
pub fn next_id<R: Record>(records: &[R], now: DateTime<Utc>) -> i64 {
    let millis = now.timestamp_millis();
    records
        .iter()
        .map(Record::id)
        .max()
        .map_or(millis, |max| millis.max(max.saturating_add(1)))
}

/// Absent and empty values both fall back to the default.
pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn merge_field(field: &mut String, patch: Option<String>) {
    if let Some(value) = patch {
        *field = value;
    }
}

pub(crate) fn merge_optional(field: &mut Option<String>, patch: Option<String>) {
    if patch.is_some() {
        *field = patch;
    }
}

/// Overlays unknown patch keys onto a record's extra keys.
pub(crate) fn merge_extra(extra: &mut Map<String, Value>, patch: Map<String, Value>) {
    extra.extend(patch);
}

/// Stored string fields written as `null` read back as empty strings.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn iso_date(now: DateTime<Utc>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}
