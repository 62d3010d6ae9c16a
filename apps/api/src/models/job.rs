use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    iso_date, merge_extra, merge_field, merge_optional, null_as_empty, or_default, Record,
};

/// A job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub position: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String, // "applied", "interview", "rejected", ... (free-form)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub applied_date: String, // YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    /// Keys the client stored that have no named field; persisted untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Add/update request body for a job.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFields {
    /// Clients echo the stored record back on update; the path id wins.
    #[serde(default, rename = "id")]
    pub _id: Option<IgnoredAny>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub applied_date: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Job {
    type Fields = JobFields;

    const NAME: &'static str = "Job";
    const FILE_NAME: &'static str = "jobs-data.json";

    fn id(&self) -> i64 {
        self.id
    }

    fn seed(_now: DateTime<Utc>) -> Self {
        Job {
            id: 1,
            company: "Irdeto".to_string(),
            description: None,
            position: "Junior Software Engineer".to_string(),
            status: "applied".to_string(),
            applied_date: "2025-08-31".to_string(),
            link: None,
            notes: "Application confirmed on 8/31. Under review by talent acquisition team."
                .to_string(),
            extra: Map::new(),
        }
    }

    fn from_fields(id: i64, fields: JobFields, now: DateTime<Utc>) -> Self {
        Job {
            id,
            company: or_default(fields.company, "New Company"),
            description: Some(fields.description.unwrap_or_default()),
            position: or_default(fields.position, "New Position"),
            status: or_default(fields.status, "applied"),
            applied_date: or_default(fields.applied_date, &iso_date(now)),
            link: Some(fields.link.unwrap_or_default()),
            notes: fields.notes.unwrap_or_default(),
            extra: Map::new(),
        }
    }

    fn apply_patch(&mut self, patch: JobFields) {
        merge_field(&mut self.company, patch.company);
        merge_optional(&mut self.description, patch.description);
        merge_field(&mut self.position, patch.position);
        merge_field(&mut self.status, patch.status);
        merge_field(&mut self.applied_date, patch.applied_date);
        merge_optional(&mut self.link, patch.link);
        merge_field(&mut self.notes, patch.notes);
        merge_extra(&mut self.extra, patch.extra);
    }
}
