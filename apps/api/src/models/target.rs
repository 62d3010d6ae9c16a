use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{merge_extra, merge_field, null_as_empty, or_default, Record};

/// A company on the shortlist of places to apply to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Target {
    pub id: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub industry: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub priority: String, // "high" | "medium" | free-form
    #[serde(deserialize_with = "null_as_empty")]
    pub target_position: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub application_timeline: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub research_notes: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub contact_info: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub website_url: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub career_page_url: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String, // "researching", ...
    /// Keys the client stored that have no named field; persisted untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Add/update request body for a target company.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetFields {
    /// Clients echo the stored record back on update; the path id wins.
    #[serde(default, rename = "id")]
    pub _id: Option<IgnoredAny>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub priority: Option<String>,
    pub target_position: Option<String>,
    pub application_timeline: Option<String>,
    pub research_notes: Option<String>,
    pub contact_info: Option<String>,
    pub website_url: Option<String>,
    pub career_page_url: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Target {
    type Fields = TargetFields;

    const NAME: &'static str = "Target";
    const FILE_NAME: &'static str = "targets-data.json";

    fn id(&self) -> i64 {
        self.id
    }

    fn seed(now: DateTime<Utc>) -> Self {
        Target {
            id: now.timestamp_millis(),
            company_name: "Example Target Company".to_string(),
            industry: "Technology".to_string(),
            location: "Amsterdam, Netherlands".to_string(),
            priority: "high".to_string(),
            target_position: "Software Engineer".to_string(),
            application_timeline: "Q1 2025".to_string(),
            research_notes: "Sample research notes for target company analysis".to_string(),
            contact_info: String::new(),
            website_url: "https://example.com".to_string(),
            career_page_url: "https://example.com/careers".to_string(),
            status: "researching".to_string(),
            extra: Map::new(),
        }
    }

    fn from_fields(id: i64, fields: TargetFields, _now: DateTime<Utc>) -> Self {
        Target {
            id,
            company_name: or_default(fields.company_name, "New Target Company"),
            industry: or_default(fields.industry, "Technology"),
            location: or_default(fields.location, "Amsterdam, Netherlands"),
            priority: or_default(fields.priority, "medium"),
            target_position: or_default(fields.target_position, "Software Engineer"),
            application_timeline: or_default(fields.application_timeline, "Q1 2025"),
            research_notes: fields.research_notes.unwrap_or_default(),
            contact_info: fields.contact_info.unwrap_or_default(),
            website_url: fields.website_url.unwrap_or_default(),
            career_page_url: fields.career_page_url.unwrap_or_default(),
            status: or_default(fields.status, "researching"),
            extra: Map::new(),
        }
    }

    fn apply_patch(&mut self, patch: TargetFields) {
        merge_field(&mut self.company_name, patch.company_name);
        merge_field(&mut self.industry, patch.industry);
        merge_field(&mut self.location, patch.location);
        merge_field(&mut self.priority, patch.priority);
        merge_field(&mut self.target_position, patch.target_position);
        merge_field(&mut self.application_timeline, patch.application_timeline);
        merge_field(&mut self.research_notes, patch.research_notes);
        merge_field(&mut self.contact_info, patch.contact_info);
        merge_field(&mut self.website_url, patch.website_url);
        merge_field(&mut self.career_page_url, patch.career_page_url);
        merge_field(&mut self.status, patch.status);
        merge_extra(&mut self.extra, patch.extra);
    }
}
