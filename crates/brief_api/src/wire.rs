//! Wire-level shapes and the defensive decoding between the webhook's loose
//! JSON and the typed domain model.
//!
//! The datastore re-encodes collection fields as JSON strings inside the
//! project payload, ids arrive as numbers or strings depending on the code
//! path, and numeric form fields come back as strings after a round trip
//! through the UI. Everything here decodes leniently: an unreadable
//! collection becomes empty, an odd scalar becomes its default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use brief_core::{CompetitorCandidate, NewProjectDraft, Project, ProjectDetails, ProjectStatus};

use crate::error::ApiError;

/// Interprets a response body the way the backend means it: empty bodies are
/// an empty object, markup signals a misconfigured base URL.
pub(crate) fn parse_body<T>(text: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    if trimmed.starts_with('<') {
        return Err(ApiError::MarkupResponse);
    }
    serde_json::from_str(trimmed).map_err(|err| ApiError::MalformedBody(err.to_string()))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProjectList {
    pub list: Vec<RawProject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StatusPayload {
    pub status: String,
}

/// One project row as the webhook returns it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawProject {
    #[serde(rename = "Id", alias = "id", deserialize_with = "opaque_text")]
    pub id: String,
    #[serde(rename = "CreatedAt", alias = "created_at")]
    pub created_at: Option<String>,
    pub title: String,
    pub main_keyword: String,
    pub status: String,
    pub competitors_google: Value,
    pub competitors_yandex: Value,
    pub excluded_competitors: Value,
    pub selected_competitors: Value,
    pub tz_content: Option<String>,
    pub client_name: String,
    pub client_website: String,
    pub client_niche: String,
    pub client_description: String,
    pub text_type: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub text_volume: u32,
    pub text_style: String,
    pub target_audience: String,
    pub region: String,
    pub language: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub faq_enabled: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub faq_count: u32,
    pub additional_requirements: String,
}

impl RawProject {
    pub(crate) fn into_project(self) -> Project {
        Project {
            id: self.id,
            title: self.title,
            main_keyword: self.main_keyword,
            status: ProjectStatus::parse(&self.status),
            created_at: self.created_at.filter(|value| !value.is_empty()),
            competitors_google: candidate_list(&self.competitors_google),
            competitors_yandex: candidate_list(&self.competitors_yandex),
            excluded_domains: string_list(&self.excluded_competitors),
            selected_competitors: string_list(&self.selected_competitors),
            tz_content: self.tz_content,
            details: ProjectDetails {
                client_name: self.client_name,
                client_website: self.client_website,
                client_niche: self.client_niche,
                client_description: self.client_description,
                text_type: self.text_type,
                text_volume: self.text_volume,
                text_style: self.text_style,
                target_audience: self.target_audience,
                region: self.region,
                language: self.language,
                faq_enabled: self.faq_enabled,
                faq_count: self.faq_count,
                additional_requirements: self.additional_requirements,
            },
        }
    }
}

/// Creation payload; field names match what the workflow stores.
#[derive(Debug, Serialize)]
pub(crate) struct CreateProjectBody<'a> {
    pub title: &'a str,
    pub main_keyword: &'a str,
    pub client_name: &'a str,
    pub client_website: &'a str,
    pub client_niche: &'a str,
    pub client_description: &'a str,
    pub text_type: &'a str,
    pub text_volume: u32,
    pub text_style: &'a str,
    pub target_audience: &'a str,
    pub region: &'a str,
    pub language: &'a str,
    pub faq_enabled: bool,
    pub faq_count: u32,
    pub additional_requirements: &'a str,
    pub excluded_competitors: &'a [String],
}

impl<'a> From<&'a NewProjectDraft> for CreateProjectBody<'a> {
    fn from(draft: &'a NewProjectDraft) -> Self {
        let details = &draft.details;
        Self {
            title: &draft.title,
            main_keyword: &draft.main_keyword,
            client_name: &details.client_name,
            client_website: &details.client_website,
            client_niche: &details.client_niche,
            client_description: &details.client_description,
            text_type: &details.text_type,
            text_volume: details.text_volume,
            text_style: &details.text_style,
            target_audience: &details.target_audience,
            region: &details.region,
            language: &details.language,
            faq_enabled: details.faq_enabled,
            faq_count: details.faq_count,
            additional_requirements: &details.additional_requirements,
            excluded_competitors: &draft.excluded_competitors,
        }
    }
}

/// Ids are opaque text, but the backend sends numbers on some paths.
fn opaque_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64().unwrap_or(0) as u32,
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_i64().unwrap_or(0) != 0,
        Value::String(text) => text == "true" || text == "1",
        _ => false,
    })
}

/// A collection field: a JSON array, a JSON-encoded string holding an array,
/// or garbage. Garbage decodes to the empty list.
fn embedded_array(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn candidate_list(value: &Value) -> Vec<CompetitorCandidate> {
    embedded_array(value)
        .iter()
        .filter_map(candidate_from)
        .collect()
}

fn candidate_from(value: &Value) -> Option<CompetitorCandidate> {
    match value {
        Value::String(url) if !url.is_empty() => Some(CompetitorCandidate {
            url: url.clone(),
            title: None,
            snippet: None,
        }),
        Value::Object(entry) => {
            let url = entry.get("url").and_then(Value::as_str)?;
            if url.is_empty() {
                return None;
            }
            Some(CompetitorCandidate {
                url: url.to_string(),
                title: text_field(entry.get("title")),
                snippet: text_field(entry.get("snippet")),
            })
        }
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    embedded_array(value)
        .iter()
        .filter_map(|item| item.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}

fn text_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
