use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::option_fields::OptionField;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Published,
    Hidden,
}

impl FromStr for ProjectStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(ProjectStatus::Draft),
            "Published" => Ok(ProjectStatus::Published),
            "Hidden" => Ok(ProjectStatus::Hidden),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Draft => "Draft",
            ProjectStatus::Published => "Published",
            ProjectStatus::Hidden => "Hidden",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: String,
    #[serde(rename = "bodyMDX")]
    pub body_mdx: String,
    pub status: ProjectStatus,
    pub industry: Option<String>,
    pub tech_stack: Vec<String>,
    pub highlight: bool,
    pub cover_image_url: Option<String>,
    pub youtube_url: Option<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub dataset_url: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub completed_on: Option<NaiveDate>,
    pub kpis: Option<serde_json::Value>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized record ready for INSERT. Ids and timestamps come from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body_mdx: String,
    pub status: ProjectStatus,
    pub industry: Option<String>,
    pub tech_stack: Vec<String>,
    pub highlight: bool,
    pub cover_image_url: String,
    pub youtube_url: Option<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub dataset_url: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub completed_on: Option<NaiveDate>,
    pub kpis: Option<serde_json::Value>,
    pub tags: Vec<String>,
}

/// Normalized partial update. Only fields that are not `Unchanged` are written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectChanges {
    pub title: OptionField<String>,
    pub slug: OptionField<String>,
    pub summary: OptionField<String>,
    pub body_mdx: OptionField<String>,
    pub status: OptionField<ProjectStatus>,
    pub industry: OptionField<String>,
    pub tech_stack: OptionField<Vec<String>>,
    pub highlight: OptionField<bool>,
    pub cover_image_url: OptionField<String>,
    pub youtube_url: OptionField<String>,
    pub repo_url: OptionField<String>,
    pub live_url: OptionField<String>,
    pub dataset_url: OptionField<String>,
    pub started_on: OptionField<NaiveDate>,
    pub completed_on: OptionField<NaiveDate>,
    pub kpis: OptionField<serde_json::Value>,
    pub tags: OptionField<Vec<String>>,
}

impl ProjectChanges {
    /// The new slug when one is being set to a non-empty value.
    pub fn new_slug(&self) -> Option<&str> {
        self.slug.value_ref().map(String::as_str).filter(|s| !s.is_empty())
    }
}

// ───── Input Payloads ───────────────────────────────────────────────

/// List fields arrive either as a comma-separated string (admin form) or as a JSON array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CsvList {
    Items(Vec<String>),
    Csv(String),
}

/// Raw, untrusted project body shared by create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPayload {
    pub title: OptionField<String>,
    pub slug: OptionField<String>,
    pub summary: OptionField<String>,
    #[serde(rename = "bodyMDX")]
    pub body_mdx: OptionField<String>,
    pub status: OptionField<String>,
    pub industry: OptionField<String>,
    pub tech_stack: OptionField<CsvList>,
    pub highlight: OptionField<bool>,
    pub cover_image_url: OptionField<String>,
    pub youtube_url: OptionField<String>,
    pub repo_url: OptionField<String>,
    pub live_url: OptionField<String>,
    pub dataset_url: OptionField<String>,
    pub started_on: OptionField<String>,
    pub completed_on: OptionField<String>,
    pub kpis: OptionField<serde_json::Value>,
    pub tags: OptionField<CsvList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoverImageRequest {
    #[serde(default)]
    pub url: Option<String>,
}
