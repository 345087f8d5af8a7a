//! Normalization of untrusted project payloads.
//!
//! This is the only place a [`ProjectPayload`] turns into a [`NewProject`] or
//! [`ProjectChanges`]. Everything here is pure and synchronous.

use chrono::NaiveDate;

use crate::{
    entities::{
        option_fields::OptionField,
        project::{CsvList, NewProject, ProjectChanges, ProjectPayload, ProjectStatus},
    },
    errors::AppError,
};

const REQUIRED_FIELDS: [&str; 3] = ["title", "slug", "summary"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize + validate input for CREATE.
pub fn normalize_create(payload: ProjectPayload) -> Result<NewProject, AppError> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .zip([&payload.title, &payload.slug, &payload.summary])
        .filter(|(_, value)| !is_truthy(*value))
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(AppError::ValidationError(format!(
            "Missing required: {}",
            missing.join(", ")
        )));
    }

    let ProjectPayload {
        title,
        slug,
        summary,
        body_mdx,
        status,
        industry,
        tech_stack,
        highlight,
        cover_image_url,
        youtube_url,
        repo_url,
        live_url,
        dataset_url,
        started_on,
        completed_on,
        kpis,
        tags,
    } = payload;

    let status = match status.flatten() {
        Some(raw) => parse_status(&raw)?,
        None => ProjectStatus::Draft,
    };

    let cover_image_url = match cover_image_url.flatten() {
        Some(raw) if !raw.is_empty() => canonical_url("coverImageUrl", &raw)?,
        _ => String::new(),
    };

    Ok(NewProject {
        title: title.flatten().unwrap_or_default(),
        slug: normalize_slug(&slug.flatten().unwrap_or_default()),
        summary: summary.flatten().unwrap_or_default(),
        body_mdx: body_mdx.flatten().unwrap_or_default(),
        status,
        industry: industry.flatten(),
        tech_stack: tech_stack.flatten().map(split_list).unwrap_or_default(),
        highlight: highlight.flatten().unwrap_or(false),
        cover_image_url,
        youtube_url: url_or_clear("youtubeUrl", youtube_url)?.flatten(),
        repo_url: url_or_clear("repoUrl", repo_url)?.flatten(),
        live_url: url_or_clear("liveUrl", live_url)?.flatten(),
        dataset_url: url_or_clear("datasetUrl", dataset_url)?.flatten(),
        started_on: optional_date("startedOn", started_on)?.flatten(),
        completed_on: optional_date("completedOn", completed_on)?.flatten(),
        kpis: kpis_value(kpis).flatten(),
        tags: tags.flatten().map(split_list).unwrap_or_default(),
    })
}

/// Normalize input for UPDATE. Every field is optional; absent keys stay `Unchanged`.
pub fn normalize_update(payload: ProjectPayload) -> Result<ProjectChanges, AppError> {
    let slug = non_null("slug", payload.slug)?.map_value(|s| normalize_slug(&s));
    if slug.value_ref().is_some_and(|s| s.is_empty()) {
        // Kept as-is: an empty slug is written through rather than ignored.
        tracing::warn!("Project update sets an empty slug");
    }

    let status = match non_null("status", payload.status)? {
        OptionField::SetToValue(raw) => OptionField::SetToValue(parse_status(&raw)?),
        _ => OptionField::Unchanged,
    };

    let cover_image_url = match payload.cover_image_url {
        OptionField::SetToValue(raw) if !raw.is_empty() => {
            OptionField::SetToValue(canonical_url("coverImageUrl", &raw)?)
        }
        // "No cover" is always stored as "", the same as on create
        OptionField::SetToValue(_) | OptionField::SetToNull => OptionField::SetToValue(String::new()),
        OptionField::Unchanged => OptionField::Unchanged,
    };

    Ok(ProjectChanges {
        title: non_null("title", payload.title)?,
        slug,
        summary: non_null("summary", payload.summary)?,
        body_mdx: non_null("bodyMDX", payload.body_mdx)?,
        status,
        industry: payload.industry,
        tech_stack: non_null("techStack", payload.tech_stack)?.map_value(split_list),
        highlight: non_null("highlight", payload.highlight)?,
        cover_image_url,
        youtube_url: url_or_clear("youtubeUrl", payload.youtube_url)?,
        repo_url: url_or_clear("repoUrl", payload.repo_url)?,
        live_url: url_or_clear("liveUrl", payload.live_url)?,
        dataset_url: url_or_clear("datasetUrl", payload.dataset_url)?,
        started_on: optional_date("startedOn", payload.started_on)?,
        completed_on: optional_date("completedOn", payload.completed_on)?,
        kpis: kpis_value(payload.kpis),
        tags: non_null("tags", payload.tags)?.map_value(split_list),
    })
}

/// Trimmed, lowercase slug.
pub fn normalize_slug(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split a comma-separated list, trimming entries and dropping empties. Order is preserved.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_list(list: CsvList) -> Vec<String> {
    match list {
        CsvList::Csv(raw) => split_csv(&raw),
        CsvList::Items(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Canonical absolute URL, or a validation error naming the field.
pub fn canonical_url(field: &str, raw: &str) -> Result<String, AppError> {
    url::Url::parse(raw)
        .map(|parsed| parsed.to_string())
        .map_err(|_| AppError::ValidationError(format!("{} is not a valid URL", field)))
}

/// `""` or null clears the column, absent leaves it alone, anything else must be a URL.
fn url_or_clear(field: &str, value: OptionField<String>) -> Result<OptionField<String>, AppError> {
    match value {
        OptionField::Unchanged => Ok(OptionField::Unchanged),
        OptionField::SetToNull => Ok(OptionField::SetToNull),
        OptionField::SetToValue(raw) if raw.is_empty() => Ok(OptionField::SetToNull),
        OptionField::SetToValue(raw) => canonical_url(field, &raw).map(OptionField::SetToValue),
    }
}

fn optional_date(field: &str, value: OptionField<String>) -> Result<OptionField<NaiveDate>, AppError> {
    match value {
        OptionField::Unchanged => Ok(OptionField::Unchanged),
        OptionField::SetToNull => Ok(OptionField::SetToNull),
        OptionField::SetToValue(raw) if raw.trim().is_empty() => Ok(OptionField::SetToNull),
        OptionField::SetToValue(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(OptionField::SetToValue)
            .map_err(|_| AppError::ValidationError(format!("{} is not a valid date", field))),
    }
}

/// Explicit `null` is stored as a JSON null document, not as SQL NULL.
fn kpis_value(value: OptionField<serde_json::Value>) -> OptionField<serde_json::Value> {
    match value {
        OptionField::SetToNull => OptionField::SetToValue(serde_json::Value::Null),
        other => other,
    }
}

fn non_null<T>(field: &str, value: OptionField<T>) -> Result<OptionField<T>, AppError> {
    if value.is_set_to_null() {
        return Err(AppError::ValidationError(format!("{} cannot be null", field)));
    }
    Ok(value)
}

fn parse_status(raw: &str) -> Result<ProjectStatus, AppError> {
    raw.parse().map_err(|_| {
        AppError::ValidationError("status must be one of Draft, Published, Hidden".to_string())
    })
}

fn is_truthy(value: &OptionField<String>) -> bool {
    value.value_ref().is_some_and(|s| !s.is_empty())
}
