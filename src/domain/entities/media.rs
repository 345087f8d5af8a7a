use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const IMAGE_KIND: &str = "image";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: Uuid,
    pub project_id: Uuid,
    pub kind: String,
    pub url: String,
    pub caption: Option<String>,
    pub sort: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaInsert {
    pub project_id: Uuid,
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewMediaRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMediaRequest {
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUploadRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadResponse {
    pub path: String,
    pub token: String,
    pub signed_url: String,
    pub public_url: String,
}

/// Next display position for a project's gallery.
///
/// Append-only: the value is one past the current maximum, or 1 for an empty gallery.
pub fn next_sort(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_media_gets_sort_one() {
        assert_eq!(next_sort(None), 1);
    }

    #[test]
    fn next_sort_follows_max_even_with_gaps() {
        // 1, 3 remain after deleting 2
        assert_eq!(next_sort(Some(3)), 4);
    }

    #[test]
    fn sign_upload_request_reads_camel_case() {
        let req: SignUploadRequest =
            serde_json::from_str(r#"{"projectId": "p1", "filename": "shot.png"}"#).unwrap();
        assert_eq!(req.project_id.as_deref(), Some("p1"));
        assert_eq!(req.filename.as_deref(), Some("shot.png"));
    }
}
