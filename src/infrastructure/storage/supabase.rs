use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::fmt;
use zeroize::Zeroizing;

use crate::{
    errors::StorageError,
    settings::AppConfig,
    storage::object_storage::{ObjectStorage, SignedUpload},
};

#[derive(Deserialize)]
struct SignUploadBody {
    url: String,
}

/// Supabase Storage over its REST API, authenticated with the service-role key.
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_role: Zeroizing<String>,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: Client, base_url: &str, service_role: &str, bucket: &str) -> Self {
        SupabaseStorage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role: Zeroizing::new(service_role.to_string()),
            bucket: bucket.to_string(),
        }
    }

    /// `None` unless url, service role and bucket are all set.
    pub fn from_config(config: &AppConfig, client: Client) -> Option<Self> {
        let settings = config.supabase()?;
        Some(Self::new(client, settings.url, settings.service_role, settings.bucket))
    }

    fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.base_url)
    }

    fn public_prefix(&self) -> String {
        format!("{}/object/public/{}/", self.storage_url(), self.bucket)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(self.service_role.as_str())
            .header("apikey", self.service_role.as_str())
    }
}

impl fmt::Debug for SupabaseStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseStorage")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .field("service_role", &"[REDACTED]")
            .finish()
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Turns a non-2xx response into `Rejected`, preferring the JSON `message` field.
async fn ensure_success(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);

    Err(StorageError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn create_signed_upload(&self, path: &str) -> Result<SignedUpload, StorageError> {
        let endpoint = format!(
            "{}/object/upload/sign/{}/{}",
            self.storage_url(),
            self.bucket,
            encode_path(path)
        );

        let response = self
            .authorized(self.client.post(&endpoint))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body: SignUploadBody = ensure_success(response).await?.json().await?;

        let signed_url = url::Url::parse(&format!("{}{}", self.storage_url(), body.url))
            .map_err(|e| StorageError::InvalidResponse(format!("bad signed url: {}", e)))?;

        let token = signed_url
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| StorageError::InvalidResponse("signed url has no token".into()))?;

        tracing::debug!(path, "Signed upload created");

        Ok(SignedUpload {
            path: path.to_string(),
            token,
            signed_url: signed_url.to_string(),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_prefix(), path)
    }

    fn object_path(&self, public_url: &str) -> Option<String> {
        let rest = public_url.strip_prefix(&self.public_prefix())?;
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        if rest.is_empty() {
            return None;
        }

        urlencoding::decode(rest).map(|path| path.into_owned()).ok()
    }

    async fn remove(&self, paths: Vec<String>) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }

        let endpoint = format!("{}/object/{}", self.storage_url(), self.bucket);
        let response = self
            .authorized(self.client.delete(&endpoint))
            .json(&serde_json::json!({ "prefixes": &paths }))
            .send()
            .await?;
        ensure_success(response).await?;

        tracing::debug!(count = paths.len(), "Storage objects removed");
        Ok(())
    }
}
