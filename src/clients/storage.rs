use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use uuid::Uuid;

use super::ClientError;

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores the file and returns its public URL.
    async fn upload(&self, file: UploadedFile) -> Result<String, ClientError>;
}

/// Uploads into a Google Cloud Storage bucket (what Firebase Storage runs on).
#[derive(Clone)]
pub struct GcsObjectStore {
    client: Client,
    base_url: String,
    bucket: String,
    access_token: String,
}

impl GcsObjectStore {
    pub fn new(base_url: &str, bucket: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            access_token: access_token.to_string(),
        }
    }

    fn object_name(file_name: &str) -> String {
        let safe: String = file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("backgrounds/{}-{}", Uuid::new_v4(), safe)
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn upload(&self, file: UploadedFile) -> Result<String, ClientError> {
        let name = Self::object_name(&file.file_name);
        let content_type = file
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let resp = self
            .client
            .post(format!(
                "{}/upload/storage/v1/b/{}/o",
                self.base_url, self.bucket
            ))
            .query(&[("uploadType", "media"), ("name", name.as_str())])
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(file.bytes)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::from_response("object storage", resp).await);
        }

        let url = format!("{}/{}/{}", self.base_url, self.bucket, name);
        tracing::info!(%url, "uploaded object");
        Ok(url)
    }
}
