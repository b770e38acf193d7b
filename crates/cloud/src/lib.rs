//! S3-compatible object storage client (Cloudflare R2).
//!
//! Uploads scan images and returns stable, publicly dereferenceable URLs.
//! When the R2 credentials are absent the client runs in mock mode and
//! returns deterministic placeholder URLs so development environments and
//! tests keep working without object storage.

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const DEFAULT_BUCKET: &str = "cellar";
const DEFAULT_PUBLIC_BASE_URL: &str = "https://storage.cellar.example";

/// Object storage configuration.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: String,
    pub public_base_url: String,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                         |
    /// |------------------------|---------------------------------|
    /// | `R2_ACCOUNT_ID`        | (unset -> mock mode)            |
    /// | `R2_ACCESS_KEY_ID`     | (unset -> mock mode)            |
    /// | `R2_SECRET_ACCESS_KEY` | (unset -> mock mode)            |
    /// | `R2_BUCKET_NAME`       | `cellar`                        |
    /// | `R2_PUBLIC_URL`        | `https://storage.cellar.example`|
    pub fn from_env() -> Self {
        Self {
            account_id: env_opt("R2_ACCOUNT_ID"),
            access_key_id: env_opt("R2_ACCESS_KEY_ID"),
            secret_access_key: env_opt("R2_SECRET_ACCESS_KEY"),
            bucket: env_opt("R2_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            public_base_url: env_opt("R2_PUBLIC_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The upload request to the storage backend failed.
    #[error("Upload failed: {0}")]
    Upload(String),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Object storage client for scan images.
pub struct StorageClient {
    client: Option<aws_sdk_s3::Client>,
    bucket: String,
    public_base_url: String,
}

impl StorageClient {
    /// Build a client from configuration.
    ///
    /// All three credential values must be present for real uploads;
    /// otherwise the client stays in mock mode.
    pub fn new(config: &StorageConfig) -> Self {
        let client = match (
            &config.account_id,
            &config.access_key_id,
            &config.secret_access_key,
        ) {
            (Some(account), Some(key), Some(secret)) => {
                let credentials = Credentials::new(key, secret, None, None, "cellar-r2");
                let endpoint = format!("https://{account}.r2.cloudflarestorage.com");
                let conf = aws_sdk_s3::config::Builder::new()
                    .behavior_version(BehaviorVersion::latest())
                    .region(Region::new("auto"))
                    .endpoint_url(endpoint)
                    .credentials_provider(credentials)
                    .build();
                Some(aws_sdk_s3::Client::from_conf(conf))
            }
            _ => {
                tracing::warn!("Object storage credentials not configured; using mock upload URLs");
                None
            }
        };

        Self {
            client,
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Whether real uploads are configured.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Upload a scan image and return its public URL.
    ///
    /// `logical_id` is the caller-assigned identifier (scan id, batch
    /// session id, or refine image id) that names the object. In mock mode
    /// a deterministic placeholder URL is returned without any network
    /// call.
    pub async fn upload_scan_image(
        &self,
        content: Vec<u8>,
        logical_id: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        let Some(client) = &self.client else {
            return Ok(format!("{}/scans/{logical_id}.jpg", self.public_base_url));
        };

        let ext = file_extension(filename);
        let key = format!("scans/{logical_id}{ext}");
        let content_type = content_type_for(filename);

        client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(content))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        Ok(format!("{}/{key}", self.public_base_url))
    }
}

// ---------------------------------------------------------------------------
// Filename helpers
// ---------------------------------------------------------------------------

/// Lowercased extension including the dot, defaulting to `.jpg`.
fn file_extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_else(|| ".jpg".to_string())
}

/// MIME type for an uploaded image, from its filename extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = std::path::Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
