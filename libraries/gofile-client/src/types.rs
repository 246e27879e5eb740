//! Types for Gofile API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.gofile.io/";

/// Default upload host; `{server}` is replaced by the server lookup result.
pub const DEFAULT_UPLOAD_URL_TEMPLATE: &str = "https://{server}.gofile.io";

/// Placeholder substituted in [`ClientConfig::upload_url_template`].
pub const SERVER_PLACEHOLDER: &str = "{server}";

/// Default pause between uploads in a folder upload.
pub const DEFAULT_FOLDER_UPLOAD_DELAY: Duration = Duration::from_secs(2);

/// Configuration for a [`crate::GofileClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.gofile.io/")
    pub api_url: String,
    /// Upload host template, containing `{server}`
    pub upload_url_template: String,
    /// Account token (optional for anonymous uploads and server lookup)
    pub token: Option<String>,
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    /// User agent sent with every request
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("upload_url_template", &self.upload_url_template)
            .field("token", &redact_token(self.token.as_deref()))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Stand-in shown instead of a token in `Debug` output.
pub(crate) fn redact_token(token: Option<&str>) -> Option<&'static str> {
    token.map(|_| "<redacted>")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            upload_url_template: DEFAULT_UPLOAD_URL_TEMPLATE.to_string(),
            token: None,
            timeout: None,
            user_agent: format!("gofile-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a config for anonymous use against the public API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with an account token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Point the client at a different API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the upload host template.
    pub fn upload_url_template(mut self, template: impl Into<String>) -> Self {
        self.upload_url_template = template.into();
        self
    }

    /// Set a request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// =============================================================================
// Server Types
// =============================================================================

/// Response payload of `getServer`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerInfo {
    pub server: String,
}

// =============================================================================
// Upload Types
// =============================================================================

/// Optional fields sent with a file upload.
///
/// `description`, `password`, `tags` and `expire` are legacy fields that
/// newer API versions may ignore.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Destination folder (requires a token)
    pub folder_id: Option<String>,
    pub description: Option<String>,
    /// At least 4 characters
    pub password: Option<String>,
    /// Comma separated tags
    pub tags: Option<String>,
    /// Expiration as a unix timestamp
    pub expire: Option<i64>,
}

impl UploadOptions {
    /// Upload into the given folder.
    pub fn into_folder(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Some(folder_id.into()),
            ..Self::default()
        }
    }
}

/// Result of a successful upload.
///
/// Fields are passed through from the server untouched. Anything the server
/// sends beyond the known fields lands in `extra`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    #[serde(default)]
    pub download_page: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub parent_folder: String,
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub md5: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for uploading a whole directory.
#[derive(Debug, Clone)]
pub struct FolderUploadOptions {
    /// Destination folder; a new one is created when absent
    pub folder_id: Option<String>,
    /// Pause between consecutive uploads
    pub delay: Duration,
}

impl Default for FolderUploadOptions {
    fn default() -> Self {
        Self {
            folder_id: None,
            delay: DEFAULT_FOLDER_UPLOAD_DELAY,
        }
    }
}

impl FolderUploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Progress events reported during a folder upload.
#[derive(Debug, Clone)]
pub enum FolderUploadProgress {
    /// About to upload file `index` of `total`
    Uploading {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    /// File `index` of `total` finished
    Uploaded {
        index: usize,
        total: usize,
        result: UploadResult,
    },
    /// Pausing before the next upload
    Waiting { delay: Duration },
}
