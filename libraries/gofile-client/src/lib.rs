//! Gofile Client
//!
//! Async HTTP client library for the Gofile file hosting API.
//!
//! # Features
//!
//! - **Account**: token validation, account details
//! - **Upload**: single files, or a whole directory into one folder
//! - **Content**: create folders, set options, copy, delete, inspect
//! - **Blocking**: a synchronous wrapper for non-async callers
//!
//! Every response is a `{status, data}` envelope. A status of `"ok"` yields
//! `data` unchanged; `"error-<reason>"` becomes
//! [`GofileError::ResponseError`] carrying `<reason>`.
//!
//! # Example
//!
//! ```ignore
//! use gofile_client::{ClientConfig, FolderUploadOptions, GofileClient, UploadOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Anonymous upload
//!     let client = GofileClient::new(ClientConfig::new())?;
//!     let uploaded = client
//!         .upload(Path::new("report.pdf"), &UploadOptions::default())
//!         .await?;
//!     println!("Download page: {}", uploaded.download_page);
//!
//!     // Account operations need a validated token
//!     let client = GofileClient::connect(ClientConfig::with_token("my-token")).await?;
//!     let results = client
//!         .upload_folder(Path::new("photos"), &FolderUploadOptions::default())
//!         .await?;
//!     println!("Uploaded {} files", results.len());
//!
//!     client.close();
//!     Ok(())
//! }
//! ```

mod blocking;
mod client;
mod content;
mod envelope;
mod error;
mod types;
mod upload;

// Re-export main types
pub use blocking::BlockingGofileClient;
pub use client::{GofileClient, MultipartBody, RequestBody};
pub use content::ContentOption;
pub use envelope::{ApiStatus, Envelope, UNKNOWN_ERROR_CODE};
pub use error::{GofileError, Result};
pub use types::{
    ClientConfig, FolderUploadOptions, FolderUploadProgress, ServerInfo, UploadOptions,
    UploadResult, DEFAULT_API_URL, DEFAULT_FOLDER_UPLOAD_DELAY, DEFAULT_UPLOAD_URL_TEMPLATE,
};
pub use upload::MIN_PASSWORD_LEN;

// Re-exported so callers of `GofileClient::request` need not depend on reqwest
pub use reqwest::Method;
