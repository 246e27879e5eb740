//! Synchronous wrapper around [`GofileClient`].

use crate::client::GofileClient;
use crate::content::ContentOption;
use crate::error::{GofileError, Result};
use crate::types::{
    ClientConfig, FolderUploadOptions, FolderUploadProgress, UploadOptions, UploadResult,
};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use tokio::runtime::{Builder, Runtime};

/// Blocking Gofile client.
///
/// Owns a single-threaded tokio runtime and drives each call to completion
/// on it. Do not use from inside an async context; use [`GofileClient`]
/// there instead.
#[derive(Debug)]
pub struct BlockingGofileClient {
    inner: GofileClient,
    runtime: Runtime,
}

impl BlockingGofileClient {
    /// Create a client without touching the network.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let runtime = build_runtime()?;
        let inner = GofileClient::new(config)?;
        Ok(Self { inner, runtime })
    }

    /// Create a client and validate its token, if one is set.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(GofileClient::connect(config))?;
        Ok(Self { inner, runtime })
    }

    /// The async client this wraps.
    pub fn inner(&self) -> &GofileClient {
        &self.inner
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn validate(&self) -> Result<()> {
        self.block_on(self.inner.validate())
    }

    pub fn check_token(&self, token: &str) -> Result<bool> {
        self.block_on(self.inner.check_token(token))
    }

    pub fn get_server(&self) -> Result<String> {
        self.block_on(self.inner.get_server())
    }

    pub fn get_account(&self) -> Result<Value> {
        self.block_on(self.inner.get_account())
    }

    pub fn upload(&self, file_path: &Path, options: &UploadOptions) -> Result<UploadResult> {
        self.block_on(self.inner.upload(file_path, options))
    }

    pub fn upload_folder(
        &self,
        dir: &Path,
        options: &FolderUploadOptions,
    ) -> Result<Vec<UploadResult>> {
        self.block_on(self.inner.upload_folder(dir, options))
    }

    pub fn upload_folder_with_progress<F>(
        &self,
        dir: &Path,
        options: &FolderUploadOptions,
        progress_callback: F,
    ) -> Result<Vec<UploadResult>>
    where
        F: FnMut(FolderUploadProgress),
    {
        self.block_on(
            self.inner
                .upload_folder_with_progress(dir, options, progress_callback),
        )
    }

    pub fn create_folder(&self, parent_folder_id: &str, folder_name: &str) -> Result<Value> {
        self.block_on(self.inner.create_folder(parent_folder_id, folder_name))
    }

    pub fn set_option(&self, content_id: &str, option: &str, value: &str) -> Result<Value> {
        self.block_on(self.inner.set_option(content_id, option, value))
    }

    pub fn set_content_option(
        &self,
        content_id: &str,
        option: ContentOption,
        value: &str,
    ) -> Result<Value> {
        self.block_on(self.inner.set_content_option(content_id, option, value))
    }

    pub fn copy_content<S: AsRef<str>>(
        &self,
        content_ids: &[S],
        dest_folder_id: &str,
    ) -> Result<Value> {
        self.block_on(self.inner.copy_content(content_ids, dest_folder_id))
    }

    pub fn delete_content<S: AsRef<str>>(&self, content_ids: &[S]) -> Result<Value> {
        self.block_on(self.inner.delete_content(content_ids))
    }

    pub fn get_content(&self, content_id: &str) -> Result<Value> {
        self.block_on(self.inner.get_content(content_id))
    }

    /// Release the connection pool and shut the runtime down.
    pub fn close(self) {
        let Self { inner, runtime } = self;
        inner.close();
        drop(runtime);
    }
}

fn build_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| GofileError::InvalidArgument(format!("cannot start runtime: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_required_without_network() {
        let client = BlockingGofileClient::new(ClientConfig::new()).unwrap();

        assert!(matches!(client.get_account(), Err(GofileError::TokenRequired)));
        assert!(matches!(
            client.delete_content(&["a"]),
            Err(GofileError::TokenRequired)
        ));
        client.close();
    }

    #[test]
    fn test_invalid_option_without_network() {
        let client = BlockingGofileClient::new(ClientConfig::with_token("t")).unwrap();

        match client.set_option("c1", "bogus", "v") {
            Err(GofileError::InvalidOption(name)) => assert_eq!(name, "bogus"),
            other => panic!("Expected InvalidOption, got: {:?}", other),
        }
    }
}
