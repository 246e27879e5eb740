//! File and folder uploads.

use crate::client::{GofileClient, MultipartBody, RequestBody};
use crate::envelope::UNKNOWN_ERROR_CODE;
use crate::error::{GofileError, Result};
use crate::types::{FolderUploadOptions, FolderUploadProgress, UploadOptions, UploadResult};
use reqwest::Method;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Minimum accepted password length for uploads.
pub const MIN_PASSWORD_LEN: usize = 4;

const FILE_FIELD: &str = "file";

impl GofileClient {
    /// Upload a single file.
    ///
    /// # Arguments
    /// * `file_path` - Path to an existing regular file
    /// * `options` - Destination folder and legacy upload fields
    ///
    /// # Returns
    /// The server's description of the uploaded file.
    pub async fn upload(&self, file_path: &Path, options: &UploadOptions) -> Result<UploadResult> {
        if !file_path.is_file() {
            return Err(GofileError::InvalidPath(format!(
                "No such file - {}",
                file_path.display()
            )));
        }

        if let Some(password) = &options.password {
            if password.chars().count() < MIN_PASSWORD_LEN {
                return Err(GofileError::InvalidArgument(format!(
                    "password must be at least {} characters",
                    MIN_PASSWORD_LEN
                )));
            }
        }

        if options.folder_id.is_some() && !self.has_token() {
            return Err(GofileError::TokenRequired);
        }

        let file_name = upload_file_name(file_path);

        let contents = tokio::fs::read(file_path).await.map_err(|e| {
            GofileError::InvalidPath(format!("cannot read {}: {}", file_path.display(), e))
        })?;
        let file_size = contents.len();

        let server = self.get_server().await?;
        let url = self.upload_url(&server);
        debug!(file = %file_path.display(), server = %server, "Uploading file");

        let body = MultipartBody {
            fields: upload_fields(options),
            file_field: FILE_FIELD.to_string(),
            file_name: file_name.clone(),
            mime_type: mime_type_for_file(file_path),
            contents,
        };

        let data = self
            .request(Method::POST, &url, &[], Some(RequestBody::Multipart(body)), false)
            .await?;
        let result = decode_upload_result(data)?;

        info!(
            file = %file_name,
            size = file_size,
            file_id = %result.file_id,
            parent_folder = %result.parent_folder,
            "File uploaded"
        );

        Ok(result)
    }

    /// Upload every file under a directory into one Gofile folder.
    ///
    /// See [`GofileClient::upload_folder_with_progress`].
    pub async fn upload_folder(
        &self,
        dir: &Path,
        options: &FolderUploadOptions,
    ) -> Result<Vec<UploadResult>> {
        self.upload_folder_with_progress(dir, options, |_| {}).await
    }

    /// Upload every file under a directory, reporting progress.
    ///
    /// Files are found depth-first with each directory's entries sorted by
    /// name, and uploaded one at a time with `options.delay` between
    /// consecutive uploads. Without `options.folder_id` a new folder named
    /// after the current time is created under the account's root folder.
    /// A token is required either way.
    ///
    /// The first failed upload aborts the batch.
    pub async fn upload_folder_with_progress<F>(
        &self,
        dir: &Path,
        options: &FolderUploadOptions,
        mut progress_callback: F,
    ) -> Result<Vec<UploadResult>>
    where
        F: FnMut(FolderUploadProgress),
    {
        if !dir.is_dir() {
            return Err(GofileError::InvalidPath(format!(
                "{} is not a valid directory",
                dir.display()
            )));
        }
        self.require_token()?;

        let files = collect_files(dir)?;
        let total = files.len();

        let folder_id = match &options.folder_id {
            Some(id) => id.clone(),
            None => self.create_upload_folder().await?,
        };
        debug!(dir = %dir.display(), files = total, folder_id = %folder_id, "Uploading folder");

        let upload_options = UploadOptions::into_folder(folder_id);
        let mut results = Vec::with_capacity(total);

        for (index, path) in files.into_iter().enumerate() {
            if index > 0 {
                progress_callback(FolderUploadProgress::Waiting {
                    delay: options.delay,
                });
                tokio::time::sleep(options.delay).await;
            }

            progress_callback(FolderUploadProgress::Uploading {
                index,
                total,
                path: path.clone(),
            });

            let result = match self.upload(&path, &upload_options).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(file = %path.display(), index, total, error = %e, "Folder upload aborted");
                    return Err(e);
                }
            };

            progress_callback(FolderUploadProgress::Uploaded {
                index,
                total,
                result: result.clone(),
            });
            results.push(result);
        }

        Ok(results)
    }

    /// Create the timestamped destination folder for a folder upload.
    async fn create_upload_folder(&self) -> Result<String> {
        let account = self.get_account().await?;
        let root_folder = string_field(&account, &["rootFolder"])?;

        let name = format!(
            "Gofile Upload - Created on {}",
            chrono::Local::now().format("%b %d, %Y %I:%M%p")
        );

        let folder = self.create_folder(&root_folder, &name).await?;
        let folder_id = string_field(&folder, &["id", "folderId"])?;

        info!(folder_id = %folder_id, name = %name, "Created upload folder");
        Ok(folder_id)
    }
}

/// Name sent for the file part; non-UTF-8 bytes are replaced, not dropped.
fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FILE_FIELD.to_string())
}

/// Form fields for the optional upload settings that are present.
fn upload_fields(options: &UploadOptions) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let text_fields = [
        ("folderId", &options.folder_id),
        ("description", &options.description),
        ("password", &options.password),
        ("tags", &options.tags),
    ];
    for (name, value) in text_fields {
        if let Some(value) = value {
            fields.push((name.to_string(), value.clone()));
        }
    }
    if let Some(expire) = options.expire {
        fields.push(("expire".to_string(), expire.to_string()));
    }
    fields
}

fn decode_upload_result(data: Value) -> Result<UploadResult> {
    match data {
        Value::Object(_) => serde_json::from_value(data).map_err(|e| {
            warn!(error = %e, "Unexpected upload payload");
            unknown_response()
        }),
        Value::Null => Ok(UploadResult::default()),
        other => {
            warn!(payload = %other, "Unexpected upload payload");
            Err(unknown_response())
        }
    }
}

/// First string value found under any of `keys`.
fn string_field(data: &Value, keys: &[&str]) -> Result<String> {
    keys.iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| {
            warn!(fields = ?keys, "Expected field missing from response");
            unknown_response()
        })
}

fn unknown_response() -> GofileError {
    GofileError::ResponseError(UNKNOWN_ERROR_CODE.to_string())
}

/// Every regular file under `dir`, depth-first, sorted by name per directory.
pub(crate) fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            GofileError::InvalidPath(format!("cannot read {}: {}", dir.display(), e))
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Get MIME type for a file from its extension.
fn mime_type_for_file(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for_file(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_type_for_file(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_type_for_file(Path::new("scan.png")), "image/png");
        assert_eq!(mime_type_for_file(Path::new("report.pdf")), "application/pdf");
        assert_eq!(
            mime_type_for_file(Path::new("blob.unknownext")),
            "application/octet-stream"
        );
        assert_eq!(
            mime_type_for_file(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_upload_file_name() {
        assert_eq!(upload_file_name(Path::new("/tmp/dir/report.pdf")), "report.pdf");
        assert_eq!(upload_file_name(Path::new("/")), "file");
    }

    #[cfg(unix)]
    #[test]
    fn test_upload_file_name_keeps_non_utf8_names_recognizable() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/tmp").join(OsStr::from_bytes(b"caf\xe9 menu.txt"));
        assert_eq!(upload_file_name(&path), "caf\u{FFFD} menu.txt");
    }

    #[test]
    fn test_upload_fields_only_present_values() {
        let fields = upload_fields(&UploadOptions::default());
        assert!(fields.is_empty());

        let options = UploadOptions {
            folder_id: Some("f1".into()),
            description: None,
            password: Some("hunter2".into()),
            tags: Some("a,b".into()),
            expire: Some(1_700_000_000),
        };
        let fields = upload_fields(&options);
        assert_eq!(
            fields,
            vec![
                ("folderId".to_string(), "f1".to_string()),
                ("password".to_string(), "hunter2".to_string()),
                ("tags".to_string(), "a,b".to_string()),
                ("expire".to_string(), "1700000000".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_files_is_sorted_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b_dir/nested")).unwrap();
        fs::create_dir_all(root.join("a_dir")).unwrap();
        fs::write(root.join("z.txt"), b"z").unwrap();
        fs::write(root.join("a_dir/one.txt"), b"1").unwrap();
        fs::write(root.join("b_dir/two.txt"), b"2").unwrap();
        fs::write(root.join("b_dir/nested/three.txt"), b"3").unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();

        let files: Vec<PathBuf> = collect_files(root)
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            vec![
                PathBuf::from("a_dir/one.txt"),
                PathBuf::from("b_dir/nested/three.txt"),
                PathBuf::from("b_dir/two.txt"),
                PathBuf::from("z.txt"),
            ]
        );
    }

    #[test]
    fn test_collect_files_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_decode_upload_result_keeps_extra_fields() {
        let result = decode_upload_result(json!({
            "downloadPage": "https://gofile.io/d/abc",
            "code": "abc",
            "parentFolder": "p1",
            "fileId": "f1",
            "fileName": "a.txt",
            "md5": "d41d8cd98f00b204e9800998ecf8427e",
            "guestToken": "g1"
        }))
        .unwrap();

        assert_eq!(result.download_page, "https://gofile.io/d/abc");
        assert_eq!(result.parent_folder, "p1");
        assert_eq!(result.file_id, "f1");
        assert_eq!(result.extra.get("guestToken"), Some(&json!("g1")));
    }

    #[test]
    fn test_string_field_fallback_keys() {
        let data = json!({"folderId": "x"});
        assert_eq!(string_field(&data, &["id", "folderId"]).unwrap(), "x");
        match string_field(&json!({}), &["rootFolder"]) {
            Err(GofileError::ResponseError(code)) => assert_eq!(code, UNKNOWN_ERROR_CODE),
            other => panic!("Expected ResponseError, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_upload_result_rejects_non_object() {
        for data in [json!("weird"), json!(42), json!(["a"])] {
            match decode_upload_result(data) {
                Err(GofileError::ResponseError(code)) => assert_eq!(code, UNKNOWN_ERROR_CODE),
                other => panic!("Expected ResponseError, got: {:?}", other),
            }
        }
    }
}
