//! Folder and content management.

use crate::client::{GofileClient, RequestBody, TOKEN_FIELD};
use crate::error::{GofileError, Result};
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Option that can be set on a file or folder with `setOption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentOption {
    /// "true" or "false"
    Public,
    Password,
    Description,
    /// Unix timestamp
    Expire,
    /// Comma separated list
    Tags,
    /// "true" or "false", files only
    DirectLink,
}

impl ContentOption {
    pub const ALL: [ContentOption; 6] = [
        Self::Public,
        Self::Password,
        Self::Description,
        Self::Expire,
        Self::Tags,
        Self::DirectLink,
    ];

    /// Name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Password => "password",
            Self::Description => "description",
            Self::Expire => "expire",
            Self::Tags => "tags",
            Self::DirectLink => "directLink",
        }
    }
}

impl fmt::Display for ContentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentOption {
    type Err = GofileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| GofileError::InvalidOption(s.to_string()))
    }
}

impl GofileClient {
    /// Create a folder under `parent_folder_id`.
    pub async fn create_folder(&self, parent_folder_id: &str, folder_name: &str) -> Result<Value> {
        self.require_token()?;

        let data = self
            .request(
                Method::PUT,
                "createFolder",
                &[],
                Some(form(&[
                    ("parentFolderId", parent_folder_id),
                    ("folderName", folder_name),
                ])),
                true,
            )
            .await?;

        info!(parent = %parent_folder_id, name = %folder_name, "Folder created");
        Ok(data)
    }

    /// Set an option on a file or folder, by option name.
    ///
    /// Unknown names fail with [`GofileError::InvalidOption`] before any
    /// request is made.
    pub async fn set_option(&self, content_id: &str, option: &str, value: &str) -> Result<Value> {
        self.require_token()?;
        let option: ContentOption = option.parse()?;
        self.set_content_option(content_id, option, value).await
    }

    /// Set an option on a file or folder.
    pub async fn set_content_option(
        &self,
        content_id: &str,
        option: ContentOption,
        value: &str,
    ) -> Result<Value> {
        self.require_token()?;

        self.request(
            Method::PUT,
            "setOption",
            &[],
            Some(form(&[
                ("contentId", content_id),
                ("option", option.as_str()),
                ("value", value),
            ])),
            true,
        )
        .await
    }

    /// Copy one or more contents into another folder.
    pub async fn copy_content<S: AsRef<str>>(
        &self,
        content_ids: &[S],
        dest_folder_id: &str,
    ) -> Result<Value> {
        self.require_token()?;
        let contents_id = join_ids(content_ids)?;

        self.request(
            Method::PUT,
            "copyContent",
            &[],
            Some(form(&[
                ("contentsId", contents_id.as_str()),
                ("folderIdDest", dest_folder_id),
            ])),
            true,
        )
        .await
    }

    /// Delete one or more files or folders.
    pub async fn delete_content<S: AsRef<str>>(&self, content_ids: &[S]) -> Result<Value> {
        self.require_token()?;
        let contents_id = join_ids(content_ids)?;

        let data = self
            .request(
                Method::DELETE,
                "deleteContent",
                &[],
                Some(form(&[("contentsId", contents_id.as_str())])),
                true,
            )
            .await?;

        info!(contents = %contents_id, "Content deleted");
        Ok(data)
    }

    /// Get details of a single file or folder.
    pub async fn get_content(&self, content_id: &str) -> Result<Value> {
        let token = self.require_token()?;

        self.request(
            Method::GET,
            "getContent",
            &[("contentId", content_id), (TOKEN_FIELD, token)],
            None,
            true,
        )
        .await
    }
}

fn form(fields: &[(&str, &str)]) -> RequestBody {
    RequestBody::Form(
        fields
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect(),
    )
}

fn join_ids<S: AsRef<str>>(content_ids: &[S]) -> Result<String> {
    if content_ids.is_empty() {
        return Err(GofileError::InvalidArgument(
            "at least one content id is required".into(),
        ));
    }

    Ok(content_ids
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_names_round_trip() {
        for option in ContentOption::ALL {
            assert_eq!(option.as_str().parse::<ContentOption>().unwrap(), option);
        }
        assert_eq!(ContentOption::DirectLink.to_string(), "directLink");
    }

    #[test]
    fn test_unknown_option_rejected() {
        match "bogus".parse::<ContentOption>() {
            Err(GofileError::InvalidOption(name)) => assert_eq!(name, "bogus"),
            other => panic!("Expected InvalidOption, got: {:?}", other),
        }
        // Names are case sensitive on the wire
        assert!("Public".parse::<ContentOption>().is_err());
        assert!("directlink".parse::<ContentOption>().is_err());
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&["a"]).unwrap(), "a");
        assert_eq!(join_ids(&["a", "b", "c"]).unwrap(), "a,b,c");
        assert_eq!(join_ids(&["x".to_string(), "y".to_string()][..]).unwrap(), "x,y");

        let empty: [&str; 0] = [];
        assert!(matches!(
            join_ids(&empty),
            Err(GofileError::InvalidArgument(_))
        ));
    }
}
