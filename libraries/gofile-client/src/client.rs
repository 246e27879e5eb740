//! Main Gofile client and the request primitive every operation uses.

use crate::envelope::{ApiStatus, Envelope, UNKNOWN_ERROR_CODE};
use crate::error::{GofileError, Result};
use crate::types::{redact_token, ClientConfig, ServerInfo, SERVER_PLACEHOLDER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

/// Form field the account token travels in.
pub(crate) const TOKEN_FIELD: &str = "token";

const WRONG_TOKEN_CODE: &str = "wrongToken";

/// Body of an API request.
#[derive(Debug)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    /// `multipart/form-data` with one file part
    Multipart(MultipartBody),
}

/// A multipart form: plain text fields plus a single file.
#[derive(Debug)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl RequestBody {
    fn fields_mut(&mut self) -> &mut Vec<(String, String)> {
        match self {
            Self::Form(fields) => fields,
            Self::Multipart(body) => &mut body.fields,
        }
    }
}

/// Client for the Gofile API.
///
/// Holds the HTTP connection pool and an optional account token. The token
/// never changes after construction, so the client can be shared by
/// reference across concurrent calls.
///
/// # Example
///
/// ```ignore
/// use gofile_client::{ClientConfig, GofileClient};
///
/// let client = GofileClient::connect(ClientConfig::with_token("my-token")).await?;
/// let server = client.get_server().await?;
/// println!("Uploading via {}", server);
/// client.close();
/// ```
pub struct GofileClient {
    http: Client,
    api_url: Url,
    upload_url_template: String,
    token: Option<String>,
}

impl fmt::Debug for GofileClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GofileClient")
            .field("api_url", &self.api_url.as_str())
            .field("upload_url_template", &self.upload_url_template)
            .field("token", &redact_token(self.token.as_deref()))
            .finish_non_exhaustive()
    }
}

impl GofileClient {
    /// Create a new client. Performs no network I/O.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_url = normalize_api_url(&config.api_url)?;

        if !config.upload_url_template.contains(SERVER_PLACEHOLDER) {
            return Err(GofileError::InvalidArgument(format!(
                "upload URL template must contain {}",
                SERVER_PLACEHOLDER
            )));
        }

        let mut builder = Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            api_url,
            upload_url_template: config.upload_url_template,
            token: config.token,
        })
    }

    /// Create a new client and eagerly validate its token, if one is set.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        if client.has_token() {
            client.validate().await?;
        }
        Ok(client)
    }

    /// Base URL requests are sent to.
    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Release the connection pool.
    ///
    /// Dropping the client has the same effect; this makes the end of its
    /// lifetime explicit at call sites.
    pub fn close(self) {
        debug!(api_url = %self.api_url, "Closing Gofile client");
        drop(self);
    }

    pub(crate) fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(GofileError::TokenRequired)
    }

    /// Issue one API call and interpret its envelope.
    ///
    /// `endpoint` is joined to the API base URL unless it is already an
    /// absolute `http(s)` URL. When a token is set and a body is sent, the
    /// token is added as a `token` field unless the caller supplied one.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Option<RequestBody>,
        requires_token: bool,
    ) -> Result<Value> {
        if requires_token && self.token.is_none() {
            return Err(GofileError::TokenRequired);
        }

        let body = body.map(|mut body| {
            if let Some(token) = &self.token {
                inject_token(body.fields_mut(), token);
            }
            body
        });

        self.send(method, endpoint, params, body)
            .await?
            .into_result()
    }

    /// Perform the HTTP call and decode the envelope without interpreting it.
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Option<RequestBody>,
    ) -> Result<Envelope> {
        let url = self.endpoint_url(endpoint)?;
        debug!(method = %method, url = %url, "Sending Gofile request");

        let mut request = self.http.request(method, url);
        if !params.is_empty() {
            request = request.query(params);
        }

        request = match body {
            None => request,
            Some(RequestBody::Form(fields)) => request.form(&fields),
            Some(RequestBody::Multipart(body)) => request.multipart(build_multipart(body)?),
        };

        let envelope: Envelope = request.send().await?.json().await?;
        Ok(envelope)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let joined = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            Url::parse(endpoint)
        } else {
            self.api_url.join(endpoint)
        };

        joined.map_err(|e| GofileError::InvalidArgument(format!("bad endpoint {}: {}", endpoint, e)))
    }

    /// Upload endpoint on the given upload server.
    pub(crate) fn upload_url(&self, server: &str) -> String {
        let host = self.upload_url_template.replace(SERVER_PLACEHOLDER, server);
        format!("{}/uploadFile", host.trim_end_matches('/'))
    }

    /// Get the best server available to receive files.
    pub async fn get_server(&self) -> Result<String> {
        let data = self
            .request(Method::GET, "getServer", &[], None, false)
            .await?;

        let info: ServerInfo = serde_json::from_value(data)
            .map_err(|_| GofileError::ResponseError(UNKNOWN_ERROR_CODE.to_string()))?;

        debug!(server = %info.server, "Resolved upload server");
        Ok(info.server)
    }

    /// Get information about the account the token belongs to.
    pub async fn get_account(&self) -> Result<Value> {
        let token = self.require_token()?;
        self.request(
            Method::GET,
            "getAccountDetails",
            &[(TOKEN_FIELD, token), ("allDetails", "true")],
            None,
            true,
        )
        .await
    }

    /// Check whether an arbitrary token is accepted by the server.
    ///
    /// Returns `false` for a rejected token; any other failure status is
    /// surfaced as [`GofileError::ResponseError`].
    pub async fn check_token(&self, token: &str) -> Result<bool> {
        let envelope = self
            .send(
                Method::GET,
                "getAccountDetails",
                &[(TOKEN_FIELD, token), ("allDetails", "true")],
                None,
            )
            .await?;

        match envelope.status() {
            ApiStatus::Ok => Ok(true),
            ApiStatus::Error(code) if code == WRONG_TOKEN_CODE => Ok(false),
            ApiStatus::Error(code) => Err(GofileError::ResponseError(code)),
        }
    }

    /// Validate the token this client was built with.
    pub async fn validate(&self) -> Result<()> {
        let token = self.require_token()?;

        if self.check_token(token).await? {
            info!("Gofile token validated");
            Ok(())
        } else {
            warn!("Gofile token rejected by server");
            Err(GofileError::TokenInvalid)
        }
    }
}

/// Parse and normalize the API base URL so it ends with exactly one `/`.
fn normalize_api_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GofileError::InvalidArgument("API URL cannot be empty".into()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(GofileError::InvalidArgument(
            "API URL must start with http:// or https://".into(),
        ));
    }

    let normalized = format!("{}/", trimmed.trim_end_matches('/'));
    Url::parse(&normalized)
        .map_err(|e| GofileError::InvalidArgument(format!("invalid API URL {}: {}", raw, e)))
}

fn inject_token(fields: &mut Vec<(String, String)>, token: &str) {
    if !fields.iter().any(|(name, _)| name == TOKEN_FIELD) {
        fields.push((TOKEN_FIELD.to_string(), token.to_string()));
    }
}

fn build_multipart(body: MultipartBody) -> Result<Form> {
    let file_part = Part::bytes(body.contents)
        .file_name(body.file_name)
        .mime_str(&body.mime_type)?;

    let mut form = Form::new().part(body.file_field, file_part);
    for (name, value) in body.fields {
        form = form.text(name, value);
    }
    Ok(form)
}
