use bytes::Bytes;
use log::debug;
use reqwest::{
    Client,
    header::{self, HeaderValue},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Config, TaskError, TaskResult};

/// Authenticated handle on the vendor endpoints.
pub struct DashScope {
    client: Client,
    api_key: String,
    config: Config,
}

/// Status and raw body of an API call, kept as text so error bodies can be shown verbatim.
#[derive(Debug)]
pub struct RawResponse {
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// Error envelope of both API families: `{code, message}` on the native API,
/// `{error: {code, message}}` on the OpenAI-compatible one.
///
/// `code` and `message` stay untyped; the native API sends numbers, bools and objects too.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    error: Option<NestedError>,
}

#[derive(Debug, Deserialize)]
struct NestedError {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    r#type: Option<Value>,
    message: Value,
}

/// Non-empty strings and collections, non-zero numbers and `true`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Bool(b) => *b,
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Null => false,
    }
}

/// Strings verbatim, anything else as compact JSON.
fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl RawResponse {
    /// The vendor's own error report, if the body carries a truthy error code or an error object.
    pub fn vendor_error(&self) -> Option<TaskError> {
        let body: ErrorBody = serde_json::from_str(&self.body).ok()?;

        if let Some(err) = body.error {
            let code = err
                .code
                .filter(is_truthy)
                .or(err.r#type.filter(is_truthy))
                .map(text_of)
                .unwrap_or_else(|| self.status.to_string());
            return Some(TaskError::VendorApi {
                code,
                message: text_of(err.message),
            });
        }

        let code = text_of(body.code.filter(is_truthy)?);
        Some(TaskError::VendorApi {
            message: body.message.map(text_of).unwrap_or_else(|| code.clone()),
            code,
        })
    }

    /// Vendor errors take precedence over the bare HTTP status.
    pub fn ensure_success(&self, url: &str) -> TaskResult<()> {
        if let Some(err) = self.vendor_error() {
            return Err(err);
        }
        if !self.status.is_success() {
            return Err(TaskError::HttpStatus {
                url: url.to_string(),
                status: self.status,
                body: self.body.clone(),
            });
        }
        Ok(())
    }
}

impl DashScope {
    pub fn new(api_key: String, config: Config) -> TaskResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// POSTs `payload` as UTF-8 JSON. Non-ASCII text is sent literally.
    pub async fn post_json<T: Serialize>(&self, url: &str, payload: &T) -> TaskResult<RawResponse> {
        let body = serde_json::to_vec(payload)?;
        debug!("POST {url}\n{}", String::from_utf8_lossy(&body));

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!("Response {status}:\n{body}");
        Ok(RawResponse { status, body })
    }

    /// Fetches a result URL handed out by the API. These are pre-signed, so no auth header.
    pub async fn download(&self, url: &str) -> TaskResult<Bytes> {
        debug!("GET {url}");
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TaskError::HttpStatus {
                url: url.to_string(),
                status,
                body,
            });
        }
        Ok(resp.bytes().await?)
    }
}
