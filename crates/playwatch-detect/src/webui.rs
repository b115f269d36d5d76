//! The `variables.html` protocol: fetch, decode, extract, normalize.
//!
//! One call of each per tick, strictly in that order. Nothing is carried
//! over between ticks.

pub mod decode;
pub mod normalize;
pub mod variables;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

pub use decode::decode;
pub use normalize::normalize;
pub use variables::RawVariableSet;

/// A response that fetched fine but could not be turned into a status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed response: variable `{key}` {reason}")]
pub struct MalformedResponse {
    pub key: String,
    pub reason: String,
}

impl MalformedResponse {
    pub(crate) fn missing(key: &str) -> Self {
        Self {
            key: key.to_string(),
            reason: "is missing".into(),
        }
    }

    pub(crate) fn invalid(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            reason: format!("has unexpected value {value:?}"),
        }
    }
}

/// Body bytes plus the declared `Content-Type`, if any.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Issue one GET. Transport errors and non-success statuses are returned
/// as-is; retrying is the caller's business.
pub async fn fetch_raw(http: &Client, url: &str) -> Result<RawResponse, reqwest::Error> {
    let resp = http.get(url).send().await?.error_for_status()?;
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.bytes().await?.to_vec();
    Ok(RawResponse { body, content_type })
}
