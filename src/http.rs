// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};

/// Response to a HEAD request, headers only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Length header value, if present
    pub content_length: Option<u64>,
    /// Content-Type header value, if present
    pub content_type: Option<String>,
}

/// The one HTTP operation feed building needs, behind a seam for tests
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch the headers of a resource, following redirects
    async fn head(&self, url: &str) -> Result<HeadResponse, reqwest::Error>;
}

/// `HttpClient` backed by a shared reqwest client
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured client, e.g. with a proxy or custom timeouts
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn head(&self, url: &str) -> Result<HeadResponse, reqwest::Error> {
        let response = self.client.head(url).send().await?;
        let headers = response.headers();

        // Read the header directly; the body size hint of a HEAD response is empty
        let length = headers.get(CONTENT_LENGTH).and_then(|v| v.to_str().ok());
        let mime = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

        Ok(HeadResponse {
            status: response.status().as_u16(),
            content_length: length.and_then(parse_length),
            content_type: mime.and_then(media_type),
        })
    }
}

fn parse_length(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

/// `audio/mpeg; charset=binary` -> `audio/mpeg`
fn media_type(value: &str) -> Option<String> {
    let essence = value.split(';').next().unwrap_or(value).trim();
    (!essence.is_empty()).then(|| essence.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_drops_parameters() {
        assert_eq!(
            media_type("audio/mpeg; charset=binary").as_deref(),
            Some("audio/mpeg")
        );
        assert_eq!(media_type("audio/ogg").as_deref(), Some("audio/ogg"));
        assert_eq!(media_type(" ; charset=utf-8"), None);
    }

    #[test]
    fn parse_length_rejects_garbage() {
        assert_eq!(parse_length(" 1234567 "), Some(1234567));
        assert_eq!(parse_length("-1"), None);
        assert_eq!(parse_length(""), None);
    }
}
