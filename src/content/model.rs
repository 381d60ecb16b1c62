// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use url::Url;

use crate::chapters::Chapter;
use crate::html::markdown_to_html;

/// A single podcast episode, with audio URLs already resolved
#[derive(Debug, Clone)]
pub struct Episode {
    pub id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub long_summary: Option<LongSummary>,
    pub publication_date: DateTime<FixedOffset>,
    pub audio: Vec<AudioVariant>,
    pub chapters: Vec<Chapter>,
    /// Any further keys of the source document, forwarded to the player
    /// unless the player config sets a key of the same name
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One deliverable media file of an episode
#[derive(Debug, Clone)]
pub struct AudioVariant {
    pub url_template: String,
    pub url: Url,
    /// Local copy used only for duration probing, never rendered
    pub local_path: Option<PathBuf>,
    pub mime_type: Option<String>,
    pub title: Option<String>,
    pub size: Option<u64>,
}

/// Long-form show notes, either ready HTML or Markdown source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LongSummary {
    Html(String),
    Markdown(String),
}

impl LongSummary {
    pub fn to_html(&self) -> String {
        match self {
            LongSummary::Html(html) => html.clone(),
            LongSummary::Markdown(markdown) => markdown_to_html(markdown),
        }
    }
}

impl Episode {
    /// Long-form notes as HTML, empty when the episode has none
    pub fn long_summary_html(&self) -> String {
        self.long_summary
            .as_ref()
            .map(LongSummary::to_html)
            .unwrap_or_default()
    }
}

/// Episode document as written in the content file
#[derive(Debug, Deserialize)]
pub(crate) struct RawEpisode {
    #[serde(rename = "uuid", alias = "id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub long_summary: Option<String>,
    pub long_summary_md: Option<String>,
    #[serde(rename = "publicationDate")]
    pub publication_date: Option<String>,
    pub audio: Option<Vec<RawAudio>>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAudio {
    pub url: String,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    pub title: Option<String>,
    pub size: Option<u64>,
}

impl RawEpisode {
    /// Markdown wins over HTML when both are given and non-empty
    pub fn long_summary(&mut self) -> Option<LongSummary> {
        match (self.long_summary_md.take(), self.long_summary.take()) {
            (Some(md), _) if !md.is_empty() => Some(LongSummary::Markdown(md)),
            (_, Some(html)) if !html.is_empty() => Some(LongSummary::Html(html)),
            _ => None,
        }
    }
}

/// Parse a publication date; the offset is mandatory
pub(crate) fn parse_publication_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z"))
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z"))
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
}
