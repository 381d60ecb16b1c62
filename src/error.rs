// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when converting chapter marks
#[derive(Error, Debug)]
pub enum ChapterError {
    #[error("Chapter line {line_number} has no space between timestamp and title: '{line}'")]
    MalformedLine { line_number: usize, line: String },

    #[error("Failed to process chapter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that can occur when loading the site configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid URL '{value}' for config key '{key}': {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur when loading episode content
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML document {document}: {source}")]
    ParseFailed {
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid episode in document {document}: {reason}")]
    InvalidEpisode { document: usize, reason: String },

    #[error("Cannot substitute placeholders in '{template}': {reason}")]
    TemplateSubstitution { template: String, reason: String },
}

/// Errors that can occur while rendering the HTML page
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Episode '{id}' is missing required field '{field}'")]
    InvalidEpisode { id: String, field: &'static str },

    #[error("Template rendering failed: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to serialize player configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while building the RSS feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Episode '{id}' is missing required field '{field}'")]
    InvalidEpisode { id: String, field: &'static str },

    #[error("Episode '{id}' has no audio variant at index {index}")]
    MissingAudioVariant { id: String, index: usize },

    #[error("Failed to fetch media metadata from {url}: {source}")]
    ExternalFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to serialize RSS feed: {0}")]
    Serialize(#[from] rss::Error),

    #[error("RSS feed is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Top-level errors for a site build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("HTML error: {0}")]
    Render(#[from] RenderError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Failed to create output directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
