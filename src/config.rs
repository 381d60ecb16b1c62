// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::html::TemplatePreset;

/// Static channel and page settings, loaded once per run
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub podcast_title: String,
    /// Intro HTML shown on the page and used as the channel description
    pub hello_text: String,
    #[serde(default)]
    pub footer_text: String,
    pub website: String,
    /// Replaces `$media_base_url` in audio URLs; defaults to `<website>/files`
    #[serde(default)]
    pub media_base_url: Option<String>,
    pub cover_image: String,
    #[serde(default)]
    pub small_cover_image: Option<String>,
    pub category: String,
    pub feed_url: String,
    pub language: String,
    pub author_name: String,
    pub copyright: String,
    /// Podlove player theme, forwarded as-is to the player
    #[serde(default)]
    pub player_theme: BTreeMap<String, String>,
    #[serde(default)]
    pub template: TemplatePreset,
}

impl SiteConfig {
    /// Read and validate a YAML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that every URL-valued key holds an absolute URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut urls = vec![
            ("website", self.website.as_str()),
            ("cover_image", self.cover_image.as_str()),
            ("feed_url", self.feed_url.as_str()),
        ];
        if let Some(small) = &self.small_cover_image {
            urls.push(("small_cover_image", small.as_str()));
        }

        for (key, value) in urls {
            Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                key,
                value: value.to_string(),
                source: e,
            })?;
        }

        Ok(())
    }

    pub fn media_base_url(&self) -> String {
        self.media_base_url
            .clone()
            .unwrap_or_else(|| format!("{}/files", self.website.trim_end_matches('/')))
    }

    pub fn small_cover_image(&self) -> &str {
        self.small_cover_image.as_deref().unwrap_or(&self.cover_image)
    }

    /// Primary language subtag, e.g. `de` for `de-DE`
    pub fn html_lang(&self) -> &str {
        self.language
            .split(['-', '_'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("en")
    }

    /// Main player color, used by the subscribe button
    pub fn theme_color(&self) -> &str {
        self.player_theme
            .get("main")
            .map(String::as_str)
            .unwrap_or("blue")
    }
}

#[cfg(test)]
pub(crate) fn sample_config() -> SiteConfig {
    SiteConfig {
        podcast_title: "Chaos im Radio".to_string(),
        hello_text: "<p>Hier könnt ihr Sendungen nachhören.</p>".to_string(),
        footer_text: "<a href=\"https://example.org\">Hauptseite</a>".to_string(),
        website: "https://radio.example.org".to_string(),
        media_base_url: None,
        cover_image: "https://radio.example.org/cover.jpg".to_string(),
        small_cover_image: Some("https://radio.example.org/cover_250.jpg".to_string()),
        category: "Technology".to_string(),
        feed_url: "https://radio.example.org/feed.xml".to_string(),
        language: "de-DE".to_string(),
        author_name: "ChaosTreff".to_string(),
        copyright: "2020 ChaosTreff".to_string(),
        player_theme: BTreeMap::from([("main".to_string(), "#b5e853".to_string())]),
        template: TemplatePreset::Classic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE_CONFIG: &str = r#"
podcast_title: Chaos im Radio
hello_text: <p>Hallo</p>
website: https://radio.example.org
cover_image: https://radio.example.org/cover.jpg
category: Technology
feed_url: https://radio.example.org/feed.xml
language: de-DE
author_name: ChaosTreff
copyright: 2020 ChaosTreff
"#;

    #[test]
    fn from_file_reads_minimal_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("podcast.yaml");
        std::fs::write(&path, SAMPLE_CONFIG).unwrap();

        let config = SiteConfig::from_file(&path).unwrap();

        assert_eq!(config.podcast_title, "Chaos im Radio");
        assert_eq!(config.footer_text, "");
        assert_eq!(config.template, TemplatePreset::Classic);
        assert!(config.player_theme.is_empty());
    }

    #[test]
    fn media_base_url_defaults_to_files_below_website() {
        let mut config = sample_config();
        assert_eq!(config.media_base_url(), "https://radio.example.org/files");

        config.media_base_url = Some("https://cdn.example.org".to_string());
        assert_eq!(config.media_base_url(), "https://cdn.example.org");
    }

    #[test]
    fn small_cover_falls_back_to_cover() {
        let mut config = sample_config();
        config.small_cover_image = None;
        assert_eq!(config.small_cover_image(), "https://radio.example.org/cover.jpg");
    }

    #[test]
    fn html_lang_uses_primary_subtag() {
        let mut config = sample_config();
        assert_eq!(config.html_lang(), "de");

        config.language = "en".to_string();
        assert_eq!(config.html_lang(), "en");
    }

    #[test]
    fn theme_color_defaults_to_blue() {
        let mut config = sample_config();
        assert_eq!(config.theme_color(), "#b5e853");

        config.player_theme.clear();
        assert_eq!(config.theme_color(), "blue");
    }

    #[test]
    fn validate_rejects_relative_urls() {
        let mut config = sample_config();
        config.feed_url = "/feed.xml".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { key: "feed_url", .. })
        ));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = SiteConfig::from_file(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }
}
