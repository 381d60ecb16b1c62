// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::SiteConfig;
use crate::content::{UrlResolver, read_content};
use crate::error::BuildError;
use crate::feed::{DurationProbe, FeedOptions, render_feed};
use crate::html::{HtmlOptions, render_html};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

pub const INDEX_FILENAME: &str = "index.html";
pub const FEED_FILENAME: &str = "feed.xml";

/// Options for a site build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory for `index.html` and `feed.xml`
    pub output_dir: PathBuf,
    /// Local copies of the media files, enables duration probing
    pub data_dir: Option<PathBuf>,
    /// Show the last episode of the content file first on the page
    pub newest_first: bool,
    /// Which audio variant becomes the feed enclosure
    pub audio_index: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            data_dir: None,
            newest_first: true,
            audio_index: 0,
        }
    }
}

/// Result of a build
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub episode_count: usize,
    pub index_path: PathBuf,
    pub feed_path: PathBuf,
}

/// Render the episode page and feed for a content file
///
/// This is the main entry point for the library. It:
/// 1. Loads all episodes from the content file
/// 2. Renders and writes `index.html`
/// 3. Fetches enclosure metadata, renders and writes `feed.xml`
///
/// Each file is written only once its content is complete. A feed failure
/// leaves an already written page in place.
pub async fn build_site<C: HttpClient, P: DurationProbe + ?Sized>(
    client: &C,
    probe: &P,
    content_path: &Path,
    config: &SiteConfig,
    options: &BuildOptions,
    reporter: SharedProgressReporter,
) -> Result<BuildResult, BuildError> {
    reporter.report(ProgressEvent::LoadingContent {
        path: content_path.to_path_buf(),
    });

    let mut resolver = UrlResolver::new(config.media_base_url());
    if let Some(data_dir) = &options.data_dir {
        resolver = resolver.with_data_dir(data_dir);
    }

    let episodes = read_content(content_path, resolver)?.collect::<Result<Vec<_>, _>>()?;
    let episode_count = episodes.len();
    info!(episode_count, path = %content_path.display(), "loaded content");

    reporter.report(ProgressEvent::ContentLoaded { episode_count });

    create_output_dir(&options.output_dir)?;

    let html_options = HtmlOptions {
        newest_first: options.newest_first,
    };
    let page = render_html(config, &episodes, &html_options)?;
    reporter.report(ProgressEvent::PageRendered { episode_count });

    let index_path = options.output_dir.join(INDEX_FILENAME);
    write_output(&index_path, &page)?;
    reporter.report(ProgressEvent::OutputWritten {
        path: index_path.clone(),
    });

    let feed_options = FeedOptions {
        audio_index: options.audio_index,
    };
    let feed = render_feed(client, probe, config, &episodes, &feed_options, &reporter).await?;

    let feed_path = options.output_dir.join(FEED_FILENAME);
    write_output(&feed_path, &feed)?;
    reporter.report(ProgressEvent::OutputWritten {
        path: feed_path.clone(),
    });

    reporter.report(ProgressEvent::BuildCompleted { episode_count });

    Ok(BuildResult {
        episode_count,
        index_path,
        feed_path,
    })
}

fn create_output_dir(output_dir: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(output_dir).map_err(|e| BuildError::CreateDirectoryFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })
}

/// Write to `<path>.partial`, then move it into place
fn write_output(path: &Path, content: &str) -> Result<(), BuildError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let write_failed = |e| BuildError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    std::fs::write(&partial, content).map_err(write_failed)?;
    std::fs::rename(&partial, path).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        write_failed(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tempfile::tempdir;

    use crate::config::sample_config;
    use crate::error::{ContentError, FeedError};
    use crate::feed::ProbedDuration;
    use crate::feed::testing::{FixedProbe, MockHttpClient};
    use crate::progress::NoopReporter;

    const CONTENT: &str = r#"
uuid: nt-2020-07-06
title: Sendung Juli
summary: Citrix und Corona-Warn-App
publicationDate: '2020-07-06T19:00:00+02:00'
audio:
  - url: $media_base_url/2020-07-06.mp3
    mimeType: audio/mpeg
---
uuid: nt-2020-08-03
title: Sendung August
summary: Aktuelles vom Chaostreff
long_summary_md: |
  - Kurzmeldungen
publicationDate: '2020-08-03T19:00:00+02:00'
audio:
  - url: $media_base_url/2020-08-03.mp3
    mimeType: audio/mpeg
"#;

    fn serving_client() -> MockHttpClient {
        MockHttpClient::default()
            .with_response("https://radio.example.org/files/2020-07-06.mp3", 200, Some(1000))
            .with_response("https://radio.example.org/files/2020-08-03.mp3", 200, Some(2000))
    }

    fn write_content(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("content.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn build_writes_page_and_feed() {
        let dir = tempdir().unwrap();
        let content_path = write_content(dir.path(), CONTENT);
        let options = BuildOptions {
            output_dir: dir.path().join("public"),
            ..Default::default()
        };

        let result = build_site(
            &serving_client(),
            &FixedProbe(ProbedDuration::Unavailable("n/a".into())),
            &content_path,
            &sample_config(),
            &options,
            NoopReporter::shared(),
        )
        .await
        .unwrap();

        assert_eq!(result.episode_count, 2);
        assert_eq!(result.index_path, dir.path().join("public/index.html"));

        let html = std::fs::read_to_string(&result.index_path).unwrap();
        let later = html.find("Sendung August").unwrap();
        let earlier = html.find("Sendung Juli").unwrap();
        assert!(later < earlier);
        assert!(html.contains("<li>Kurzmeldungen</li>"));

        let feed = std::fs::read_to_string(&result.feed_path).unwrap();
        let channel = rss::Channel::read_from(feed.as_bytes()).unwrap();
        assert_eq!(channel.items().len(), 2);
        for item in channel.items() {
            assert!(
                item.enclosure()
                    .unwrap()
                    .url()
                    .starts_with("https://radio.example.org/files/")
            );
        }

        assert!(!dir.path().join("public/index.html.partial").exists());
        assert!(!dir.path().join("public/feed.xml.partial").exists());
    }

    #[tokio::test]
    async fn data_dir_enables_duration_probing() {
        let dir = tempdir().unwrap();
        let content_path = write_content(dir.path(), CONTENT);
        let options = BuildOptions {
            output_dir: dir.path().to_path_buf(),
            data_dir: Some(dir.path().join("media")),
            newest_first: false,
            audio_index: 0,
        };

        let result = build_site(
            &serving_client(),
            &FixedProbe(ProbedDuration::Found(Duration::from_secs(3600))),
            &content_path,
            &sample_config(),
            &options,
            NoopReporter::shared(),
        )
        .await
        .unwrap();

        let feed = std::fs::read_to_string(&result.feed_path).unwrap();
        assert!(feed.contains("01:00:00"));
        assert!(!feed.contains("media/2020"));

        let html = std::fs::read_to_string(&result.index_path).unwrap();
        assert!(html.find("Sendung Juli").unwrap() < html.find("Sendung August").unwrap());
    }

    #[tokio::test]
    async fn invalid_content_writes_nothing() {
        let dir = tempdir().unwrap();
        let content_path = write_content(
            dir.path(),
            "uuid: a\ntitle: A\nsummary: B\npublicationDate: '2020-07-06T19:00:00+02:00'\n",
        );
        let options = BuildOptions {
            output_dir: dir.path().join("public"),
            ..Default::default()
        };

        let result = build_site(
            &serving_client(),
            &FixedProbe(ProbedDuration::Unavailable("n/a".into())),
            &content_path,
            &sample_config(),
            &options,
            NoopReporter::shared(),
        )
        .await;

        assert!(matches!(
            result,
            Err(BuildError::Content(ContentError::InvalidEpisode { .. }))
        ));
        assert!(!dir.path().join("public/index.html").exists());
        assert!(!dir.path().join("public/feed.xml").exists());
    }

    #[tokio::test]
    async fn feed_failure_keeps_page_but_writes_no_feed() {
        let dir = tempdir().unwrap();
        let content_path = write_content(dir.path(), CONTENT);
        let options = BuildOptions {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let result = build_site(
            &MockHttpClient::default(),
            &FixedProbe(ProbedDuration::Unavailable("n/a".into())),
            &content_path,
            &sample_config(),
            &options,
            NoopReporter::shared(),
        )
        .await;

        assert!(matches!(
            result,
            Err(BuildError::Feed(FeedError::HttpStatus { .. }))
        ));
        assert!(dir.path().join(INDEX_FILENAME).exists());
        assert!(!dir.path().join(FEED_FILENAME).exists());
    }

    #[test]
    fn write_output_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "old").unwrap();

        write_output(&path, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("index.html.partial").exists());
    }
}
