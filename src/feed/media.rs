// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use url::Url;

use crate::content::AudioVariant;
use crate::error::FeedError;
use crate::http::HttpClient;

const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// Enclosure data for one feed entry
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub url: Url,
    pub length: u64,
    pub mime_type: String,
    pub duration: Option<Duration>,
}

/// Outcome of a best-effort duration lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ProbedDuration {
    Found(Duration),
    Unavailable(String),
}

/// Looks up the playback length of a local media file
pub trait DurationProbe: Send + Sync {
    fn probe(&self, path: &Path) -> ProbedDuration;
}

/// Duration probe backed by the `ffprobe` command line tool
#[derive(Debug, Clone)]
pub struct FfprobeDuration {
    program: PathBuf,
}

impl FfprobeDuration {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
        }
    }

    /// Use a specific ffprobe binary
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeDuration {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationProbe for FfprobeDuration {
    fn probe(&self, path: &Path) -> ProbedDuration {
        if !path.is_file() {
            return ProbedDuration::Unavailable(format!("{} is not a file", path.display()));
        }

        let output = match Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return ProbedDuration::Unavailable(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ));
            }
        };

        if !output.status.success() {
            return ProbedDuration::Unavailable(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            );
        }

        parse_seconds(&String::from_utf8_lossy(&output.stdout))
    }
}

/// A probe that never finds anything, for builds without local media
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDurationProbe;

impl DurationProbe for NoDurationProbe {
    fn probe(&self, _path: &Path) -> ProbedDuration {
        ProbedDuration::Unavailable("duration probing disabled".to_string())
    }
}

fn parse_seconds(output: &str) -> ProbedDuration {
    match output.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            ProbedDuration::Found(Duration::from_secs_f64(seconds))
        }
        _ => ProbedDuration::Unavailable(format!("unexpected ffprobe output '{}'", output.trim())),
    }
}

/// Format a duration as `HH:MM:SS` for `itunes:duration`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// Query the server for the enclosure's size and type
///
/// Any transport failure or HTTP error status is fatal for the feed.
pub async fn fetch_media<C: HttpClient>(
    client: &C,
    audio: &AudioVariant,
) -> Result<MediaInfo, FeedError> {
    let url = audio.url.as_str();

    let response = client
        .head(url)
        .await
        .map_err(|e| FeedError::ExternalFetch {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(FeedError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(MediaInfo {
        url: audio.url.clone(),
        length: response.content_length.or(audio.size).unwrap_or(0),
        mime_type: response
            .content_type
            .or_else(|| audio.mime_type.clone())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        duration: None,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::MockHttpClient;
    use super::*;
    use crate::http::HeadResponse;
    use tempfile::tempdir;

    const AUDIO_URL: &str = "https://radio.example.org/files/ep1.mp3";

    fn make_audio() -> AudioVariant {
        AudioVariant {
            url_template: "$media_base_url/ep1.mp3".to_string(),
            url: Url::parse(AUDIO_URL).unwrap(),
            local_path: None,
            mime_type: Some("audio/ogg".to_string()),
            title: None,
            size: Some(42),
        }
    }

    #[tokio::test]
    async fn fetch_media_uses_server_headers() {
        let client = MockHttpClient::default().with_response(AUDIO_URL, 200, Some(1234567));

        let media = fetch_media(&client, &make_audio()).await.unwrap();

        assert_eq!(media.url.as_str(), AUDIO_URL);
        assert_eq!(media.length, 1234567);
        assert_eq!(media.mime_type, "audio/mpeg");
        assert!(media.duration.is_none());
    }

    #[tokio::test]
    async fn fetch_media_falls_back_to_content_values() {
        let mut client = MockHttpClient::default();
        client.responses.insert(
            AUDIO_URL.to_string(),
            HeadResponse {
                status: 200,
                content_length: None,
                content_type: None,
            },
        );

        let media = fetch_media(&client, &make_audio()).await.unwrap();

        assert_eq!(media.length, 42);
        assert_eq!(media.mime_type, "audio/ogg");
    }

    #[tokio::test]
    async fn fetch_media_fails_on_http_error() {
        let client = MockHttpClient::default();

        let result = fetch_media(&client, &make_audio()).await;

        match result.unwrap_err() {
            FeedError::HttpStatus { status, url } => {
                assert_eq!(status, 404);
                assert_eq!(url, AUDIO_URL);
            }
            other => panic!("Expected HttpStatus error, got {other}"),
        }
    }

    #[test]
    fn formats_duration_as_hours_minutes_seconds() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_duration(Duration::from_secs(3723)), "01:02:03");
        assert_eq!(format_duration(Duration::from_secs_f64(3394.9)), "00:56:34");
    }

    #[test]
    fn parses_ffprobe_output() {
        assert_eq!(
            parse_seconds("3394.560000\n"),
            ProbedDuration::Found(Duration::from_secs_f64(3394.56))
        );
        assert!(matches!(parse_seconds("N/A"), ProbedDuration::Unavailable(_)));
        assert!(matches!(parse_seconds(""), ProbedDuration::Unavailable(_)));
    }

    #[test]
    fn ffprobe_reports_missing_file() {
        let dir = tempdir().unwrap();
        let probe = FfprobeDuration::new();

        assert!(matches!(
            probe.probe(&dir.path().join("missing.mp3")),
            ProbedDuration::Unavailable(_)
        ));
    }

    #[test]
    fn ffprobe_reports_missing_program() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ep1.mp3");
        std::fs::write(&path, b"not really audio").unwrap();

        let probe = FfprobeDuration::with_program(dir.path().join("no-such-ffprobe"));

        match probe.probe(&path) {
            ProbedDuration::Unavailable(reason) => assert!(reason.contains("failed to run")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn no_probe_is_always_unavailable() {
        assert!(matches!(
            NoDurationProbe.probe(Path::new("/srv/media/ep1.mp3")),
            ProbedDuration::Unavailable(_)
        ));
    }
}
