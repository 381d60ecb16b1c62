// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::ContentError;

use super::model::{AudioVariant, Episode, RawAudio, RawEpisode, parse_publication_date};
use super::placeholder::{MEDIA_BASE_URL, substitute};

/// Resolves `$media_base_url` in audio URL templates
#[derive(Debug, Clone)]
pub struct UrlResolver {
    media_base_url: String,
    data_dir: Option<PathBuf>,
}

impl UrlResolver {
    pub fn new(media_base_url: impl Into<String>) -> Self {
        Self {
            media_base_url: media_base_url.into(),
            data_dir: None,
        }
    }

    /// Also resolve each template against a local directory for duration probing
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    fn resolve(&self, raw: RawAudio, document: usize) -> Result<AudioVariant, ContentError> {
        let local_path = match &self.data_dir {
            Some(dir) => Some(PathBuf::from(substitute(
                &raw.url,
                MEDIA_BASE_URL,
                &dir.to_string_lossy(),
            )?)),
            None => None,
        };

        let resolved = substitute(&raw.url, MEDIA_BASE_URL, &self.media_base_url)?;
        let url = Url::parse(&resolved).map_err(|e| ContentError::InvalidEpisode {
            document,
            reason: format!("audio URL '{resolved}' is not absolute: {e}"),
        })?;

        Ok(AudioVariant {
            url_template: raw.url,
            url,
            local_path,
            mime_type: raw.mime_type,
            title: raw.title,
            size: raw.size,
        })
    }
}

/// Lazily parsed episodes of a multi-document YAML file, in document order
///
/// The stream is consumed once; collect it to walk the episodes again.
pub struct EpisodeStream {
    documents: serde_yaml::Deserializer<'static>,
    resolver: UrlResolver,
    document: usize,
    seen_ids: HashSet<String>,
    failed: bool,
}

impl EpisodeStream {
    /// Stream episodes from YAML text already in memory
    pub fn from_yaml(content: String, resolver: UrlResolver) -> Self {
        Self {
            documents: serde_yaml::Deserializer::from_reader(Cursor::new(content)),
            resolver,
            document: 0,
            seen_ids: HashSet::new(),
            failed: false,
        }
    }

    fn convert(&mut self, mut raw: RawEpisode) -> Result<Episode, ContentError> {
        let document = self.document;
        let invalid = |reason: String| ContentError::InvalidEpisode { document, reason };

        let id = raw.id.take().ok_or_else(|| invalid("missing 'uuid'".to_string()))?;
        if !self.seen_ids.insert(id.clone()) {
            return Err(invalid(format!("duplicate id '{id}'")));
        }

        let raw_audio = raw
            .audio
            .take()
            .filter(|audio| !audio.is_empty())
            .ok_or_else(|| invalid(format!("episode '{id}' has no 'audio' entries")))?;

        let date_str = raw
            .publication_date
            .take()
            .ok_or_else(|| invalid(format!("episode '{id}' has no 'publicationDate'")))?;
        let publication_date = parse_publication_date(&date_str).ok_or_else(|| {
            invalid(format!(
                "episode '{id}' has malformed publicationDate '{date_str}'"
            ))
        })?;

        let audio = raw_audio
            .into_iter()
            .map(|a| self.resolver.resolve(a, document))
            .collect::<Result<Vec<_>, _>>()?;

        let long_summary = raw.long_summary();

        Ok(Episode {
            id,
            title: raw.title,
            subtitle: raw.subtitle,
            summary: raw.summary,
            long_summary,
            publication_date,
            audio,
            chapters: raw.chapters,
            extra: raw.extra,
        })
    }
}

impl Iterator for EpisodeStream {
    type Item = Result<Episode, ContentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let document = self.documents.next()?;
            self.document += 1;

            let value = match serde_yaml::Value::deserialize(document) {
                Ok(value) => value,
                Err(e) => return Some(self.fail(ContentError::ParseFailed {
                    document: self.document,
                    source: e,
                })),
            };

            if value.is_null() {
                debug!(document = self.document, "skipping empty YAML document");
                continue;
            }

            let result = serde_yaml::from_value::<RawEpisode>(value)
                .map_err(|e| ContentError::ParseFailed {
                    document: self.document,
                    source: e,
                })
                .and_then(|raw| self.convert(raw));

            return Some(match result {
                Ok(episode) => {
                    debug!(id = %episode.id, document = self.document, "loaded episode");
                    Ok(episode)
                }
                Err(e) => self.fail(e),
            });
        }
    }
}

impl EpisodeStream {
    fn fail(&mut self, error: ContentError) -> Result<Episode, ContentError> {
        self.failed = true;
        Err(error)
    }
}

/// Open a content file as a lazy episode stream
pub fn read_content(path: &Path, resolver: UrlResolver) -> Result<EpisodeStream, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(EpisodeStream::from_yaml(content, resolver))
}

/// Read every episode of a content file, failing on the first invalid one
pub fn load_content(path: &Path, resolver: UrlResolver) -> Result<Vec<Episode>, ContentError> {
    read_content(path, resolver)?.collect()
}
