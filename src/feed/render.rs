// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use rss::extension::atom::{AtomExtensionBuilder, Link};
use rss::extension::itunes::{
    ITunesCategoryBuilder, ITunesChannelExtensionBuilder, ITunesItemExtensionBuilder,
    ITunesOwnerBuilder,
};
use rss::{
    CategoryBuilder, Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, Item,
    ItemBuilder,
};
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::content::Episode;
use crate::error::FeedError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::strip::strip_html_tags;

use super::media::{DurationProbe, MediaInfo, ProbedDuration, fetch_media, format_duration};

const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";
const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Options for building the feed
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    /// Which audio variant of each episode becomes the enclosure
    pub audio_index: usize,
}

/// Build the RSS feed for all episodes, in content file order
///
/// Enclosure metadata is fetched for every episode, one after another. A
/// failed fetch aborts the feed; a failed duration lookup only drops the
/// duration of that entry.
pub async fn render_feed<C: HttpClient, P: DurationProbe + ?Sized>(
    client: &C,
    probe: &P,
    config: &SiteConfig,
    episodes: &[Episode],
    options: &FeedOptions,
    reporter: &SharedProgressReporter,
) -> Result<String, FeedError> {
    let mut items = Vec::with_capacity(episodes.len());

    for (episode_index, episode) in episodes.iter().enumerate() {
        let title = required(episode, "title", episode.title.as_deref())?;

        let audio = episode.audio.get(options.audio_index).ok_or_else(|| {
            FeedError::MissingAudioVariant {
                id: episode.id.clone(),
                index: options.audio_index,
            }
        })?;

        reporter.report(ProgressEvent::FetchingMedia {
            episode_title: title.to_string(),
            episode_index,
            total_episodes: episodes.len(),
            url: audio.url.to_string(),
        });

        let mut media = fetch_media(client, audio).await?;

        if let Some(path) = &audio.local_path {
            match probe.probe(path) {
                ProbedDuration::Found(duration) => media.duration = Some(duration),
                ProbedDuration::Unavailable(reason) => {
                    warn!(
                        episode = %episode.id,
                        path = %path.display(),
                        %reason,
                        "Failed to load duration from file"
                    );
                    reporter.report(ProgressEvent::DurationUnavailable {
                        episode_title: title.to_string(),
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        items.push(build_item(episode, title, media)?);
    }

    let channel = build_channel(config, items);
    info!(entries = channel.items().len(), "built feed");

    let bytes = channel.write_to(Vec::new())?;
    Ok(String::from_utf8(bytes)?)
}

/// Summary paragraph followed by the long-form notes, if any
pub fn long_description(summary: &str, episode: &Episode) -> String {
    match &episode.long_summary {
        Some(long_summary) => format!("<p>{summary}</p>\n{}", long_summary.to_html()),
        None => format!("<p>{summary}</p>"),
    }
}

fn build_item(episode: &Episode, title: &str, media: MediaInfo) -> Result<Item, FeedError> {
    let summary = required(episode, "summary", episode.summary.as_deref())?;

    let enclosure = EnclosureBuilder::default()
        .url(media.url.to_string())
        .length(media.length.to_string())
        .mime_type(media.mime_type)
        .build();

    let guid = GuidBuilder::default()
        .value(episode.id.clone())
        .permalink(false)
        .build();

    let itunes = ITunesItemExtensionBuilder::default()
        .summary(Some(strip_html_tags(summary)))
        .subtitle(episode.subtitle.as_deref().map(strip_html_tags))
        .duration(media.duration.map(format_duration))
        .build();

    Ok(ItemBuilder::default()
        .title(Some(title.to_string()))
        .description(Some(summary.to_string()))
        .content(Some(long_description(summary, episode)))
        .guid(Some(guid))
        .pub_date(Some(episode.publication_date.to_rfc2822()))
        .enclosure(Some(enclosure))
        .itunes_ext(Some(itunes))
        .build())
}

fn build_channel(config: &SiteConfig, items: Vec<Item>) -> Channel {
    let image = ImageBuilder::default()
        .url(config.cover_image.clone())
        .title(config.podcast_title.clone())
        .link(config.website.clone())
        .build();

    let category = CategoryBuilder::default().name(config.category.clone()).build();

    let owner = ITunesOwnerBuilder::default()
        .name(Some(config.author_name.clone()))
        .build();

    let itunes = ITunesChannelExtensionBuilder::default()
        .author(Some(config.author_name.clone()))
        .owner(Some(owner))
        .categories(vec![ITunesCategoryBuilder::default().text(config.category.clone()).build()])
        .image(Some(config.cover_image.clone()))
        .summary(Some(strip_html_tags(&config.hello_text)))
        .explicit(Some("false".to_string()))
        .build();

    let mut self_link = Link::default();
    self_link.set_href(config.feed_url.clone());
    self_link.set_rel("self");
    self_link.set_mime_type(Some("application/rss+xml".to_string()));

    let atom = AtomExtensionBuilder::default().links(vec![self_link]).build();

    let namespaces = BTreeMap::from([
        ("atom".to_string(), ATOM_NAMESPACE.to_string()),
        ("content".to_string(), CONTENT_NAMESPACE.to_string()),
        ("itunes".to_string(), ITUNES_NAMESPACE.to_string()),
    ]);

    ChannelBuilder::default()
        .namespaces(namespaces)
        .title(config.podcast_title.clone())
        .link(config.website.clone())
        .description(config.hello_text.clone())
        .language(Some(config.language.clone()))
        .copyright(Some(config.copyright.clone()))
        .generator(Some(format!("podstatic {}", env!("CARGO_PKG_VERSION"))))
        .image(Some(image))
        .categories(vec![category])
        .itunes_ext(Some(itunes))
        .atom_ext(Some(atom))
        .items(items)
        .build()
}

fn required<'a>(
    episode: &Episode,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, FeedError> {
    value.ok_or_else(|| FeedError::InvalidEpisode {
        id: episode.id.clone(),
        field,
    })
}
