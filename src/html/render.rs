// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use minijinja::{Environment, context};
use serde::Serialize;

use crate::chapters::Chapter;
use crate::config::SiteConfig;
use crate::content::{AudioVariant, Episode};
use crate::error::RenderError;

use super::templates::{ENTRY, PAGE, PLAYER, SUBSCRIBE_BUTTON};

/// Options for rendering the episode page
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Show the last episode of the content file first
    pub newest_first: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self { newest_first: true }
    }
}

/// Episode fields handed to the web player
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerEpisode<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<&'a str>,
    summary: &'a str,
    publication_date: String,
    audio: Vec<PlayerAudio<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chapters: Option<&'a [Chapter]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<&'a BTreeMap<String, String>>,
    #[serde(flatten)]
    extra: BTreeMap<&'a str, &'a serde_json::Value>,
}

/// Keys the player config sets itself; same-named document keys are dropped
const PLAYER_FIELDS: [&str; 7] = [
    "title",
    "subtitle",
    "summary",
    "publicationDate",
    "audio",
    "chapters",
    "theme",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerAudio<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

impl<'a> From<&'a AudioVariant> for PlayerAudio<'a> {
    fn from(audio: &'a AudioVariant) -> Self {
        Self {
            url: audio.url.as_str(),
            mime_type: audio.mime_type.as_deref(),
            title: audio.title.as_deref(),
            size: audio.size,
        }
    }
}

/// Render the full episode page
///
/// Each episode gets a page-local anchor `entry_<position>`, so anchors shift
/// when episodes are added or reordered. The heading link uses the episode id.
pub fn render_html(
    config: &SiteConfig,
    episodes: &[Episode],
    options: &HtmlOptions,
) -> Result<String, RenderError> {
    let env = config.template.templates().environment()?;

    let ordered: Box<dyn Iterator<Item = &Episode> + '_> = if options.newest_first {
        Box::new(episodes.iter().rev())
    } else {
        Box::new(episodes.iter())
    };

    let entries = ordered
        .enumerate()
        .map(|(position, episode)| render_entry(&env, config, position, episode))
        .collect::<Result<Vec<_>, _>>()?;

    let subscribe_button = render_subscribe_button(&env, config)?;

    let page = env.get_template(PAGE)?.render(context! {
        lang => config.html_lang(),
        podcast_title => &config.podcast_title,
        hello_text => &config.hello_text,
        footer_text => &config.footer_text,
        feed_url => &config.feed_url,
        subscribe_button => subscribe_button,
        content => entries.join("\n"),
    })?;

    Ok(page)
}

fn render_entry(
    env: &Environment<'static>,
    config: &SiteConfig,
    position: usize,
    episode: &Episode,
) -> Result<String, RenderError> {
    let title = required(episode, "title", episode.title.as_deref())?;
    let summary = required(episode, "summary", episode.summary.as_deref())?;
    let anchor = format!("entry_{position}");

    let fragment = env.get_template(ENTRY)?.render(context! {
        anchor => &anchor,
        id => &episode.id,
        title => title,
        summary => summary,
        long_summary => episode.long_summary_html(),
    })?;

    let player_config = PlayerEpisode {
        title,
        subtitle: episode.subtitle.as_deref(),
        summary,
        publication_date: episode.publication_date.to_rfc3339(),
        audio: episode.audio.iter().map(PlayerAudio::from).collect(),
        chapters: Some(episode.chapters.as_slice()).filter(|c| !c.is_empty()),
        theme: Some(&config.player_theme).filter(|t| !t.is_empty()),
        extra: episode
            .extra
            .iter()
            .filter(|(key, _)| !PLAYER_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
            .collect(),
    };

    let player = env.get_template(PLAYER)?.render(context! {
        anchor => &anchor,
        player_config => script_safe_json(&player_config)?,
    })?;

    Ok(fragment + &player)
}

fn render_subscribe_button(
    env: &Environment<'static>,
    config: &SiteConfig,
) -> Result<String, RenderError> {
    Ok(env.get_template(SUBSCRIBE_BUTTON)?.render(context! {
        lang => config.html_lang(),
        color => config.theme_color(),
        feed_url => &config.feed_url,
        title_json => script_safe_json(&config.podcast_title)?,
        description_json => script_safe_json(&config.hello_text)?,
        cover_json => script_safe_json(config.small_cover_image())?,
        feed_url_json => script_safe_json(&config.feed_url)?,
    })?)
}

fn required<'a>(
    episode: &Episode,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, RenderError> {
    value.ok_or_else(|| RenderError::InvalidEpisode {
        id: episode.id.clone(),
        field,
    })
}

/// Serialize to JSON that can sit inside a `<script>` element
fn script_safe_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}
