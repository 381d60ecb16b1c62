// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Deserialize;

pub(crate) const PAGE: &str = "page.html";
pub(crate) const ENTRY: &str = "entry.html";
pub(crate) const SUBSCRIBE_BUTTON: &str = "subscribe_button.html";
pub(crate) const PLAYER: &str = "player.html";

/// Named markup variants for the generated page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplatePreset {
    /// Styled page with podlove player and subscribe button
    #[default]
    Classic,
    /// Bare markup, podlove player only
    Plain,
}

/// The template sources making up one preset
///
/// Every preset fills the same slots; values are inserted verbatim, so only
/// attribute values go through the `attr` filter.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSet {
    pub page: &'static str,
    pub entry: &'static str,
    pub subscribe_button: &'static str,
    pub player: &'static str,
}

impl TemplatePreset {
    pub fn templates(self) -> TemplateSet {
        match self {
            TemplatePreset::Classic => TemplateSet {
                page: CLASSIC_PAGE,
                entry: CLASSIC_ENTRY,
                subscribe_button: CLASSIC_SUBSCRIBE_BUTTON,
                player: PODLOVE_PLAYER,
            },
            TemplatePreset::Plain => TemplateSet {
                page: PLAIN_PAGE,
                entry: PLAIN_ENTRY,
                subscribe_button: PLAIN_SUBSCRIBE_BUTTON,
                player: PODLOVE_PLAYER,
            },
        }
    }
}

impl TemplateSet {
    /// Build a template environment holding all slots of this set
    pub fn environment(&self) -> Result<Environment<'static>, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("attr", escape_attribute);

        env.add_template(PAGE, self.page)?;
        env.add_template(ENTRY, self.entry)?;
        env.add_template(SUBSCRIBE_BUTTON, self.subscribe_button)?;
        env.add_template(PLAYER, self.player)?;

        Ok(env)
    }
}

fn escape_attribute(value: String) -> String {
    html_escape::encode_double_quoted_attribute(&value).into_owned()
}

const CLASSIC_PAGE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang|attr }}">

<head>

<title>{{ podcast_title }}</title>

<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0, user-scalable=yes">

<link rel="stylesheet" type="text/css" href="site.css" />
<link rel="stylesheet" type="text/css" href="podstatic.css" />
<link rel="alternate" type="application/rss+xml" title="{{ podcast_title|attr }}" href="{{ feed_url|attr }}" />

<script src="https://cdn.podlove.org/web-player/embed.js"></script>

</head>

<body>

<header>

<div class="container introcontainer">
	<h1 id="toc_0">{{ podcast_title }}</h1>
	<div class="introblock">
		{{ hello_text }}
	</div>
	<div class="buttonblock">
		{{ subscribe_button }}
	</div>
</div>

</header>

<div class="container">
<section id="main_content">

{{ content }}

</section>
</div>

<footer>
	<center>
		<small>
			{{ footer_text }}
		</small>
	</center>
</footer>

</body>

</html>
"#;

const CLASSIC_ENTRY: &str = r##"
<div id="{{ anchor|attr }}" class="podstatic-entry">
<a href="#{{ id|attr }}" style="text-decoration: none;"><h2 id="{{ id|attr }}">{{ title }}</h2></a>

<p>{{ summary }}</p>

<div id="player_{{ anchor|attr }}"></div>
<div id="shownotes_{{ anchor|attr }}" class="podstatic-shownotes">
{{ long_summary }}
</div>
</div>
"##;

const CLASSIC_SUBSCRIBE_BUTTON: &str = r#"
	<script>window.podcastData={
		"title": {{ title_json }},
		"subtitle": "",
		"description": {{ description_json }},
		"cover": {{ cover_json }},
		"feeds": [{"type":"audio","format":"mp3","url":{{ feed_url_json }}}]}
	</script>
	<script class="podlove-subscribe-button" src="https://cdn.podlove.org/subscribe-button/javascripts/app.js" data-language="{{ lang|attr }}" data-size="medium" data-json-data="podcastData" data-color="{{ color|attr }}" data-format="cover" data-style="filled"></script><noscript><a href="{{ feed_url|attr }}">Subscribe to feed</a></noscript>
"#;

const PLAIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang|attr }}">
<head>
<meta charset="utf-8">
<title>{{ podcast_title }}</title>
<link rel="alternate" type="application/rss+xml" href="{{ feed_url|attr }}" />
<script src="https://cdn.podlove.org/web-player/embed.js"></script>
</head>
<body>
<h1>{{ podcast_title }}</h1>
{{ hello_text }}
<p>{{ subscribe_button }}</p>
<main>
{{ content }}
</main>
<footer>{{ footer_text }}</footer>
</body>
</html>
"#;

const PLAIN_ENTRY: &str = r##"
<article id="{{ anchor|attr }}">
<h2 id="{{ id|attr }}"><a href="#{{ id|attr }}">{{ title }}</a></h2>
<p>{{ summary }}</p>
<div id="player_{{ anchor|attr }}"></div>
{{ long_summary }}
</article>
"##;

const PLAIN_SUBSCRIBE_BUTTON: &str = r#"<a href="{{ feed_url|attr }}">Subscribe to feed</a>"#;

const PODLOVE_PLAYER: &str =
    r#"<script>podlovePlayer('#player_{{ anchor }}', {{ player_config }});</script>"#;
