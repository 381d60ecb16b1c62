// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between compact chapter lines and structured chapter lists.
//!
//! A chapter line looks like `00:05:24 Musik: X <https://example.org/track>`:
//! a timestamp, a single space, the title and an optional trailing link in
//! angle brackets. Timestamps are kept verbatim; `00:00:00` and
//! `00:00:00.000` stay distinct values.
//!
//! A parsed block remembers its line ending and whether it ended in a
//! newline, so formatting it again gives back the same bytes.
//!
//! Known limitation: any trailing ` <...>` token without whitespace inside is
//! taken as the link, even when it was meant to be part of the title.
//! Chapter start times are not checked for ordering.

use serde::{Deserialize, Serialize};

use crate::error::ChapterError;

/// A timestamped marker within an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub start: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Wrapper matching the `chapters:` key used in episode documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChapterList {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Taken from the first line break; `Lf` for single-line text
    fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(end) if text[..end].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Chapter records plus the layout of the text they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterBlock {
    pub chapters: Vec<Chapter>,
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl From<Vec<Chapter>> for ChapterBlock {
    /// Newline-terminated `\n` lines, the usual shape of a chapter file
    fn from(chapters: Vec<Chapter>) -> Self {
        Self {
            chapters,
            line_ending: LineEnding::Lf,
            trailing_newline: true,
        }
    }
}

/// Parse chapter lines into chapter records, preserving line order
pub fn parse_chapters(text: &str) -> Result<ChapterBlock, ChapterError> {
    let chapters = text
        .lines()
        .enumerate()
        .map(|(index, line)| parse_chapter_line(line, index + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ChapterBlock {
        chapters,
        line_ending: LineEnding::detect(text),
        trailing_newline: text.ends_with('\n'),
    })
}

/// Format chapter records back into chapter lines
///
/// Blocks that mix `\n` and `\r\n` come back with the first line's ending
/// on every line.
pub fn format_chapters(block: &ChapterBlock) -> String {
    let line_ending = block.line_ending.as_str();
    let mut text = block
        .chapters
        .iter()
        .map(format_chapter_line)
        .collect::<Vec<_>>()
        .join(line_ending);

    if block.trailing_newline && !block.chapters.is_empty() {
        text.push_str(line_ending);
    }
    text
}

/// Convert chapter lines into a YAML `chapters:` block
///
/// Every scalar is single-quoted: YAML 1.1 readers would otherwise take
/// `00:00:49.000` for a number and a title like `yes` for a boolean.
pub fn chapters_to_yaml(text: &str) -> Result<String, ChapterError> {
    let block = parse_chapters(text)?;
    if block.chapters.is_empty() {
        return Ok("chapters: []\n".to_string());
    }

    let mut yaml = String::from("chapters:\n");
    for chapter in &block.chapters {
        yaml.push_str(&format!("  - start: {}\n", single_quoted(&chapter.start)));
        yaml.push_str(&format!("    title: {}\n", single_quoted(&chapter.title)));
        if let Some(href) = &chapter.href {
            yaml.push_str(&format!("    href: {}\n", single_quoted(href)));
        }
    }
    Ok(yaml)
}

/// Convert a YAML `chapters:` block into newline-terminated chapter lines
pub fn chapters_from_yaml(yaml: &str) -> Result<String, ChapterError> {
    let list: ChapterList = serde_yaml::from_str(yaml)?;
    Ok(format_chapters(&ChapterBlock::from(list.chapters)))
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn parse_chapter_line(line: &str, line_number: usize) -> Result<Chapter, ChapterError> {
    let (start, rest) = line
        .split_once(' ')
        .ok_or_else(|| ChapterError::MalformedLine {
            line_number,
            line: line.to_string(),
        })?;

    let (title, href) = match split_trailing_href(rest) {
        Some((title, href)) => (title, Some(href.to_string())),
        None => (rest, None),
    };

    Ok(Chapter {
        start: start.to_string(),
        title: title.to_string(),
        href,
    })
}

/// Split `title <href>` into its parts if the line ends in a link token
fn split_trailing_href(rest: &str) -> Option<(&str, &str)> {
    let inner = rest.strip_suffix('>')?;
    let (title, href) = inner.rsplit_once(" <")?;

    if href.is_empty() || href.chars().any(char::is_whitespace) {
        return None;
    }

    Some((title, href))
}

fn format_chapter_line(chapter: &Chapter) -> String {
    match &chapter.href {
        Some(href) => format!("{} {} <{}>", chapter.start, chapter.title, href),
        None => format!("{} {}", chapter.start, chapter.title),
    }
}
