// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::ContentError;

/// The only placeholder recognized in audio URL templates
pub const MEDIA_BASE_URL: &str = "media_base_url";

/// Replace `$name` / `${name}` in `template` with `value`
///
/// `$$` yields a literal `$`. Any other placeholder, or a `$` that does not
/// start a valid placeholder, is an error: the template must resolve fully.
pub fn substitute(template: &str, name: &str, value: &str) -> Result<String, ContentError> {
    let mut result = String::with_capacity(template.len() + value.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let identifier = match chars.peek().copied() {
            Some((_, '$')) => {
                chars.next();
                result.push('$');
                continue;
            }
            Some((_, '{')) => {
                chars.next();
                let identifier = take_identifier(&mut chars);
                if !matches!(chars.next(), Some((_, '}'))) || identifier.is_empty() {
                    return Err(invalid(template, pos));
                }
                identifier
            }
            Some((_, next)) if is_identifier_start(next) => take_identifier(&mut chars),
            _ => return Err(invalid(template, pos)),
        };

        if identifier != name {
            return Err(ContentError::TemplateSubstitution {
                template: template.to_string(),
                reason: format!("unknown placeholder '${identifier}'"),
            });
        }

        result.push_str(value);
    }

    Ok(result)
}

fn take_identifier(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut identifier = String::new();
    while let Some(&(_, c)) = chars.peek() {
        let valid = if identifier.is_empty() {
            is_identifier_start(c)
        } else {
            c == '_' || c.is_ascii_alphanumeric()
        };
        if !valid {
            break;
        }
        identifier.push(c);
        chars.next();
    }
    identifier
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn invalid(template: &str, pos: usize) -> ContentError {
    ContentError::TemplateSubstitution {
        template: template.to_string(),
        reason: format!("invalid placeholder at position {pos}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://radio.example.org/files";

    #[test]
    fn substitutes_bare_placeholder() {
        let url = substitute("$media_base_url/2020-07-06.mp3", MEDIA_BASE_URL, BASE).unwrap();
        assert_eq!(url, "https://radio.example.org/files/2020-07-06.mp3");
    }

    #[test]
    fn substitutes_braced_placeholder() {
        let url = substitute("${media_base_url}ep1.opus", MEDIA_BASE_URL, BASE).unwrap();
        assert_eq!(url, "https://radio.example.org/filesep1.opus");
    }

    #[test]
    fn leaves_templates_without_placeholder_untouched() {
        let url = substitute("https://cdn.example.org/a.mp3", MEDIA_BASE_URL, BASE).unwrap();
        assert_eq!(url, "https://cdn.example.org/a.mp3");
    }

    #[test]
    fn double_dollar_is_literal() {
        let url = substitute("$media_base_url/price$$5.mp3", MEDIA_BASE_URL, BASE).unwrap();
        assert_eq!(url, "https://radio.example.org/files/price$5.mp3");
    }

    #[test]
    fn replaces_every_occurrence() {
        let out = substitute("$media_base_url|$media_base_url", MEDIA_BASE_URL, "x").unwrap();
        assert_eq!(out, "x|x");
    }

    #[test]
    fn rejects_unknown_placeholder() {
        let err = substitute("$cdn_url/a.mp3", MEDIA_BASE_URL, BASE).unwrap_err();
        assert!(err.to_string().contains("$cdn_url"));
    }

    #[test]
    fn rejects_dangling_dollar() {
        assert!(substitute("https://example.org/a$", MEDIA_BASE_URL, BASE).is_err());
        assert!(substitute("https://example.org/$1.mp3", MEDIA_BASE_URL, BASE).is_err());
    }

    #[test]
    fn rejects_unterminated_brace() {
        assert!(substitute("${media_base_url/a.mp3", MEDIA_BASE_URL, BASE).is_err());
        assert!(substitute("${}/a.mp3", MEDIA_BASE_URL, BASE).is_err());
    }
}
