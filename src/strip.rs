// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use kuchikikiki::traits::TendrilSink;

/// Reduce an HTML fragment to its text nodes, in document order
///
/// Tags, attributes and comments are dropped and entities decoded. Broken
/// markup is recovered the way a browser would. Text inside `<script>` and
/// `<style>` is kept like any other text.
pub fn strip_html_tags(html: &str) -> String {
    kuchikikiki::parse_html().one(html).text_contents()
}
