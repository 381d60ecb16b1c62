// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while building the site, for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The content file is being read
    LoadingContent { path: PathBuf },

    /// All episode documents have been parsed
    ContentLoaded { episode_count: usize },

    /// The HTML page has been rendered
    PageRendered { episode_count: usize },

    /// Enclosure metadata is being fetched for one episode
    FetchingMedia {
        episode_title: String,
        /// Position of this episode in the content file
        episode_index: usize,
        total_episodes: usize,
        url: String,
    },

    /// A local duration lookup failed; the entry is emitted without duration
    DurationUnavailable {
        episode_title: String,
        path: PathBuf,
        reason: String,
    },

    /// An output file has been written
    OutputWritten { path: PathBuf },

    /// Both output files are in place
    BuildCompleted { episode_count: usize },
}

/// Receives build progress; the CLI draws a spinner from it.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// Drops every event, for `--quiet` and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
