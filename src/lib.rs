pub mod build;
pub mod chapters;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod html;
pub mod http;
pub mod progress;
pub mod strip;

// Re-export main types for convenience
pub use build::{BuildOptions, BuildResult, FEED_FILENAME, INDEX_FILENAME, build_site};
pub use chapters::{
    Chapter, ChapterBlock, ChapterList, LineEnding, chapters_from_yaml, chapters_to_yaml,
    format_chapters, parse_chapters,
};
pub use config::SiteConfig;
pub use content::{
    AudioVariant, Episode, EpisodeStream, LongSummary, UrlResolver, load_content, read_content,
};
pub use error::{BuildError, ChapterError, ConfigError, ContentError, FeedError, RenderError};
pub use feed::{
    DurationProbe, FeedOptions, FfprobeDuration, NoDurationProbe, ProbedDuration, render_feed,
};
pub use html::{HtmlOptions, TemplatePreset, render_html};
pub use http::{HeadResponse, HttpClient, ReqwestClient};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use strip::strip_html_tags;
