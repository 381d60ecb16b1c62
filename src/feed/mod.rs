mod media;
mod render;

pub use media::{
    DurationProbe, FfprobeDuration, MediaInfo, NoDurationProbe, ProbedDuration, fetch_media,
    format_duration,
};
pub use render::{FeedOptions, long_description, render_feed};

#[cfg(test)]
pub(crate) use media::testing;
