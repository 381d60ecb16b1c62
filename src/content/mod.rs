mod load;
mod model;
mod placeholder;

pub use load::{EpisodeStream, UrlResolver, load_content, read_content};
pub use model::{AudioVariant, Episode, LongSummary};
pub use placeholder::{MEDIA_BASE_URL, substitute};
