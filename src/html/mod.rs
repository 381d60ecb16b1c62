mod markdown;
mod render;
mod templates;

pub use markdown::markdown_to_html;
pub use render::{HtmlOptions, render_html};
pub use templates::{TemplatePreset, TemplateSet};
