// Markdown → HTML for model output shown in the browser.

pub mod handlers;
pub mod markdown;

pub use markdown::render_markdown;
