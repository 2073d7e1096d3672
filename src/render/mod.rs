//! Message rendering
//!
//! Turns raw message text into markup that is safe to hand to the page.

mod markdown;
mod sanitize;

pub use markdown::render_markdown;
pub use sanitize::escape_html;
