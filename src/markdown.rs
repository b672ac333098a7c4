//! Markdown-backed routes: frontmatter parsing, rendering to the
//! component tree, and the markdown-export response.

mod export;
mod frontmatter;
mod render;

pub use export::{MARKDOWN_CACHE_CONTROL, X_MARKDOWN_TOKENS, estimate_tokens, markdown_response};
pub use frontmatter::{Frontmatter, parse_frontmatter};
pub use render::render_markdown;
