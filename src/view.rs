//! The view component tree and its two materializations.
//!
//! - `node`: the tree itself, built by pages, layouts, and the markdown
//!   renderer
//! - `html`: hypertext output with escaping and void-element handling
//! - `stream`: the compact wire encoding served in stream mode and
//!   consumed by document assembly

mod html;
mod node;
pub mod stream;

pub use html::{HtmlChunks, render_html};
pub use node::{Element, Node, el, text};
