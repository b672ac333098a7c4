//! HTTP serving: negotiation, per-route page handlers, document
//! assembly, and router construction.

mod app;
mod document;
mod negotiate;
mod page;

pub use app::create_app;
pub use document::{DEFAULT_LANG, DocumentOptions, assemble_document};
pub use negotiate::{
    NegotiateLayer, RENDER_MODE_HEADER, RenderMode, STREAM_PREFIX, negotiate, render_mode,
};
