//! Pageloom is a server-side page rendering framework.
//!
//! Applications register page, layout, content, and handler modules
//! under path-like keys. The route resolver turns those registrations
//! into an immutable route table, and the server serves every resolved
//! route in one of two modes:
//!
//! - **stream**: a serialized component-tree stream for client-side
//!   hydration and navigation
//! - **document**: a fully assembled HTML document for first loads and
//!   crawlers, always produced from the stream encoding so there is a
//!   single rendering code path

pub mod builtin;
pub mod config;
pub mod content;
pub mod markdown;
pub mod route;
pub mod server;
pub mod view;

pub use config::{Config, SiteConfig};
pub use route::{RouteGlobs, RouteTable, build_route_table};
pub use server::{NegotiateLayer, create_app};
pub use view::Node;
