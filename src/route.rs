//! Route resolution: turning page, layout, and content registrations
//! into an immutable route table with layout chains and a manifest.

mod resolve;
mod types;

pub use resolve::{
    ResolveError, build_route_table, content_file_to_path, handler_file_to_path,
    markdown_export_path, page_file_to_path, resolve_layout_chain,
};
pub use types::{
    LayoutEntry, LayoutLoader, LayoutModule, ManifestEntry, MarkdownSource, PageLoader, PageModule,
    PageRender, ResolvedRoute, RouteGlobs, RouteMeta, RouteTable, layout_loader, markdown_source,
    page_loader, page_render,
};
