use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use axum::Router;
use pageloom::content::{ContentError, discover_contents};
use pageloom::route::RouteTable;
use pageloom::{Config, build_route_table, builtin};

pub mod routes;
pub mod serve;

/// Everything a command needs after loading config and resolving routes.
pub struct Prepared {
    pub config: Config,
    pub table: RouteTable,
    pub handlers: BTreeMap<String, Router>,
}

/// Load the config file, discover content, and resolve the route table.
pub fn prepare(config_file: &Path) -> Result<Prepared, anyhow::Error> {
    let config_path = if config_file.is_relative() {
        std::env::current_dir()?.join(config_file)
    } else {
        config_file.to_path_buf()
    };

    let config = Config::load(&config_path)?;

    // Relative routes directories resolve against the config file.
    let base_path = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let routes_dir = if config.routes.is_relative() {
        base_path.join(&config.routes)
    } else {
        config.routes.clone()
    };

    let contents = match discover_contents(&routes_dir) {
        Ok(contents) => contents,
        Err(ContentError::NotFound(path)) => {
            println!(
                "No routes directory at {}, serving built-in pages only",
                path.display()
            );
            BTreeMap::new()
        }
        Err(error) => return Err(error.into()),
    };

    let mut globs = builtin::globs(&config.site, &contents);
    globs.contents.extend(contents);

    let handlers = std::mem::take(&mut globs.handlers);
    let table = build_route_table(&globs)?;

    Ok(Prepared {
        config,
        table,
        handlers,
    })
}
