//! Content discovery for the bundled binary: walks a routes directory
//! and collects raw markdown files into the contents registration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("routes directory does not exist: {0}")]
    NotFound(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read directory entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read content file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Recursively collect `.md` files under `dir`, keyed as
/// `routes/<relative path>`.
pub fn discover_contents(dir: &Path) -> Result<BTreeMap<String, String>, ContentError> {
    if !dir.is_dir() {
        return Err(ContentError::NotFound(dir.to_path_buf()));
    }
    let mut contents = BTreeMap::new();
    walk_directory(dir, Path::new(""), &mut contents)?;
    Ok(contents)
}

fn walk_directory(
    dir: &Path,
    relative: &Path,
    out: &mut BTreeMap<String, String>,
) -> Result<(), ContentError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ContentError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ContentError::ReadEntry {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        let file_name = entry.file_name();
        let file_name_str = file_name.to_string_lossy();

        // Skip hidden files and directories
        if file_name_str.starts_with('.') {
            continue;
        }

        let entry_relative = relative.join(&file_name);

        if path.is_dir() {
            if matches!(file_name_str.as_ref(), "node_modules" | "target") {
                continue;
            }
            walk_directory(&path, &entry_relative, out)?;
        } else if path.is_file() && file_name_str.ends_with(".md") {
            let raw = std::fs::read_to_string(&path).map_err(|source| ContentError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let key = format!(
                "routes/{}",
                entry_relative.to_string_lossy().replace('\\', "/")
            );
            out.insert(key, raw);
        }
    }

    Ok(())
}
