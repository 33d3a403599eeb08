use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum DiscoveryError {
    #[error("policy directory {0} does not exist or is not a directory")]
    InvalidRoot(PathBuf),
    #[error("failed to resolve policy directory {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Absolute form of `path`, without requiring it to exist.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Recursively collects policy files under `root`, sorted by path.
///
/// A file is kept when its extension equals `extension` and its base name
/// contains none of `skip_keywords`. Keywords only filter files; directories
/// are always descended into.
pub fn discover_policies(
    root: &Path,
    extension: &str,
    skip_keywords: &[String],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let root = absolutize(root).map_err(|source| DiscoveryError::Resolve {
        path: root.to_path_buf(),
        source,
    })?;
    if !root.is_dir() {
        return Err(DiscoveryError::InvalidRoot(root));
    }

    let mut found = Vec::new();
    walk(&root, extension, skip_keywords, &mut found)?;
    found.sort();
    info!(root = %root.display(), count = found.len(), "discovered policy files");
    Ok(found)
}

fn walk(
    dir: &Path,
    extension: &str,
    skip_keywords: &[String],
    found: &mut Vec<PathBuf>,
) -> Result<(), DiscoveryError> {
    let walk_err = |source| DiscoveryError::Walk {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(walk_err)? {
        let entry = entry.map_err(walk_err)?;
        let path = entry.path();
        let ty = entry.file_type().map_err(walk_err)?;
        if ty.is_dir() {
            walk(&path, extension, skip_keywords, found)?;
            continue;
        }
        if !(ty.is_file() || ty.is_symlink()) {
            continue;
        }
        if is_skipped(&path, skip_keywords) {
            debug!(path = %path.display(), "skipping helper policy file");
            continue;
        }
        if has_extension(&path, extension) {
            found.push(path);
        }
    }
    Ok(())
}

/// True when the file name ends in `.<extension>`, so a bare `.rego` counts.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.ends_with(&format!(".{extension}")),
        None => false,
    }
}

fn is_skipped(path: &Path, skip_keywords: &[String]) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    skip_keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| name.contains(k.as_str()))
}
