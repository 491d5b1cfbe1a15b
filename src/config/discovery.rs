//! Plan file discovery.
//!
//! Walks the plan directory down to a depth limit and collects every file
//! with the configured name, in a stable order.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Directories never searched for plans.
const SKIPPED_DIRS: &[&str] = &[".git", ".terraform"];

/// Finds all plan files named `file_name` under `dir`.
///
/// Files directly inside `dir` are at depth 0; each subdirectory level adds
/// one. Symbolic links to directories are not followed. The result is
/// sorted by path.
///
/// # Errors
///
/// Returns an error if a directory cannot be read or no plan file is found.
pub fn find_plan_files(
    dir: impl AsRef<Path>,
    file_name: &str,
    max_depth: usize,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut found = Vec::new();
    walk(dir, file_name, 0, max_depth, &mut found)?;
    found.sort();

    if found.is_empty() {
        return Err(ConfigError::NoPlansFound {
            dir: dir.to_path_buf(),
            file_name: file_name.to_string(),
            max_depth,
        }
        .into());
    }

    info!("Found {} plan file(s) under {}", found.len(), dir.display());
    Ok(found)
}

fn walk(
    dir: &Path,
    file_name: &str,
    depth: usize,
    max_depth: usize,
    found: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_file() && entry.file_name() == file_name {
            debug!("Found plan file: {}", path.display());
            found.push(path);
        } else if file_type.is_dir() && depth < max_depth {
            let skipped = entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if !skipped {
                walk(&path, file_name, depth + 1, max_depth, found)?;
            }
        }
    }
    Ok(())
}
