/// Discover C++ sources under the paths given on the command line.
use std::path::{Path, PathBuf};

use thtml2doxy::refactor::macros::OUTPUT_DIR;

/// Extensions converted when no configuration says otherwise. `C` is ROOT's
/// macro extension and is case-sensitive.
pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "C", "cc", "cpp", "cxx"];

/// Files are taken as given; directories are searched recursively.
pub fn expand_paths(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = discover_sources(path, extensions)?;
            tracing::debug!(dir = %path.display(), files = found.len(), "directory expanded");
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Discover all sources with one of `extensions` below `root`, skipping
/// hidden directories and generated macro directories.
pub fn discover_sources(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            e.depth() == 0 || (!name.starts_with('.') && name != OUTPUT_DIR)
        })
    {
        let entry = entry.map_err(|e| format!("walkdir error: {e}"))?;
        if entry.file_type().is_file() {
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| extensions.iter().any(|x| ext == x.as_str()))
            {
                files.push(path.to_path_buf());
            }
        }
    }

    // Sort for deterministic ordering
    files.sort();
    Ok(files)
}
