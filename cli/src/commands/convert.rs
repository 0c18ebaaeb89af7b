use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thtml2doxy::{Converter, SyntaxProvider};

/// Convert every file. A failing file is reported and skipped; the others
/// are still converted.
pub fn run<P: SyntaxProvider>(
    converter: &Converter<P>,
    files: &[PathBuf],
    stdout: bool,
) -> Result<(), String> {
    let mut failed = 0;

    for file in files {
        let result = converter
            .convert_file(file)
            .map_err(|e| e.to_string())
            .and_then(|conversion| {
                if stdout {
                    print_output(&conversion.output)
                } else {
                    write_in_place(file, &conversion.output)
                }
            });

        if let Err(e) = result {
            tracing::error!(file = %file.display(), "{e}");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} file(s) failed", files.len()));
    }
    Ok(())
}

fn print_output(text: &str) -> Result<(), String> {
    let mut out = std::io::stdout().lock();
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| format!("cannot write to stdout: {e}"))
}

/// Replace `path` with `content`. The new text goes to a temporary file in
/// the same directory first, which is then renamed over the original, so
/// a failure leaves the original untouched.
pub fn write_in_place(path: &Path, content: &str) -> Result<(), String> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| format!("cannot create temporary file in {}: {e}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| format!("cannot write temporary file for {}: {e}", path.display()))?;

    if let Ok(meta) = fs::metadata(path) {
        if let Err(e) = tmp.as_file().set_permissions(meta.permissions()) {
            tracing::warn!(file = %path.display(), "cannot keep permissions: {e}");
        }
    }

    tmp.persist(path)
        .map_err(|e| format!("cannot replace {}: {}", path.display(), e.error))?;
    tracing::debug!(file = %path.display(), "rewritten");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_in_place_replaces_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("A.h");
        fs::write(&path, "// old\n").expect("write");

        write_in_place(&path, "/// new\n").expect("rewrite");
        assert_eq!(fs::read_to_string(&path).expect("read"), "/// new\n");

        // No temporary file left behind
        let entries = fs::read_dir(dir.path()).expect("read_dir").count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_in_place_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("A.h");
        assert!(write_in_place(&path, "x").is_err());
    }
}
