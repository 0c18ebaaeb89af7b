/// Embedded macro materialization.
///
/// `BEGIN_MACRO` blocks hold ROOT macros whose output picture illustrates
/// the documentation. The macro body is written next to the source as a
/// standalone `.C` file named after a hash of its content, so identical
/// bodies always land in the same file and reruns are harmless.
use std::fs;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};

use crate::error::{ConvertError, Result};

/// Directory, next to the source file, receiving generated macros.
pub const OUTPUT_DIR: &str = "imgdoc";

/// Hex digits of the content hash kept in file names.
const SHORT_DIGEST_LEN: usize = 7;

pub struct MacroMaterializer {
    source: PathBuf,
    write: bool,
}

impl MacroMaterializer {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        MacroMaterializer {
            source: source.into(),
            write: true,
        }
    }

    /// Same names as `new`, nothing written.
    pub fn dry_run(source: impl Into<PathBuf>) -> Self {
        MacroMaterializer {
            source: source.into(),
            write: false,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        match self.source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(OUTPUT_DIR),
            _ => PathBuf::from(OUTPUT_DIR),
        }
    }

    /// Path of the generated files for this body, without extension.
    pub fn output_prefix(&self, lines: &[String]) -> PathBuf {
        let base = self
            .source
            .file_name()
            .map(|f| f.to_string_lossy().replace('.', "_"))
            .unwrap_or_default();
        let digest = content_digest(lines);
        self.output_dir()
            .join(format!("{base}_{}", &digest[..SHORT_DIGEST_LEN]))
    }

    /// Write the macro body to `{prefix}.C` and return the prefix.
    pub fn materialize(&self, lines: &[String]) -> Result<PathBuf> {
        let prefix = self.output_prefix(lines);
        if !self.write {
            return Ok(prefix);
        }

        let dir = self.output_dir();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "creating macro directory");
            fs::create_dir_all(&dir).map_err(|e| ConvertError::io(&dir, e))?;
        }

        let macro_path = with_suffix(&prefix, "C");
        tracing::debug!(path = %macro_path.display(), "writing macro");
        fs::write(&macro_path, join_lines(lines)).map_err(|e| ConvertError::io(&macro_path, e))?;
        Ok(prefix)
    }
}

/// SHA-1 over every line followed by a newline, hex encoded. Macro files
/// written by earlier conversion runs carry the same names.
pub fn content_digest(lines: &[String]) -> String {
    let mut hasher = Sha1::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Append `.ext` without touching dots already in the name.
pub fn with_suffix(prefix: &Path, ext: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

fn join_lines(lines: &[String]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
