/// thtml2doxy — rewrite ROOT THtml comments in C++ sources as Doxygen comments.
///
/// The pipeline per file: the syntax provider builds a tree, the entity
/// walker anchors every documented declaration to its raw comment, the
/// normalizer turns comment bodies into Doxygen text, and the rewriter
/// merges everything back into the original lines.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub mod comments;
pub mod error;
pub mod parser;
pub mod reconstruct;
pub mod refactor;
pub mod source;

pub use comments::{Entity, MemberComment, MemberFlag, PlainComment, SourceSpan};
pub use error::{ConvertError, Result};
pub use parser::cpp::CppProvider;
pub use parser::SyntaxProvider;

/// Image format of the pictures generated from embedded macros.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Passed to the syntax provider.
    pub include_dirs: Vec<PathBuf>,
    pub image_extension: String,
    /// Write macro bodies to disk. When off, picture references are still
    /// computed but `imgdoc/` is left alone.
    pub write_macros: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            include_dirs: Vec::new(),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            write_macros: true,
        }
    }
}

/// Result of converting one file.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub entities: Vec<Entity>,
    pub output: String,
}

/// ROOT macros are `.C` files: their data members are left alone and their
/// header documents the file rather than a class.
pub fn is_macro_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".C")
}

pub struct Converter<P: SyntaxProvider> {
    provider: P,
    options: ConvertOptions,
}

impl<P: SyntaxProvider> Converter<P> {
    pub fn new(provider: P, options: ConvertOptions) -> Self {
        Converter { provider, options }
    }

    /// Find the comment entities of `source`, read from `path`.
    pub fn collect(&self, path: &Path, source: &str) -> Result<Vec<Entity>> {
        let tree = self
            .provider
            .parse(path, source, &self.options.include_dirs)?;
        let materializer = if self.options.write_macros {
            refactor::MacroMaterializer::new(path)
        } else {
            refactor::MacroMaterializer::dry_run(path)
        };
        let normalizer = refactor::Normalizer::new(
            materializer,
            self.options.image_extension.clone(),
        );
        let entities =
            comments::walker::collect_entities(&tree, path, source, &normalizer, is_macro_file(path))?;

        for entity in &entities {
            tracing::debug!(owner = entity.owner(), span = ?entity.span(), "entity");
        }
        Ok(entities)
    }

    pub fn convert(&self, path: &Path, source: &str) -> Result<Conversion> {
        let entities = self.collect(path, source)?;
        let output = reconstruct::rewrite(source, &entities);
        Ok(Conversion { entities, output })
    }

    /// Read `path` and convert it. Nothing is written back.
    pub fn convert_file(&self, path: &Path) -> Result<Conversion> {
        tracing::info!(file = %path.display(), "input file");
        let source = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        self.convert(path, &source)
    }
}
