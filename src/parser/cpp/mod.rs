/// C++ syntax provider — C++ source → SyntaxTree via tree-sitter.
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::parser::syntax::SyntaxTree;
use crate::parser::treesitter::{self, TsLanguage};
use crate::parser::SyntaxProvider;

mod walker;

/// Tree-sitter backed provider. tree-sitter does not preprocess, so the
/// tree only ever describes the file itself and include directories are
/// accepted for interface compatibility only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppProvider;

impl CppProvider {
    /// Check that the grammar loads before any file is touched.
    pub fn new() -> Result<Self> {
        treesitter::parser_for(&TsLanguage::Cpp)?;
        Ok(CppProvider)
    }
}

impl SyntaxProvider for CppProvider {
    fn parse(&self, path: &Path, source: &str, include_dirs: &[PathBuf]) -> Result<SyntaxTree> {
        if !include_dirs.is_empty() {
            tracing::debug!(
                count = include_dirs.len(),
                "include directories ignored: tree-sitter does not follow #include"
            );
        }

        let tree = treesitter::parse(source, TsLanguage::Cpp)?;
        if tree.root_node().has_error() {
            tracing::debug!(file = %path.display(), "parse tree has error nodes, using recovered tree");
        }

        let root = walker::walk_cpp_file(&tree, source, path);
        tracing::trace!(file = %path.display(), nodes = root.count(), "syntax tree built");
        Ok(SyntaxTree { root })
    }
}
