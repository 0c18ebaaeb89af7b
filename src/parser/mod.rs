/// Parser module — C++ source → provider-agnostic syntax tree.
use std::path::{Path, PathBuf};

use crate::error::Result;

pub mod cpp;
pub mod kinds;
pub mod syntax;
pub mod treesitter;

pub use syntax::{Extent, SyntaxNode, SyntaxTree, Token};

/// Anything that can turn a C++ file into a syntax tree.
///
/// The comment anchors only need node kinds, names, file/line locations and
/// the token stream of method bodies, so a provider may be as shallow as it
/// likes beyond that.
pub trait SyntaxProvider {
    fn parse(&self, path: &Path, source: &str, include_dirs: &[PathBuf]) -> Result<SyntaxTree>;
}
