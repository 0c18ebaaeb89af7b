/// Shared tree-sitter parser infrastructure.

pub mod cursor;

use crate::error::{ConvertError, Result};

/// Supported tree-sitter languages.
pub enum TsLanguage {
    Cpp,
}

impl TsLanguage {
    pub fn ts_language(&self) -> tree_sitter::Language {
        match self {
            TsLanguage::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TsLanguage::Cpp => "cpp",
        }
    }
}

/// Build a parser for the given grammar. Fails when the grammar ABI does not match the runtime.
pub fn parser_for(lang: &TsLanguage) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&lang.ts_language())
        .map_err(|e| ConvertError::Provider(format!("cannot load {} grammar: {e}", lang.name())))?;
    Ok(parser)
}

/// Parse source text with the given tree-sitter language grammar.
pub fn parse(source: &str, lang: TsLanguage) -> Result<tree_sitter::Tree> {
    let mut parser = parser_for(&lang)?;
    parser
        .parse(source, None)
        .ok_or_else(|| ConvertError::Provider(format!("{} parser returned no tree", lang.name())))
}
