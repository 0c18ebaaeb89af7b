/// Node and token kinds exposed by a syntax-tree provider.
///
/// Only the distinctions the comment anchors need survive: method-like
/// nodes, data members/variables, and everything else.
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    TranslationUnit,
    Method,
    Constructor,
    Destructor,
    Field,
    Variable,
    /// Anything else, tagged with the provider's own kind name.
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::TranslationUnit => "translation_unit",
            NodeKind::Method => "method",
            NodeKind::Constructor => "constructor",
            NodeKind::Destructor => "destructor",
            NodeKind::Field => "field",
            NodeKind::Variable => "variable",
            NodeKind::Other(kind) => kind,
        }
    }

    /// Methods, constructors and destructors: documented by the first comment in their body.
    pub fn is_method_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Method | NodeKind::Constructor | NodeKind::Destructor
        )
    }

    /// Data members and variables: documented by a trailing comment on their line.
    pub fn is_data_member(&self) -> bool {
        matches!(self, NodeKind::Field | NodeKind::Variable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Comment,
    Punctuation,
    Other,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Other => "other",
        }
    }
}
