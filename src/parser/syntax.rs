/// Provider-agnostic syntax tree: the minimal surface the comment anchors read.
use std::path::PathBuf;

use super::kinds::{NodeKind, TokenKind};

/// Start/end position of a token, 1-based lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Extent {
    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub spelling: String,
    pub extent: Extent,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    pub fn is_punctuation(&self, spelling: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.spelling == spelling
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Declared name, empty when the node has none.
    pub spelling: String,
    /// File the node originates from; `None` for synthetic nodes.
    pub file: Option<PathBuf>,
    /// 1-based line of the node's name (declarator for members).
    pub line: usize,
    /// Token stream of the body, opening brace first. Only method definitions carry one.
    pub body: Option<Vec<Token>>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, spelling: impl Into<String>, line: usize) -> Self {
        SyntaxNode {
            kind,
            spelling: spelling.into(),
            file: None,
            line,
            body: None,
            children: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_body(mut self, body: Vec<Token>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Total number of nodes in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::count).sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}
