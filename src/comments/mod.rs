/// Comment entities — what was found, where, and for whom.
///
/// One list of entities is produced per file. Every entity claims a set of
/// physical lines and no line is claimed twice; the extractors check this
/// before they add anything.
use serde::Serialize;

pub mod anchor;
pub mod header;
pub mod member;
pub mod walker;

/// Inclusive line/column span, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub first_line: usize,
    pub first_col: usize,
    pub last_line: usize,
    pub last_col: usize,
}

impl SourceSpan {
    pub fn new(first_line: usize, first_col: usize, last_line: usize, last_col: usize) -> Self {
        debug_assert!(
            first_line > 0 && last_line >= first_line,
            "wrong line numbers: {first_line}..{last_line}"
        );
        SourceSpan {
            first_line,
            first_col,
            last_line,
            last_col,
        }
    }

    /// Whole physical lines.
    pub fn lines(first_line: usize, last_line: usize) -> Self {
        SourceSpan::new(first_line, 1, last_line, 1)
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.first_line && line <= self.last_line
    }
}

/// Data member flags carried by the comment introducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberFlag {
    #[default]
    None,
    /// `//!`: not streamed.
    Transient,
    /// `//||`: streamed without splitting.
    DontSplit,
    /// `//->`: pointer to a single object.
    Ptr,
}

impl MemberFlag {
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            "!" => MemberFlag::Transient,
            "||" => MemberFlag::DontSplit,
            "->" => MemberFlag::Ptr,
            _ => MemberFlag::None,
        }
    }

    /// The short code written after `//`.
    pub fn marker(&self) -> &'static str {
        match self {
            MemberFlag::None => "",
            MemberFlag::Transient => "!",
            MemberFlag::DontSplit => "||",
            MemberFlag::Ptr => "->",
        }
    }
}

/// A comment block documenting a method, class or file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlainComment {
    /// Comment text as found in the source.
    pub raw: Vec<String>,
    /// Doxygen text, one entry per output line.
    pub lines: Vec<String>,
    pub span: SourceSpan,
    /// Column the `///` block is indented to, 0-based.
    pub indent: usize,
    pub owner: String,
}

/// A trailing comment on a data member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberComment {
    pub text: String,
    pub flag: MemberFlag,
    pub array_size: Option<String>,
    pub line: usize,
    /// 1-based column where the comment introducer starts.
    pub column: usize,
    pub owner: String,
}

impl MemberComment {
    /// Array sizes and the dontsplit/ptr flags must stay readable by ROOT's
    /// own parser, so the description moves to a line of its own.
    pub fn needs_split(&self) -> bool {
        self.array_size.is_some() || matches!(self.flag, MemberFlag::DontSplit | MemberFlag::Ptr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Plain(PlainComment),
    Member(MemberComment),
    /// Lines dropped from the output.
    Removal(SourceSpan),
}

impl Entity {
    pub fn span(&self) -> SourceSpan {
        match self {
            Entity::Plain(c) => c.span,
            Entity::Member(m) => SourceSpan::new(m.line, m.column, m.line, m.column),
            Entity::Removal(span) => *span,
        }
    }

    pub fn covers(&self, line: usize) -> bool {
        self.span().contains_line(line)
    }

    pub fn owner(&self) -> &str {
        match self {
            Entity::Plain(c) => &c.owner,
            Entity::Member(m) => &m.owner,
            Entity::Removal(_) => "<remove>",
        }
    }
}

/// The entity claiming `line`, if any.
pub fn entity_at(entities: &[Entity], line: usize) -> Option<&Entity> {
    entities.iter().find(|e| e.covers(line))
}

pub fn is_claimed(entities: &[Entity], line: usize) -> bool {
    entity_at(entities, line).is_some()
}
