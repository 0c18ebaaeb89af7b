/// Find the raw comment span that documents a declaration.
///
/// Two strategies resolve where a declaration's documentation lives:
/// methods read the token stream of their body, data members read the
/// physical line they are declared on. Both sit behind `CommentAnchor` so
/// the entity walker does not care which one it got.
use std::path::Path;

use super::member::{extract_member, MemberMatch};
use super::{is_claimed, Entity, SourceSpan};
use crate::error::{ConvertError, Result};
use crate::parser::kinds::NodeKind;
use crate::parser::{SyntaxNode, Token};
use crate::source::SourceLines;

/// What an anchor sees of the file being processed.
pub struct AnchorContext<'a> {
    pub path: &'a Path,
    pub lines: &'a SourceLines<'a>,
    /// Entities found so far, in discovery order.
    pub entities: &'a [Entity],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchored {
    /// A comment block, not yet normalized.
    Block {
        raw: Vec<String>,
        span: SourceSpan,
        indent: usize,
    },
    Member(MemberMatch),
}

pub trait CommentAnchor {
    /// Locate the raw comment documenting `node`. `Ok(None)` means undocumented.
    fn resolve(&self, node: &SyntaxNode, ctx: &AnchorContext<'_>) -> Result<Option<Anchored>>;
}

/// First comment run right after the opening brace of a method body.
pub struct BodyTokenAnchor;

/// Trailing comment on the declaration line of a data member or variable.
pub struct DeclarationLineAnchor;

/// The anchor documenting nodes of `kind`. Data members of macro files are
/// not documented.
pub fn anchor_for(kind: &NodeKind, is_macro: bool) -> Option<&'static dyn CommentAnchor> {
    if kind.is_method_like() {
        Some(&BodyTokenAnchor)
    } else if kind.is_data_member() && !is_macro {
        Some(&DeclarationLineAnchor)
    } else {
        None
    }
}

impl CommentAnchor for BodyTokenAnchor {
    fn resolve(&self, node: &SyntaxNode, _ctx: &AnchorContext<'_>) -> Result<Option<Anchored>> {
        let Some(body) = node.body.as_deref() else {
            tracing::debug!(function = %node.spelling, "declaration without body");
            return Ok(None);
        };

        let found = first_comment_run(body);
        if found.is_none() {
            tracing::warn!(function = %node.spelling, "no comment found for function");
        }
        Ok(found)
    }
}

/// Collect consecutive single-line comments following the opening brace.
/// A comment spanning several lines is taken whole and ends the run.
fn first_comment_run(body: &[Token]) -> Option<Anchored> {
    let tokens = match body.first() {
        Some(first) if first.is_punctuation("{") => &body[1..],
        _ => body,
    };

    let mut raw: Vec<String> = Vec::new();
    let mut span: Option<SourceSpan> = None;
    let mut indent = usize::MAX;

    for token in tokens {
        if !token.is_comment() {
            tracing::trace!(
                kind = token.kind.as_str(),
                line = token.extent.start_line,
                "comment run ends"
            );
            break;
        }
        let ext = token.extent;
        if let Some(prev) = span {
            if ext.start_line != prev.last_line + 1 || !ext.is_single_line() {
                break;
            }
        }

        indent = indent.min(ext.start_col.saturating_sub(1));
        span = Some(match span {
            None => SourceSpan::new(ext.start_line, ext.start_col, ext.end_line, ext.end_col),
            Some(prev) => SourceSpan::new(prev.first_line, prev.first_col, ext.end_line, ext.end_col),
        });
        raw.extend(token.spelling.split('\n').map(str::to_string));

        if !ext.is_single_line() {
            break;
        }
    }

    span.map(|span| Anchored::Block { raw, span, indent })
}

impl CommentAnchor for DeclarationLineAnchor {
    fn resolve(&self, node: &SyntaxNode, ctx: &AnchorContext<'_>) -> Result<Option<Anchored>> {
        let line = node.line;
        let current = ctx.lines.get(line).ok_or_else(|| ConvertError::MissingLine {
            path: ctx.path.to_path_buf(),
            line,
        })?;

        if is_claimed(ctx.entities, line) {
            tracing::debug!(member = %node.spelling, line, "line already documented, skipping");
            return Ok(None);
        }

        // A claimed previous line belongs to someone else and cannot be hoisted
        let previous = line
            .checked_sub(1)
            .filter(|prev| *prev > 0 && !is_claimed(ctx.entities, *prev))
            .and_then(|prev| ctx.lines.get(prev));

        Ok(extract_member(current, previous, line, &node.spelling).map(Anchored::Member))
    }
}
