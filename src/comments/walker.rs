/// Entity walker — SyntaxTree → ordered comment entities.
///
/// Depth-first, pre-order. Every documented node is handed to its comment
/// anchor; the header is looked for once the whole tree has been visited,
/// so comments claimed by methods and members take precedence over it.
use std::path::Path;

use super::anchor::{anchor_for, AnchorContext, Anchored};
use super::header::extract_header;
use super::{Entity, PlainComment};
use crate::error::Result;
use crate::parser::{SyntaxNode, SyntaxTree};
use crate::refactor::Normalizer;
use crate::source::SourceLines;

struct EntityWalkCtx<'a> {
    path: &'a Path,
    lines: SourceLines<'a>,
    normalizer: &'a Normalizer,
    is_macro: bool,
    entities: Vec<Entity>,
}

/// Collect the comment entities of `path` from its syntax tree.
pub fn collect_entities(
    tree: &SyntaxTree,
    path: &Path,
    source: &str,
    normalizer: &Normalizer,
    is_macro: bool,
) -> Result<Vec<Entity>> {
    let mut ctx = EntityWalkCtx {
        path,
        lines: SourceLines::new(source),
        normalizer,
        is_macro,
        entities: Vec::new(),
    };

    walk_node(&mut ctx, &tree.root, 0)?;

    if let Some(header) = extract_header(
        ctx.path,
        &ctx.lines,
        &ctx.entities,
        ctx.normalizer,
        ctx.is_macro,
    )? {
        ctx.entities.push(Entity::Plain(header));
    }

    Ok(ctx.entities)
}

fn walk_node(ctx: &mut EntityWalkCtx<'_>, node: &SyntaxNode, depth: usize) -> Result<()> {
    if let Some(file) = &node.file {
        if file.as_path() != ctx.path {
            tracing::debug!(file = %file.display(), "skipping included file");
            return Ok(());
        }
    }

    tracing::debug!(
        line = node.line,
        depth,
        kind = node.kind.as_str(),
        name = %node.spelling,
        "visit"
    );

    if let Some(anchor) = anchor_for(&node.kind, ctx.is_macro) {
        let anchored = {
            let anchor_ctx = AnchorContext {
                path: ctx.path,
                lines: &ctx.lines,
                entities: &ctx.entities,
            };
            anchor.resolve(node, &anchor_ctx)?
        };
        if let Some(anchored) = anchored {
            add_anchored(ctx, node, anchored)?;
        }
    }

    for child in &node.children {
        walk_node(ctx, child, depth + 1)?;
    }
    Ok(())
}

fn add_anchored(ctx: &mut EntityWalkCtx<'_>, node: &SyntaxNode, anchored: Anchored) -> Result<()> {
    match anchored {
        Anchored::Block { raw, span, indent } => {
            if (span.first_line..=span.last_line).any(|l| super::is_claimed(&ctx.entities, l)) {
                tracing::debug!(function = %node.spelling, "comment already claimed, skipping");
                return Ok(());
            }

            let mut lines = ctx.normalizer.normalize(&raw, true)?;
            if lines.is_empty() {
                tracing::debug!(function = %node.spelling, "empty comment found for function: collapsing");
                lines.push(String::new());
            } else {
                tracing::debug!(function = %node.spelling, "comment found for function");
            }

            ctx.entities.push(Entity::Plain(PlainComment {
                raw,
                lines,
                span,
                indent,
                owner: node.spelling.clone(),
            }));
        }
        Anchored::Member(found) => {
            tracing::debug!(
                member = %node.spelling,
                flag = found.comment.flag.marker(),
                array_size = found.comment.array_size.as_deref().unwrap_or(""),
                "comment found for member"
            );
            if let Some(hoisted) = found.hoisted {
                ctx.entities.push(Entity::Removal(hoisted));
            }
            ctx.entities.push(Entity::Member(found.comment));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{MemberFlag, SourceSpan};
    use crate::parser::kinds::{NodeKind, TokenKind};
    use crate::parser::{Extent, Token};
    use crate::refactor::MacroMaterializer;

    fn comment_token(line: usize, col: usize, text: &str) -> Token {
        Token {
            kind: TokenKind::Comment,
            spelling: text.into(),
            extent: Extent {
                start_line: line,
                start_col: col,
                end_line: line,
                end_col: col + text.len(),
            },
        }
    }

    fn brace(line: usize) -> Token {
        Token {
            kind: TokenKind::Punctuation,
            spelling: "{".into(),
            extent: Extent {
                start_line: line,
                start_col: 1,
                end_line: line,
                end_col: 2,
            },
        }
    }

    fn collect(path: &str, source: &str, root: SyntaxNode) -> Vec<Entity> {
        let normalizer = Normalizer::new(MacroMaterializer::new(path), "png");
        let tree = SyntaxTree { root };
        collect_entities(&tree, Path::new(path), source, &normalizer, path.ends_with(".C"))
            .expect("collect")
    }

    fn unit(path: &str, children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(NodeKind::TranslationUnit, path, 1)
            .with_file(path)
            .with_children(children)
    }

    const SOURCE: &str = "\
// The Foo class.
class Foo {
   Int_t fN; // number of things
   Double_t fX[3]; //[3] coordinates
};

void Foo::Bar()
{
   // ----
   // Do the bar.
   // ----
   fN = 0;
}
";

    fn foo_tree(path: &str) -> SyntaxNode {
        let class = SyntaxNode::new(NodeKind::Other("class_specifier".into()), "Foo", 2)
            .with_file(path)
            .with_children(vec![
                SyntaxNode::new(NodeKind::Field, "fN", 3).with_file(path),
                SyntaxNode::new(NodeKind::Field, "fX", 4).with_file(path),
            ]);
        let method = SyntaxNode::new(NodeKind::Method, "Bar", 7)
            .with_file(path)
            .with_body(vec![
                brace(8),
                comment_token(9, 4, "// ----"),
                comment_token(10, 4, "// Do the bar."),
                comment_token(11, 4, "// ----"),
            ]);
        unit(path, vec![class, method])
    }

    #[test]
    fn test_collects_all_kinds_in_order() {
        let entities = collect("Foo.cxx", SOURCE, foo_tree("Foo.cxx"));
        assert_eq!(entities.len(), 4);

        let Entity::Member(n) = &entities[0] else {
            panic!("expected member, got {:?}", entities[0]);
        };
        assert_eq!(n.text, "number of things");
        assert_eq!(n.flag, MemberFlag::None);

        let Entity::Member(x) = &entities[1] else {
            panic!("expected member");
        };
        assert_eq!(x.array_size.as_deref(), Some("3"));

        let Entity::Plain(bar) = &entities[2] else {
            panic!("expected method comment");
        };
        assert_eq!(bar.lines, vec!["Do the bar."]);
        assert_eq!(bar.span, SourceSpan::new(9, 4, 11, 11));
        assert_eq!(bar.indent, 3);
        assert_eq!(bar.owner, "Bar");

        let Entity::Plain(header) = &entities[3] else {
            panic!("expected header");
        };
        assert_eq!(header.lines, vec!["\\class Foo", "", "The Foo class."]);
        assert_eq!(header.span, SourceSpan::lines(1, 1));
    }

    #[test]
    fn test_macro_file_members_ignored() {
        let entities = collect("Foo.C", SOURCE, foo_tree("Foo.C"));
        assert!(entities.iter().all(|e| !matches!(e, Entity::Member(_))));
        let Some(Entity::Plain(header)) = entities.last() else {
            panic!("expected header");
        };
        assert_eq!(header.lines[0], "\\file Foo.C");
    }

    #[test]
    fn test_foreign_nodes_skipped() {
        let root = unit(
            "Foo.cxx",
            vec![SyntaxNode::new(NodeKind::Field, "fN", 3).with_file("TObject.h")],
        );
        let entities = collect("Foo.cxx", SOURCE, root);
        assert_eq!(entities.len(), 1);
        assert!(matches!(entities[0], Entity::Plain(_)));
    }

    #[test]
    fn test_empty_method_comment_collapses() {
        let source = "void A::B()\n{\n   // ======\n}\n";
        let root = unit(
            "A.cxx",
            vec![SyntaxNode::new(NodeKind::Method, "B", 1)
                .with_file("A.cxx")
                .with_body(vec![brace(2), comment_token(3, 4, "// ======")])],
        );
        let entities = collect("A.cxx", source, root);
        let Entity::Plain(b) = &entities[0] else {
            panic!("expected method comment");
        };
        assert_eq!(b.lines, vec![String::new()]);
        assert_eq!(b.raw, vec!["// ======"]);
    }

    #[test]
    fn test_promotion_adds_removal() {
        let source = "struct S {\n   /// the count\n   Int_t n; //[3]\n};\n";
        let root = unit(
            "S.h",
            vec![SyntaxNode::new(NodeKind::Field, "n", 3).with_file("S.h")],
        );
        let entities = collect("S.h", source, root);
        assert_eq!(entities[0], Entity::Removal(SourceSpan::lines(2, 2)));
        let Entity::Member(n) = &entities[1] else {
            panic!("expected member");
        };
        assert_eq!(n.text, "the count");
        // The hoisted line is claimed, so it is not picked up as the header
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_no_line_claimed_twice() {
        let entities = collect("Foo.cxx", SOURCE, foo_tree("Foo.cxx"));
        for line in 1..=SOURCE.lines().count() {
            let owners = entities.iter().filter(|e| e.covers(line)).count();
            assert!(owners <= 1, "line {line} claimed {owners} times");
        }
    }
}
