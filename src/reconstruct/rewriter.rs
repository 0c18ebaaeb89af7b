/// Source rewriter — original lines + entities → converted text.
///
/// One forward pass. Lines no entity claims are copied as they are; comment
/// blocks are held back and written out as `///` lines when the block ends.
use crate::comments::{entity_at, Entity, MemberComment, MemberFlag, PlainComment};
use crate::source::{before_column, leading_whitespace, SourceLines};

/// Rewrite `source` with every entity's comment in Doxygen form. Every
/// output line ends with `\n`.
pub fn rewrite(source: &str, entities: &[Entity]) -> String {
    let lines = SourceLines::new(source);
    let mut out = String::with_capacity(source.len() + source.len() / 8);
    let mut open: Option<&PlainComment> = None;

    for (num, line) in lines.numbered() {
        match entity_at(entities, num) {
            Some(Entity::Member(member)) => {
                flush(&mut out, open.take());
                emit_member(&mut out, line, member);
            }
            Some(Entity::Removal(_)) => {
                flush(&mut out, open.take());
            }
            Some(Entity::Plain(comment)) => {
                if num == comment.span.first_line {
                    flush(&mut out, open.take());
                    let code = before_column(line, comment.span.first_col).trim_end();
                    if !code.is_empty() {
                        push_line(&mut out, code);
                    }
                    open = Some(comment);
                }
            }
            None => {
                // The blank line right after a converted block is already written by the flush
                if flush(&mut out, open.take()) && line.trim().is_empty() {
                    continue;
                }
                push_line(&mut out, line);
            }
        }
    }

    flush(&mut out, open);
    out
}

/// Write out an open comment block. Returns whether there was one.
fn flush(out: &mut String, open: Option<&PlainComment>) -> bool {
    let Some(comment) = open else {
        return false;
    };
    let indent = " ".repeat(comment.indent);
    for line in &comment.lines {
        out.push_str(&indent);
        out.push_str("/// ");
        push_line(out, line);
    }
    out.push('\n');
    true
}

fn emit_member(out: &mut String, line: &str, member: &MemberComment) {
    let code = before_column(line, member.column);

    if member.needs_split() {
        // ROOT still has to read the flag and size from the declaration line
        out.push_str(leading_whitespace(line));
        out.push_str("/// ");
        push_line(out, &member.text);

        out.push_str(code);
        out.push_str("//");
        out.push_str(member.flag.marker());
        if let Some(size) = &member.array_size {
            out.push('[');
            out.push_str(size);
            out.push(']');
        }
        out.push('\n');
    } else {
        let marker = match member.flag {
            MemberFlag::Transient => '!',
            _ => '/',
        };
        out.push_str(code);
        out.push_str("//");
        out.push(marker);
        out.push_str("< ");
        push_line(out, &member.text);
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::SourceSpan;

    fn member(line: usize, column: usize, text: &str, flag: MemberFlag, size: Option<&str>) -> Entity {
        Entity::Member(MemberComment {
            text: text.into(),
            flag,
            array_size: size.map(str::to_string),
            line,
            column,
            owner: "fN".into(),
        })
    }

    fn plain(span: SourceSpan, indent: usize, lines: &[&str]) -> Entity {
        Entity::Plain(PlainComment {
            raw: Vec::new(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            span,
            indent,
            owner: "B".into(),
        })
    }

    #[test]
    fn test_untouched_without_entities() {
        let source = "int a;\n\nint b;\n";
        assert_eq!(rewrite(source, &[]), source);
    }

    #[test]
    fn test_final_newline_added() {
        assert_eq!(rewrite("int a;", &[]), "int a;\n");
    }

    #[test]
    fn test_carriage_returns_preserved() {
        assert_eq!(rewrite("int a;\r\nint b;\r\n", &[]), "int a;\r\nint b;\r\n");
    }

    #[test]
    fn test_member_one_line_forms() {
        let source = "   Int_t fN;   // count\n   Int_t fC;   //! cache\n";
        let entities = vec![
            member(1, 16, "count", MemberFlag::None, None),
            member(2, 16, "cache", MemberFlag::Transient, None),
        ];
        assert_eq!(
            rewrite(source, &entities),
            "   Int_t fN;   ///< count\n   Int_t fC;   //!< cache\n"
        );
    }

    #[test]
    fn test_member_split_forms() {
        let source = "   TObject *fO; //-> owned\n   Double_t *fA; //[fN] values\n";
        let entities = vec![
            member(1, 17, "owned", MemberFlag::Ptr, None),
            member(2, 18, "values", MemberFlag::None, Some("fN")),
        ];
        assert_eq!(
            rewrite(source, &entities),
            "   /// owned\n   TObject *fO; //->\n   /// values\n   Double_t *fA; //[fN]\n"
        );
    }

    #[test]
    fn test_member_promotion() {
        let source = "/// the count\nInt_t n; //[3]\n";
        let entities = vec![
            Entity::Removal(SourceSpan::lines(1, 1)),
            member(2, 10, "the count", MemberFlag::None, Some("3")),
        ];
        assert_eq!(rewrite(source, &entities), "/// the count\nInt_t n; //[3]\n");
    }

    #[test]
    fn test_method_block() {
        let source = "\
void A::B()
{
   // Comment.
   // More.

   x = 1;
}
";
        let entities = vec![plain(SourceSpan::new(3, 4, 4, 12), 3, &["Comment.", "More."])];
        assert_eq!(
            rewrite(source, &entities),
            "\
void A::B()
{
   /// Comment.
   /// More.

   x = 1;
}
"
        );
    }

    #[test]
    fn test_code_before_comment_kept() {
        let source = "void A::B() { // Short.\n   x = 1;\n}\n";
        let entities = vec![plain(SourceSpan::new(1, 15, 1, 24), 14, &["Short."])];
        assert_eq!(
            rewrite(source, &entities),
            "void A::B() {\n              /// Short.\n\n   x = 1;\n}\n"
        );
    }

    #[test]
    fn test_header_block_and_empty_lines() {
        let source = "// desc\nclass A {};\n";
        let entities = vec![plain(SourceSpan::lines(1, 1), 0, &["\\class A", "", "desc"])];
        assert_eq!(
            rewrite(source, &entities),
            "/// \\class A\n/// \n/// desc\n\nclass A {};\n"
        );
    }

    #[test]
    fn test_block_flushed_at_end_of_input() {
        let source = "// only";
        let entities = vec![plain(SourceSpan::lines(1, 1), 0, &["only"])];
        assert_eq!(rewrite(source, &entities), "/// only\n\n");
    }

    #[test]
    fn test_member_closes_open_block() {
        let source = "// desc\nInt_t fN; // count\n";
        let entities = vec![
            plain(SourceSpan::lines(1, 1), 0, &["desc"]),
            member(2, 11, "count", MemberFlag::None, None),
        ];
        assert_eq!(
            rewrite(source, &entities),
            "/// desc\n\nInt_t fN; ///< count\n"
        );
    }

    #[test]
    fn test_adjacent_blocks() {
        let source = "// one\n// two\nint x;\n";
        let entities = vec![
            plain(SourceSpan::lines(1, 1), 0, &["one"]),
            plain(SourceSpan::lines(2, 2), 0, &["two"]),
        ];
        assert_eq!(
            rewrite(source, &entities),
            "/// one\n\n/// two\n\nint x;\n"
        );
    }
}
