/// Data member comment extraction.
///
/// Works on raw lines rather than on the syntax tree: member declarations
/// are assumed to fit on one line and the comment trails the declaration.
use once_cell::sync::Lazy;
use regex::Regex;

use super::{MemberComment, MemberFlag, SourceSpan};

/// `//`, `///`, `//!`, `//||` or `//->`, an optional `[size]`, an optional `<`, then the text.
static MEMBER_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(//(!|\|\||->)|///?)(\[([0-9,]+)\])?<?\s*(.*?)\s*$").expect("valid regex")
});

/// A description already hoisted above the declaration by an earlier conversion.
static HOISTED_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*///\s*(.*?)\s*$").expect("valid regex"));

/// Result of scanning one declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMatch {
    pub comment: MemberComment,
    /// The previous line, when its `///` text became the description.
    pub hoisted: Option<SourceSpan>,
}

/// Scan the declaration on `line` (text `current`) for a trailing comment.
///
/// `previous` is the line above, or `None` when it does not exist or is
/// already claimed by another entity. Returns `None` for undocumented members.
pub fn extract_member(
    current: &str,
    previous: Option<&str>,
    line: usize,
    owner: &str,
) -> Option<MemberMatch> {
    let start = comment_start(current)?;
    let caps = MEMBER_COMMENT.captures(&current[start..])?;

    let flag = caps
        .get(2)
        .map_or(MemberFlag::None, |m| MemberFlag::from_marker(m.as_str()));
    let array_size = caps.get(4).map(|m| m.as_str().to_string());
    let mut text = caps.get(5).map_or("", |m| m.as_str()).to_string();

    let mut hoisted = None;
    if array_size.is_some() && line > 1 {
        if let Some(prev_caps) = previous.and_then(|p| HOISTED_DESCRIPTION.captures(p)) {
            text = prev_caps
                .get(1)
                .map_or("", |m| m.as_str())
                .to_string();
            hoisted = Some(SourceSpan::lines(line - 1, line - 1));
        }
    }

    Some(MemberMatch {
        comment: MemberComment {
            text,
            flag,
            array_size,
            line,
            column: start + 1,
            owner: owner.to_string(),
        },
        hoisted,
    })
}

/// Byte offset of the `//` opening the line comment, skipping string and
/// character literals and `/* */` blocks.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        match (quote, bytes[i]) {
            (Some(_), b'\\') => i += 1,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(bytes[i]),
            (None, b'/') if bytes.get(i + 1) == Some(&b'/') => return Some(i),
            (None, b'/') if bytes.get(i + 1) == Some(&b'*') => {
                let end = line[i + 2..].find("*/")?;
                i += end + 3;
            }
            (None, _) => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(current: &str) -> MemberComment {
        extract_member(current, None, 10, "fX")
            .expect("member comment")
            .comment
    }

    #[test]
    fn test_plain_comment() {
        let c = extract("   Double_t fX;   // x coordinate  ");
        assert_eq!(c.text, "x coordinate");
        assert_eq!(c.flag, MemberFlag::None);
        assert_eq!(c.array_size, None);
        assert_eq!(c.column, 19);
        assert_eq!(c.line, 10);
        assert_eq!(c.owner, "fX");
    }

    #[test]
    fn test_flags() {
        assert_eq!(extract("Int_t fN; //! cache").flag, MemberFlag::Transient);
        assert_eq!(extract("TObjArray *fA; //|| list").flag, MemberFlag::DontSplit);
        assert_eq!(extract("TObject *fO; //-> owner").flag, MemberFlag::Ptr);
        assert_eq!(extract("Int_t fN; /// doxygen").flag, MemberFlag::None);
    }

    #[test]
    fn test_already_doxygen_marker_is_absorbed() {
        let c = extract("Int_t fN; ///< count");
        assert_eq!(c.text, "count");
        let c = extract("Int_t fN; //!< cache");
        assert_eq!(c.text, "cache");
        assert_eq!(c.flag, MemberFlag::Transient);
    }

    #[test]
    fn test_array_size() {
        let c = extract("Double_t fM[3][3]; //[3,3] matrix");
        assert_eq!(c.array_size.as_deref(), Some("3,3"));
        assert_eq!(c.text, "matrix");
    }

    #[test]
    fn test_slashes_in_string_literal() {
        let line = r#"const char *kUrl = "http://x"; // url"#;
        let c = extract(line);
        assert_eq!(c.text, "url");
        assert_eq!(c.column, line.find("; //").map_or(0, |i| i + 3));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let c = extract(r#"const char *kQ = "a\"//b"; // quoted"#);
        assert_eq!(c.text, "quoted");
    }

    #[test]
    fn test_slash_char_literals() {
        assert_eq!(extract("char fSep = '/'; //! separator").text, "separator");
    }

    #[test]
    fn test_block_comment_before_member_comment() {
        assert_eq!(extract("Int_t /* a // b */ fN; // count").text, "count");
        assert!(extract_member("Int_t /* unterminated // x", None, 1, "fN").is_none());
    }

    #[test]
    fn test_only_string_slashes() {
        assert!(extract_member(r#"const char *kUrl = "http://x";"#, None, 1, "kUrl").is_none());
    }

    #[test]
    fn test_no_comment() {
        assert!(extract_member("Int_t fN;", None, 3, "fN").is_none());
    }

    #[test]
    fn test_promotion_from_previous_line() {
        let m = extract_member("   Int_t n; //[3]", Some("   /// the count"), 8, "n")
            .expect("member comment");
        assert_eq!(m.comment.text, "the count");
        assert_eq!(m.comment.array_size.as_deref(), Some("3"));
        assert_eq!(m.hoisted, Some(SourceSpan::lines(7, 7)));
    }

    #[test]
    fn test_no_promotion_without_array_size() {
        let m = extract_member("Int_t n; // own text", Some("/// hoisted"), 8, "n")
            .expect("member comment");
        assert_eq!(m.comment.text, "own text");
        assert!(m.hoisted.is_none());
    }

    #[test]
    fn test_no_promotion_from_plain_code() {
        let m = extract_member("Int_t n; //[3] own", Some("Int_t k;"), 8, "n")
            .expect("member comment");
        assert_eq!(m.comment.text, "own");
        assert!(m.hoisted.is_none());
    }
}
