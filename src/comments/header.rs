/// Class/file description at the top of a source file.
///
/// The syntax tree knows nothing about it: the first run of `//` lines in
/// the file is taken, provided no other entity got there first. `\class`,
/// `\file`, `\author` and `\date` lines are pulled out of the body and
/// regenerated in a fixed order.
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{is_claimed, Entity, PlainComment, SourceSpan};
use crate::error::Result;
use crate::refactor::normalizer::strip_html;
use crate::refactor::Normalizer;
use crate::source::SourceLines;

static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*///?(\s*.*?)\s*/*\s*$").expect("valid regex"));

static NAME_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\\(class|file):?\s*([^.]*)").expect("valid regex"));

static AUTHOR_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\\?authors?\b:?\s*(.*?)\s*(,?\s*([0-9./-]+))?\s*$").expect("valid regex")
});

static DATE_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\\?date:?\s*([0-9./-]+)\s*$").expect("valid regex"));

/// Header fields collected while scanning the comment run.
#[derive(Debug, Default)]
struct HeaderFields {
    name: Option<String>,
    author: Option<String>,
    date: Option<String>,
    body: Vec<String>,
}

impl HeaderFields {
    fn absorb(&mut self, text: &str) {
        if let Some(caps) = NAME_DIRECTIVE.captures(text) {
            self.name = Some(caps[2].trim().to_string());
        } else if let Some(caps) = AUTHOR_DIRECTIVE.captures(text) {
            self.author = Some(caps[1].to_string());
            // A standalone \date wins over one embedded in \author
            if self.date.is_none() {
                self.date = caps.get(3).map(|m| m.as_str().to_string());
            }
        } else if let Some(caps) = DATE_DIRECTIVE.captures(text) {
            self.date = Some(caps[1].to_string());
        } else {
            self.body.push(text.to_string());
        }
    }
}

/// Extract the header block of `path`, if it has one.
///
/// `is_macro` files get `\file NAME.C` instead of `\class NAME`.
pub fn extract_header(
    path: &Path,
    lines: &SourceLines<'_>,
    entities: &[Entity],
    normalizer: &Normalizer,
    is_macro: bool,
) -> Result<Option<PlainComment>> {
    let mut fields = HeaderFields::default();
    let mut raw = Vec::new();
    let mut run: Option<(usize, usize)> = None;

    for (num, line) in lines.numbered() {
        if run.is_some() && line.trim().is_empty() {
            continue;
        }

        let stripped = strip_html(line);
        let Some(caps) = HEADER_LINE.captures(&stripped) else {
            if run.is_some() {
                break;
            }
            continue;
        };

        if is_claimed(entities, num) {
            if run.is_none() {
                tracing::debug!(line = num, "first comment already documents something else");
            }
            break;
        }

        run = Some(run.map_or((num, num), |(first, _)| (first, num)));
        raw.push(line.to_string());
        fields.absorb(caps.get(1).map_or("", |m| m.as_str()));
    }

    let name = fields.name.take().unwrap_or_else(|| default_name(path));

    let Some((first, last)) = run else {
        tracing::warn!(class = %name, "no comment found for class");
        return Ok(None);
    };

    let mut body = Vec::with_capacity(fields.body.len() + 5);
    body.push(if is_macro {
        format!("\\file {name}.C")
    } else {
        format!("\\class {name}")
    });
    body.push(String::new());
    body.append(&mut fields.body);
    body.push(String::new());
    if let Some(author) = fields.author {
        body.push(format!("\\author {author}"));
    }
    if let Some(date) = fields.date {
        body.push(format!("\\date {date}"));
    }

    let normalized = normalizer.normalize(&body, false)?;
    tracing::debug!(class = %name, first, last, "comment found for class");

    Ok(Some(PlainComment {
        raw,
        lines: normalized,
        span: SourceSpan::lines(first, last),
        indent: 0,
        owner: name,
    }))
}

/// File name without directory and final extension.
fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
