/// Comment normalizer — THtml comment text → Doxygen comment text.
///
/// A line-by-line state machine. Each input line is handled by exactly one
/// mode, in priority order:
///
/// 1. macro: `BEGIN_MACRO` .. `END_MACRO` bodies are buffered untouched and
///    replaced by a reference to the picture they generate;
/// 2. LaTeX: `BEGIN_LATEX` .. `END_LATEX` become `\f$ .. \f$` or
///    `\f[ .. \f]`, with ROOT's `#` escapes turned into `\`;
/// 3. default: comment delimiters and decorative separator lines are
///    stripped, and `<pre>` tags become `~~~` fences.
///
/// Separator lines collapse into at most one blank line between two content
/// lines, never at the start or the end.
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::macros::{with_suffix, MacroMaterializer};
use crate::error::{ConvertError, Result};

/// Leading `//`, `///`, `/*`, one optional space, the text, then trailing slashes or `*/`.
static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(/{2,}|/\*)? ?(\s*.*?)\s*((/{2,})?\s*|\*/)$").expect("valid regex")
});

static GARBAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([\s*=\-_#]+|(begin|end)_html)\s*$").expect("valid regex")
});

static HTML_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(p|br)/?>").expect("valid regex"));

static LATEX_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^((.*?)\s+)?(BEGIN|END)_LATEX([.,;:\s]+.*)?$").expect("valid regex")
});

static INLINE_LATEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(.*)BEGIN_LATEX\s+(.*?)\s+END_LATEX(.*)$").expect("valid regex")
});

static PRE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\s*)</?PRE>\s*$").expect("valid regex"));

static MACRO_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(BEGIN|END)_MACRO(\((.*?)\))?\s*$").expect("valid regex")
});

/// Remove `<p>` and `<br>` tags, with or without closing slashes.
pub fn strip_html(line: &str) -> Cow<'_, str> {
    HTML_BREAK.replace_all(line, "")
}

/// ROOT writes LaTeX with `#` where TeX has `\`.
fn latex_escape(text: &str) -> String {
    text.replace('#', "\\")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LatexStyle {
    /// `BEGIN_LATEX` alone on its line: `\f[ .. \f]`.
    Block,
    /// Text around the marker: `\f$ .. \f$`.
    Inline,
}

#[derive(Debug)]
enum Mode {
    Default,
    Latex(LatexStyle),
    /// Macro bodies may interrupt a LaTeX block; `resume` restores it.
    Macro {
        buffer: Vec<String>,
        resume: Option<LatexStyle>,
    },
}

impl Mode {
    fn latex(&self) -> Option<LatexStyle> {
        match self {
            Mode::Latex(style) => Some(*style),
            Mode::Macro { resume, .. } => *resume,
            Mode::Default => None,
        }
    }
}

/// Normalizes comment bodies for one source file. Macro bodies are
/// materialized relative to that file.
pub struct Normalizer {
    materializer: MacroMaterializer,
    image_extension: String,
}

impl Normalizer {
    pub fn new(materializer: MacroMaterializer, image_extension: impl Into<String>) -> Self {
        Normalizer {
            materializer,
            image_extension: image_extension.into(),
        }
    }

    /// Normalize raw comment lines. `strip_html` removes `<p>`/`<br>` tags
    /// first; header lines arrive with them already stripped.
    pub fn normalize(&self, lines: &[String], strip_html: bool) -> Result<Vec<String>> {
        let mut run = Run {
            normalizer: self,
            strip_html,
            mode: Mode::Default,
            out: Vec::new(),
            pending_blank: false,
            seen_content: false,
        };
        for line in lines {
            run.feed(line)?;
        }
        run.finish()
    }
}

/// State of one normalization pass.
struct Run<'n> {
    normalizer: &'n Normalizer,
    strip_html: bool,
    mode: Mode,
    out: Vec<String>,
    pending_blank: bool,
    seen_content: bool,
}

impl Run<'_> {
    fn feed(&mut self, raw: &str) -> Result<()> {
        if let Some(caps) = MACRO_MARK.captures(raw) {
            let begin = caps[1].eq_ignore_ascii_case("begin");
            return self.macro_marker(raw, begin);
        }
        if let Mode::Macro { buffer, .. } = &mut self.mode {
            buffer.push(raw.to_string());
            return Ok(());
        }

        let line = if self.strip_html {
            strip_html(raw)
        } else {
            Cow::Borrowed(raw)
        };
        let caps = COMMENT_LINE.captures(&line).ok_or_else(|| {
            ConvertError::Invariant(format!("comment line escapes strip pattern: {line:?}"))
        })?;
        let text = caps.get(2).map_or("", |m| m.as_str());

        if text.is_empty() || GARBAGE.is_match(text) {
            self.pending_blank = true;
            return Ok(());
        }
        self.begin_content();

        let text = expand_inline_latex(text);

        if let Some(caps) = LATEX_MARK.captures(&text) {
            let before = caps.get(2).map_or("", |m| m.as_str());
            let after = caps.get(4).map_or("", |m| m.as_str());
            if caps[3].eq_ignore_ascii_case("begin") {
                self.open_latex(before, after);
            } else {
                self.close_latex(before, after);
            }
            return Ok(());
        }

        match self.mode.latex() {
            Some(_) => self.out.push(latex_escape(&text)),
            None => match PRE_TAG.captures(&text) {
                Some(pre) => self.out.push(format!("{}~~~", &pre[1])),
                None => self.out.push(text),
            },
        }
        Ok(())
    }

    /// Emit the pending blank line, unless nothing has been written yet.
    fn begin_content(&mut self) {
        if self.pending_blank && self.seen_content {
            self.out.push(String::new());
        }
        self.pending_blank = false;
        self.seen_content = true;
    }

    fn macro_marker(&mut self, raw: &str, begin: bool) -> Result<()> {
        match (&mut self.mode, begin) {
            (Mode::Macro { buffer, .. }, true) => {
                tracing::debug!(line = raw, "nested BEGIN_MACRO kept in macro body");
                buffer.push(raw.to_string());
            }
            (Mode::Macro { buffer, resume }, false) => {
                let buffer = std::mem::take(buffer);
                let resume = *resume;
                self.mode = match resume {
                    Some(style) => Mode::Latex(style),
                    None => Mode::Default,
                };
                let prefix = self.normalizer.materializer.materialize(&buffer)?;
                let image = with_suffix(&prefix, &self.normalizer.image_extension);
                tracing::debug!(image = %image.display(), "found macro for generating image");
                // Blank-line bookkeeping belongs to plain text only
                self.out
                    .push(format!("![Picture from ROOT macro]({})", image.display()));
            }
            (mode, true) => {
                let resume = mode.latex();
                *mode = Mode::Macro {
                    buffer: Vec::new(),
                    resume,
                };
            }
            (_, false) => {
                tracing::warn!("END_MACRO without BEGIN_MACRO, dropped");
            }
        }
        Ok(())
    }

    fn open_latex(&mut self, before: &str, after: &str) {
        if before.is_empty() && after.is_empty() {
            self.out.push("\\f[".to_string());
            self.mode = Mode::Latex(LatexStyle::Block);
        } else {
            self.out.push(format!("{before} \\f${}", latex_escape(after)));
            self.mode = Mode::Latex(LatexStyle::Inline);
        }
    }

    fn close_latex(&mut self, before: &str, after: &str) {
        match self.mode.latex().unwrap_or(LatexStyle::Inline) {
            LatexStyle::Block => {
                if !before.is_empty() {
                    self.out.push(latex_escape(before));
                }
                self.out.push("\\f]".to_string());
                if !after.is_empty() {
                    self.out.push(after.to_string());
                }
            }
            LatexStyle::Inline => {
                self.out.push(format!("{}\\f${after}", latex_escape(before)));
            }
        }
        self.mode = Mode::Default;
    }

    fn finish(self) -> Result<Vec<String>> {
        match self.mode {
            Mode::Macro { buffer, .. } => {
                tracing::warn!(lines = buffer.len(), "BEGIN_MACRO without END_MACRO, macro dropped");
            }
            Mode::Latex(_) => tracing::warn!("BEGIN_LATEX without END_LATEX"),
            Mode::Default => {}
        }
        Ok(self.out)
    }
}

/// Rewrite every `BEGIN_LATEX expr END_LATEX` on the line to `\f$expr\f$`.
fn expand_inline_latex(text: &str) -> String {
    let mut text = text.to_string();
    while let Some(caps) = INLINE_LATEX.captures(&text) {
        let expanded = format!(
            "{}\\f${}\\f${}",
            &caps[1],
            latex_escape(&caps[2]),
            &caps[3]
        );
        text = expanded;
    }
    text
}
