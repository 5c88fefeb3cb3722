//! Document diagnostics
//!
//! The segmenter never fails: markup it does not recognize silently stays
//! in the surrounding text. This module reports those cases so a user can
//! see why a block did not render. It can identify:
//!
//! - Iframes from unsupported sources, or with an empty provider ID
//! - Tables that are never closed or have no rows
//! - Ragged tables whose short rows will be padded
//!
//! ## Example
//!
//! ```rust
//! use richblocks::diagnostics::{check_document, DiagnosticLevel};
//!
//! let result = check_document("intro <table><tr><td>1</td></tr>");
//! assert_eq!(result.warnings, 1);
//! assert_eq!(result.diagnostics[0].level, DiagnosticLevel::Warning);
//! ```

use std::fmt;
use std::ops::Range;

use crate::core::embed::EmbedRef;
use crate::core::segmenter::{segment_document, Segment, SegmentKind};
use crate::core::table::parser::{parse_rows, raw_row_lengths};
use crate::utils::html::{attribute, TagScanner};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMPTY_YOUTUBE_ID: Regex =
        Regex::new(r"(?i)youtube\.com/embed/?(?:[?#]|$)").expect("empty youtube id pattern");
    static ref EMPTY_DRIVE_ID: Regex =
        Regex::new(r"(?i)drive\.google\.com/file/d/(?:/|preview|$)").expect("empty drive id pattern");
}

/// Longest source excerpt attached to a diagnostic
const EXCERPT_LEN: usize = 60;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - a block will not render the way it was probably meant to
    Warning,
    /// Error - markup is malformed
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub column: Option<usize>,
    /// Span of text in the source (start, end)
    pub span: Option<(usize, usize)>,
    /// Relevant source text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            span: None,
            source_text: None,
            suggestion: None,
        }
    }

    /// Add location information
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Add span information
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Check a document for markup that will not render as a block
pub fn check_document(input: &str) -> CheckResult {
    let mut result = CheckResult::new();
    let line_offsets = compute_line_offsets(input);
    let scanner = TagScanner::new(input);
    let locate = Locator {
        source: input,
        line_offsets: &line_offsets,
    };

    for segment in segment_document(input).iter() {
        match segment.kind {
            SegmentKind::Text => {
                check_stray_iframes(&scanner, segment.span.clone(), &locate, &mut result);
                check_stray_tables(&scanner, segment.span.clone(), &locate, &mut result);
            }
            SegmentKind::Table => check_table(segment, &locate, &mut result),
            SegmentKind::Youtube | SegmentKind::Pdf => {}
        }
    }

    result
}

/// Maps byte spans to diagnostics with line, column and excerpt filled in
struct Locator<'a> {
    source: &'a str,
    line_offsets: &'a [usize],
}

impl Locator<'_> {
    fn at(&self, level: DiagnosticLevel, message: impl Into<String>, span: Range<usize>) -> Diagnostic {
        let (line, col) = offset_to_location(span.start, self.line_offsets);
        Diagnostic::new(level, message)
            .with_location(line, col)
            .with_span(span.start, span.end)
            .with_source(excerpt(&self.source[span]))
    }
}

/// Iframes left inside a text run
fn check_stray_iframes(
    scanner: &TagScanner<'_>,
    span: Range<usize>,
    locate: &Locator<'_>,
    result: &mut CheckResult,
) {
    let mut pos = span.start;
    while let Some(start) = scanner.find_open("iframe", pos).filter(|s| *s < span.end) {
        let Some(tag_end) = scanner.open_tag_end(start) else {
            result.add(
                locate
                    .at(DiagnosticLevel::Error, "malformed <iframe> tag", start..span.end)
                    .with_suggestion("Close the opening tag with '>'"),
            );
            break;
        };
        let Some(frame) = scanner.element_at("iframe", start) else {
            result.add(
                locate
                    .at(DiagnosticLevel::Warning, "iframe is never closed and is shown as text", start..tag_end)
                    .with_suggestion("Add a closing </iframe> tag"),
            );
            pos = tag_end;
            continue;
        };

        let open_tag = frame.open_tag_str(scanner.src());
        let diag = match attribute(open_tag, "src") {
            None => locate.at(
                DiagnosticLevel::Info,
                "iframe without a src is shown as text",
                frame.open_tag.clone(),
            ),
            Some(src) if EMPTY_YOUTUBE_ID.is_match(&src) || EMPTY_DRIVE_ID.is_match(&src) => locate
                .at(
                    DiagnosticLevel::Warning,
                    "embed has an empty provider ID and is shown as text",
                    frame.open_tag.clone(),
                )
                .with_suggestion("Re-insert the embed from its share URL"),
            Some(src) if EmbedRef::from_src(&src).is_none() => locate
                .at(
                    DiagnosticLevel::Info,
                    format!("iframe from unsupported source '{}' is shown as text", src),
                    frame.open_tag.clone(),
                )
                .with_suggestion("Only YouTube and Google Drive embeds render as blocks"),
            Some(_) => locate.at(
                DiagnosticLevel::Info,
                "embed is nested in other markup and is shown as text",
                frame.open_tag.clone(),
            ),
        };
        result.add(diag);
        pos = frame.outer.end;
    }
}

/// `<table` openings left inside a text run
fn check_stray_tables(
    scanner: &TagScanner<'_>,
    span: Range<usize>,
    locate: &Locator<'_>,
    result: &mut CheckResult,
) {
    let mut pos = span.start;
    while let Some(start) = scanner.find_open("table", pos).filter(|s| *s < span.end) {
        match scanner.open_tag_end(start) {
            Some(tag_end) => {
                result.add(
                    locate
                        .at(DiagnosticLevel::Warning, "table is never closed and is shown as text", start..tag_end)
                        .with_suggestion("Add a closing </table> tag"),
                );
                pos = tag_end;
            }
            None => {
                result.add(
                    locate
                        .at(DiagnosticLevel::Error, "malformed <table> tag", start..span.end)
                        .with_suggestion("Close the opening tag with '>'"),
                );
                break;
            }
        }
    }
}

/// Tables the grid editor has to repair or cannot open
fn check_table(segment: &Segment, locate: &Locator<'_>, result: &mut CheckResult) {
    let open_end = segment.raw.find('>').map(|i| i + 1).unwrap_or(segment.raw.len());
    let span = segment.span.start..segment.span.start + open_end;

    if parse_rows(&segment.raw).is_none() {
        result.add(
            locate
                .at(DiagnosticLevel::Warning, "table has no rows", span)
                .with_suggestion("Add a <tr> with at least one cell"),
        );
        return;
    }

    let lengths = raw_row_lengths(&segment.raw);
    let widest = lengths.iter().copied().max().unwrap_or(0);
    if lengths.iter().any(|len| *len != widest) {
        let counts = lengths
            .iter()
            .map(|len| len.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        result.add(locate.at(
            DiagnosticLevel::Info,
            format!(
                "table rows have {} cells; short rows are padded to {} when edited",
                counts, widest
            ),
            span,
        ));
    }
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Compute byte offsets for each line start
fn compute_line_offsets(input: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in input.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Convert byte offset to line and column
fn offset_to_location(offset: usize, line_offsets: &[usize]) -> (usize, usize) {
    let line = line_offsets
        .iter()
        .position(|&o| o > offset)
        .unwrap_or(line_offsets.len())
        - 1;

    let column = offset - line_offsets.get(line).unwrap_or(&0) + 1;
    (line + 1, column) // 1-indexed
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const YT: &str = r#"<iframe src="https://www.youtube.com/embed/abc"></iframe>"#;

    #[test]
    fn test_clean_document() {
        let doc = format!(
            "# Notes\n<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>\n{}",
            YT
        );
        let result = check_document(&doc);
        assert!(result.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.summary(), "no issues found");
    }

    #[test]
    fn test_unsupported_iframe() {
        let result = check_document(r#"see <iframe src="https://player.vimeo.com/video/1"></iframe>"#);
        assert_eq!(result.infos, 1);
        assert!(result.diagnostics[0].message.contains("player.vimeo.com"));
        assert_eq!(result.diagnostics[0].column, Some(5));
    }

    #[test]
    fn test_empty_provider_id() {
        let result = check_document(r#"<iframe src="https://www.youtube.com/embed/"></iframe>"#);
        assert_eq!(result.warnings, 1);
        assert!(result.diagnostics[0].message.contains("empty provider ID"));

        let result =
            check_document(r#"<iframe src="https://drive.google.com/file/d//preview"></iframe>"#);
        assert_eq!(result.warnings, 1);
    }

    #[test]
    fn test_unterminated_table() {
        let result = check_document("line one\n  <table><tr><td>x</td></tr>");
        assert_eq!(result.warnings, 1);
        assert!(!result.has_errors());
        let diag = &result.diagnostics[0];
        assert_eq!((diag.line, diag.column), (Some(2), Some(3)));
        assert_eq!(diag.source_text.as_deref(), Some("<table>"));
    }

    #[test]
    fn test_malformed_table_tag() {
        let result = check_document("<table class=\"x");
        assert!(result.has_errors());
    }

    #[test]
    fn test_table_without_rows() {
        let result = check_document("<table></table>");
        assert_eq!(result.warnings, 1);
        assert_eq!(result.diagnostics[0].message, "table has no rows");
    }

    #[test]
    fn test_ragged_table() {
        let result = check_document(
            "<table><tr><td>1</td><td>2</td><td>3</td></tr><tr><td>4</td></tr></table>",
        );
        assert_eq!(result.infos, 1);
        assert!(result.diagnostics[0].message.contains("3, 1"));
    }

    #[test]
    fn test_iframe_inside_table_is_not_reported() {
        let doc = format!("<table><tr><td>{}</td></tr></table>", YT);
        assert!(check_document(&doc).is_empty());
    }

    #[test]
    fn test_long_excerpt_is_truncated() {
        let src = format!("https://example.com/{}", "x".repeat(100));
        let result = check_document(&format!("<iframe src=\"{}\"></iframe>", src));
        let text = result.diagnostics[0].source_text.clone().unwrap();
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), EXCERPT_LEN + 3);
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("1 warning"));
    }

    #[test]
    fn test_format_without_color() {
        let result = check_document("<table></table>");
        let text = format_diagnostics(&result, false);
        assert!(text.contains("warning: table has no rows"));
        assert!(text.contains("--> line 1:1"));
        assert!(text.ends_with("Summary: 1 warning"));
        assert!(!text.contains("\x1b["));
    }
}
