//! Toolbar formatting snippets
//!
//! Each toolbar action inserts literal Markdown (or, for tables, a fresh
//! HTML table) at the caret. Inline styles can also wrap a selection.

use crate::core::options::EditorOptions;
use crate::core::table::{GridCell, GridRow, TableGrid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Toolbar action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Formatting {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    CodeBlock,
    /// Heading level, clamped to 1..=6
    Heading(u8),
    BulletList,
    NumberedList,
    Checklist,
    Quote,
    Link,
    HorizontalRule,
    Table,
}

impl Formatting {
    /// Delimiters for styles that wrap a selection
    fn delimiters(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Formatting::Bold => Some(("**", "**")),
            Formatting::Italic => Some(("*", "*")),
            Formatting::Strikethrough => Some(("~~", "~~")),
            Formatting::InlineCode => Some(("`", "`")),
            Formatting::Link => Some(("[", "](https://)")),
            _ => None,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Formatting::Bold => "bold text",
            Formatting::Italic => "italic text",
            Formatting::Strikethrough => "strikethrough",
            Formatting::InlineCode => "code",
            Formatting::Link => "link text",
            _ => "",
        }
    }

    /// Text inserted at the caret when nothing is selected
    pub fn snippet(&self, options: &EditorOptions) -> String {
        if self.delimiters().is_some() {
            return self.wrap(self.placeholder());
        }
        match self {
            Formatting::CodeBlock => "\n```\ncode\n```\n".to_string(),
            Formatting::Heading(level) => {
                format!("\n{} Heading\n", "#".repeat((*level).clamp(1, 6) as usize))
            }
            Formatting::BulletList => "\n- List item\n".to_string(),
            Formatting::NumberedList => "\n1. List item\n".to_string(),
            Formatting::Checklist => "\n- [ ] Task\n".to_string(),
            Formatting::Quote => "\n> Quote\n".to_string(),
            Formatting::HorizontalRule => "\n---\n".to_string(),
            Formatting::Table => format!("\n{}\n", starter_table().to_html(options)),
            _ => String::new(),
        }
    }

    /// Wrap selected text; block-level actions ignore the selection and
    /// return their snippet shape with the selection as content
    pub fn wrap(&self, selection: &str) -> String {
        match self.delimiters() {
            Some((open, close)) => format!("{}{}{}", open, selection, close),
            None => match self {
                Formatting::Heading(level) => format!(
                    "{} {}",
                    "#".repeat((*level).clamp(1, 6) as usize),
                    selection
                ),
                Formatting::BulletList => prefix_lines(selection, |_| "- ".to_string()),
                Formatting::NumberedList => prefix_lines(selection, |i| format!("{}. ", i + 1)),
                Formatting::Checklist => prefix_lines(selection, |_| "- [ ] ".to_string()),
                Formatting::Quote => prefix_lines(selection, |_| "> ".to_string()),
                Formatting::CodeBlock => format!("```\n{}\n```", selection),
                _ => selection.to_string(),
            },
        }
    }
}

fn prefix_lines(text: &str, prefix: impl Fn(usize) -> String) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| format!("{}{}", prefix(i), line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table inserted by the toolbar: a header row and two empty rows
pub fn starter_table() -> TableGrid {
    let header = GridRow::new(
        (1..=3)
            .map(|i| GridCell::header(format!("Header {}", i)))
            .collect(),
    );
    let mut rows = vec![header];
    rows.extend((0..2).map(|_| GridRow::empty(3, false)));
    TableGrid::from_rows(rows)
}
