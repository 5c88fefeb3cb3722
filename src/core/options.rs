//! Editor configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where toolbar insertions land in a segmented document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InsertMode {
    /// Insert into the text segment holding the caret
    #[default]
    Caret,
    /// Always insert into the leading text segment (segment 0)
    FirstText,
}

/// Options shared by the segmenter, the table editor and the session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditorOptions {
    /// Class attribute emitted on every serialized `<table>`
    /// Default: "rich-table"
    pub table_class: String,

    /// Width assumed for a column that has no pixel width yet
    /// Default: 150
    pub default_column_width: u32,

    /// Lower bound for a resized column
    /// Default: 50
    pub min_column_width: u32,

    /// Indentation unit used by the table serializer
    /// Default: two spaces
    pub indent: String,

    /// Toolbar insertion targeting
    /// Default: caret tracking
    pub insert_mode: InsertMode,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            table_class: "rich-table".to_string(),
            default_column_width: 150,
            min_column_width: 50,
            indent: "  ".to_string(),
            insert_mode: InsertMode::Caret,
        }
    }
}

impl EditorOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Options reproducing the first-textarea insertion behavior
    pub fn legacy() -> Self {
        Self {
            insert_mode: InsertMode::FirstText,
            ..Self::default()
        }
    }

    pub fn with_table_class(mut self, class: impl Into<String>) -> Self {
        self.table_class = class.into();
        self
    }

    pub fn with_insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = EditorOptions::default();
        assert_eq!(opts.table_class, "rich-table");
        assert_eq!(opts.min_column_width, 50);
        assert_eq!(opts.default_column_width, 150);
        assert_eq!(opts.insert_mode, InsertMode::Caret);
    }

    #[test]
    fn test_legacy_preset() {
        let opts = EditorOptions::legacy();
        assert_eq!(opts.insert_mode, InsertMode::FirstText);
        assert_eq!(opts.table_class, "rich-table");
    }

    #[test]
    fn test_builders() {
        let opts = EditorOptions::new()
            .with_table_class("grid")
            .with_insert_mode(InsertMode::FirstText);
        assert_eq!(opts.table_class, "grid");
        assert_eq!(opts.insert_mode, InsertMode::FirstText);
    }
}
