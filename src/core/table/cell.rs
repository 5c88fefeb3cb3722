//! Cell and row types for the table grid

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `width: <value>` declaration; `min-width`/`max-width` are not widths
    static ref WIDTH_DECL: Regex =
        Regex::new(r"(?i)(?:^|[;\s])width\s*:\s*([^;]+)").expect("width pattern");
    static ref PIXELS: Regex = Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*px\s*$").expect("px pattern");
}

/// Which tag a cell serializes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTag {
    Th,
    Td,
}

impl CellTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellTag::Th => "th",
            CellTag::Td => "td",
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridCell {
    /// Inner HTML, kept opaque
    pub content: String,
    /// Serialized as `<th>` when set
    pub is_header: bool,
    /// CSS length from the cell's `style="width: ..."`
    pub width: Option<String>,
}

impl GridCell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_header: false,
            width: None,
        }
    }

    pub fn header(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_header: true,
            width: None,
        }
    }

    /// Create an empty cell
    pub fn empty(is_header: bool) -> Self {
        Self {
            content: String::new(),
            is_header,
            width: None,
        }
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn tag(&self) -> CellTag {
        if self.is_header {
            CellTag::Th
        } else {
            CellTag::Td
        }
    }

    /// Width in pixels, if the stored width is a pixel length
    pub fn width_px(&self) -> Option<f64> {
        self.width.as_deref().and_then(parse_px)
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
}

impl GridRow {
    pub fn new(cells: Vec<GridCell>) -> Self {
        Self { cells }
    }

    /// Row of `columns` empty cells
    pub fn empty(columns: usize, is_header: bool) -> Self {
        Self {
            cells: vec![GridCell::empty(is_header); columns],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn has_header_cell(&self) -> bool {
        self.cells.iter().any(|c| c.is_header)
    }
}

/// Extract the `width` declaration from a `style` attribute value
pub fn width_from_style(style: &str) -> Option<String> {
    WIDTH_DECL
        .captures(style)
        .map(|caps| caps[1].trim().to_string())
        .filter(|w| !w.is_empty())
}

/// Parse a pixel length such as `"150px"`
pub fn parse_px(width: &str) -> Option<f64> {
    PIXELS
        .captures(width)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

/// Format a pixel length, dropping a zero fraction
pub fn format_px(px: f64) -> String {
    if px.fract() == 0.0 {
        format!("{}px", px as i64)
    } else {
        format!("{:.1}px", px)
    }
}
