//! Core document model
//!
//! This module contains the pieces every editing feature builds on:
//! - `segmenter`: splits a document into text runs and HTML blocks
//! - `table`: parses, edits and regenerates HTML tables
//! - `embed`: YouTube and Google Drive embed references
//! - `options`: editor configuration

pub mod embed;
pub mod options;
pub mod segmenter;
pub mod table;

pub use embed::{EmbedProvider, EmbedRef};
pub use options::{EditorOptions, InsertMode};
pub use segmenter::{segment_document, Caret, Segment, SegmentKind, Segmentation};
pub use table::{TableEditor, TableGrid, TableOp};
