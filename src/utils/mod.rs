//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics and error reporting
//! - Error types and result types
//! - A small HTML tag scanner

pub mod diagnostics;
pub mod error;
pub mod html;

// Re-export commonly used items
pub use diagnostics::{check_document, format_diagnostics, Diagnostic, DiagnosticLevel};
pub use error::{EditorError, EditorResult};
