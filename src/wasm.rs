//! WASM bindings for richblocks
//!
//! This module provides JavaScript-accessible functions for segmenting a
//! document and editing its tables and embeds. Every mutating call takes
//! the current document string and returns the new one; the host stays the
//! owner of the value.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{EditorError, EditorOptions, TableOp};

/// Segment as seen from JavaScript
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct JsSegment {
    pub kind: String,
    pub raw: String,
    pub index: usize,
}

/// Edit result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct EditResult {
    /// The new document or fragment
    pub output: String,
    /// Whether the edit was applied
    pub success: bool,
    /// Message to show the user if it was not
    pub error: Option<String>,
}

#[cfg(feature = "wasm")]
impl EditResult {
    fn from_result(result: Result<String, EditorError>) -> Self {
        match result {
            Ok(output) => Self {
                output,
                success: true,
                error: None,
            },
            Err(err) => Self {
                output: String::new(),
                success: false,
                error: Some(err.user_message()),
            },
        }
    }

    fn into_js(self) -> JsValue {
        serde_wasm_bindgen::to_value(&self).unwrap_or(JsValue::NULL)
    }
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Split a document into `{kind, raw, index}` segments
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "segmentDocument")]
pub fn segment_document_wasm(doc: &str) -> JsValue {
    let segments: Vec<JsSegment> = crate::segment_document(doc)
        .iter()
        .map(|s| JsSegment {
            kind: s.kind.as_str().to_string(),
            raw: s.raw.clone(),
            index: s.index,
        })
        .collect();
    serde_wasm_bindgen::to_value(&segments).unwrap_or(JsValue::NULL)
}

/// Replace one segment's raw content and return the new document
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "replaceSegment")]
pub fn replace_segment_wasm(doc: &str, index: usize, replacement: &str) -> JsValue {
    EditResult::from_result(crate::segment_document(doc).replace(index, replacement)).into_js()
}

/// Apply a table op to a table fragment
///
/// # Arguments
/// * `html` - Table fragment
/// * `op` - Serialized `TableOp`, e.g. `{ op: "add_row", edge: "bottom" }`
/// * `options` - Optional `EditorOptions`; missing fields take defaults
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "tableApply")]
pub fn table_apply_wasm(html: &str, op: JsValue, options: JsValue) -> JsValue {
    let op: TableOp = match serde_wasm_bindgen::from_value(op) {
        Ok(op) => op,
        Err(e) => {
            return EditResult {
                output: String::new(),
                success: false,
                error: Some(format!("Invalid table op: {}", e)),
            }
            .into_js()
        }
    };
    let opts: EditorOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    EditResult::from_result(crate::table::apply_to_html(html, &op, &opts)).into_js()
}

/// Iframe HTML for a pasted YouTube or Google Drive URL
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "embedFromUrl")]
pub fn embed_from_url_wasm(url: &str) -> JsValue {
    EditResult::from_result(crate::embed_html(url)).into_js()
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check a document for markup that will render as plain text
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkDocument")]
pub fn check_document_wasm(doc: &str) -> JsValue {
    use crate::diagnostics::DiagnosticLevel;

    let result = crate::diagnostics::check_document(doc);

    // Group diagnostics by level
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => errors.push(d.message.clone()),
            DiagnosticLevel::Warning => warnings.push(d.message.clone()),
            DiagnosticLevel::Info => infos.push(d.message.clone()),
        }
    }

    let summary = CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
}

/// Summary of document check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}
