//! Feature modules - Editing operations on top of the core model
//!
//! This module contains the host-facing editing features:
//! - Embed URL parsing and embed replacement
//! - Markdown toolbar snippets
//! - Document sessions that own the authoritative string

pub mod embeds;
pub mod markdown;
pub mod session;

// Re-export commonly used types
pub use embeds::{parse_embed_url, parse_provider_url};
pub use markdown::Formatting;
pub use session::DocumentSession;
