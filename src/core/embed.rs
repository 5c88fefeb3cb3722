//! Embed references
//!
//! The two iframe shapes the editor recognizes, and the provider IDs they
//! carry:
//!
//! - YouTube: `src="https://www.youtube.com/embed/{VIDEO_ID}"`
//! - PDF (Google Drive): `src="https://drive.google.com/file/d/{FILE_ID}/preview"`

use crate::utils::html::{attribute, TagScanner};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref YOUTUBE_SRC: Regex = Regex::new(
        r"^https://www\.youtube\.com/embed/([A-Za-z0-9_-]+)(?:[?#]\S*)?$"
    )
    .expect("youtube src pattern");
    static ref PDF_SRC: Regex = Regex::new(
        r"^https://drive\.google\.com/file/d/([A-Za-z0-9_-]+)/preview(?:[?#]\S*)?$"
    )
    .expect("drive src pattern");
}

/// Embed provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EmbedProvider {
    Youtube,
    Pdf,
}

impl EmbedProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedProvider::Youtube => "youtube",
            EmbedProvider::Pdf => "pdf",
        }
    }

    /// Human-readable provider name for messages
    pub fn display_name(&self) -> &'static str {
        match self {
            EmbedProvider::Youtube => "YouTube",
            EmbedProvider::Pdf => "Google Drive",
        }
    }
}

impl fmt::Display for EmbedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider plus its opaque ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmbedRef {
    pub provider: EmbedProvider,
    pub id: String,
}

impl EmbedRef {
    pub fn youtube(id: impl Into<String>) -> Self {
        Self {
            provider: EmbedProvider::Youtube,
            id: id.into(),
        }
    }

    pub fn pdf(id: impl Into<String>) -> Self {
        Self {
            provider: EmbedProvider::Pdf,
            id: id.into(),
        }
    }

    /// Match an iframe `src` against the embed templates. YouTube wins
    /// when both would match.
    pub fn from_src(src: &str) -> Option<Self> {
        let src = src.trim();
        if let Some(caps) = YOUTUBE_SRC.captures(src) {
            return Some(Self::youtube(&caps[1]));
        }
        PDF_SRC.captures(src).map(|caps| Self::pdf(&caps[1]))
    }

    /// Recognize a raw `<iframe ...></iframe>` block
    pub fn from_html(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let scanner = TagScanner::new(trimmed);
        let frame = scanner.element_at("iframe", 0)?;
        if frame.outer.end != trimmed.len() {
            return None;
        }
        let src = attribute(frame.open_tag_str(trimmed), "src")?;
        Self::from_src(&src)
    }

    /// URL placed in the iframe `src`
    pub fn embed_src(&self) -> String {
        match self.provider {
            EmbedProvider::Youtube => format!("https://www.youtube.com/embed/{}", self.id),
            EmbedProvider::Pdf => format!("https://drive.google.com/file/d/{}/preview", self.id),
        }
    }

    /// URL shown to the user when the embed is opened for editing
    pub fn canonical_url(&self) -> String {
        match self.provider {
            EmbedProvider::Youtube => format!("https://www.youtube.com/watch?v={}", self.id),
            EmbedProvider::Pdf => format!("https://drive.google.com/file/d/{}/view", self.id),
        }
    }

    /// Generate the iframe block
    pub fn to_html(&self) -> String {
        match self.provider {
            EmbedProvider::Youtube => format!(
                "<iframe width=\"560\" height=\"315\" src=\"{}\" frameborder=\"0\" allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture\" allowfullscreen></iframe>",
                self.embed_src()
            ),
            EmbedProvider::Pdf => format!(
                "<iframe src=\"{}\" width=\"640\" height=\"480\" allow=\"autoplay\"></iframe>",
                self.embed_src()
            ),
        }
    }
}
