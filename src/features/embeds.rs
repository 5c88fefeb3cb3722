//! Embed editing
//!
//! Turns pasted URLs into embed references, and edits embeds in a document
//! by exact-substring removal followed by re-insertion at a caret.
//!
//! ```rust
//! use richblocks::embeds::parse_embed_url;
//!
//! let embed = parse_embed_url("https://youtu.be/abc123XYZ").unwrap();
//! assert_eq!(embed.id, "abc123XYZ");
//! assert!(embed.to_html().contains("youtube.com/embed/abc123XYZ"));
//! ```

use crate::core::embed::{EmbedProvider, EmbedRef};
use crate::core::options::InsertMode;
use crate::core::segmenter::{segment_document, Caret};
use crate::utils::error::{EditorError, EditorResult};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref YOUTUBE_WATCH: Regex = Regex::new(
        r"^(?:https?://)?(?:www\.|m\.|music\.)?youtube\.com/watch\?(?:[^#\s]*&)?v=([A-Za-z0-9_-]+)"
    )
    .expect("youtube watch pattern");
    static ref YOUTUBE_PATH: Regex = Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?youtube(?:-nocookie)?\.com/(?:embed|shorts|live|v)/([A-Za-z0-9_-]+)"
    )
    .expect("youtube path pattern");
    static ref YOUTUBE_SHORT: Regex =
        Regex::new(r"^(?:https?://)?youtu\.be/([A-Za-z0-9_-]+)").expect("youtu.be pattern");
    static ref DRIVE_FILE: Regex = Regex::new(
        r"^(?:https?://)?drive\.google\.com/file/d/([A-Za-z0-9_-]+)"
    )
    .expect("drive file pattern");
    static ref DRIVE_OPEN: Regex = Regex::new(
        r"^(?:https?://)?drive\.google\.com/(?:open|uc)\?(?:[^#\s]*&)?id=([A-Za-z0-9_-]+)"
    )
    .expect("drive open pattern");
}

fn first_capture(patterns: &[&Regex], input: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(input).map(|caps| caps[1].to_string()))
}

/// Parse a pasted URL for a specific provider
pub fn parse_provider_url(provider: EmbedProvider, input: &str) -> EditorResult<EmbedRef> {
    let url = input.trim();
    if url.is_empty() {
        return Err(EditorError::invalid_url(input, "Please enter a URL"));
    }
    let id = match provider {
        EmbedProvider::Youtube => {
            first_capture(&[&*YOUTUBE_WATCH, &*YOUTUBE_PATH, &*YOUTUBE_SHORT], url)
        }
        EmbedProvider::Pdf => first_capture(&[&*DRIVE_FILE, &*DRIVE_OPEN], url),
    };
    id.map(|id| EmbedRef { provider, id }).ok_or_else(|| {
        EditorError::invalid_url(
            input,
            format!("Please enter a valid {} URL", provider.display_name()),
        )
    })
}

/// Parse a pasted URL for whichever provider it belongs to
pub fn parse_embed_url(input: &str) -> EditorResult<EmbedRef> {
    if input.trim().is_empty() {
        return Err(EditorError::invalid_url(input, "Please enter a URL"));
    }
    parse_provider_url(EmbedProvider::Youtube, input)
        .or_else(|_| parse_provider_url(EmbedProvider::Pdf, input))
        .map_err(|_| {
            EditorError::invalid_url(input, "Please enter a valid YouTube or Google Drive URL")
        })
}

/// Delete the first exact occurrence of `raw` from `doc`.
///
/// Whitespace must match too; a block that is not found leaves the
/// document unchanged.
pub fn remove_block(doc: &str, raw: &str) -> String {
    if raw.is_empty() || !doc.contains(raw) {
        debug!("block to remove not found");
        return doc.to_string();
    }
    doc.replacen(raw, "", 1)
}

/// Markup inserted for a new embed
pub fn embed_snippet(embed: &EmbedRef) -> String {
    format!("\n{}\n", embed.to_html())
}

/// Insert the embed for `url` at `caret`
pub fn insert_embed(doc: &str, url: &str, caret: Caret, mode: InsertMode) -> EditorResult<String> {
    let embed = parse_embed_url(url)?;
    Ok(segment_document(doc).insert(caret, &embed_snippet(&embed), mode))
}

/// Replace the embed block `old_raw` with the embed for `url`.
///
/// The URL is validated before anything changes. `caret` is resolved
/// against the document after the old block has been removed.
pub fn replace_embed(
    doc: &str,
    old_raw: &str,
    url: &str,
    caret: Caret,
    mode: InsertMode,
) -> EditorResult<String> {
    let embed = parse_embed_url(url)?;
    let removed = remove_block(doc, old_raw);
    Ok(segment_document(&removed).insert(caret, &embed_snippet(&embed), mode))
}

/// URL to prefill when an embed block is opened for editing
pub fn edit_url(raw: &str) -> Option<String> {
    EmbedRef::from_html(raw).map(|e| e.canonical_url())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_url_forms() {
        for url in [
            "https://www.youtube.com/watch?v=abc123",
            "youtube.com/watch?feature=share&v=abc123",
            "https://m.youtube.com/watch?v=abc123&t=10s",
            "https://youtu.be/abc123?si=xyz",
            "https://www.youtube.com/embed/abc123",
            "https://www.youtube.com/shorts/abc123",
            "  https://www.youtube.com/watch?v=abc123  ",
        ] {
            assert_eq!(
                parse_embed_url(url).unwrap(),
                EmbedRef::youtube("abc123"),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_drive_url_forms() {
        for url in [
            "https://drive.google.com/file/d/1aB_c-D/view?usp=sharing",
            "https://drive.google.com/file/d/1aB_c-D/preview",
            "https://drive.google.com/open?id=1aB_c-D",
        ] {
            assert_eq!(parse_embed_url(url).unwrap(), EmbedRef::pdf("1aB_c-D"), "{}", url);
        }
    }

    #[test]
    fn test_invalid_urls() {
        let err = parse_embed_url("https://vimeo.com/123").unwrap_err();
        assert_eq!(
            err.user_message(),
            "Please enter a valid YouTube or Google Drive URL"
        );
        assert_eq!(parse_embed_url("   ").unwrap_err().user_message(), "Please enter a URL");

        let err = parse_provider_url(EmbedProvider::Pdf, "https://youtu.be/abc").unwrap_err();
        assert_eq!(err.user_message(), "Please enter a valid Google Drive URL");
    }

    #[test]
    fn test_remove_block_exact_match_only() {
        let embed = EmbedRef::youtube("abc").to_html();
        let doc = format!("a\n{}\nb", embed);
        assert_eq!(remove_block(&doc, &embed), "a\n\nb");

        let loose = embed.replace("  ", " ").replace("<iframe ", "<iframe  ");
        assert_eq!(remove_block(&doc, &loose), doc);
        assert_eq!(remove_block(&doc, ""), doc);
    }

    #[test]
    fn test_insert_embed() {
        let out = insert_embed("ab", "https://youtu.be/xyz", Caret::new(0, 1), InsertMode::Caret)
            .unwrap();
        let s = segment_document(&out);
        assert_eq!(s.youtube_embeds().len(), 1);
        assert!(out.starts_with("a\n<iframe"));
        assert!(out.ends_with("</iframe>\nb"));
    }

    #[test]
    fn test_invalid_url_leaves_document_alone() {
        let doc = format!("x{}y", EmbedRef::pdf("old").to_html());
        let old = EmbedRef::pdf("old").to_html();
        let err = replace_embed(&doc, &old, "not a url", Caret::new(0, 1), InsertMode::Caret);
        assert!(matches!(err, Err(EditorError::InvalidEmbedUrl { .. })));
    }

    #[test]
    fn test_replace_embed() {
        let old = EmbedRef::pdf("old").to_html();
        let doc = format!("x{}y", old);
        let out = replace_embed(
            &doc,
            &old,
            "https://drive.google.com/file/d/new/view",
            Caret::new(0, 1),
            InsertMode::Caret,
        )
        .unwrap();
        let s = segment_document(&out);
        assert_eq!(s.pdf_embeds().len(), 1);
        assert!(s.pdf_embeds()[0].contains("/file/d/new/preview"));
        assert!(!out.contains("/d/old/"));
    }

    #[test]
    fn test_edit_url() {
        let raw = EmbedRef::youtube("abc").to_html();
        assert_eq!(
            edit_url(&raw).as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
        assert_eq!(edit_url("<p>no</p>"), None);
    }
}
