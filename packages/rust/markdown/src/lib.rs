//! Markup-to-Markdown conversion for CSV body cells.
//!
//! HTML is converted with the `htmd` crate followed by a short cleanup
//! pipeline. Textile is handled by a set of line and inline passes in
//! [`textile`].

mod cleanup;
pub mod textile;

use tracing::{debug, instrument};

use mdgen_shared::{MdGenError, Result};

/// Tags whose content never belongs in a page body.
const SKIPPED_TAGS: [&str; 5] = ["script", "style", "iframe", "noscript", "svg"];

/// Inline elements with no Markdown form, re-emitted as HTML when
/// `keep_inline_html` is on.
const INLINE_HTML_TAGS: [&str; 10] = [
    "span", "u", "ins", "mark", "sup", "sub", "small", "abbr", "kbd", "font",
];

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// HTML-to-Markdown converter.
///
/// With `keep_inline_html` off, elements `htmd` has no Markdown form for are
/// reduced to their text. With it on, inline elements such as `span` and
/// `sup` keep their tags.
pub struct HtmlConverter {
    inner: htmd::HtmlToMarkdown,
    keep_inline_html: bool,
}

impl HtmlConverter {
    pub fn new(keep_inline_html: bool) -> Self {
        let mut builder = htmd::HtmlToMarkdown::builder().skip_tags(SKIPPED_TAGS.to_vec());
        if keep_inline_html {
            builder = builder.add_handler(INLINE_HTML_TAGS.to_vec(), inline_html_handler);
        }
        let inner = builder.build();

        Self {
            inner,
            keep_inline_html,
        }
    }

    /// Convert an HTML fragment to Markdown.
    #[instrument(skip_all, fields(len = html.len(), keep_inline_html = self.keep_inline_html))]
    pub fn convert(&self, html: &str) -> Result<String> {
        let raw_markdown = self
            .inner
            .convert(html)
            .map_err(|e| MdGenError::Conversion(format!("htmd conversion failed: {e}")))?;

        debug!(raw_len = raw_markdown.len(), "htmd conversion complete");

        let cleaned = cleanup::run_pipeline(&raw_markdown);

        debug!(final_len = cleaned.len(), "cleanup complete");
        Ok(cleaned)
    }
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Re-emit an element as HTML around its converted content.
fn inline_html_handler(element: htmd::Element) -> Option<String> {
    let mut html = format!("<{}", element.tag);
    for attr in element.attrs {
        html.push_str(&format!(
            " {}=\"{}\"",
            &*attr.name.local,
            attr.value.replace('"', "&quot;")
        ));
    }
    html.push('>');
    html.push_str(element.content);
    html.push_str(&format!("</{}>", element.tag));
    Some(html)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
