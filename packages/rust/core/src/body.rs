//! Body conversion: HTML (and optionally Textile) to Markdown, appended to
//! the page after its front matter.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use mdgen_markdown::{HtmlConverter, textile};
use mdgen_shared::{MdGenError, Result};

/// Backslash-n as two literal characters, as CSV exports often encode line breaks.
const LITERAL_NEWLINE: &str = "\\n";

/// URL-encoded form of [`LITERAL_NEWLINE`] left behind by some exports.
const ENCODED_NEWLINE: &str = "%5Cn";

/// Converts body cells and appends them to page files.
pub struct BodyConverter {
    html: HtmlConverter,
    textile_marker: String,
}

impl BodyConverter {
    pub fn new(keep_inline_html: bool, textile_marker: impl Into<String>) -> Self {
        Self {
            html: HtmlConverter::new(keep_inline_html),
            textile_marker: textile_marker.into(),
        }
    }

    /// Whether a `textile` cell turns on the Textile pass. Missing cells never do.
    pub fn is_textile(&self, cell: Option<&str>) -> bool {
        cell == Some(self.textile_marker.as_str())
    }

    /// Convert a body cell to Markdown.
    pub fn convert(&self, body: &str, textile: bool) -> Result<String> {
        let html = body.replace(LITERAL_NEWLINE, "<br>");
        let markdown = self.html.convert(&html)?;

        if !textile {
            return Ok(markdown);
        }

        let markdown = textile::to_markdown(&markdown).replace(ENCODED_NEWLINE, "");
        debug!(len = markdown.len(), "textile pass applied");
        Ok(markdown)
    }

    /// Convert `body` and append it to `path`, preceded by a newline.
    pub fn append(&self, path: &Path, body: &str, textile: bool) -> Result<()> {
        let markdown = self.convert(body, textile)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| MdGenError::io(path, e))?;

        file.write_all(b"\n")
            .and_then(|()| file.write_all(markdown.as_bytes()))
            .and_then(|()| file.flush())
            .map_err(|e| MdGenError::io(path, e))?;

        Ok(())
    }
}
