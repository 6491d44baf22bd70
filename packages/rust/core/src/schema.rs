//! Required-column validation and the column index map used by every stage.

use mdgen_shared::{Header, MdGenError, Result};

pub const BODY: &str = "body";
pub const URL: &str = "url";
pub const TITLE: &str = "title";
pub const TEXTILE: &str = "textile";

/// Positions of the columns the pipeline gives meaning to.
///
/// Computed once per run from the header. Every column not listed here is
/// page metadata and ends up in the front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub url: usize,
    pub title: usize,
    pub body: usize,
    pub textile: Option<usize>,
}

impl ColumnSchema {
    /// Validate `header` and locate the named columns.
    ///
    /// Fails with [`MdGenError::MissingColumns`] unless `body`, `url` and
    /// `title` are all present (exact, case-sensitive names).
    pub fn from_header(header: &Header) -> Result<Self> {
        let body = header.position(BODY);
        let url = header.position(URL);
        let title = header.position(TITLE);

        match (body, url, title) {
            (Some(body), Some(url), Some(title)) => Ok(Self {
                url,
                title,
                body,
                textile: header.position(TEXTILE),
            }),
            _ => {
                let missing = [(BODY, body), (URL, url), (TITLE, title)]
                    .into_iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                Err(MdGenError::MissingColumns { missing })
            }
        }
    }

    /// Whether the column at `index` is consumed by the pipeline itself.
    pub fn is_reserved(&self, index: usize) -> bool {
        index == self.url
            || index == self.title
            || index == self.body
            || self.textile == Some(index)
    }

    /// Metadata columns as `(index, name)`, in header order.
    pub fn metadata_columns<'h>(
        &self,
        header: &'h Header,
    ) -> impl Iterator<Item = (usize, &'h str)> {
        let schema = *self;
        header
            .names()
            .iter()
            .enumerate()
            .filter(move |(i, _)| !schema.is_reserved(*i))
            .map(|(i, name)| (i, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Header {
        Header::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn locates_required_and_optional_columns() {
        let schema =
            ColumnSchema::from_header(&header(&["author", "body", "title", "textile", "url"]))
                .unwrap();
        assert_eq!(schema.body, 1);
        assert_eq!(schema.title, 2);
        assert_eq!(schema.textile, Some(3));
        assert_eq!(schema.url, 4);
    }

    #[test]
    fn textile_is_optional() {
        let schema = ColumnSchema::from_header(&header(&["title", "url", "body"])).unwrap();
        assert_eq!(schema.textile, None);
    }

    #[test]
    fn missing_columns_are_reported_in_order() {
        let err = ColumnSchema::from_header(&header(&["Title", "url"])).unwrap_err();
        match err {
            MdGenError::MissingColumns { missing } => assert_eq!(missing, ["body", "title"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_header_misses_everything() {
        let err = ColumnSchema::from_header(&Header::default()).unwrap_err();
        assert!(matches!(err, MdGenError::MissingColumns { ref missing } if missing.len() == 3));
    }

    #[test]
    fn metadata_columns_skip_reserved() {
        let h = header(&["date", "title", "url", "tags", "body", "textile"]);
        let schema = ColumnSchema::from_header(&h).unwrap();
        let meta: Vec<_> = schema.metadata_columns(&h).collect();
        assert_eq!(meta, [(0, "date"), (3, "tags")]);
    }
}
