//! Front-matter block: quoted title, metadata columns, optional H1.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use mdgen_shared::{Header, MdGenError, Result, Row};

use crate::schema::ColumnSchema;

/// Render the front matter for `row`.
///
/// Values are written as-is; only the title has its double quotes stripped.
pub fn render(header: &Header, row: &Row, schema: &ColumnSchema, create_header: bool) -> String {
    let title = row.get(schema.title).unwrap_or_default().replace('"', "");

    let mut fm = String::from("---\n");
    fm.push_str(&format!("title: \"{title}\"\n"));

    for (index, name) in schema.metadata_columns(header) {
        if let Some(value) = row.get(index) {
            fm.push_str(&format!("{name}: {value}\n"));
        }
    }

    fm.push_str("---\n");
    fm.push('\n');

    if create_header {
        fm.push_str(&format!("# {title}\n"));
    }

    fm
}

/// Truncate `path` and write the front matter. The handle is flushed and
/// closed before returning.
pub fn write(
    path: &Path,
    header: &Header,
    row: &Row,
    schema: &ColumnSchema,
    create_header: bool,
) -> Result<()> {
    let content = render(header, row, schema, create_header);

    let mut file = File::create(path).map_err(|e| MdGenError::io(path, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| MdGenError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn fixture(names: &[&str], cells: &[&str]) -> (Header, Row, ColumnSchema) {
        let header = Header::new(strings(names));
        let schema = ColumnSchema::from_header(&header).unwrap();
        (header, Row::new(strings(cells)), schema)
    }

    #[test]
    fn renders_title_and_metadata_in_header_order() {
        let (header, row, schema) = fixture(
            &["date", "title", "url", "body", "author"],
            &["2020-01-01", "Hello", "hello", "<p>x</p>", "Ann"],
        );
        let fm = render(&header, &row, &schema, false);
        assert_eq!(
            fm,
            "---\ntitle: \"Hello\"\ndate: 2020-01-01\nauthor: Ann\n---\n\n"
        );
    }

    #[test]
    fn strips_quotes_from_title() {
        let (header, row, schema) = fixture(
            &["title", "url", "body"],
            &["He said \"hi\"", "p", ""],
        );
        let fm = render(&header, &row, &schema, true);
        assert!(fm.contains("title: \"He said hi\"\n"));
        assert!(fm.ends_with("# He said hi\n"));
    }

    #[test]
    fn reserved_columns_never_appear_as_keys() {
        let (header, row, schema) = fixture(
            &["title", "url", "body", "textile", "tags"],
            &["T", "t", "<p>b</p>", "Y", "a,b"],
        );
        let fm = render(&header, &row, &schema, false);
        for key in ["url:", "body:", "textile:"] {
            assert!(!fm.contains(key), "{key} leaked into {fm}");
        }
        assert_eq!(fm.matches("title:").count(), 1);
        assert_eq!(fm.matches("tags: a,b").count(), 1);
    }

    #[test]
    fn short_row_skips_missing_cells() {
        let (header, row, schema) = fixture(&["title", "url", "body", "extra"], &["T", "t"]);
        let fm = render(&header, &row, &schema, false);
        assert_eq!(fm, "---\ntitle: \"T\"\n---\n\n");
    }

    #[test]
    fn write_truncates_existing_content() {
        let dir = std::env::temp_dir().join(format!("mdgen-fm-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("README.md");
        std::fs::write(&path, "old content that is much longer than the new one").unwrap();

        let (header, row, schema) = fixture(&["title", "url", "body"], &["New", "n", ""]);
        write(&path, &header, &row, &schema, false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "---\ntitle: \"New\"\n---\n\n"
        );
    }
}
