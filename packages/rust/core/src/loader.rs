//! CSV loading: header record plus data rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, instrument};

use mdgen_shared::{Delimiter, Header, MdGenError, Result, Row};

/// A loaded CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    /// First record of the file.
    pub header: Header,
    /// Every following record, in file order.
    pub rows: Vec<Row>,
}

/// Open `path` and parse it with `delimiter`.
///
/// The file is read as bytes; cells are decoded as UTF-8 with lossy
/// replacement. Records shorter or longer than the header are kept as-is.
#[instrument(skip_all, fields(path = %path.display(), delimiter = %delimiter))]
pub fn load(path: &Path, delimiter: Delimiter) -> Result<CsvTable> {
    let file = File::open(path).map_err(|source| MdGenError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse(file, delimiter, path)?;

    debug!(
        columns = table.header.len(),
        rows = table.rows.len(),
        "CSV loaded"
    );
    Ok(table)
}

/// Parse CSV records from any reader. `origin` is only used in error messages.
pub fn parse<R: Read>(reader: R, delimiter: Delimiter, origin: &Path) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = reader.byte_records();

    let header = match records.next() {
        Some(record) => {
            let record = record.map_err(|e| MdGenError::csv(origin, e.to_string()))?;
            Header::new(decode(&record))
        }
        None => Header::default(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| MdGenError::csv(origin, e.to_string()))?;
        rows.push(Row::new(decode(&record)));
    }

    Ok(CsvTable { header, rows })
}

fn decode(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse_str(input: &str, delimiter: &str) -> CsvTable {
        parse(
            input.as_bytes(),
            delimiter.parse().unwrap(),
            Path::new("test.csv"),
        )
        .unwrap()
    }

    #[test]
    fn first_record_is_header() {
        let table = parse_str("title,url,body\nHello,hello-page,<p>Hi</p>\n", ",");
        assert_eq!(table.header.names(), ["title", "url", "body"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0],
            Row::new(vec!["Hello".into(), "hello-page".into(), "<p>Hi</p>".into()])
        );
    }

    #[test]
    fn rows_keep_file_order() {
        let table = parse_str("url\na\nb\nc\n", ",");
        let urls: Vec<_> = table.rows.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(urls, ["a", "b", "c"]);
    }

    #[test]
    fn custom_delimiter() {
        let table = parse_str("title;url;body\nA;a;x,y\n", ";");
        assert_eq!(table.header.len(), 3);
        assert_eq!(table.rows[0].get(2), Some("x,y"));
    }

    #[test]
    fn quoted_fields_with_delimiter_and_newline() {
        let table = parse_str(
            "title,url,body\n\"Hello, \"\"you\"\"\",a,\"<p>line one\nline two</p>\"\n",
            ",",
        );
        assert_eq!(table.rows[0].get(0), Some("Hello, \"you\""));
        assert_eq!(table.rows[0].get(2), Some("<p>line one\nline two</p>"));
    }

    #[test]
    fn short_rows_pass_through_unchanged() {
        let table = parse_str("title,url,body,extra\nA,a\n", ",");
        assert_eq!(table.rows[0], Row::new(vec!["A".into(), "a".into()]));
        assert_eq!(table.rows[0].get(2), None);
    }

    #[test]
    fn empty_input_has_empty_header() {
        let table = parse_str("", ",");
        assert!(table.header.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let bytes: &[u8] = b"title\nbad\xffbyte\n";
        let table = parse(bytes, Delimiter::default(), Path::new("x.csv")).unwrap();
        assert_eq!(table.rows[0].get(0), Some("bad\u{FFFD}byte"));
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let path = PathBuf::from("/definitely/not/here.csv");
        let err = load(&path, Delimiter::default()).unwrap_err();
        assert!(matches!(err, MdGenError::SourceNotFound { .. }));
        assert!(err.to_string().contains("not/here.csv"));
    }
}
