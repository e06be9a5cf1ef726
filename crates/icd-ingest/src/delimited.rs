#![deny(unsafe_code)]

use std::path::Path;

use tracing::debug;

use icd_model::DataFormat;

use crate::IngestError;

/// Read an ICD file itself: comma-delimited, no headers, rows of any width.
pub fn icd_rows(path: &Path) -> Result<Vec<Vec<String>>, IngestError> {
    let bytes = std::fs::read(path).map_err(|error| IngestError::io(path, error))?;
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    collect_rows(reader, path)
}

/// Read a delimited data file honoring the data format's delimiter and
/// quote properties, skipping a header row when one is declared.
pub fn delimited_rows(
    path: &Path,
    data_format: &DataFormat,
) -> Result<Vec<Vec<String>>, IngestError> {
    let delimiter = ascii_property(path, "item delimiter", data_format.item_delimiter())?;
    let quote = ascii_property(path, "quote character", data_format.quote_character())?;

    let bytes = std::fs::read(path).map_err(|error| IngestError::io(path, error))?;
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote(quote)
        .from_reader(bytes.as_slice());

    let mut rows = collect_rows(reader, path)?;
    if data_format.has_header() && !rows.is_empty() {
        rows.remove(0);
    }
    debug!(path = %path.display(), row_count = rows.len(), "read delimited rows");
    Ok(rows)
}

fn collect_rows(
    mut reader: csv::Reader<&[u8]>,
    path: &Path,
) -> Result<Vec<Vec<String>>, IngestError> {
    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|error| IngestError::delimited(path, error.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn ascii_property(path: &Path, name: &str, value: char) -> Result<u8, IngestError> {
    u8::try_from(value as u32)
        .map_err(|_| IngestError::delimited(path, format!("{name} must be an ASCII character")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn icd_rows_keeps_ragged_row_widths() {
        let file = write_file("d,format,delimited\nf,id\nc,desc,IsUnique,id\n");
        let rows = icd_rows(file.path()).expect("rows");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ["d", "format", "delimited"]);
        assert_eq!(rows[1], ["f", "id"]);
    }

    #[test]
    fn delimited_rows_honor_custom_delimiter_and_quotes() {
        let mut data_format = DataFormat::new("delimited").expect("data format");
        data_format
            .set_property("item_delimiter", "semicolon")
            .expect("property");
        let file = write_file("17;\"Miller; John\"\n18;Webster\n");
        let rows = delimited_rows(file.path(), &data_format).expect("rows");
        assert_eq!(rows[0], ["17", "Miller; John"]);
        assert_eq!(rows[1], ["18", "Webster"]);
    }

    #[test]
    fn delimited_rows_skip_declared_header() {
        let mut data_format = DataFormat::new("delimited").expect("data format");
        data_format.set_property("header", "true").expect("property");
        let file = write_file("id,surname\n17,Miller\n");
        let rows = delimited_rows(file.path(), &data_format).expect("rows");
        assert_eq!(rows, vec![vec!["17".to_string(), "Miller".to_string()]]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = icd_rows(Path::new("no/such/file.csv"));
        assert!(matches!(result, Err(IngestError::Io { .. })));
    }
}
