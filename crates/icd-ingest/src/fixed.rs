#![deny(unsafe_code)]

use std::path::Path;

use tracing::debug;

use icd_model::Location;

use crate::IngestError;

/// Read a fixed-width data file, slicing every line into one cell per
/// `(field name, width)` entry.
///
/// Every line must contain exactly the sum of all widths in characters;
/// shorter or longer lines are reported with their line location.
pub fn fixed_rows(
    path: &Path,
    field_widths: &[(String, usize)],
) -> Result<Vec<Vec<String>>, IngestError> {
    let content =
        std::fs::read_to_string(path).map_err(|error| IngestError::io(path, error))?;
    let expected_width: usize = field_widths.iter().map(|(_, width)| width).sum();

    let mut rows = Vec::new();
    let mut location = Location::without_cell(path.display().to_string());
    for line in content.lines() {
        if line.is_empty() {
            location.advance_line();
            continue;
        }
        let cells: Vec<char> = line.chars().collect();
        if cells.len() != expected_width {
            return Err(IngestError::FixedWidth {
                message: format!(
                    "line must have {expected_width} characters but has {}",
                    cells.len()
                ),
                location,
            });
        }
        let mut row = Vec::with_capacity(field_widths.len());
        let mut offset = 0;
        for (_, width) in field_widths {
            row.push(cells[offset..offset + width].iter().collect());
            offset += width;
        }
        rows.push(row);
        location.advance_line();
    }

    debug!(path = %path.display(), row_count = rows.len(), "read fixed-width rows");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    fn widths(raw: &[(&str, usize)]) -> Vec<(String, usize)> {
        raw.iter()
            .map(|(name, width)| ((*name).to_string(), *width))
            .collect()
    }

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn slices_lines_by_field_widths() {
        let file = write_file("38000Miller    \n38001Webster   \n");
        let rows = fixed_rows(file.path(), &widths(&[("id", 5), ("surname", 10)]))
            .expect("rows");
        assert_eq!(rows[0], ["38000", "Miller    "]);
        assert_eq!(rows[1], ["38001", "Webster   "]);
    }

    #[test]
    fn short_line_is_reported_with_its_line() {
        let file = write_file("38000Miller    \n38001\n");
        let error = fixed_rows(file.path(), &widths(&[("id", 5), ("surname", 10)]))
            .expect_err("short line must fail");
        match error {
            IngestError::FixedWidth { location, .. } => assert_eq!(location.line(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn overlong_line_is_rejected() {
        let file = write_file("38000Miller     too much\n");
        assert!(fixed_rows(file.path(), &widths(&[("id", 5), ("surname", 10)])).is_err());
    }

    #[test]
    fn empty_lines_are_skipped() {
        let file = write_file("38000Miller    \n\n38001Webster   \n");
        let rows = fixed_rows(file.path(), &widths(&[("id", 5), ("surname", 10)]))
            .expect("rows");
        assert_eq!(rows.len(), 2);
    }
}
