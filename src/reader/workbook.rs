//! Workbook Reader
//!
//! ODS/XLSX ingestion built on calamine's auto-detecting opener. The course
//! material lives in ODS workbooks with one sheet per lesson; sheets whose
//! name starts with `lesson` are preferred when present (the sheet filter in
//! [`crate::reader::select_sheet_names`]).

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

use tracing::debug;

use crate::error::DarsTexError;
use crate::reader::{select_sheet_names, HeaderMap};
use crate::types::RawRow;

/// Read all data rows from an ODS or XLSX workbook.
///
/// Every ingested sheet must start with its own header row. Row indexes keep
/// counting across sheets so diagnostics stay unambiguous.
pub(crate) fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>, DarsTexError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_names = select_sheet_names(&workbook.sheet_names().to_vec());
    debug!(sheets = sheet_names.len(), "reading workbook");

    let mut rows = Vec::new();
    let mut index = 0usize;

    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| DarsTexError::Workbook(e.into()))?;

        let mut header_map: Option<HeaderMap> = None;
        for cells_row in range.rows() {
            let cells: Vec<String> = cells_row.iter().map(cell_text).collect();

            match &header_map {
                None => {
                    if cells.iter().any(|c| !c.trim().is_empty()) {
                        header_map = Some(HeaderMap::new(&cells));
                    }
                }
                Some(map) => {
                    if map.is_header_row(&cells) {
                        continue;
                    }
                    index += 1;
                    if let Some(row) = map.row(index, &cells) {
                        rows.push(row);
                    }
                }
            }
        }
    }

    Ok(rows)
}

/// Render a calamine cell as text.
///
/// Numeric cells with no fractional part print as integers so that lesson
/// and verse numbers read back exactly as they were typed.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(d) => d.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use rust_xlsxwriter::Workbook;

    fn build_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name("Lesson 16").unwrap();
        sheet.write_string(0, 0, "Ex/Voc").unwrap();
        sheet.write_string(0, 1, "Sing. / Perf.").unwrap();
        sheet.write_string(0, 2, "English").unwrap();
        sheet.write_string(0, 3, "Lesson #").unwrap();
        sheet.write_string(1, 0, "Vocabulary").unwrap();
        sheet.write_string(1, 1, "أَبْصَرَ").unwrap();
        sheet.write_string(1, 2, "(+ bi-) to see, observe").unwrap();
        sheet.write_number(1, 3, 16.0).unwrap();

        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "should be skipped").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_read_rows_from_workbook() {
        let bytes = build_workbook();
        let rows = read_rows(&bytes).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Column::Kind), Some("Vocabulary"));
        assert_eq!(rows[0].get(Column::SingularOrPerfect), Some("أَبْصَرَ"));
        // Numeric cell reads back as an integer, not "16.0"
        assert_eq!(rows[0].get(Column::LessonNumber), Some("16"));
    }

    #[test]
    fn test_read_rows_invalid_workbook() {
        let result = read_rows(b"not a workbook");
        assert!(result.is_err());
    }

    #[test]
    fn test_cell_text_float_formatting() {
        assert_eq!(cell_text(&Data::Float(16.0)), "16");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
