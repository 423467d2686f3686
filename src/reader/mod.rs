//! Reader Module
//!
//! Turns input spreadsheet bytes into [`RawRow`] values. One submodule per
//! supported container: delimited text (CSV/TSV), ODS/XLSX workbooks via
//! calamine, and flat XML spreadsheets via quick-xml.
//!
//! Readers only recognize columns and collect cell text; all validation
//! happens later in the normalizer.

pub(crate) mod delimited;
pub(crate) mod flatxml;
pub(crate) mod workbook;

use tracing::debug;

use crate::api::InputFormat;
use crate::error::DarsTexError;
use crate::types::{Column, RawRow};

/// Read every data row from `bytes` using the reader for `format`.
pub(crate) fn read_rows(bytes: &[u8], format: InputFormat) -> Result<Vec<RawRow>, DarsTexError> {
    match format {
        InputFormat::Csv => delimited::read_rows(bytes, b','),
        InputFormat::Tsv => delimited::read_rows(bytes, b'\t'),
        InputFormat::Workbook => workbook::read_rows(bytes),
        InputFormat::FlatXml => flatxml::read_rows(bytes),
    }
}

/// Positional header-to-column mapping shared by all readers.
///
/// Built from a header row once, then applied to each data row. Unrecognized
/// headers are ignored (logged at debug level) so that bookkeeping columns
/// like `Page Number` or `Warning` do not break ingestion.
pub(crate) struct HeaderMap {
    columns: Vec<Option<Column>>,
    headers: Vec<String>,
}

impl HeaderMap {
    pub fn new(header_cells: &[String]) -> Self {
        let columns: Vec<Option<Column>> = header_cells
            .iter()
            .map(|h| {
                let column = Column::from_header(h);
                if column.is_none() && !h.trim().is_empty() {
                    debug!(header = %h, "ignoring unrecognized column");
                }
                column
            })
            .collect();
        Self {
            columns,
            headers: header_cells.to_vec(),
        }
    }

    /// True when at least one header was recognized.
    pub fn any_recognized(&self) -> bool {
        self.columns.iter().any(Option::is_some)
    }

    /// True when `cells` repeats the header row itself. Multi-sheet exports
    /// re-emit the header row per sheet; those repeats carry no data.
    pub fn is_header_row(&self, cells: &[String]) -> bool {
        !cells.is_empty()
            && cells.len() <= self.headers.len()
            && cells
                .iter()
                .zip(&self.headers)
                .all(|(cell, header)| cell.trim() == header.trim())
            && cells.iter().any(|c| !c.trim().is_empty())
    }

    /// Build a raw row from positional cells, dropping cells past the header
    /// width and fully blank rows.
    pub fn row(&self, index: usize, cells: &[String]) -> Option<RawRow> {
        let mut row = RawRow::new(index);
        for (position, cell) in cells.iter().enumerate() {
            if let Some(Some(column)) = self.columns.get(position) {
                if !cell.is_empty() {
                    row.cells.insert(*column, cell.clone());
                }
            }
        }
        if row.is_empty() {
            None
        } else {
            Some(row)
        }
    }
}

/// Sheet-name filter shared by the workbook and flat XML readers: when any
/// sheet name starts with `lesson` (case-insensitive), only those sheets are
/// ingested; otherwise every sheet is.
pub(crate) fn select_sheet_names(names: &[String]) -> Vec<String> {
    let lesson_sheets: Vec<String> = names
        .iter()
        .filter(|name| name.trim().to_lowercase().starts_with("lesson"))
        .cloned()
        .collect();
    if lesson_sheets.is_empty() {
        names.to_vec()
    } else {
        lesson_sheets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_map_recognizes_columns_and_aliases() {
        let map = HeaderMap::new(&cells(&[
            "Sing. / Perf.",
            "English Translations",
            "Lesson Number",
            "Page Number", // unknown, ignored
        ]));
        assert!(map.any_recognized());

        let row = map
            .row(1, &cells(&["أَبْصَرَ", "to see", "16", "12"]))
            .expect("row should survive");
        assert_eq!(row.get(Column::SingularOrPerfect), Some("أَبْصَرَ"));
        assert_eq!(row.get(Column::English), Some("to see"));
        assert_eq!(row.get(Column::LessonNumber), Some("16"));
        // Page Number is not a recognized column
        assert_eq!(row.cells.len(), 3);
    }

    #[test]
    fn test_header_map_drops_blank_rows() {
        let map = HeaderMap::new(&cells(&["English", "Lesson #"]));
        assert!(map.row(1, &cells(&["", ""])).is_none());
        assert!(map.row(2, &cells(&[])).is_none());
    }

    #[test]
    fn test_header_map_detects_repeated_header() {
        let map = HeaderMap::new(&cells(&["English", "Lesson #"]));
        assert!(map.is_header_row(&cells(&["English", "Lesson #"])));
        assert!(!map.is_header_row(&cells(&["to see", "16"])));
        assert!(!map.is_header_row(&cells(&["", ""])));
    }

    #[test]
    fn test_select_sheet_names_prefers_lesson_sheets() {
        let names = cells(&["Overview", "Lesson 16", "lesson 17 draft", "Notes"]);
        assert_eq!(
            select_sheet_names(&names),
            cells(&["Lesson 16", "lesson 17 draft"])
        );
    }

    #[test]
    fn test_select_sheet_names_falls_back_to_all() {
        let names = cells(&["Sheet1", "Sheet2"]);
        assert_eq!(select_sheet_names(&names), names);
    }
}
