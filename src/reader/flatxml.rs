//! Flat XML Spreadsheet Reader
//!
//! Ingestion of single-file XML spreadsheets (uncompressed ODF, `.fods`).
//! Event-driven parse with quick-xml; element names are matched by local
//! name so namespace prefixes (`table:`, `text:`) do not matter.
//!
//! Recognized structure:
//!
//! ```xml
//! <table:table table:name="Lesson 16">
//!   <table:table-row>
//!     <table:table-cell><text:p>Ex/Voc</text:p></table:table-cell>
//!     <table:table-cell table:number-columns-repeated="2"/>
//!   </table:table-row>
//! </table:table>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use tracing::debug;

use crate::error::DarsTexError;
use crate::reader::{select_sheet_names, HeaderMap};
use crate::types::RawRow;

/// Read all data rows from a flat XML spreadsheet.
pub(crate) fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>, DarsTexError> {
    let tables = parse_tables(bytes)?;

    let table_names: Vec<String> = tables.iter().map(|(name, _)| name.clone()).collect();
    let selected = select_sheet_names(&table_names);
    debug!(tables = selected.len(), "reading flat XML spreadsheet");

    let mut rows = Vec::new();
    let mut index = 0usize;

    for (name, table_rows) in &tables {
        if !selected.contains(name) {
            continue;
        }
        let mut header_map: Option<HeaderMap> = None;
        for cells in table_rows {
            match &header_map {
                None => {
                    if cells.iter().any(|c| !c.trim().is_empty()) {
                        header_map = Some(HeaderMap::new(cells));
                    }
                }
                Some(map) => {
                    if map.is_header_row(cells) {
                        continue;
                    }
                    index += 1;
                    if let Some(row) = map.row(index, cells) {
                        rows.push(row);
                    }
                }
            }
        }
    }

    Ok(rows)
}

/// Parse the XML into `(table name, rows of cell text)` in document order.
fn parse_tables(bytes: &[u8]) -> Result<Vec<(String, Vec<Vec<String>>)>, DarsTexError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut tables: Vec<(String, Vec<Vec<String>>)> = Vec::new();

    let mut current_rows: Vec<Vec<String>> = Vec::new();
    let mut current_table_name = String::new();
    let mut in_table = false;

    let mut row: Vec<String> = Vec::new();
    let mut in_row = false;

    let mut cell_text = String::new();
    let mut cell_repeat = 1usize;
    let mut in_cell = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().local_name().as_ref() {
                b"table" => {
                    in_table = true;
                    current_table_name = attribute_local(&e, b"name")?.unwrap_or_default();
                    current_rows.clear();
                }
                b"table-row" if in_table => {
                    in_row = true;
                    row.clear();
                }
                b"table-cell" if in_row => {
                    in_cell = true;
                    cell_text.clear();
                    cell_repeat = repeat_count(&e)?;
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                // Self-closing cells are empty cells, possibly repeated
                if in_row && e.name().local_name().as_ref() == b"table-cell" {
                    let repeat = repeat_count(&e)?;
                    for _ in 0..repeat {
                        row.push(String::new());
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_cell {
                    let text = e.unescape()?;
                    cell_text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().local_name().as_ref() {
                b"table-cell" if in_cell => {
                    in_cell = false;
                    for _ in 0..cell_repeat {
                        row.push(cell_text.clone());
                    }
                }
                b"table-row" if in_row => {
                    in_row = false;
                    current_rows.push(std::mem::take(&mut row));
                }
                b"table" if in_table => {
                    in_table = false;
                    tables.push((
                        std::mem::take(&mut current_table_name),
                        std::mem::take(&mut current_rows),
                    ));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DarsTexError::Xml(e)),
        }
        buf.clear();
    }

    Ok(tables)
}

/// Value of the `number-columns-repeated` attribute, defaulting to 1.
///
/// Trailing filler cells can carry huge repeat counts; they are capped so a
/// hostile file cannot balloon memory.
fn repeat_count(e: &BytesStart<'_>) -> Result<usize, DarsTexError> {
    const MAX_REPEAT: usize = 1024;

    for attribute in e.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.local_name().as_ref() == b"number-columns-repeated" {
            let value = std::str::from_utf8(&attribute.value)?;
            let count: usize = value.trim().parse().unwrap_or(1);
            return Ok(count.min(MAX_REPEAT).max(1));
        }
    }
    Ok(1)
}

/// String value of an attribute matched by local name.
fn attribute_local(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, DarsTexError> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.local_name().as_ref() == name {
            let value = std::str::from_utf8(&attribute.value)?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn cell(text: &str) -> String {
        format!("<table:table-cell><text:p>{}</text:p></table:table-cell>", text)
    }

    fn fixture() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document xmlns:office="o" xmlns:table="t" xmlns:text="x">
 <table:table table:name="Lesson 16">
  <table:table-row>{}{}{}{}</table:table-row>
  <table:table-row>{}{}{}{}</table:table-row>
  <table:table-row><table:table-cell table:number-columns-repeated="4"/></table:table-row>
 </table:table>
 <table:table table:name="Scratch">
  <table:table-row>{}</table:table-row>
 </table:table>
</office:document>"#,
            cell("Ex/Voc"),
            cell("Sing. / Perf."),
            cell("English"),
            cell("Lesson #"),
            cell("Vocabulary"),
            cell("أَبْصَرَ"),
            cell("(+ bi-) to see, observe"),
            cell("16"),
            cell("ignored"),
        )
    }

    #[test]
    fn test_read_rows_flat_xml() {
        let rows = read_rows(fixture().as_bytes()).unwrap();

        // Scratch table filtered out, empty repeated row dropped
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Column::Kind), Some("Vocabulary"));
        assert_eq!(rows[0].get(Column::SingularOrPerfect), Some("أَبْصَرَ"));
        assert_eq!(rows[0].get(Column::LessonNumber), Some("16"));
    }

    #[test]
    fn test_repeated_cells_shift_columns() {
        let xml = format!(
            r#"<table xmlns:table="t" xmlns:text="x" table:name="Lesson 1">
 <table:table-row>{}{}{}</table:table-row>
 <table:table-row>{}<table:table-cell table:number-columns-repeated="1"/>{}</table:table-row>
</table>"#,
            cell("Ex/Voc"),
            cell("English"),
            cell("Lesson #"),
            cell("Vocabulary"),
            cell("3"),
        );
        let rows = read_rows(xml.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Column::English), None);
        assert_eq!(rows[0].get(Column::LessonNumber), Some("3"));
    }

    #[test]
    fn test_xml_entities_unescaped() {
        let xml = format!(
            r#"<table:table xmlns:table="t" xmlns:text="x" table:name="Lesson 1">
 <table:table-row>{}{}</table:table-row>
 <table:table-row>{}{}</table:table-row>
</table:table>"#,
            cell("English"),
            cell("Lesson #"),
            cell("bread &amp; salt"),
            cell("2"),
        );
        let rows = read_rows(xml.as_bytes()).unwrap();
        assert_eq!(rows[0].get(Column::English), Some("bread & salt"));
    }

    #[test]
    fn test_truncated_xml_yields_no_rows() {
        let xml = "<table:table><table:table-row>";
        let rows = read_rows(xml.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
