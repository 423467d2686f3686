//! Delimited Text Reader
//!
//! CSV/TSV ingestion with a header row. Fields may be quoted with `"`,
//! embedded quotes escape as `""`, and quoted fields may span lines; this is
//! the inverse of the escaping convention used by common spreadsheet
//! exporters.
//!
//! Sheet marker lines (`=== Sheet: ... ===`) and repeated header rows, as
//! emitted by the course ODS-to-CSV exporter, are skipped.

use crate::error::DarsTexError;
use crate::reader::HeaderMap;
use crate::types::RawRow;

/// Read all data rows from delimited UTF-8 text.
pub(crate) fn read_rows(bytes: &[u8], delimiter: u8) -> Result<Vec<RawRow>, DarsTexError> {
    let text = std::str::from_utf8(bytes)?;
    let records = parse_records(text, delimiter as char);

    let mut rows = Vec::new();
    let mut header_map: Option<HeaderMap> = None;
    let mut index = 0usize;

    for record in records {
        if is_sheet_marker(&record) {
            continue;
        }
        match &header_map {
            None => {
                // First non-marker record is the header row.
                if record.iter().any(|c| !c.trim().is_empty()) {
                    header_map = Some(HeaderMap::new(&record));
                }
            }
            Some(map) => {
                if map.is_header_row(&record) {
                    continue;
                }
                index += 1;
                if let Some(row) = map.row(index, &record) {
                    rows.push(row);
                }
            }
        }
    }

    Ok(rows)
}

/// True for exporter-generated sheet separators like `=== Sheet: Lesson 16 ===`.
fn is_sheet_marker(record: &[String]) -> bool {
    record
        .first()
        .map(|c| c.trim_start().starts_with("=== Sheet:"))
        .unwrap_or(false)
        && record.iter().skip(1).all(|c| c.trim().is_empty())
}

/// Split delimited text into records of fields.
///
/// State machine over characters: quotes toggle quoted mode, `""` inside a
/// quoted field is a literal quote, `\r\n` and `\n` both end a record.
fn parse_records(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
        } else {
            match c {
                '"' if field.is_empty() => in_quotes = true,
                c if c == delimiter => {
                    record.push(std::mem::take(&mut field));
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                _ => field.push(c),
            }
        }
    }

    // Trailing record without a final newline
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    // Drop records that are entirely empty (blank separator lines)
    records
        .into_iter()
        .filter(|r| r.iter().any(|f| !f.trim().is_empty()))
        .collect()
}
