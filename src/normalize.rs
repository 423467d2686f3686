//! Record Normalizer
//!
//! Maps raw spreadsheet rows onto the two canonical record shapes. Column
//! access is by declared name, never by position. A bad row is never fatal:
//! it produces exactly one diagnostic and the rest of the batch continues.
//!
//! Arabic text passes through byte-for-byte. No case folding, no diacritic
//! stripping; combining marks in the source must survive into the output.

use tracing::{debug, warn};

use crate::report::Diagnostic;
use crate::types::{Column, ExerciseEntry, RawRow, Record, VocabularyEntry};

/// Row kind as declared in the `Ex/Voc` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Vocabulary,
    Exercise,
}

/// Normalize raw rows into records.
///
/// Returns the successfully parsed records in input order together with one
/// diagnostic per rejected row. Never fails as a whole.
pub(crate) fn normalize(rows: &[RawRow]) -> (Vec<Record>, Vec<Diagnostic>) {
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for row in rows {
        match normalize_row(row) {
            Ok(record) => records.push(record),
            Err(diagnostic) => {
                warn!(row = row.index, %diagnostic, "rejected row");
                diagnostics.push(diagnostic);
            }
        }
    }

    debug!(
        records = records.len(),
        rejected = diagnostics.len(),
        "normalized rows"
    );
    (records, diagnostics)
}

fn normalize_row(row: &RawRow) -> Result<Record, Diagnostic> {
    let kind = row_kind(row)?;

    // Lesson number is required and positive for both kinds
    let lesson_number = required_positive(row, Column::LessonNumber)?;

    match kind {
        RowKind::Vocabulary => normalize_vocabulary(row, lesson_number),
        RowKind::Exercise => normalize_exercise(row, lesson_number),
    }
}

fn row_kind(row: &RawRow) -> Result<RowKind, Diagnostic> {
    let declared = row.get(Column::Kind).ok_or_else(|| Diagnostic::InvalidRow {
        row: row.index,
        columns: vec![Column::Kind],
        message: "row kind not declared".to_string(),
    })?;

    match declared.to_lowercase().as_str() {
        "vocabulary" => Ok(RowKind::Vocabulary),
        "exercise" => Ok(RowKind::Exercise),
        other => Err(Diagnostic::InvalidRow {
            row: row.index,
            columns: vec![],
            message: format!("unknown row kind '{}'", other),
        }),
    }
}

fn normalize_vocabulary(row: &RawRow, lesson_number: u32) -> Result<Record, Diagnostic> {
    let missing: Vec<Column> = [Column::SingularOrPerfect, Column::English]
        .into_iter()
        .filter(|&c| row.get(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(Diagnostic::InvalidRow {
            row: row.index,
            columns: missing,
            message: "vocabulary row".to_string(),
        });
    }

    Ok(Record::Vocabulary(VocabularyEntry {
        singular_or_perfect: row.get(Column::SingularOrPerfect).unwrap_or("").to_string(),
        dual_or_imperfect: row.get(Column::DualOrImperfect).unwrap_or("").to_string(),
        plural_or_verbal_noun: row
            .get(Column::PluralOrVerbalNoun)
            .unwrap_or("")
            .to_string(),
        english: row.get(Column::English).unwrap_or("").to_string(),
        lesson_number,
    }))
}

fn normalize_exercise(row: &RawRow, lesson_number: u32) -> Result<Record, Diagnostic> {
    // The full sentence lives in `Arabic Text` when that column exists,
    // otherwise in the first glossary column (single-purpose exports).
    let arabic_column = if row.get(Column::ArabicText).is_some() {
        Column::ArabicText
    } else {
        Column::SingularOrPerfect
    };

    let missing: Vec<Column> = [arabic_column, Column::English, Column::ExerciseNumber]
        .into_iter()
        .filter(|&c| row.get(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(Diagnostic::InvalidRow {
            row: row.index,
            columns: missing,
            message: "exercise row".to_string(),
        });
    }

    let exercise_number = required_positive(row, Column::ExerciseNumber)?;

    // Verse references come as a pair or not at all; a half reference means
    // the sheet is wrong and guessing a default would silently miscite.
    let sura = optional_number(row, Column::Sura)?;
    let verse = optional_number(row, Column::Verse)?;
    if sura.is_some() != verse.is_some() {
        let present = if sura.is_some() { Column::Sura } else { Column::Verse };
        return Err(Diagnostic::InvalidRow {
            row: row.index,
            columns: vec![],
            message: format!(
                "partial verse reference: {} given without its counterpart",
                present.header()
            ),
        });
    }

    Ok(Record::Exercise(ExerciseEntry {
        arabic_text: row.get(arabic_column).unwrap_or("").to_string(),
        english: row.get(Column::English).unwrap_or("").to_string(),
        sura,
        verse,
        lesson_number,
        exercise_number,
    }))
}

/// Parse a required positive integer cell.
fn required_positive(row: &RawRow, column: Column) -> Result<u32, Diagnostic> {
    let text = row.get(column).ok_or_else(|| Diagnostic::InvalidRow {
        row: row.index,
        columns: vec![column],
        message: "required numeric column".to_string(),
    })?;

    match text.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        Ok(_) => Err(Diagnostic::InvalidRow {
            row: row.index,
            columns: vec![],
            message: format!("{} must be a positive integer, got '{}'", column, text),
        }),
        Err(_) => Err(Diagnostic::InvalidRow {
            row: row.index,
            columns: vec![],
            message: format!("{} is not a number: '{}'", column, text),
        }),
    }
}

/// Parse an optional positive integer cell: blank means absent, non-numeric
/// text is a validation error.
fn optional_number(row: &RawRow, column: Column) -> Result<Option<u32>, Diagnostic> {
    match row.get(column) {
        None => Ok(None),
        Some(text) => match text.parse::<u32>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(Diagnostic::InvalidRow {
                row: row.index,
                columns: vec![],
                message: format!("{} is not a positive integer: '{}'", column, text),
            }),
        },
    }
}
