//! Run Report Module
//!
//! Non-fatal diagnostics collected while a pipeline runs. Bad rows and failed
//! lookups degrade the output; they never abort the batch. The report is
//! returned alongside the rendered document so callers can show the user what
//! was skipped and why.

use std::fmt;

use crate::types::{Column, VerseReference};

/// A single non-fatal problem encountered during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A spreadsheet row failed validation and was excluded from the output.
    InvalidRow {
        /// 1-based row index in the source (header row not counted).
        row: usize,
        /// Required columns that were missing or blank. Empty when the row
        /// failed for a different reason (bad number, partial reference).
        columns: Vec<Column>,
        message: String,
    },

    /// The verse API answered with an error status or a malformed body.
    Lookup {
        reference: VerseReference,
        /// HTTP status, when the failure came with one.
        status: Option<u16>,
        message: String,
    },

    /// The verse API could not be reached (connect, DNS, timeout).
    Transport {
        reference: VerseReference,
        message: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidRow {
                row,
                columns,
                message,
            } => {
                if columns.is_empty() {
                    write!(f, "row {}: {}", row, message)
                } else {
                    let names: Vec<&str> = columns.iter().map(|c| c.header()).collect();
                    write!(
                        f,
                        "row {}: missing required column(s) {}: {}",
                        row,
                        names.join(", "),
                        message
                    )
                }
            }
            Diagnostic::Lookup {
                reference,
                status,
                message,
            } => match status {
                Some(code) => write!(f, "lookup {}: HTTP {}: {}", reference, code, message),
                None => write!(f, "lookup {}: {}", reference, message),
            },
            Diagnostic::Transport { reference, message } => {
                write!(f, "lookup {}: transport error: {}", reference, message)
            }
        }
    }
}

/// Outcome summary of one pipeline run.
///
/// Always produced, even when every row was valid and every lookup succeeded.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Vocabulary entries that made it into the document.
    pub vocabulary_count: usize,
    /// Exercise entries that made it into the document.
    pub exercise_count: usize,
    /// Distinct verse references looked up.
    pub lookups_attempted: usize,
    /// Lookups that failed and fell back to unenriched output.
    pub lookups_failed: usize,
    /// Everything that was skipped or degraded, in encounter order.
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Number of rows rejected by the normalizer.
    pub fn rejected_rows(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::InvalidRow { .. }))
            .count()
    }

    /// True when nothing was skipped or degraded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Human-readable multi-line summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} vocabulary entries, {} exercises, {}/{} lookups succeeded",
            self.vocabulary_count,
            self.exercise_count,
            self.lookups_attempted - self.lookups_failed,
            self.lookups_attempted,
        );
        for diagnostic in &self.diagnostics {
            out.push('\n');
            out.push_str(&diagnostic.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_row_display_names_columns() {
        let diagnostic = Diagnostic::InvalidRow {
            row: 4,
            columns: vec![Column::English, Column::LessonNumber],
            message: "vocabulary row".to_string(),
        };
        let text = diagnostic.to_string();
        assert!(text.contains("row 4"));
        assert!(text.contains("English"));
        assert!(text.contains("Lesson #"));
    }

    #[test]
    fn test_lookup_display_with_status() {
        let diagnostic = Diagnostic::Lookup {
            reference: VerseReference::new(16, 89),
            status: Some(404),
            message: "not found".to_string(),
        };
        let text = diagnostic.to_string();
        assert!(text.contains("16:89"));
        assert!(text.contains("HTTP 404"));
    }

    #[test]
    fn test_transport_display() {
        let diagnostic = Diagnostic::Transport {
            reference: VerseReference::new(2, 255),
            message: "connection timed out".to_string(),
        };
        assert!(diagnostic.to_string().contains("transport error"));
    }

    #[test]
    fn test_report_counts() {
        let mut report = RunReport {
            vocabulary_count: 10,
            exercise_count: 5,
            lookups_attempted: 3,
            lookups_failed: 1,
            ..Default::default()
        };
        assert!(report.is_clean());
        assert_eq!(report.rejected_rows(), 0);

        report.diagnostics.push(Diagnostic::InvalidRow {
            row: 2,
            columns: vec![],
            message: "bad lesson number".to_string(),
        });
        report.diagnostics.push(Diagnostic::Transport {
            reference: VerseReference::new(1, 1),
            message: "timeout".to_string(),
        });

        assert!(!report.is_clean());
        assert_eq!(report.rejected_rows(), 1);
        assert!(report.summary().contains("2/3 lookups succeeded"));
        assert!(report.summary().contains("bad lesson number"));
    }
}
