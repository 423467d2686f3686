//! Public API Types
//!
//! Configuration enums used by the public builder API.

use serde::Serialize;

/// Input spreadsheet format.
///
/// Selects the reader used to turn the input bytes into raw rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputFormat {
    /// Comma-delimited UTF-8 text with a header row.
    Csv,

    /// Tab-delimited UTF-8 text with a header row.
    Tsv,

    /// ODS or XLSX workbook, auto-detected by calamine.
    ///
    /// When the workbook contains sheets whose trimmed name starts with
    /// `lesson` (case-insensitive), only those sheets are ingested; otherwise
    /// every sheet is read. Each sheet must carry its own header row.
    Workbook,

    /// Flat (single-file) XML spreadsheet.
    ///
    /// A minimal uncompressed spreadsheet serialization: `table-row`
    /// elements containing `table-cell` elements, with support for the
    /// `number-columns-repeated` attribute.
    FlatXml,
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Typeset LaTeX document (default).
    ///
    /// One chapter per lesson: a vocabulary `longtable` followed by a
    /// numbered exercise list, with an enrichment block per exercise when a
    /// verse detail is available.
    Latex,

    /// Intermediate JSON.
    ///
    /// A single object with ordered `vocabulary` and `exercises` arrays.
    /// Enriched exercises carry a `verse_detail` object.
    Json,
}

/// English translation resources supported by the verse lookup.
///
/// The variants mirror the Quran.com translation resources the original
/// course material was built against; the numeric ids are the resource ids
/// the API expects. Transliteration (resource 57) is always requested and is
/// not part of this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
pub enum Translation {
    /// Saheeh International (resource 20).
    SaheehInternational,

    /// M. Pickthall (resource 19).
    Pickthall,

    /// A. Yusuf Ali (resource 22).
    YusufAli,

    /// M.A.S. Abdel Haleem (resource 85).
    AbdelHaleem,

    /// Al-Hilali & Khan (resource 203).
    HilaliKhan,

    /// T. Usmani (resource 84).
    Usmani,
}

impl Translation {
    /// Resource id sent in the `translations=` query parameter.
    pub fn resource_id(self) -> u32 {
        match self {
            Translation::SaheehInternational => 20,
            Translation::Pickthall => 19,
            Translation::YusufAli => 22,
            Translation::AbdelHaleem => 85,
            Translation::HilaliKhan => 203,
            Translation::Usmani => 84,
        }
    }

    /// Translator name as printed in the output document.
    pub fn display_name(self) -> &'static str {
        match self {
            Translation::SaheehInternational => "Saheeh Intl.",
            Translation::Pickthall => "M. Pickthall",
            Translation::YusufAli => "A. Yusuf Ali",
            Translation::AbdelHaleem => "M.A.S. Abdel Haleem",
            Translation::HilaliKhan => "Al-Hilali & Khan",
            Translation::Usmani => "T. Usmani",
        }
    }

    /// Reverse lookup from an API resource id.
    pub(crate) fn from_resource_id(id: u32) -> Option<Self> {
        match id {
            20 => Some(Translation::SaheehInternational),
            19 => Some(Translation::Pickthall),
            22 => Some(Translation::YusufAli),
            85 => Some(Translation::AbdelHaleem),
            203 => Some(Translation::HilaliKhan),
            84 => Some(Translation::Usmani),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_resource_ids() {
        assert_eq!(Translation::SaheehInternational.resource_id(), 20);
        assert_eq!(Translation::Pickthall.resource_id(), 19);
        assert_eq!(Translation::YusufAli.resource_id(), 22);
        assert_eq!(Translation::AbdelHaleem.resource_id(), 85);
        assert_eq!(Translation::HilaliKhan.resource_id(), 203);
        assert_eq!(Translation::Usmani.resource_id(), 84);
    }

    #[test]
    fn test_translation_round_trip() {
        for t in [
            Translation::SaheehInternational,
            Translation::Pickthall,
            Translation::YusufAli,
            Translation::AbdelHaleem,
            Translation::HilaliKhan,
            Translation::Usmani,
        ] {
            assert_eq!(Translation::from_resource_id(t.resource_id()), Some(t));
        }
    }

    #[test]
    fn test_translation_unknown_resource_id() {
        // 57 is the transliteration resource, intentionally outside the set
        assert_eq!(Translation::from_resource_id(57), None);
        assert_eq!(Translation::from_resource_id(0), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Translation::Pickthall.display_name(), "M. Pickthall");
        assert_eq!(
            Translation::SaheehInternational.display_name(),
            "Saheeh Intl."
        );
    }
}
