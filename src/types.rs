//! Types Module
//!
//! Canonical record types shared across the pipeline, plus the raw-row
//! representation handed from the readers to the normalizer.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::api::Translation;

/// Spreadsheet columns recognized by the normalizer.
///
/// Cell access is by declared column name, never by position. Each variant
/// has a canonical header plus the long-form aliases the original course
/// exporter produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// `Sing. / Perf.` - singular (nouns) or perfect (verbs) form.
    SingularOrPerfect,
    /// `Dual / Imperf.` - dual (nouns) or imperfect (verbs) form.
    DualOrImperfect,
    /// `Plural / Verbal N.` - plural (nouns) or verbal noun (verbs) form.
    PluralOrVerbalNoun,
    /// `English` - English meaning(s).
    English,
    /// `Sura` - Quran chapter number of an exercise reference.
    Sura,
    /// `Verse` - Quran verse number of an exercise reference.
    Verse,
    /// `Lesson #` - textbook lesson the row belongs to.
    LessonNumber,
    /// `Ex/Voc` - row kind discriminator.
    Kind,
    /// `Exercise #` - exercise position within its lesson.
    ExerciseNumber,
    /// `Arabic Text` - full exercise sentence, preferred over
    /// `Sing. / Perf.` when both are present on an exercise row.
    ArabicText,
}

impl Column {
    /// Canonical header string for this column.
    pub fn header(self) -> &'static str {
        match self {
            Column::SingularOrPerfect => "Sing. / Perf.",
            Column::DualOrImperfect => "Dual / Imperf.",
            Column::PluralOrVerbalNoun => "Plural / Verbal N.",
            Column::English => "English",
            Column::Sura => "Sura",
            Column::Verse => "Verse",
            Column::LessonNumber => "Lesson #",
            Column::Kind => "Ex/Voc",
            Column::ExerciseNumber => "Exercise #",
            Column::ArabicText => "Arabic Text",
        }
    }

    /// Resolve a header cell to a column, accepting the long-form aliases
    /// used by older exports. Returns `None` for unknown headers.
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim() {
            "Sing. / Perf." => Some(Column::SingularOrPerfect),
            "Dual / Imperf." => Some(Column::DualOrImperfect),
            "Plural / Verbal N." => Some(Column::PluralOrVerbalNoun),
            "English" | "English Translations" => Some(Column::English),
            "Sura" | "Quran Chapter/Surah" => Some(Column::Sura),
            "Verse" | "Quran Verse/Ayah" => Some(Column::Verse),
            "Lesson #" | "Lesson Number" => Some(Column::LessonNumber),
            "Ex/Voc" => Some(Column::Kind),
            "Exercise #" | "Exercise Number" => Some(Column::ExerciseNumber),
            "Arabic Text" => Some(Column::ArabicText),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One raw spreadsheet row: recognized cells keyed by column, plus the
/// 1-based row index in the source file for diagnostics.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based source row index (header row excluded from the count).
    pub index: usize,
    /// Cell text per recognized column. Blank cells may be present or absent;
    /// both mean "no value".
    pub cells: HashMap<Column, String>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            cells: HashMap::new(),
        }
    }

    /// Cell text for a column, trimmed; `None` when missing or blank.
    pub fn get(&self, column: Column) -> Option<&str> {
        self.cells
            .get(&column)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// True when every cell is blank.
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// A vocabulary entry as it appears in the glossary tables.
///
/// Arabic fields pass through from the spreadsheet byte-for-byte, combining
/// marks included. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    /// Singular (nouns) or perfect (verbs) form. Never blank.
    pub singular_or_perfect: String,
    /// Dual (nouns) or imperfect (verbs) form. May be blank.
    pub dual_or_imperfect: String,
    /// Plural (nouns) or verbal noun (verbs) form. May be blank.
    pub plural_or_verbal_noun: String,
    /// English meaning(s).
    pub english: String,
    /// Textbook lesson, always positive.
    pub lesson_number: u32,
}

/// An exercise entry, optionally tied to a Quranic verse.
///
/// Ordering key within the document is `(lesson_number, exercise_number)`.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseEntry {
    /// Exercise sentence in Arabic, passed through unaltered.
    pub arabic_text: String,
    /// English rendering of the sentence.
    pub english: String,
    /// Quran chapter, present only when the exercise cites a verse.
    pub sura: Option<u32>,
    /// Quran verse, present exactly when `sura` is.
    pub verse: Option<u32>,
    /// Textbook lesson, always positive.
    pub lesson_number: u32,
    /// Exercise position within the lesson.
    pub exercise_number: u32,
}

impl ExerciseEntry {
    /// The verse reference this exercise cites, if any.
    pub fn reference(&self) -> Option<VerseReference> {
        match (self.sura, self.verse) {
            (Some(sura), Some(verse)) => Some(VerseReference { sura, verse }),
            _ => None,
        }
    }
}

/// A `(sura, verse)` pair identifying one Quranic verse.
///
/// Value type with equality by value; used as the lookup cache key so that
/// two exercises citing the same verse resolve to the same detail within a
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VerseReference {
    pub sura: u32,
    pub verse: u32,
}

impl VerseReference {
    pub fn new(sura: u32, verse: u32) -> Self {
        Self { sura, verse }
    }
}

impl fmt::Display for VerseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sura, self.verse)
    }
}

/// Verse text fetched from the lookup API.
///
/// Created only by the API client and never mutated afterwards. Translations
/// are kept in the order they were requested, which fixes the output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseDetail {
    /// Full Arabic verse text (Uthmani script).
    pub arabic_text: String,
    /// Latin-script transliteration.
    pub transliteration: String,
    /// Requested translations, in request order.
    pub translations: Vec<(Translation, String)>,
}

/// A normalized row: either a vocabulary entry or an exercise entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Vocabulary(VocabularyEntry),
    Exercise(ExerciseEntry),
}

impl Record {
    pub fn lesson_number(&self) -> u32 {
        match self {
            Record::Vocabulary(v) => v.lesson_number,
            Record::Exercise(e) => e.lesson_number,
        }
    }
}
