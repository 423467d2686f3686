//! JSON Renderer
//!
//! Emits the intermediate JSON document: ordered `vocabulary` and
//! `exercises` arrays, each exercise carrying its verse detail when
//! enrichment found one. Pretty-printed UTF-8 with a trailing newline.

use std::io::Write;

use serde::Serialize;

use crate::document::Document;
use crate::error::DarsTexError;
use crate::types::{ExerciseEntry, VerseDetail, VocabularyEntry};

#[derive(Serialize)]
struct JsonDocument<'a> {
    vocabulary: Vec<&'a VocabularyEntry>,
    exercises: Vec<JsonExercise<'a>>,
}

#[derive(Serialize)]
struct JsonExercise<'a> {
    #[serde(flatten)]
    entry: &'a ExerciseEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    verse_detail: Option<&'a VerseDetail>,
}

pub(crate) struct JsonRenderer;

impl JsonRenderer {
    pub(crate) fn render<W: Write>(
        &self,
        document: &Document,
        writer: &mut W,
    ) -> Result<(), DarsTexError> {
        let mut vocabulary = Vec::new();
        let mut exercises = Vec::new();
        for lesson in &document.lessons {
            vocabulary.extend(lesson.vocabulary.iter());
            exercises.extend(lesson.exercises.iter().map(|(entry, detail)| JsonExercise {
                entry,
                verse_detail: detail.as_ref(),
            }));
        }

        let json = JsonDocument {
            vocabulary,
            exercises,
        };
        serde_json::to_writer_pretty(&mut *writer, &json)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
