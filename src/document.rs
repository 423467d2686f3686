//! Document Assembler
//!
//! Merges normalized records and fetched verse details into one ordered
//! document model. Ordering is fully determined by the data: lessons
//! ascending, exercises ascending by exercise number within a lesson,
//! vocabulary in source order. No unordered containers leak into iteration,
//! so the same input always assembles to the same document.

use std::collections::{BTreeMap, HashMap};

use crate::types::{ExerciseEntry, Record, VerseDetail, VerseReference, VocabularyEntry};

/// One lesson's worth of content.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonSection {
    pub lesson_number: u32,
    /// Vocabulary entries in source order.
    pub vocabulary: Vec<VocabularyEntry>,
    /// Exercises ascending by exercise number, each with its verse detail
    /// when enrichment found one.
    pub exercises: Vec<(ExerciseEntry, Option<VerseDetail>)>,
}

/// The assembled document: lessons in ascending order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub lessons: Vec<LessonSection>,
}

impl Document {
    /// Group records by lesson and pair exercises with their details.
    ///
    /// Exercises whose reference is missing from `details` (enrichment
    /// disabled, or the lookup failed) get `None` and render unenriched.
    pub(crate) fn assemble(
        records: Vec<Record>,
        details: &HashMap<VerseReference, VerseDetail>,
    ) -> Self {
        let mut lessons: BTreeMap<u32, LessonSection> = BTreeMap::new();

        for record in records {
            let section = lessons
                .entry(record.lesson_number())
                .or_insert_with(|| LessonSection {
                    lesson_number: record.lesson_number(),
                    vocabulary: Vec::new(),
                    exercises: Vec::new(),
                });
            match record {
                Record::Vocabulary(entry) => section.vocabulary.push(entry),
                Record::Exercise(entry) => {
                    let detail = entry
                        .reference()
                        .and_then(|reference| details.get(&reference))
                        .cloned();
                    section.exercises.push((entry, detail));
                }
            }
        }

        for section in lessons.values_mut() {
            // Stable sort keeps source order for duplicate exercise numbers
            section.exercises.sort_by_key(|(e, _)| e.exercise_number);
        }

        Document {
            lessons: lessons.into_values().collect(),
        }
    }

    pub fn vocabulary_count(&self) -> usize {
        self.lessons.iter().map(|l| l.vocabulary.len()).sum()
    }

    pub fn exercise_count(&self) -> usize {
        self.lessons.iter().map(|l| l.exercises.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(lesson: u32, word: &str) -> Record {
        Record::Vocabulary(VocabularyEntry {
            singular_or_perfect: word.to_string(),
            dual_or_imperfect: String::new(),
            plural_or_verbal_noun: String::new(),
            english: "meaning".to_string(),
            lesson_number: lesson,
        })
    }

    fn exercise(lesson: u32, number: u32, reference: Option<(u32, u32)>) -> Record {
        Record::Exercise(ExerciseEntry {
            arabic_text: format!("exercise {}", number),
            english: "text".to_string(),
            sura: reference.map(|(s, _)| s),
            verse: reference.map(|(_, v)| v),
            lesson_number: lesson,
            exercise_number: number,
        })
    }

    fn detail(text: &str) -> VerseDetail {
        VerseDetail {
            arabic_text: text.to_string(),
            transliteration: String::new(),
            translations: vec![],
        }
    }

    #[test]
    fn test_lessons_ascend_and_exercises_sort() {
        let records = vec![
            exercise(17, 2, None),
            vocab(16, "كتب"),
            exercise(16, 3, None),
            exercise(16, 1, None),
            vocab(17, "قرأ"),
        ];
        let document = Document::assemble(records, &HashMap::new());

        assert_eq!(document.lessons.len(), 2);
        assert_eq!(document.lessons[0].lesson_number, 16);
        assert_eq!(document.lessons[1].lesson_number, 17);

        let numbers: Vec<u32> = document.lessons[0]
            .exercises
            .iter()
            .map(|(e, _)| e.exercise_number)
            .collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_shared_reference_resolves_to_same_detail() {
        let mut details = HashMap::new();
        details.insert(VerseReference::new(16, 89), detail("الآية"));

        let records = vec![
            exercise(16, 1, Some((16, 89))),
            exercise(16, 2, Some((16, 89))),
        ];
        let document = Document::assemble(records, &details);

        let exercises = &document.lessons[0].exercises;
        assert_eq!(exercises[0].1, exercises[1].1);
        assert_eq!(exercises[0].1.as_ref().unwrap().arabic_text, "الآية");
    }

    #[test]
    fn test_missing_detail_pairs_with_none() {
        let records = vec![
            exercise(16, 1, Some((16, 89))), // lookup failed / disabled
            exercise(16, 2, None),           // no reference at all
        ];
        let document = Document::assemble(records, &HashMap::new());

        for (_, detail) in &document.lessons[0].exercises {
            assert!(detail.is_none());
        }
    }

    #[test]
    fn test_counts() {
        let records = vec![vocab(1, "a"), vocab(2, "b"), exercise(1, 1, None)];
        let document = Document::assemble(records, &HashMap::new());
        assert_eq!(document.vocabulary_count(), 2);
        assert_eq!(document.exercise_count(), 1);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let build = || {
            let records = vec![
                vocab(3, "c"),
                exercise(1, 2, None),
                vocab(1, "a"),
                exercise(1, 1, None),
            ];
            Document::assemble(records, &HashMap::new())
        };
        assert_eq!(build(), build());
    }
}
