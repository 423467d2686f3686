//! Verse Reference Resolver
//!
//! Decides which verse references need a remote lookup. References are
//! deduplicated while preserving first-seen order, so the sequence of API
//! calls is identical between runs of the same input.

use std::collections::HashSet;

use crate::types::{ExerciseEntry, VerseReference};

/// Collect the distinct verse references cited by `exercises`.
///
/// Returns an empty list when enrichment is disabled. Exercises without a
/// reference are skipped; duplicates collapse onto their first occurrence.
pub(crate) fn collect_references(
    exercises: &[&ExerciseEntry],
    enrichment_enabled: bool,
) -> Vec<VerseReference> {
    if !enrichment_enabled {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut references = Vec::new();
    for exercise in exercises {
        if let Some(reference) = exercise.reference() {
            if seen.insert(reference) {
                references.push(reference);
            }
        }
    }
    references
}
