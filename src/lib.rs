//! darstex - Arabic textbook spreadsheets to LaTeX, with Quran verse enrichment
//!
//! This crate converts spreadsheet-resident Arabic textbook data (vocabulary
//! entries and exercises citing Quranic verses) into a typeset LaTeX document
//! or an intermediate JSON form. Exercises that cite a verse can optionally be
//! enriched with the full verse text, a transliteration, and English
//! translations fetched from the Quran.com content API.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use darstex::PipelineBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Default settings: CSV in, LaTeX out, no network access
//!     let pipeline = PipelineBuilder::new().build()?;
//!
//!     let input = File::open("textbook.csv")?;
//!     let output = File::create("textbook.tex")?;
//!
//!     let report = pipeline.convert(input, output)?;
//!     eprintln!("{}", report.summary());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Verse Enrichment
//!
//! ```rust,no_run
//! use std::fs::File;
//! use darstex::{PipelineBuilder, QuranApiConfig, Translation};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The token comes from wherever the application keeps its secrets;
//!     // the library never reads the environment itself.
//!     let token = std::env::var("QURAN_API_TOKEN")?;
//!
//!     let pipeline = PipelineBuilder::new()
//!         .enable_enrichment(true)
//!         .with_api_config(QuranApiConfig::new(
//!             "https://apis.quran.com/content/api/v4",
//!             token,
//!         ))
//!         .with_translations(vec![
//!             Translation::SaheehInternational,
//!             Translation::Pickthall,
//!         ])
//!         .build()?;
//!
//!     let input = File::open("textbook.ods")?;
//!     let output = File::create("textbook.tex")?;
//!     pipeline.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # In-Memory Conversion
//!
//! ```rust
//! use std::io::Cursor;
//! use darstex::PipelineBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = PipelineBuilder::new().build()?;
//! let csv = "Sing. / Perf.,English,Lesson #,Ex/Voc\n\
//!            كِتَاب,book,3,Vocabulary\n";
//! let (latex, report) = pipeline.convert_to_string(Cursor::new(csv))?;
//! assert!(latex.contains("\\chapter{Lesson 3}"));
//! assert_eq!(report.vocabulary_count, 1);
//! # Ok(())
//! # }
//! ```
//!
//! Invalid rows and failed verse lookups never abort a run; they are
//! collected into the returned [`RunReport`] and the affected content is
//! skipped or rendered unenriched. Output is deterministic: identical input
//! and lookup results produce byte-identical documents.

mod api;
mod builder;
mod document;
mod error;
mod normalize;
mod output;
mod quran;
mod reader;
mod report;
mod types;

pub use api::{InputFormat, OutputFormat, Translation};
pub use builder::{Pipeline, PipelineBuilder};
pub use document::{Document, LessonSection};
pub use error::DarsTexError;
pub use quran::{LookupError, QuranApiClient, QuranApiConfig, VerseLookup};
pub use report::{Diagnostic, RunReport};
pub use types::{
    Column, ExerciseEntry, RawRow, Record, VerseDetail, VerseReference, VocabularyEntry,
};
