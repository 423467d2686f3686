//! Builder Module
//!
//! Fluent builder for configuring a [`Pipeline`], plus the pipeline facade
//! itself.

use std::io::{BufWriter, Read, Write};

use tracing::{debug, info};

use crate::api::{InputFormat, OutputFormat, Translation};
use crate::document::Document;
use crate::error::DarsTexError;
use crate::output::Renderer;
use crate::quran::{collect_references, fetch_details, QuranApiClient, QuranApiConfig, VerseLookup};
use crate::reader::read_rows;
use crate::report::RunReport;
use crate::types::{ExerciseEntry, Record};

/// Settings collected by the builder.
#[derive(Debug, Clone)]
pub(crate) struct PipelineConfig {
    /// Input spreadsheet format.
    pub input_format: InputFormat,

    /// Output document format.
    pub output_format: OutputFormat,

    /// Whether to look up cited verses over the network.
    pub enrichment: bool,

    /// Translations to request per verse, in output order.
    pub translations: Vec<Translation>,

    /// API connection settings; required when enrichment is on.
    pub api_config: Option<QuranApiConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_format: InputFormat::Csv,
            output_format: OutputFormat::Latex,
            enrichment: false,
            translations: vec![Translation::SaheehInternational, Translation::Pickthall],
            api_config: None,
        }
    }
}

/// Fluent builder for [`Pipeline`].
///
/// Every setting has a default: CSV in, LaTeX out, enrichment off, Saheeh
/// International and Pickthall as the translation set. Only `build()` can
/// fail, and only on an inconsistent configuration.
///
/// # Examples
///
/// ```rust
/// use darstex::{PipelineBuilder, InputFormat, OutputFormat};
///
/// # fn main() -> Result<(), darstex::DarsTexError> {
/// let pipeline = PipelineBuilder::new()
///     .with_input_format(InputFormat::Workbook)
///     .with_output_format(OutputFormat::Json)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Select the input spreadsheet format.
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.config.input_format = format;
        self
    }

    /// Select the output document format.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Turn verse enrichment on or off.
    ///
    /// When on, `build()` requires an API configuration (see
    /// [`with_api_config`](Self::with_api_config)).
    pub fn enable_enrichment(mut self, enabled: bool) -> Self {
        self.config.enrichment = enabled;
        self
    }

    /// Set the translations requested per verse, in the order they should
    /// appear in the output.
    pub fn with_translations(mut self, translations: Vec<Translation>) -> Self {
        self.config.translations = translations;
        self
    }

    /// Provide the verse API endpoint and credentials.
    ///
    /// The token is taken as given; the library never reads environment
    /// variables or other ambient configuration itself.
    pub fn with_api_config(mut self, config: QuranApiConfig) -> Self {
        self.config.api_config = Some(config);
        self
    }

    /// Validate the configuration and construct the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`DarsTexError::Config`] when:
    ///
    /// * enrichment is enabled with no API configuration, or with a blank
    ///   base URL or token — checked here so a bad setup fails before the
    ///   first network call;
    /// * the translation set is empty or contains duplicates.
    pub fn build(self) -> Result<Pipeline, DarsTexError> {
        if self.config.translations.is_empty() {
            return Err(DarsTexError::Config(
                "translation set must not be empty".to_string(),
            ));
        }
        for (i, translation) in self.config.translations.iter().enumerate() {
            if self.config.translations[..i].contains(translation) {
                return Err(DarsTexError::Config(format!(
                    "duplicate translation in request set: {}",
                    translation.display_name()
                )));
            }
        }

        let client = if self.config.enrichment {
            let api_config = self.config.api_config.clone().ok_or_else(|| {
                DarsTexError::Config(
                    "enrichment enabled: no API configuration provided".to_string(),
                )
            })?;
            Some(QuranApiClient::new(
                api_config,
                self.config.translations.clone(),
            )?)
        } else {
            None
        };

        Ok(Pipeline {
            config: self.config,
            client,
        })
    }
}

/// Conversion facade.
///
/// Reads a spreadsheet, normalizes its rows, optionally enriches cited
/// verses, and renders the document. Built via [`PipelineBuilder`].
///
/// # Examples
///
/// ```rust,no_run
/// use darstex::PipelineBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), darstex::DarsTexError> {
/// let pipeline = PipelineBuilder::new().build()?;
/// let input = File::open("textbook.csv")?;
/// let output = File::create("textbook.tex")?;
/// let report = pipeline.convert(input, output)?;
/// eprintln!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    client: Option<QuranApiClient>,
}

impl Pipeline {
    /// Convert `input` and write the rendered document to `output`.
    ///
    /// Invalid rows and failed lookups are reported in the returned
    /// [`RunReport`], never raised: the output always contains the best
    /// achievable document for the valid rows. Output is byte-identical
    /// across runs given the same input and lookup results.
    pub fn convert<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<RunReport, DarsTexError> {
        match &self.client {
            Some(client) => self.run(input, output, Some(client)),
            None => self.run(input, output, None),
        }
    }

    /// Like [`convert`](Self::convert), but with a caller-supplied verse
    /// lookup instead of the built-in HTTP client. Intended for tests and
    /// for embedders with their own caching layer.
    pub fn convert_with_lookup<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        lookup: &dyn VerseLookup,
    ) -> Result<RunReport, DarsTexError> {
        self.run(input, output, Some(lookup))
    }

    /// Convert `input` and return the rendered document as a string.
    pub fn convert_to_string<R: Read>(
        &self,
        input: R,
    ) -> Result<(String, RunReport), DarsTexError> {
        let mut buffer = Vec::new();
        let report = self.convert(input, &mut buffer)?;
        let text = String::from_utf8(buffer).map_err(|e| {
            DarsTexError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        Ok((text, report))
    }

    fn run<R: Read, W: Write>(
        &self,
        mut input: R,
        mut output: W,
        lookup: Option<&dyn VerseLookup>,
    ) -> Result<RunReport, DarsTexError> {
        // 1. Read the whole input; every reader works on an in-memory slice
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer)?;
        debug!(bytes = buffer.len(), format = ?self.config.input_format, "reading input");

        // 2. Raw rows, then normalized records plus per-row diagnostics
        let rows = read_rows(&buffer, self.config.input_format)?;
        let (records, mut diagnostics) = crate::normalize::normalize(&rows);

        // 3. Resolve references and fetch details
        let exercises: Vec<&ExerciseEntry> = records
            .iter()
            .filter_map(|record| match record {
                Record::Exercise(entry) => Some(entry),
                Record::Vocabulary(_) => None,
            })
            .collect();
        // A caller-supplied lookup implies enrichment
        let references = collect_references(&exercises, lookup.is_some());

        let (details, lookup_diagnostics) = match lookup {
            Some(lookup) if !references.is_empty() => fetch_details(&references, lookup),
            _ => Default::default(),
        };
        let lookups_attempted = references.len();
        let lookups_failed = lookup_diagnostics.len();
        diagnostics.extend(lookup_diagnostics);

        // 4. Assemble and render
        let document = Document::assemble(records, &details);
        let mut writer = BufWriter::new(&mut output);
        Renderer::from_format(self.config.output_format).render(&document, &mut writer)?;
        writer.flush()?;

        let report = RunReport {
            vocabulary_count: document.vocabulary_count(),
            exercise_count: document.exercise_count(),
            lookups_attempted,
            lookups_failed,
            diagnostics,
        };
        info!(
            vocabulary = report.vocabulary_count,
            exercises = report.exercise_count,
            lookups = report.lookups_attempted,
            failed = report.lookups_failed,
            rejected = report.rejected_rows(),
            "conversion finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn test_builder_defaults() {
        let builder = PipelineBuilder::new();
        assert_eq!(builder.config.input_format, InputFormat::Csv);
        assert_eq!(builder.config.output_format, OutputFormat::Latex);
        assert!(!builder.config.enrichment);
        assert_eq!(
            builder.config.translations,
            vec![Translation::SaheehInternational, Translation::Pickthall]
        );
        assert!(builder.config.api_config.is_none());
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = PipelineBuilder::new()
            .with_input_format(InputFormat::FlatXml)
            .with_output_format(OutputFormat::Json)
            .with_translations(vec![Translation::YusufAli])
            .enable_enrichment(true)
            .with_api_config(
                QuranApiConfig::new("https://example.test/v4", "token")
                    .with_timeout(Duration::from_secs(5)),
            );

        assert_eq!(builder.config.input_format, InputFormat::FlatXml);
        assert_eq!(builder.config.output_format, OutputFormat::Json);
        assert!(builder.config.enrichment);
        assert_eq!(builder.config.translations, vec![Translation::YusufAli]);
        assert!(builder.config.api_config.is_some());
    }

    #[test]
    fn test_build_success_without_enrichment() {
        assert!(PipelineBuilder::new().build().is_ok());
    }

    #[test]
    fn test_build_rejects_enrichment_without_api_config() {
        let result = PipelineBuilder::new().enable_enrichment(true).build();
        match result {
            Err(DarsTexError::Config(msg)) => assert!(msg.contains("no API configuration")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_rejects_blank_token() {
        let result = PipelineBuilder::new()
            .enable_enrichment(true)
            .with_api_config(QuranApiConfig::new("https://example.test/v4", ""))
            .build();
        assert!(matches!(result, Err(DarsTexError::Config(_))));
    }

    #[test]
    fn test_build_rejects_empty_translation_set() {
        let result = PipelineBuilder::new().with_translations(vec![]).build();
        match result {
            Err(DarsTexError::Config(msg)) => assert!(msg.contains("must not be empty")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_rejects_duplicate_translations() {
        let result = PipelineBuilder::new()
            .with_translations(vec![Translation::Pickthall, Translation::Pickthall])
            .build();
        match result {
            Err(DarsTexError::Config(msg)) => assert!(msg.contains("duplicate")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_convert_empty_input_yields_empty_document() {
        let pipeline = PipelineBuilder::new().build().unwrap();
        let csv = "Sing. / Perf.,English,Lesson #,Ex/Voc\n";
        let (text, report) = pipeline.convert_to_string(Cursor::new(csv)).unwrap();

        assert!(text.contains("\\begin{document}"));
        assert!(text.ends_with("\\end{document}\n"));
        assert_eq!(report.vocabulary_count, 0);
        assert_eq!(report.exercise_count, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_convert_counts_records_and_rejections() {
        let pipeline = PipelineBuilder::new().build().unwrap();
        let csv = "\
Sing. / Perf.,English,Lesson #,Ex/Voc,Exercise #
كِتَاب,book,3,Vocabulary,
قَلَم,pen,,Vocabulary,
";
        let (_, report) = pipeline.convert_to_string(Cursor::new(csv)).unwrap();
        assert_eq!(report.vocabulary_count, 1);
        assert_eq!(report.rejected_rows(), 1);
        assert_eq!(report.lookups_attempted, 0);
    }
}
