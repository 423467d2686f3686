//! Quran Lookup Module
//!
//! Verse reference resolution and the remote lookup client. The pipeline
//! talks to this module through the [`VerseLookup`] trait so tests can swap
//! in a scripted lookup without any network.

mod client;
mod resolver;

pub use client::QuranApiClient;
pub(crate) use resolver::collect_references;

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::report::Diagnostic;
use crate::types::{VerseDetail, VerseReference};

/// Default per-request timeout. One slow verse must not stall the run for
/// longer than this; the lookup is then classified as a transport failure.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the verse lookup API.
///
/// The token comes from the caller's configuration (environment, dotenv,
/// whatever the embedding application uses); the library never reads ambient
/// globals itself.
#[derive(Debug, Clone)]
pub struct QuranApiConfig {
    /// Base URL of the content API, e.g.
    /// `https://apis.quran.com/content/api/v4`.
    pub base_url: String,
    /// Bearer token sent in the `Authorization` header.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl QuranApiConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Failure of a single verse lookup. Never fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The API answered, but with an error status or an unusable body.
    Lookup {
        reference: VerseReference,
        status: Option<u16>,
        message: String,
    },
    /// The API could not be reached at all (connect, DNS, timeout).
    Transport {
        reference: VerseReference,
        message: String,
    },
}

impl LookupError {
    pub(crate) fn into_diagnostic(self) -> Diagnostic {
        match self {
            LookupError::Lookup {
                reference,
                status,
                message,
            } => Diagnostic::Lookup {
                reference,
                status,
                message,
            },
            LookupError::Transport { reference, message } => {
                Diagnostic::Transport { reference, message }
            }
        }
    }
}

/// A verse lookup backend.
///
/// Implemented by [`QuranApiClient`] for the real API and by scripted mocks
/// in tests.
pub trait VerseLookup {
    /// Fetch the detail for one verse. One attempt per call; retry policy is
    /// the caller's business (the pipeline never retries within a run).
    fn lookup(&self, reference: VerseReference) -> Result<VerseDetail, LookupError>;
}

/// Run every lookup sequentially and collect results keyed by reference.
///
/// Failures are isolated: a failed reference is reported and skipped, the
/// remaining references are still fetched. The returned map holds exactly
/// one detail per succeeding reference, so every exercise citing the same
/// verse resolves to the same detail.
pub(crate) fn fetch_details(
    references: &[VerseReference],
    lookup: &dyn VerseLookup,
) -> (HashMap<VerseReference, VerseDetail>, Vec<Diagnostic>) {
    let mut details = HashMap::new();
    let mut diagnostics = Vec::new();

    for &reference in references {
        debug!(%reference, "fetching verse");
        match lookup.lookup(reference) {
            Ok(detail) => {
                details.insert(reference, detail);
            }
            Err(error) => {
                let diagnostic = error.into_diagnostic();
                warn!(%reference, %diagnostic, "verse lookup failed");
                diagnostics.push(diagnostic);
            }
        }
    }

    (details, diagnostics)
}
