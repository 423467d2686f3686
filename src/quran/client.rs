//! Verse API Client
//!
//! Thin blocking client for the Quran.com content API. One GET per verse,
//! bearer-token authentication, strict single-attempt policy: failures are
//! classified and handed back, never retried here.

use serde::Deserialize;
use tracing::debug;

use crate::api::Translation;
use crate::error::DarsTexError;
use crate::quran::{LookupError, QuranApiConfig, VerseLookup};
use crate::types::{VerseDetail, VerseReference};

/// Resource id of the Latin-script transliteration pseudo-translation.
const TRANSLITERATION_RESOURCE_ID: u32 = 57;

/// Client for `GET {base}/verses/by_key/{sura}:{verse}`.
pub struct QuranApiClient {
    agent: ureq::Agent,
    config: QuranApiConfig,
    translations: Vec<Translation>,
}

impl QuranApiClient {
    /// Build a client for the given endpoint and translation request set.
    ///
    /// Fails with [`DarsTexError::Config`] when the base URL or token is
    /// blank; this is checked here so a misconfiguration surfaces before the
    /// first network call.
    pub fn new(
        config: QuranApiConfig,
        translations: Vec<Translation>,
    ) -> Result<Self, DarsTexError> {
        if config.base_url.trim().is_empty() {
            return Err(DarsTexError::Config(
                "enrichment enabled: no API base URL configured".to_string(),
            ));
        }
        if config.token.trim().is_empty() {
            return Err(DarsTexError::Config(
                "enrichment enabled: no API token found".to_string(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .build();

        Ok(Self {
            agent,
            config,
            translations,
        })
    }

    /// Request URL for one verse, with fields and translation ids fixed by
    /// the client configuration.
    fn request_url(&self, reference: VerseReference) -> String {
        let mut ids: Vec<String> = self
            .translations
            .iter()
            .map(|t| t.resource_id().to_string())
            .collect();
        ids.push(TRANSLITERATION_RESOURCE_ID.to_string());

        format!(
            "{}/verses/by_key/{}:{}?fields=text_uthmani&translations={}",
            self.config.base_url.trim_end_matches('/'),
            reference.sura,
            reference.verse,
            ids.join(","),
        )
    }

    /// Shape a raw API body into a [`VerseDetail`].
    ///
    /// Translations are emitted in the configured request order regardless
    /// of the order the API returned them in, which keeps the rendered
    /// output stable.
    fn parse_detail(
        &self,
        reference: VerseReference,
        body: VerseResponse,
    ) -> Result<VerseDetail, LookupError> {
        let arabic_text = body.verse.text_uthmani.ok_or_else(|| LookupError::Lookup {
            reference,
            status: None,
            message: "response missing text_uthmani".to_string(),
        })?;

        let transliteration = body
            .verse
            .translations
            .iter()
            .find(|t| t.resource_id == TRANSLITERATION_RESOURCE_ID)
            .map(|t| t.text.clone())
            .unwrap_or_default();

        let mut translations = Vec::new();
        for &requested in &self.translations {
            if let Some(found) = body
                .verse
                .translations
                .iter()
                .find(|t| Translation::from_resource_id(t.resource_id) == Some(requested))
            {
                translations.push((requested, found.text.clone()));
            }
        }

        Ok(VerseDetail {
            arabic_text,
            transliteration,
            translations,
        })
    }
}

impl VerseLookup for QuranApiClient {
    fn lookup(&self, reference: VerseReference) -> Result<VerseDetail, LookupError> {
        let url = self.request_url(reference);
        debug!(%reference, %url, "verse lookup");

        let response = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .set("Authorization", &format!("Bearer {}", self.config.token))
            .call();

        match response {
            Ok(response) => {
                let status = response.status();
                let body: VerseResponse =
                    response.into_json().map_err(|e| LookupError::Lookup {
                        reference,
                        status: Some(status),
                        message: format!("malformed response body: {}", e),
                    })?;
                self.parse_detail(reference, body)
            }
            Err(ureq::Error::Status(code, response)) => Err(LookupError::Lookup {
                reference,
                status: Some(code),
                message: response.status_text().to_string(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(LookupError::Transport {
                reference,
                message: transport.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerseResponse {
    verse: VerseBody,
}

#[derive(Debug, Deserialize)]
struct VerseBody {
    text_uthmani: Option<String>,
    #[serde(default)]
    translations: Vec<TranslationBody>,
}

#[derive(Debug, Deserialize)]
struct TranslationBody {
    resource_id: u32,
    #[serde(default)]
    text: String,
}
