//! Output Renderer Module
//!
//! Strategy-pattern dispatch over the supported output renderers.

mod json;
mod latex;

use std::io::Write;

use crate::api::OutputFormat;
use crate::document::Document;
use crate::error::DarsTexError;

pub(crate) use json::JsonRenderer;
pub(crate) use latex::LatexRenderer;

/// Output renderer, one variant per [`OutputFormat`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Renderer {
    Latex,
    Json,
}

impl Renderer {
    pub(crate) fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Latex => Renderer::Latex,
            OutputFormat::Json => Renderer::Json,
        }
    }

    /// Render the document to `writer`.
    ///
    /// Output is a pure function of the document, so identical documents
    /// render to byte-identical output.
    pub(crate) fn render<W: Write>(
        &self,
        document: &Document,
        writer: &mut W,
    ) -> Result<(), DarsTexError> {
        match self {
            Renderer::Latex => LatexRenderer.render(document, writer),
            Renderer::Json => JsonRenderer.render(document, writer),
        }
    }
}
