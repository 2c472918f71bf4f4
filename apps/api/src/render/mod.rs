// Resume re-typesetting: normalize → classify → lay out → write PDF.
// Rendering is CPU-bound; handlers run it inside tokio::task::spawn_blocking.
// Every call builds its own writer and cursor; nothing is shared between renders.

pub mod classify;
pub mod filename;
pub mod font_metrics;
pub mod handlers;
pub mod layout;
pub mod normalize;
pub mod writer;

use thiserror::Error;
use tracing::debug;

use crate::models::formatting::FormattingProfile;

pub use filename::{download_filename, OutputFormat};
pub use layout::layout_document;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders optimized resume text to PDF bytes.
pub fn render_pdf(text: &str, profile: &FormattingProfile) -> Result<Vec<u8>, RenderError> {
    let writer = layout_document(text, profile);
    let bytes = writer.finish()?;
    debug!(
        pages = writer.page_count(),
        bytes = bytes.len(),
        "Rendered resume PDF"
    );
    Ok(bytes)
}

/// Plain-text download: the same text with bullets normalized.
pub fn render_text(text: &str) -> String {
    normalize::normalize_bullets(text)
}
