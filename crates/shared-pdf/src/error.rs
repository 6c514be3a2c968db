use thiserror::Error;

/// Failures surfaced by the PDF adapter.
///
/// Anything that happens while walking a single page's content stream is
/// *not* represented here: malformed page content degrades to an empty
/// result for that page rather than failing the whole document (see
/// `PdfAdapter::page`).
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to open PDF: {0}")]
    Open(#[from] lopdf::Error),

    #[error("page {0} does not exist")]
    PageNotFound(u32),
}
