use thiserror::Error;

/// Failures `detect_fields` can surface. Every other failure mode (a
/// malformed page, a strategy that finds nothing) degrades silently to
/// "no candidates" rather than reaching here — see spec §4.13.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("failed to open PDF: {0}")]
    PdfOpen(#[from] shared_pdf::PdfError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read PDF file: {0}")]
    Io(#[from] std::io::Error),

    /// A strategy panicked while processing a page (spec §7). Never
    /// returned from `detect_fields` — the orchestrator catches the panic,
    /// logs this as evidence, and treats the strategy as having produced
    /// zero candidates for that page instead of failing the whole call.
    #[error("strategy '{strategy}' panicked on page {page_number}: {message}")]
    StrategyInternal {
        strategy: &'static str,
        page_number: u32,
        message: String,
    },
}
