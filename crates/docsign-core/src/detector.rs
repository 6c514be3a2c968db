//! Orchestrator (spec §4.9): drive every strategy across every page, dedup,
//! filter by confidence, and time the whole call.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

use shared_pdf::{LayoutExtractor, PdfAdapter};
use shared_types::{DetectionResult, PageLayout};

use crate::config::DetectionConfig;
use crate::dedup::deduplicate;
use crate::error::DetectionError;
use crate::strategies;

/// Where the PDF bytes come from. A path is read eagerly; bytes are used
/// as given.
pub enum PdfSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// Run every detection strategy over `pdf` and return the surviving,
/// deduplicated, confidence-filtered candidates.
///
/// If `text_layout` is supplied, the caller's pre-extracted layout is
/// trusted for any page it covers; pages it doesn't cover fall back to
/// running C2 (the layout extractor) locally.
pub fn detect_fields(
    document_id: &str,
    pdf: PdfSource,
    text_layout: Option<Vec<PageLayout>>,
    config: &DetectionConfig,
) -> Result<DetectionResult, DetectionError> {
    if document_id.trim().is_empty() {
        return Err(DetectionError::InvalidInput(
            "document_id must not be empty".to_string(),
        ));
    }

    let start = Instant::now();

    let bytes = match pdf {
        PdfSource::Bytes(b) => b,
        PdfSource::Path(path) => std::fs::read(&path)?,
    };
    let adapter = PdfAdapter::open(&bytes)?;
    let strategies = strategies::all();

    let mut all_candidates = Vec::new();
    for page_number in adapter.page_numbers() {
        let page = match adapter.page(page_number) {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(page_number, %err, "page content stream failed to parse, skipping");
                continue;
            }
        };

        let layout = text_layout
            .as_ref()
            .and_then(|layouts| layouts.iter().find(|l| l.page_number == page_number).cloned())
            .unwrap_or_else(|| LayoutExtractor::extract(&page));

        for strategy in &strategies {
            // Strategies run independently and must not be able to take the
            // whole detection down with them (spec §7): a panic inside one
            // (e.g. a NaN bbox coordinate reaching `partial_cmp().unwrap()`)
            // is caught here and degrades to zero candidates for that
            // strategy on this page rather than unwinding past this loop.
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| strategy.detect(&page, &layout, config)));
            match outcome {
                Ok(found) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        page_number,
                        candidates = found.len(),
                        "strategy produced candidates"
                    );
                    all_candidates.extend(found);
                }
                Err(payload) => {
                    let err = DetectionError::StrategyInternal {
                        strategy: strategy.name(),
                        page_number,
                        message: panic_message(&payload),
                    };
                    tracing::warn!(%err, "strategy panicked, degrading to zero candidates for this page");
                }
            }
        }
    }

    let total_candidates = all_candidates.len();
    let deduped = deduplicate(all_candidates, config.dedup_overlap_threshold);

    let mut filtered: Vec<_> = deduped
        .into_iter()
        .filter(|c| c.detection_confidence >= config.detection_confidence_threshold)
        .collect();
    // Dedup's sort is global confidence-desc; regroup by ascending page
    // number for the documented output order (spec §5), stable so that
    // confidence-desc ordering survives as the tiebreak within a page.
    filtered.sort_by_key(|c| c.page_number);

    let filtered_candidates = filtered.len();
    let detection_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(DetectionResult {
        document_id: document_id.to_string(),
        detected_fields: filtered,
        detection_time_ms,
        total_candidates,
        filtered_candidates,
    })
}

/// Recover a human-readable message from a `catch_unwind` payload. Panics
/// raised via `panic!("...")` or `.unwrap()`/`.expect()` box either a
/// `&'static str` or a `String`; anything else (a custom payload type) has
/// no printable representation, so it falls back to a placeholder.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::Strategy;
    use shared_pdf::{PdfPage, TextSpan};
    use shared_types::{BoundingBox, PageLayout};

    #[test]
    fn rejects_empty_document_id() {
        let config = DetectionConfig::default();
        let err = detect_fields("", PdfSource::Bytes(vec![]), None, &config).unwrap_err();
        assert!(matches!(err, DetectionError::InvalidInput(_)));
    }

    #[test]
    fn rejects_unparsable_bytes() {
        let config = DetectionConfig::default();
        let err = detect_fields("doc-1", PdfSource::Bytes(b"not a pdf".to_vec()), None, &config)
            .unwrap_err();
        assert!(matches!(err, DetectionError::PdfOpen(_)));
    }

    #[test]
    fn panic_message_recovers_str_and_string_payloads() {
        let str_payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*str_payload), "boom");

        let string_payload: Box<dyn std::any::Any + Send> = Box::new("boom".to_string());
        assert_eq!(panic_message(&*string_payload), "boom");

        let other_payload: Box<dyn std::any::Any + Send> = Box::new(42_i32);
        assert_eq!(panic_message(&*other_payload), "non-string panic payload");
    }

    struct PanickingStrategy;

    impl Strategy for PanickingStrategy {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn detect(
            &self,
            _page: &PdfPage,
            _layout: &PageLayout,
            _config: &DetectionConfig,
        ) -> Vec<shared_types::Candidate> {
            panic!("synthetic strategy failure");
        }
    }

    #[test]
    fn a_panicking_strategy_is_caught_instead_of_unwinding() {
        let page = PdfPage {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            text_spans: vec![TextSpan {
                text: "irrelevant".to_string(),
                bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                font_size: 10.0,
                font_name: "F1".to_string(),
            }],
            drawings: vec![],
            widgets: vec![],
        };
        let layout = PageLayout {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            words: vec![],
            lines: vec![],
            blocks: vec![],
        };
        let config = DetectionConfig::default();

        let strategy: Box<dyn Strategy> = Box::new(PanickingStrategy);
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| strategy.detect(&page, &layout, &config)));

        let payload = outcome.expect_err("strategy was expected to panic");
        assert_eq!(panic_message(&*payload), "synthetic strategy failure");
    }
}
