use shared_pdf::{DrawingPrimitive, PdfPage, WidgetKind};
use shared_types::{AssigneeType, BoundingBox, Candidate, FieldType, PageLayout};

use crate::config::DetectionConfig;

use super::Strategy;

/// Unicode glyphs a checkbox is commonly rendered with (spec §4.5).
const CHECKBOX_GLYPHS: &[char] = &['☐', '☑', '☒', '□', '▢', '▣'];

/// Interactive widgets, small square vector rects, and checkbox glyphs
/// (spec §4.5). Default assignee is `ROLE` with no inferred key — a known
/// weakness carried over verbatim from the source (spec §9).
pub struct CheckboxStrategy;

impl Strategy for CheckboxStrategy {
    fn name(&self) -> &'static str {
        "checkboxes"
    }

    fn detect(&self, page: &PdfPage, layout: &PageLayout, config: &DetectionConfig) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        candidates.extend(detect_widgets(page, layout.page_number));
        candidates.extend(detect_square_rects(page, layout.page_number, config));
        candidates.extend(detect_glyphs(page, layout.page_number));
        candidates
    }
}

fn checkbox_candidate(page_number: u32, bbox: BoundingBox, detection_confidence: f64, classification_confidence: f64, evidence: String) -> Candidate {
    Candidate {
        page_number,
        bbox,
        field_type: FieldType::Checkbox,
        assignee_type: AssigneeType::Role,
        detected_role_key: None,
        detection_confidence,
        classification_confidence,
        role_confidence: 0.5,
        evidence,
        label: None,
        nearby_text: None,
    }
}

fn detect_widgets(page: &PdfPage, page_number: u32) -> Vec<Candidate> {
    page.widgets
        .iter()
        .filter(|w| w.kind == WidgetKind::Checkbox)
        .map(|w| {
            checkbox_candidate(
                page_number,
                w.bbox,
                0.95,
                0.95,
                "PDF checkbox widget detected".to_string(),
            )
        })
        .collect()
}

fn detect_square_rects(page: &PdfPage, page_number: u32, config: &DetectionConfig) -> Vec<Candidate> {
    page.drawings
        .iter()
        .filter_map(|d| match d {
            DrawingPrimitive::Rect { bbox } => Some(bbox),
            _ => None,
        })
        .filter(|bbox| {
            bbox.width >= config.checkbox_size_min
                && bbox.width <= config.checkbox_size_max
                && bbox.height >= config.checkbox_size_min
                && bbox.height <= config.checkbox_size_max
                && (bbox.width - bbox.height).abs() < config.checkbox_squareness_tolerance
        })
        .map(|bbox| {
            checkbox_candidate(
                page_number,
                *bbox,
                0.70,
                0.80,
                "Small square shape detected (potential checkbox)".to_string(),
            )
        })
        .collect()
}

fn detect_glyphs(page: &PdfPage, page_number: u32) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for &glyph in CHECKBOX_GLYPHS {
        let needle = glyph.to_string();
        for hit in page.search(&needle) {
            let bbox = BoundingBox::new(hit.x, hit.y, hit.width + 5.0, hit.height + 5.0);
            candidates.push(checkbox_candidate(
                page_number,
                bbox,
                0.90,
                0.95,
                format!("Checkbox character '{glyph}' detected"),
            ));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_pdf::{TextSpan, Widget};

    #[test]
    fn widget_checkbox_yields_high_confidence() {
        let page = PdfPage {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            text_spans: vec![],
            drawings: vec![],
            widgets: vec![Widget { kind: WidgetKind::Checkbox, bbox: BoundingBox::new(10.0, 10.0, 12.0, 12.0) }],
        };
        let found = detect_widgets(&page, 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].detection_confidence, 0.95);
    }

    #[test]
    fn square_rect_within_tolerance_is_kept() {
        let page = PdfPage {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            text_spans: vec![],
            drawings: vec![DrawingPrimitive::Rect { bbox: BoundingBox::new(0.0, 0.0, 12.0, 12.0) }],
            widgets: vec![],
        };
        let config = DetectionConfig::default();
        let found = detect_square_rects(&page, 1, &config);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn non_square_rect_is_discarded() {
        let page = PdfPage {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            text_spans: vec![],
            drawings: vec![DrawingPrimitive::Rect { bbox: BoundingBox::new(0.0, 0.0, 12.0, 60.0) }],
            widgets: vec![],
        };
        let config = DetectionConfig::default();
        assert!(detect_square_rects(&page, 1, &config).is_empty());
    }

    #[test]
    fn glyph_bbox_gets_padding() {
        let page = PdfPage {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            text_spans: vec![TextSpan {
                text: "☐ I agree".to_string(),
                bbox: BoundingBox::new(0.0, 700.0, 50.0, 10.0),
                font_size: 10.0,
                font_name: "F1".to_string(),
            }],
            drawings: vec![],
            widgets: vec![],
        };
        let found = detect_glyphs(&page, 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bbox.width, 55.0);
        assert_eq!(found[0].detection_confidence, 0.9);
    }
}
