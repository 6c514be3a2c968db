use regex::Regex;
use once_cell::sync::Lazy;
use shared_pdf::{DrawingPrimitive, PdfPage};
use shared_types::{AssigneeType, BoundingBox, Candidate, PageLayout};

use crate::config::DetectionConfig;
use crate::label::{classify_and_infer_role, find_nearby_label};
use crate::lexicon::DEFAULT_CONFIDENCE;

use super::Strategy;

static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{3,}").unwrap());

/// Vector underlines and underscore blanks (spec §4.4).
pub struct UnderlineStrategy;

impl Strategy for UnderlineStrategy {
    fn name(&self) -> &'static str {
        "underlines"
    }

    fn detect(&self, page: &PdfPage, layout: &PageLayout, config: &DetectionConfig) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        candidates.extend(detect_vector_underlines(page, layout, config));
        candidates.extend(detect_underscore_blanks(layout));
        candidates
    }
}

fn detect_vector_underlines(page: &PdfPage, layout: &PageLayout, config: &DetectionConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for drawing in &page.drawings {
        let DrawingPrimitive::Line { start, end } = drawing else {
            continue;
        };
        if (start.y - end.y).abs() >= config.line_horizontal_epsilon {
            continue;
        }
        let length = (end.x - start.x).abs();
        if length <= config.min_underline_length {
            continue;
        }

        let line_y = start.y;
        let min_x = start.x.min(end.x);
        let bbox = BoundingBox::new(min_x, line_y - 15.0, length, 20.0);

        let label = find_nearby_label(layout, min_x, line_y, length, config.max_label_distance);
        let (field_type, role_key, role_confidence) =
            classify_and_infer_role(label.as_deref().unwrap_or(""));

        let detection_confidence = if label.is_some() { 0.7 } else { DEFAULT_CONFIDENCE };
        let classification_confidence = if label.is_some() { 0.6 } else { 0.4 };

        let evidence = match &label {
            Some(text) => format!("Underline detected with nearby text: '{text}'"),
            None => "Underline detected (no label)".to_string(),
        };

        candidates.push(Candidate {
            page_number: layout.page_number,
            bbox,
            field_type,
            assignee_type: AssigneeType::Role,
            detected_role_key: Some(role_key),
            detection_confidence,
            classification_confidence,
            role_confidence,
            evidence,
            label: label.clone(),
            nearby_text: label,
        });
    }

    candidates
}

fn detect_underscore_blanks(layout: &PageLayout) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for line in &layout.lines {
        let Some(m) = UNDERSCORE_RUN.find(&line.text) else {
            continue;
        };
        let label_text = line.text[..m.start()].trim().to_string();
        let (field_type, role_key, role_confidence) = classify_and_infer_role(&label_text);

        let classification_confidence = if label_text.is_empty() { 0.5 } else { 0.7 };
        let evidence = if label_text.is_empty() {
            "Underscore blank detected".to_string()
        } else {
            format!("Underscore blank with label: '{label_text}'")
        };
        let label = if label_text.is_empty() { None } else { Some(label_text) };

        candidates.push(Candidate {
            page_number: layout.page_number,
            bbox: line.bbox,
            field_type,
            assignee_type: AssigneeType::Role,
            detected_role_key: Some(role_key),
            detection_confidence: 0.8,
            classification_confidence,
            role_confidence,
            evidence,
            label: label.clone(),
            nearby_text: label,
        });
    }

    candidates
}
