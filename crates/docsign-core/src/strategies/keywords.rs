use shared_pdf::PdfPage;
use shared_types::{AssigneeType, BoundingBox, Candidate, FieldType, PageLayout};

use crate::config::DetectionConfig;
use crate::label::infer_role;
use crate::lexicon::{DATE_KEYWORDS, INITIALS_KEYWORDS, SIGNATURE_KEYWORDS};

use super::Strategy;

/// Per-line keyword scan for signature/date/initials labels (spec §4.6).
/// Precedence is fixed: signature, then date (skipped if the line also
/// says "signature", so a "Signature Date" header emits one candidate,
/// not two), then initials. First category to match wins for the line.
pub struct KeywordStrategy;

impl Strategy for KeywordStrategy {
    fn name(&self) -> &'static str {
        "keywords"
    }

    fn detect(&self, _page: &PdfPage, layout: &PageLayout, _config: &DetectionConfig) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for line in &layout.lines {
            let lower = line.text.to_lowercase();

            if let Some(keyword) = SIGNATURE_KEYWORDS.iter().find(|k| lower.contains(**k)) {
                candidates.push(make_candidate(
                    layout.page_number,
                    &line.bbox,
                    FieldType::Signature,
                    150.0,
                    40.0,
                    &lower,
                    keyword,
                    0.8,
                    0.9,
                ));
                continue;
            }

            if !lower.contains("signature") {
                if let Some(keyword) = DATE_KEYWORDS.iter().find(|k| lower.contains(**k)) {
                    candidates.push(make_candidate(
                        layout.page_number,
                        &line.bbox,
                        FieldType::DateSigned,
                        100.0,
                        20.0,
                        &lower,
                        keyword,
                        0.75,
                        0.85,
                    ));
                    continue;
                }
            }

            if let Some(keyword) = INITIALS_KEYWORDS.iter().find(|k| lower.contains(**k)) {
                candidates.push(make_candidate(
                    layout.page_number,
                    &line.bbox,
                    FieldType::Initials,
                    60.0,
                    30.0,
                    &lower,
                    keyword,
                    0.8,
                    0.85,
                ));
            }
        }

        candidates
    }
}

#[allow(clippy::too_many_arguments)]
fn make_candidate(
    page_number: u32,
    label_bbox: &BoundingBox,
    field_type: FieldType,
    width: f64,
    height: f64,
    lowercased_line: &str,
    keyword: &str,
    detection_confidence: f64,
    classification_confidence: f64,
) -> Candidate {
    let bbox = BoundingBox::new(
        label_bbox.x + label_bbox.width + 10.0,
        label_bbox.y,
        width,
        height,
    );
    let (role_key, role_confidence) = infer_role(lowercased_line);
    let trimmed = lowercased_line.trim().to_string();
    let kind = match field_type {
        FieldType::Signature => "Signature",
        FieldType::DateSigned => "Date",
        FieldType::Initials => "Initials",
        _ => "Keyword",
    };

    Candidate {
        page_number,
        bbox,
        field_type,
        assignee_type: AssigneeType::Role,
        detected_role_key: Some(role_key.clone()),
        detection_confidence,
        classification_confidence,
        role_confidence,
        evidence: format!("{kind} keyword '{keyword}' detected (inferred role: {role_key})"),
        label: Some(trimmed.clone()),
        nearby_text: Some(trimmed),
    }
}
