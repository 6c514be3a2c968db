use once_cell::sync::Lazy;
use regex::Regex;
use shared_pdf::PdfPage;
use shared_types::{AssigneeType, BoundingBox, Candidate, FieldType, PageLayout};

use crate::config::DetectionConfig;
use crate::lexicon::anchor_type_from_code;

use super::Strategy;

static NEW_ROLE_ANCHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\w+)\|role:(\w+)\]").unwrap());
static LEGACY_ANCHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\w+)\|(\w+)\]").unwrap());
static SENDER_VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

const ANCHOR_CONFIDENCE: f64 = 0.95;

/// Inline authoring tags: the new `[type|role:key]` form, the legacy
/// `[type|signerN]`/`[type|sender]` form, and `{{var}}` sender variables
/// (spec §4.7). All three patterns run over the page's full rendered
/// text; position comes from `page.search` on the exact matched text.
pub struct AnchorStrategy;

impl Strategy for AnchorStrategy {
    fn name(&self) -> &'static str {
        "anchors"
    }

    fn detect(&self, page: &PdfPage, layout: &PageLayout, _config: &DetectionConfig) -> Vec<Candidate> {
        let full_text: String = page.text_spans.iter().map(|s| s.text.as_str()).collect();
        let mut candidates = Vec::new();

        for caps in NEW_ROLE_ANCHOR.captures_iter(&full_text) {
            let matched = caps.get(0).unwrap().as_str();
            let field_code = caps[1].to_lowercase();
            let role_key = caps[2].to_lowercase();
            let Some(bbox) = first_hit(page, matched) else {
                continue;
            };
            let field_type = anchor_type_from_code(&field_code);
            let bbox = sized(bbox, field_type);

            candidates.push(Candidate {
                page_number: layout.page_number,
                bbox,
                field_type,
                assignee_type: AssigneeType::Role,
                detected_role_key: Some(role_key.clone()),
                detection_confidence: ANCHOR_CONFIDENCE,
                classification_confidence: ANCHOR_CONFIDENCE,
                role_confidence: ANCHOR_CONFIDENCE,
                evidence: format!("Anchor tag '{matched}' detected (role: {role_key})"),
                label: Some(matched.to_string()),
                nearby_text: None,
            });
        }

        for caps in LEGACY_ANCHOR.captures_iter(&full_text) {
            let matched = caps.get(0).unwrap().as_str();
            if matched.to_lowercase().contains("role:") {
                continue;
            }
            let field_code = caps[1].to_lowercase();
            let role_code = caps[2].to_lowercase();
            let Some(bbox) = first_hit(page, matched) else {
                continue;
            };
            let field_type = anchor_type_from_code(&field_code);
            let bbox = sized(bbox, field_type);
            let (role_key, assignee_type) = legacy_role(&role_code);

            candidates.push(Candidate {
                page_number: layout.page_number,
                bbox,
                field_type,
                assignee_type,
                detected_role_key: role_key,
                detection_confidence: ANCHOR_CONFIDENCE,
                classification_confidence: ANCHOR_CONFIDENCE,
                role_confidence: ANCHOR_CONFIDENCE,
                evidence: format!("Anchor tag '{matched}' detected"),
                label: Some(matched.to_string()),
                nearby_text: None,
            });
        }

        for caps in SENDER_VARIABLE.captures_iter(&full_text) {
            let matched = caps.get(0).unwrap().as_str();
            let var_name = caps[1].to_string();
            let Some(bbox) = first_hit(page, matched) else {
                continue;
            };
            let bbox = BoundingBox::new(bbox.x, bbox.y, 100.0, 20.0);

            candidates.push(Candidate {
                page_number: layout.page_number,
                bbox,
                field_type: FieldType::Text,
                assignee_type: AssigneeType::Sender,
                detected_role_key: None,
                detection_confidence: ANCHOR_CONFIDENCE,
                classification_confidence: 0.9,
                role_confidence: ANCHOR_CONFIDENCE,
                evidence: format!("Sender variable tag '{{{{{var_name}}}}}' detected"),
                label: Some(var_name),
                nearby_text: None,
            });
        }

        candidates
    }
}

fn first_hit(page: &PdfPage, needle: &str) -> Option<BoundingBox> {
    page.search(needle).into_iter().next()
}

/// Width depends on field type; height on whether it's a signature-like
/// field (spec §4.7).
fn sized(bbox: BoundingBox, field_type: FieldType) -> BoundingBox {
    let width = match field_type {
        FieldType::Signature => 150.0,
        FieldType::Name => 100.0,
        _ => 80.0,
    };
    let height = match field_type {
        FieldType::Signature | FieldType::Initials => 40.0,
        _ => 20.0,
    };
    BoundingBox::new(bbox.x, bbox.y, width, height)
}

fn legacy_role(role_code: &str) -> (Option<String>, AssigneeType) {
    match role_code {
        "signer1" | "signer_1" | "s1" => (Some("signer_1".to_string()), AssigneeType::Role),
        "signer2" | "signer_2" | "s2" => (Some("signer_2".to_string()), AssigneeType::Role),
        "sender" => (None, AssigneeType::Sender),
        _ => (Some("signer_1".to_string()), AssigneeType::Role),
    }
}
