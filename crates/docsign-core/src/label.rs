//! Label lookup, type classification and role inference (spec §4.10–4.12).
//! Shared by every strategy that needs to turn nearby or matched text into
//! a `FieldType` and a role key.

use shared_types::{FieldType, PageLayout};

use crate::lexicon::{
    DATE_KEYWORDS, DEFAULT_ROLE_CONFIDENCE, DEFAULT_ROLE_KEY, EMAIL_KEYWORDS, INITIALS_KEYWORDS,
    NAME_KEYWORDS, ROLE_KEYWORDS, ROLE_MATCH_CONFIDENCE, SIGNATURE_KEYWORDS,
};

/// Find the nearest word above-or-left of `(x, y, width)`, by Manhattan
/// distance, within `max_distance` points. Candidates strictly below or to
/// the right of the field are never considered — a label describes what
/// comes before it.
pub fn find_nearby_label(layout: &PageLayout, x: f64, y: f64, width: f64, max_distance: f64) -> Option<String> {
    layout
        .words
        .iter()
        .filter(|w| w.bbox.y <= y && w.bbox.x <= x + width)
        .map(|w| {
            let distance = (y - w.bbox.y).abs() + (x - w.bbox.x).abs();
            (distance, w)
        })
        .filter(|(distance, _)| *distance < max_distance)
        .min_by(|(da, _), (db, _)| da.partial_cmp(db).unwrap())
        .map(|(_, w)| w.text.clone())
}

/// Classify a label's text into a `FieldType` by the fixed precedence:
/// signature, then date, then name, then email, then initials, else `Text`.
pub fn classify_label(label: &str) -> FieldType {
    let lower = label.to_lowercase();
    if SIGNATURE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        FieldType::Signature
    } else if DATE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        FieldType::DateSigned
    } else if NAME_KEYWORDS.iter().any(|k| lower.contains(k)) {
        FieldType::Name
    } else if EMAIL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        FieldType::Email
    } else if INITIALS_KEYWORDS.iter().any(|k| lower.contains(k)) {
        FieldType::Initials
    } else {
        FieldType::Text
    }
}

/// Infer a signer role from free text: the first matching `ROLE_KEYWORDS`
/// phrase wins; no match falls back to a weak `"signer"` default.
pub fn infer_role(text: &str) -> (String, f64) {
    let lower = text.to_lowercase();
    for (role_key, phrases) in ROLE_KEYWORDS {
        if phrases.iter().any(|p| lower.contains(p)) {
            return (role_key.to_string(), ROLE_MATCH_CONFIDENCE);
        }
    }
    (DEFAULT_ROLE_KEY.to_string(), DEFAULT_ROLE_CONFIDENCE)
}

/// Run the label classifier and role inference together, as C4's
/// underline path and C6's keyword path both need both results.
pub fn classify_and_infer_role(label: &str) -> (FieldType, String, f64) {
    let field_type = classify_label(label);
    let (role_key, role_confidence) = infer_role(label);
    (field_type, role_key, role_confidence)
}
