//! Core data model shared between the PDF layer and the field detector.
//!
//! These are plain value types: no I/O, no PDF-library dependency. Every
//! field on every type here is part of the JSON contract consumed by the
//! rest of the e-signature stack, so field names and enum reprs are fixed.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in PDF user-space points, bottom-left origin, y-up
/// (the convention `lopdf` and the rest of this workspace already use).
///
/// Invariant: `width >= 0.0 && height >= 0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Area of overlap between two boxes, 0.0 if they don't intersect.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let ix = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let iy = (self.y + self.height).min(other.y + other.height) - self.y.max(other.y);
        ix.max(0.0) * iy.max(0.0)
    }

    /// True if the intersection covers more than `threshold` of either box's
    /// own area. Zero-area boxes never overlap significantly.
    pub fn overlaps_significantly(&self, other: &BoundingBox, threshold: f64) -> bool {
        let a = self.area();
        let b = other.area();
        if a == 0.0 || b == 0.0 {
            return false;
        }
        let inter = self.intersection_area(other);
        inter / a > threshold || inter / b > threshold
    }
}

/// The closed set of semantic field types the detector can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    Name,
    Email,
    DateSigned,
    Checkbox,
    Signature,
    Initials,
}

/// Who is responsible for filling a detected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssigneeType {
    /// Filled by the document originator before the envelope is dispatched.
    Sender,
    /// Filled by a named downstream signer identified by `detected_role_key`.
    Role,
}

/// One proposed fillable region, surviving dedup and confidence filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub page_number: u32,
    pub bbox: BoundingBox,
    pub field_type: FieldType,

    pub assignee_type: AssigneeType,
    /// Lowercase stable identifier, e.g. "client", "landlord", "signer_1".
    /// Always `None` when `assignee_type == AssigneeType::Sender`.
    pub detected_role_key: Option<String>,

    pub detection_confidence: f64,
    pub classification_confidence: f64,
    pub role_confidence: f64,

    pub evidence: String,
    pub label: Option<String>,
    pub nearby_text: Option<String>,
}

/// Output of a single `detect_fields` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub document_id: String,
    pub detected_fields: Vec<Candidate>,
    pub detection_time_ms: f64,
    pub total_candidates: usize,
    pub filtered_candidates: usize,
}

/// A single word: the text of one non-empty text-showing span plus its bbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: BoundingBox,
    pub font_size: f64,
    pub font_name: String,
}

/// A line: concatenated span text plus the line's overall bbox and the
/// words that make it up. Whitespace is preserved verbatim so anchor-tag
/// regexes can match across what would otherwise be normalized runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub bbox: BoundingBox,
    pub words: Vec<Word>,
}

/// A block: one or more lines that the PDF's layout grouped together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub bbox: BoundingBox,
    pub lines: Vec<Line>,
}

/// Normalized per-page layout produced once by the layout extractor and
/// consumed by every detection strategy that needs text positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    pub words: Vec<Word>,
    pub lines: Vec<Line>,
    pub blocks: Vec<Block>,
}
