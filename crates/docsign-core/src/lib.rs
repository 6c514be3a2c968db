//! Document form-field detection engine.
//!
//! Given a PDF, [`detect_fields`] returns a ranked set of candidate
//! fillable regions — each with a bounding box, a semantic field type, an
//! assignee, and three independent confidence scores. Four strategies
//! (vector underlines, checkboxes, keyword proximity, anchor tags) each
//! run independently per page; their output is deduplicated and filtered
//! by confidence before being returned.

pub mod config;
pub mod dedup;
pub mod detector;
pub mod error;
pub mod label;
pub mod lexicon;
pub mod strategies;

pub use config::DetectionConfig;
pub use detector::{detect_fields, PdfSource};
pub use error::DetectionError;

pub use shared_types::{
    AssigneeType, BoundingBox, Candidate, DetectionResult, FieldType, PageLayout,
};
