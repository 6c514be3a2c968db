//! Data model shared between `shared-pdf` and `docsign-core`.

pub mod types;

pub use types::{
    AssigneeType, Block, BoundingBox, Candidate, DetectionResult, FieldType, Line, PageLayout,
    Word,
};
