//! Detection strategies (spec §4.4–§4.7). Each strategy has the same
//! shape — `(page, layout) -> Vec<Candidate>` — modeled as a trait with
//! one method rather than a class hierarchy, per the orchestrator design
//! note: strategies don't know about each other or about dedup.

mod anchors;
mod checkboxes;
mod keywords;
mod underlines;

pub use anchors::AnchorStrategy;
pub use checkboxes::CheckboxStrategy;
pub use keywords::KeywordStrategy;
pub use underlines::UnderlineStrategy;

use shared_pdf::PdfPage;
use shared_types::{Candidate, PageLayout};

use crate::config::DetectionConfig;

pub trait Strategy {
    fn name(&self) -> &'static str;
    fn detect(&self, page: &PdfPage, layout: &PageLayout, config: &DetectionConfig) -> Vec<Candidate>;
}

/// The fixed C4 -> C5 -> C6 -> C7 order the orchestrator appends
/// candidates in; dedup's stable sort relies on this for tie-breaking.
pub fn all() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(UnderlineStrategy),
        Box::new(CheckboxStrategy),
        Box::new(KeywordStrategy),
        Box::new(AnchorStrategy),
    ]
}
