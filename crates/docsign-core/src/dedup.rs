//! Cross-strategy deduplication (spec §4.8): collapse overlapping
//! candidates, keeping the highest-confidence winner.

use shared_types::Candidate;

/// Stable-sort by `detection_confidence` descending, then greedily keep a
/// candidate iff it doesn't significantly overlap an already-kept
/// candidate on the same page. Pure function: no mutation of the input.
pub fn deduplicate(candidates: Vec<Candidate>, overlap_threshold: f64) -> Vec<Candidate> {
    let mut sorted = candidates;
    sorted.sort_by(|a, b| b.detection_confidence.partial_cmp(&a.detection_confidence).unwrap());

    let mut kept: Vec<Candidate> = Vec::with_capacity(sorted.len());
    'candidates: for candidate in sorted {
        for existing in &kept {
            if existing.page_number == candidate.page_number
                && existing.bbox.overlaps_significantly(&candidate.bbox, overlap_threshold)
            {
                continue 'candidates;
            }
        }
        kept.push(candidate);
    }
    kept
}
