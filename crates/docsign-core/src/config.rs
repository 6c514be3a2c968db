//! Detection thresholds, overridable by the caller.
//!
//! Mirrors the field-detection section of the Python original's
//! `Settings` (`app/core/config.py`) — the collaborator-facing settings
//! on that struct (database URL, storage backend, SMTP, signing-link
//! expiry) have no place here; they belong to whatever REST layer
//! eventually wraps this crate.

/// Tunables for the detection pipeline. `Default` gives the spec's
/// documented constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// Candidates below this `detection_confidence` are dropped by the
    /// orchestrator's final filter.
    pub detection_confidence_threshold: f64,
    /// Two line endpoints within this many points of each other in y
    /// count as the same horizontal line.
    pub line_horizontal_epsilon: f64,
    /// Vector lines shorter than this are not field candidates.
    pub min_underline_length: f64,
    /// Labels farther than this (Manhattan distance, points) from a field
    /// are not considered.
    pub max_label_distance: f64,
    pub checkbox_size_min: f64,
    pub checkbox_size_max: f64,
    pub checkbox_squareness_tolerance: f64,
    /// Overlap fraction (of either box's own area) above which two
    /// candidates on the same page are considered duplicates.
    pub dedup_overlap_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            detection_confidence_threshold: 0.5,
            line_horizontal_epsilon: 2.0,
            min_underline_length: 50.0,
            max_label_distance: 100.0,
            checkbox_size_min: 8.0,
            checkbox_size_max: 25.0,
            checkbox_squareness_tolerance: 5.0,
            dedup_overlap_threshold: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let c = DetectionConfig::default();
        assert_eq!(c.detection_confidence_threshold, 0.5);
        assert_eq!(c.line_horizontal_epsilon, 2.0);
        assert_eq!(c.min_underline_length, 50.0);
        assert_eq!(c.max_label_distance, 100.0);
        assert_eq!(c.checkbox_size_min, 8.0);
        assert_eq!(c.checkbox_size_max, 25.0);
        assert_eq!(c.checkbox_squareness_tolerance, 5.0);
    }
}
