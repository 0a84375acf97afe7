//! Band classification of normalized scores.

use crate::model::Band;

/// Select the first band, in authoring order, whose inclusive range contains
/// `normalized`.
///
/// Overlaps resolve to the earlier band; gaps and out-of-range values yield
/// `None`. The value is not clamped.
pub fn classify(normalized: f64, bands: &[Band]) -> Option<&Band> {
    bands.iter().find(|band| band.contains(normalized))
}
