//! Write panel placement and corrected labels back onto button records.

use crate::button::{ButtonRecord, LabelStatus};
use crate::cluster::PanelClusters;
use crate::relabel::{Correction, Sequence};

/// Set the 1-based row and column of every clustered button.
pub(super) fn assign_positions(records: &mut [ButtonRecord], clusters: &PanelClusters) {
    for (r, row) in clusters.rows.iter().enumerate() {
        for &b in &row.members {
            records[b].row = r + 1;
        }
    }
    for (c, col) in clusters.cols.iter().enumerate() {
        for &b in &col.members {
            records[b].col = c + 1;
        }
    }
}

/// Copy corrected labels and statuses through the sequence index mapping.
///
/// Suppressed buttons keep their raw label.
pub(super) fn write_back(
    records: &mut [ButtonRecord],
    sequence: &Sequence,
    correction: &Correction,
    suppressed: &[usize],
) {
    for (pos, entry) in sequence.entries.iter().enumerate() {
        records[entry.button].set_status(correction.labels[pos], correction.status[pos]);
    }
    for &b in suppressed {
        let raw = records[b].raw_label;
        records[b].set_status(raw, LabelStatus::Suppressed);
    }
}
