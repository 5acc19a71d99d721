use crate::button::{ButtonRecord, LabelStatus};
use crate::cluster::{Cluster, ClusterStats};
use crate::relabel::{CorrectionEvent, CorrectionStats, Sequence, Template};

/// Per-panel outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PanelSummary {
    pub n_buttons: usize,
    pub n_rows: usize,
    pub n_cols: usize,
    /// Buttons whose read label was trusted as is.
    pub n_consistent: usize,
    /// Buttons renumbered from their neighbors.
    pub n_repaired: usize,
    /// Buttons that took a classifier alternate.
    pub n_candidates_adopted: usize,
    /// Buttons confirmed as jump buttons.
    pub n_jump_accepted: usize,
    pub n_unresolved: usize,
    /// Buttons left out of a column-major sequence.
    pub n_suppressed: usize,
    /// Input indices of unresolved buttons.
    pub unresolved_buttons: Vec<usize>,
    /// No button is unresolved.
    pub all_resolved: bool,
}

impl PanelSummary {
    pub(crate) fn from_records(records: &[ButtonRecord], n_rows: usize, n_cols: usize) -> Self {
        let mut summary = Self {
            n_buttons: records.len(),
            n_rows,
            n_cols,
            ..Self::default()
        };
        for (i, r) in records.iter().enumerate() {
            match r.status {
                LabelStatus::Consistent => summary.n_consistent += 1,
                LabelStatus::Repaired => summary.n_repaired += 1,
                LabelStatus::CandidateAdopted => summary.n_candidates_adopted += 1,
                LabelStatus::JumpAccepted => summary.n_jump_accepted += 1,
                LabelStatus::Suppressed => summary.n_suppressed += 1,
                LabelStatus::Unresolved => {
                    summary.n_unresolved += 1;
                    summary.unresolved_buttons.push(i);
                }
            }
        }
        summary.all_resolved = summary.n_unresolved == 0;
        summary
    }
}

/// Full relabeling result for one panel.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RelabeledPanel {
    /// Button records in input order.
    pub records: Vec<ButtonRecord>,
    /// Row clusters, top to bottom.
    pub rows: Vec<Cluster>,
    /// Column clusters, left to right.
    pub cols: Vec<Cluster>,
    pub row_stats: ClusterStats,
    pub col_stats: ClusterStats,
    /// Selected reading order with all candidate ranks.
    pub template: Template,
    /// Flattened raw labels with their consistency flags.
    pub sequence: Sequence,
    /// Labels after correction, parallel to `sequence`.
    pub corrected_labels: Vec<i32>,
    /// Buttons dropped by row suppression.
    pub suppressed: Vec<usize>,
    pub events: Vec<CorrectionEvent>,
    pub correction_stats: CorrectionStats,
    pub summary: PanelSummary,
}

impl RelabeledPanel {
    /// Every button ended with a trusted or suppressed label.
    pub fn is_fully_resolved(&self) -> bool {
        self.summary.all_resolved
    }

    /// Corrected label of the first button placed at 1-based `(row, col)`.
    pub fn label_at(&self, row: usize, col: usize) -> Option<i32> {
        self.records
            .iter()
            .find(|r| r.row == row && r.col == col)
            .map(|r| r.corrected_label)
    }

    /// Corrected labels in input order.
    pub fn labels(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.corrected_label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::ButtonDetection;

    fn record(status: LabelStatus) -> ButtonRecord {
        let mut r = ButtonRecord::from_detection(&ButtonDetection::new(0.5, 0.5, 1), 3);
        r.set_status(1, status);
        r
    }

    #[test]
    fn summary_counts_statuses() {
        let records = vec![
            record(LabelStatus::Consistent),
            record(LabelStatus::Unresolved),
            record(LabelStatus::Suppressed),
            record(LabelStatus::JumpAccepted),
            record(LabelStatus::Unresolved),
        ];
        let s = PanelSummary::from_records(&records, 2, 3);
        assert_eq!(s.n_buttons, 5);
        assert_eq!(s.n_consistent, 1);
        assert_eq!(s.n_suppressed, 1);
        assert_eq!(s.n_jump_accepted, 1);
        assert_eq!(s.unresolved_buttons, vec![1, 4]);
        assert!(!s.all_resolved);
    }

    #[test]
    fn suppressed_buttons_do_not_block_resolution() {
        let records = vec![
            record(LabelStatus::Suppressed),
            record(LabelStatus::Repaired),
        ];
        let s = PanelSummary::from_records(&records, 2, 1);
        assert!(s.all_resolved);
        assert_eq!(s.n_unresolved, 0);
    }
}
