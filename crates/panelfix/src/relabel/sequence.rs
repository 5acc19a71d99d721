use crate::cluster::PanelClusters;
use crate::config::RelabelConfig;

use super::template::{column_layout, Template};

/// One position of a flattened panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SequenceEntry {
    /// Index of the originating button record.
    pub button: usize,
    /// Raw label of that button.
    pub label: i32,
}

/// Buttons in reading order together with their local consistency flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Sequence {
    pub entries: Vec<SequenceEntry>,
    /// `consistent[i]` tells whether `entries[i].label` fits its neighbors.
    pub consistent: Vec<bool>,
}

impl Sequence {
    /// Validate `entries` and pair them with their consistency flags.
    pub fn validated(entries: Vec<SequenceEntry>) -> Self {
        let labels: Vec<i32> = entries.iter().map(|e| e.label).collect();
        let consistent = validate_sequence(&labels);
        Self {
            entries,
            consistent,
        }
    }

    /// Sequence over plain labels; position `i` refers to button `i`.
    pub fn from_labels(labels: &[i32]) -> Self {
        Self::validated(
            labels
                .iter()
                .enumerate()
                .map(|(button, &label)| SequenceEntry { button, label })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> Vec<i32> {
        self.entries.iter().map(|e| e.label).collect()
    }

    pub fn is_fully_consistent(&self) -> bool {
        self.consistent.iter().all(|&c| c)
    }
}

/// Sequence built from a template plus the buttons it left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedSequence {
    /// Buttons in reading order with their read labels.
    pub entries: Vec<SequenceEntry>,
    /// Buttons dropped by row suppression.
    pub suppressed: Vec<usize>,
}

/// Flatten all buttons following `template`.
///
/// Row-major: rows top to bottom, each row left-to-right or reversed.
/// Column-major: columns (after row suppression) left-to-right or in reverse
/// column order, each column top to bottom.
pub fn build_sequence(
    template: &Template,
    clusters: &PanelClusters,
    labels: &[i32],
    config: &RelabelConfig,
) -> FlattenedSequence {
    let (order, suppressed): (Vec<usize>, Vec<usize>) = if template.priority_row_major {
        let order = clusters
            .rows
            .iter()
            .flat_map(|row| {
                let members = row.members.iter().copied();
                let members: Vec<usize> = if template.priority_left_right {
                    members.collect()
                } else {
                    members.rev().collect()
                };
                members
            })
            .collect();
        (order, Vec::new())
    } else {
        let layout = column_layout(clusters, config);
        let mut columns = layout.columns;
        if !template.priority_left_right {
            columns.reverse();
        }
        (columns.into_iter().flatten().collect(), layout.suppressed)
    };

    tracing::debug!(
        n_entries = order.len(),
        n_suppressed = suppressed.len(),
        "flattened panel"
    );

    FlattenedSequence {
        entries: order
            .into_iter()
            .map(|button| SequenceEntry {
                button,
                label: labels[button],
            })
            .collect(),
        suppressed,
    }
}

/// Mark each position as locally consistent.
///
/// Interior positions need `seq[i] == seq[i-1] + 1` or
/// `seq[i] == seq[i+1] - 1`. The first and last position also accept a
/// match against the opposite end offset by the sequence length.
pub fn validate_sequence(seq: &[i32]) -> Vec<bool> {
    let n = seq.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![true],
        _ => {}
    }

    let s: Vec<i64> = seq.iter().map(|&v| i64::from(v)).collect();
    let len = n as i64;
    let last = n - 1;

    let mut out = Vec::with_capacity(n);
    out.push(s[0] == s[last] - len + 1 || s[0] == s[1] - 1);
    for i in 1..last {
        out.push(s[i] == s[i - 1] + 1 || s[i] == s[i + 1] - 1);
    }
    out.push(s[last] == s[last - 1] + 1 || s[last] == s[0] + len - 1);
    out
}
