//! Ranked label hypotheses from raw classifier scores.
//!
//! The upstream digit classifier emits one score per class. The relabeler
//! only needs the few most likely floor labels per button, most confident
//! first; this module performs that reduction.

use std::cmp::Ordering;

use crate::error::RelabelError;

/// Mapping from classifier class index to floor label.
///
/// Sentinel labels (ground, basement, parking, ...) are ordinary signed
/// integers here; the relabeler treats any label that breaks numeric order
/// as a potential jump button.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: Vec<i32>,
}

impl LabelMap {
    pub fn new(labels: Vec<i32>) -> Self {
        Self { labels }
    }

    /// Number of classifier classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Floor label of class `class`.
    pub fn label(&self, class: usize) -> Option<i32> {
        self.labels.get(class).copied()
    }
}

/// Return the labels of the `k` best-scoring classes, best first.
///
/// Ties keep the lower class index first; non-finite scores rank below every
/// finite one.
pub fn rank_candidates(
    scores: &[f32],
    label_map: &LabelMap,
    k: usize,
) -> Result<Vec<i32>, RelabelError> {
    if scores.is_empty() || scores.len() != label_map.len() {
        return Err(RelabelError::ScoreLengthMismatch {
            expected: label_map.len(),
            got: scores.len(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (scores[a], scores[b]);
        let by_score = match (sa.is_finite(), sb.is_finite()) {
            (true, true) => sb.partial_cmp(&sa).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        };
        by_score.then(a.cmp(&b))
    });

    Ok(order
        .into_iter()
        .take(k)
        .filter_map(|class| label_map.label(class))
        .collect())
}
