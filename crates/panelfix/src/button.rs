//! Button detections coming in and button records going out.

use crate::candidates::{rank_candidates, LabelMap};
use crate::cluster::Axis;
use crate::error::RelabelError;

/// Physical button size shared by every button on one panel, in the same
/// normalized units as the button positions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Button extent along the coordinate that groups `axis` clusters
    /// (height for rows, width for columns).
    pub(crate) fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Row => self.height,
            Axis::Col => self.width,
        }
    }

    /// Number of clusters along `axis` that physically fit into `[0, 1]`.
    pub(crate) fn max_clusters(&self, axis: Axis) -> usize {
        // epsilon absorbs 1/0.2 style rounding just below an integer
        (1.0 / self.extent(axis) + 1e-9).floor() as usize
    }

    fn validate(&self) -> Result<(), RelabelError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(RelabelError::InvalidFootprint {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// One detected button as reported by the upstream detector/classifier.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ButtonDetection {
    /// Normalized x coordinate of the button center.
    pub x: f64,
    /// Normalized y coordinate of the button center (grows downwards).
    pub y: f64,
    /// Label read by the classifier.
    pub label: i32,
    /// Alternate label hypotheses, most confident first.
    #[serde(default)]
    pub candidates: Vec<i32>,
}

impl ButtonDetection {
    pub fn new(x: f64, y: f64, label: i32) -> Self {
        Self {
            x,
            y,
            label,
            candidates: Vec::new(),
        }
    }

    pub fn with_candidates(mut self, candidates: impl Into<Vec<i32>>) -> Self {
        self.candidates = candidates.into();
        self
    }

    /// Build a detection from raw per-class classifier scores.
    ///
    /// The raw label is the best-scoring class; the `k` best classes become
    /// the candidate list.
    pub fn from_scores(
        x: f64,
        y: f64,
        scores: &[f32],
        label_map: &LabelMap,
        k: usize,
    ) -> Result<Self, RelabelError> {
        let candidates = rank_candidates(scores, label_map, k.max(1))?;
        let label = candidates
            .first()
            .copied()
            .ok_or(RelabelError::ScoreLengthMismatch {
                expected: label_map.len(),
                got: scores.len(),
            })?;
        Ok(Self {
            x,
            y,
            label,
            candidates,
        })
    }
}

/// Everything the relabeler consumes for one panel snapshot.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectionBatch {
    pub footprint: Footprint,
    pub buttons: Vec<ButtonDetection>,
}

impl DetectionBatch {
    pub fn new(footprint: Footprint, buttons: Vec<ButtonDetection>) -> Self {
        Self { footprint, buttons }
    }

    /// Parse a batch from JSON.
    pub fn from_json_str(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Reject malformed batches before any clustering happens.
    pub(crate) fn validate(&self) -> Result<(), RelabelError> {
        if self.buttons.is_empty() {
            return Err(RelabelError::EmptyBatch);
        }
        self.footprint.validate()?;
        for (index, b) in self.buttons.iter().enumerate() {
            if !b.x.is_finite() || !b.y.is_finite() {
                return Err(RelabelError::NonFiniteCoordinate {
                    index,
                    x: b.x,
                    y: b.y,
                });
            }
        }
        Ok(())
    }
}

/// How the final label of a button came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    /// Read label fits its neighbors and was kept.
    Consistent,
    /// Renumbered by linear interpolation between trusted neighbors.
    Repaired,
    /// Replaced by a classifier alternate that fits the numbering.
    CandidateAdopted,
    /// Confirmed as a legitimate non-sequential (jump) label.
    JumpAccepted,
    /// No consistent label was found; the read label is kept.
    Unresolved,
    /// Left out of a column-major sequence by row suppression.
    Suppressed,
}

impl LabelStatus {
    /// Whether the final label is trusted.
    pub fn is_valid(self) -> bool {
        matches!(
            self,
            Self::Consistent | Self::Repaired | Self::CandidateAdopted | Self::JumpAccepted
        )
    }
}

/// A detected button together with its derived panel placement.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ButtonRecord {
    /// Normalized `[x, y]` position.
    pub position: [f64; 2],
    pub raw_label: i32,
    pub candidates: Vec<i32>,
    /// 1-based row index, top row first.
    pub row: usize,
    /// 1-based column index, left column first.
    pub col: usize,
    pub corrected_label: i32,
    pub is_valid: bool,
    pub status: LabelStatus,
}

impl ButtonRecord {
    pub(crate) fn from_detection(detection: &ButtonDetection, max_candidates: usize) -> Self {
        let mut candidates = detection.candidates.clone();
        candidates.truncate(max_candidates);
        Self {
            position: [detection.x, detection.y],
            raw_label: detection.label,
            candidates,
            row: 0,
            col: 0,
            corrected_label: detection.label,
            is_valid: false,
            status: LabelStatus::Unresolved,
        }
    }

    pub(crate) fn set_status(&mut self, label: i32, status: LabelStatus) {
        self.corrected_label = label;
        self.status = status;
        self.is_valid = status.is_valid();
    }
}
