//! Fatal batch rejections.

// ── Error type ─────────────────────────────────────────────────────────────

/// Reasons a detection batch is rejected before a panel is produced.
///
/// Non-fatal outcomes (unresolved labels, anchor fallbacks) are never
/// reported here; they travel with the panel as
/// [`CorrectionEvent`](crate::CorrectionEvent)s.
#[derive(Debug, Clone, PartialEq)]
pub enum RelabelError {
    /// The batch contains no buttons.
    EmptyBatch,
    /// A button position is NaN or infinite.
    NonFiniteCoordinate {
        /// Input index of the offending button.
        index: usize,
        /// Reported x coordinate.
        x: f64,
        /// Reported y coordinate.
        y: f64,
    },
    /// The shared button footprint is not a positive finite size.
    InvalidFootprint {
        /// Reported button width.
        width: f64,
        /// Reported button height.
        height: f64,
    },
    /// A classifier score vector does not line up with the label map.
    ScoreLengthMismatch {
        /// Number of classes in the label map.
        expected: usize,
        /// Number of scores supplied.
        got: usize,
    },
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// More rows were clustered than fit into normalized panel space.
    TooManyRows {
        /// Number of row clusters found.
        found: usize,
        /// Maximum allowed by the button height.
        max: usize,
    },
    /// More columns were clustered than fit into normalized panel space.
    TooManyCols {
        /// Number of column clusters found.
        found: usize,
        /// Maximum allowed by the button width.
        max: usize,
    },
}

impl std::fmt::Display for RelabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "detection batch contains no buttons"),
            Self::NonFiniteCoordinate { index, x, y } => {
                write!(f, "button {} has a non-finite position ({}, {})", index, x, y)
            }
            Self::InvalidFootprint { width, height } => {
                write!(
                    f,
                    "button footprint must be positive and finite, got {}x{}",
                    width, height
                )
            }
            Self::ScoreLengthMismatch { expected, got } => {
                write!(
                    f,
                    "classifier scores do not match label map: expected {}, got {}",
                    expected, got
                )
            }
            Self::InvalidConfig(msg) => write!(f, "invalid relabel config: {}", msg),
            Self::TooManyRows { found, max } => {
                write!(
                    f,
                    "found {} rows but at most {} fit into the panel",
                    found, max
                )
            }
            Self::TooManyCols { found, max } => {
                write!(
                    f,
                    "found {} columns but at most {} fit into the panel",
                    found, max
                )
            }
        }
    }
}

impl std::error::Error for RelabelError {}
