//! panelfix: pure-Rust relabeling of elevator call-button panels.
//!
//! Takes noisy button detections (normalized positions, a read label and
//! ranked classifier alternates per button) and turns them into a
//! consistently numbered panel. The pipeline stages are:
//!
//! 1. **Cluster**: drift-tolerant grouping of buttons into rows and columns.
//! 2. **Template**: pick the reading order (rows/columns, forward/backward)
//!    under which the read labels are most monotonic.
//! 3. **Sequence**: flatten the panel along that order and flag labels that
//!    do not continue their neighbors.
//! 4. **Correct**: renumber inconsistent runs between trusted anchors or
//!    resolve them from classifier alternates, keeping jump buttons.
//! 5. **Assemble**: write row, column and corrected label back per button.
//!
//! # Public API
//! - [`Relabeler`] and [`relabel_panel`] as primary entry points
//! - [`RelabelConfig`] for tuning
//! - [`DetectionBatch`] in, [`RelabeledPanel`] out
//!
//! The stage functions ([`cluster_panel`], [`select_template`],
//! [`build_sequence`], [`correct_sequence`]) are public as well, for callers
//! that want to inspect or replace a single stage.

mod api;
mod button;
mod candidates;
mod cluster;
mod config;
mod error;
mod pipeline;
mod relabel;

pub use api::{relabel_panel, Relabeler};
pub use button::{ButtonDetection, ButtonRecord, DetectionBatch, Footprint, LabelStatus};
pub use candidates::{rank_candidates, LabelMap};
pub use cluster::{cluster_axis, cluster_panel, Axis, Cluster, ClusterStats, PanelClusters};
pub use config::RelabelConfig;
pub use error::RelabelError;
pub use pipeline::{PanelSummary, RelabeledPanel};
pub use relabel::{
    build_sequence, correct_sequence, count_rank, select_template, validate_sequence,
    CandidateRank, Correction, CorrectionEvent, CorrectionStats, FlattenedSequence, ReadingOrder,
    Sequence, SequenceEntry, Template,
};
