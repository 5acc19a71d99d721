/// A single non-fatal correction decision.
///
/// `position` indexes the flattened sequence, `button` the record store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrectionEvent {
    /// Renumbered by linear interpolation between trusted neighbors.
    LinearRepair {
        position: usize,
        button: usize,
        from: i32,
        to: i32,
    },
    /// A classifier alternate that fits the numbering replaced the read label.
    CandidateAdopted {
        position: usize,
        button: usize,
        from: i32,
        to: i32,
        /// 0 for the classifier's most confident alternate.
        candidate_rank: usize,
    },
    /// A non-sequential label was confirmed as a jump button.
    JumpAccepted {
        position: usize,
        button: usize,
        from: i32,
        label: i32,
        candidate_rank: usize,
    },
    /// No fitting label was found; the read label is kept.
    Unresolved {
        position: usize,
        button: usize,
        label: i32,
    },
    /// No consistent position followed `position`; the sequence end stood in
    /// as anchor.
    AnchorFallback { position: usize },
}

impl CorrectionEvent {
    pub fn position(&self) -> usize {
        match *self {
            Self::LinearRepair { position, .. }
            | Self::CandidateAdopted { position, .. }
            | Self::JumpAccepted { position, .. }
            | Self::Unresolved { position, .. }
            | Self::AnchorFallback { position } => position,
        }
    }

    /// Affected button, if the event concerns a single button.
    pub fn button(&self) -> Option<usize> {
        match *self {
            Self::LinearRepair { button, .. }
            | Self::CandidateAdopted { button, .. }
            | Self::JumpAccepted { button, .. }
            | Self::Unresolved { button, .. } => Some(button),
            Self::AnchorFallback { .. } => None,
        }
    }
}

/// Event counts of one correction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CorrectionStats {
    pub n_linear_repairs: usize,
    pub n_candidates_adopted: usize,
    pub n_jumps_accepted: usize,
    pub n_unresolved: usize,
    pub n_anchor_fallbacks: usize,
}

impl CorrectionStats {
    pub fn from_events(events: &[CorrectionEvent]) -> Self {
        let mut stats = Self::default();
        for event in events {
            match event {
                CorrectionEvent::LinearRepair { .. } => stats.n_linear_repairs += 1,
                CorrectionEvent::CandidateAdopted { .. } => stats.n_candidates_adopted += 1,
                CorrectionEvent::JumpAccepted { .. } => stats.n_jumps_accepted += 1,
                CorrectionEvent::Unresolved { .. } => stats.n_unresolved += 1,
                CorrectionEvent::AnchorFallback { .. } => stats.n_anchor_fallbacks += 1,
            }
        }
        stats
    }
}
