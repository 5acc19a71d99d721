//! High-level relabeling API.
//!
//! [`Relabeler`] is the primary entry point. It wraps a [`RelabelConfig`]
//! and runs the full pipeline on one [`DetectionBatch`] per call.

use std::path::Path;

use crate::button::DetectionBatch;
use crate::config::RelabelConfig;
use crate::error::RelabelError;
use crate::pipeline::{self, RelabeledPanel};

/// Primary relabeling interface.
///
/// Holds no per-panel state: create once, relabel many panels.
///
/// # Examples
///
/// ```
/// use panelfix::{ButtonDetection, DetectionBatch, Footprint, Relabeler};
///
/// let buttons = (0..3)
///     .map(|i| ButtonDetection::new(0.2 + 0.3 * i as f64, 0.5, i + 1))
///     .collect();
/// let batch = DetectionBatch::new(Footprint::new(0.2, 0.2), buttons);
/// let panel = Relabeler::default().relabel(&batch).unwrap();
/// assert_eq!(panel.labels(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Relabeler {
    config: RelabelConfig,
}

impl Relabeler {
    /// Create a relabeler with explicit configuration.
    pub fn new(config: RelabelConfig) -> Self {
        Self { config }
    }

    /// Load configuration JSON and create a relabeler in one step.
    pub fn from_config_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(RelabelConfig::from_json_file(path)?))
    }

    /// Access the current configuration.
    pub fn config(&self) -> &RelabelConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut RelabelConfig {
        &mut self.config
    }

    /// Relabel one panel.
    pub fn relabel(&self, batch: &DetectionBatch) -> Result<RelabeledPanel, RelabelError> {
        pipeline::relabel_batch(batch, &self.config)
    }
}

/// Relabel one panel with an explicit configuration.
pub fn relabel_panel(
    batch: &DetectionBatch,
    config: &RelabelConfig,
) -> Result<RelabeledPanel, RelabelError> {
    pipeline::relabel_batch(batch, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{ButtonDetection, Footprint};

    fn row_batch(labels: &[i32]) -> DetectionBatch {
        let buttons = labels
            .iter()
            .enumerate()
            .map(|(i, &l)| ButtonDetection::new(0.1 + 0.2 * i as f64, 0.5, l))
            .collect();
        DetectionBatch::new(Footprint::new(0.15, 0.2), buttons)
    }

    #[test]
    fn relabeler_basic_relabel() {
        let panel = Relabeler::default().relabel(&row_batch(&[1, 2, 3, 4])).unwrap();
        assert_eq!(panel.labels(), vec![1, 2, 3, 4]);
        assert!(panel.is_fully_resolved());
        assert!(panel.events.is_empty());
    }

    #[test]
    fn relabeler_config_mut() {
        let mut r = Relabeler::default();
        r.config_mut().suppress_partial_first_row = false;
        assert!(!r.config().suppress_partial_first_row);
    }

    #[test]
    fn invalid_config_rejects_batch() {
        let mut r = Relabeler::default();
        r.config_mut().drift_gain = 0.0;
        let err = r.relabel(&row_batch(&[1, 2])).unwrap_err();
        assert!(matches!(err, RelabelError::InvalidConfig(_)));
    }

    #[test]
    fn free_function_matches_facade() {
        let batch = row_batch(&[1, 2, 4, 4]);
        let cfg = RelabelConfig::default();
        let a = relabel_panel(&batch, &cfg).unwrap();
        let b = Relabeler::new(cfg).relabel(&batch).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn relabeler_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Relabeler>();
    }
}
