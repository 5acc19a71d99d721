//! Top-level pipeline orchestrator: cluster → template → sequence → correct → assemble.

use super::assemble;
use super::result::{PanelSummary, RelabeledPanel};
use crate::button::{ButtonRecord, DetectionBatch};
use crate::cluster::cluster_panel;
use crate::config::RelabelConfig;
use crate::error::RelabelError;
use crate::relabel::{
    build_sequence, correct_sequence, select_template, CorrectionStats, Sequence,
};

fn reject(err: RelabelError) -> RelabelError {
    tracing::warn!("rejected detection batch: {}", err);
    err
}

/// Relabel one detection batch.
pub(crate) fn relabel_batch(
    batch: &DetectionBatch,
    config: &RelabelConfig,
) -> Result<RelabeledPanel, RelabelError> {
    config.validate().map_err(reject)?;
    batch.validate().map_err(reject)?;

    let mut records: Vec<ButtonRecord> = batch
        .buttons
        .iter()
        .map(|b| ButtonRecord::from_detection(b, config.max_candidates))
        .collect();
    let positions: Vec<[f64; 2]> = records.iter().map(|r| r.position).collect();
    let raw_labels: Vec<i32> = records.iter().map(|r| r.raw_label).collect();

    // ── 1. Cluster ───────────────────────────────────────────────────────────
    let clusters = cluster_panel(&positions, batch.footprint, config).map_err(reject)?;
    assemble::assign_positions(&mut records, &clusters);

    // ── 2. Reading order ─────────────────────────────────────────────────────
    let template = select_template(&clusters, &raw_labels, config);

    // ── 3. Flatten + validate ────────────────────────────────────────────────
    let flat = build_sequence(&template, &clusters, &raw_labels, config);
    let sequence = Sequence::validated(flat.entries);

    // ── 4. Correct ───────────────────────────────────────────────────────────
    let candidates: Vec<&[i32]> = sequence
        .entries
        .iter()
        .map(|e| records[e.button].candidates.as_slice())
        .collect();
    let correction = correct_sequence(&sequence, &candidates);

    // ── 5. Assemble ──────────────────────────────────────────────────────────
    assemble::write_back(&mut records, &sequence, &correction, &flat.suppressed);
    let summary = PanelSummary::from_records(&records, clusters.rows.len(), clusters.cols.len());
    let correction_stats = CorrectionStats::from_events(&correction.events);

    if !summary.all_resolved {
        tracing::warn!(
            n_unresolved = summary.n_unresolved,
            buttons = ?summary.unresolved_buttons,
            "panel has unresolved labels"
        );
    }
    tracing::debug!(
        n_buttons = summary.n_buttons,
        order = ?template.order(),
        n_repaired = summary.n_repaired,
        n_jump_accepted = summary.n_jump_accepted,
        n_suppressed = summary.n_suppressed,
        "relabeled panel"
    );

    Ok(RelabeledPanel {
        records,
        rows: clusters.rows,
        cols: clusters.cols,
        row_stats: clusters.row_stats,
        col_stats: clusters.col_stats,
        template,
        sequence,
        corrected_labels: correction.labels,
        suppressed: flat.suppressed,
        events: correction.events,
        correction_stats,
        summary,
    })
}
