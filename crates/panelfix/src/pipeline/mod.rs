//! High-level relabeling pipeline.
//!
//! This module is the internal "glue" layer that wires the stages together:
//! clustering -> reading-order selection -> flatten/validate -> correction ->
//! assembly.
//!
//! Algorithmic primitives live in `crate::cluster` and `crate::relabel`.
//! The pipeline layer focuses on stage boundaries, call order, and data flow.

mod assemble;
mod result;
mod run;

pub use result::{PanelSummary, RelabeledPanel};

pub(crate) use run::relabel_batch;
