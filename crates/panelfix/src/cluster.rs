//! Drift-tolerant row/column clustering of button positions.
//!
//! ## Algorithm
//!
//! 1. **Seed sweeps**: every button seeds one sweep over all buttons,
//!    visited along the member axis (x for rows, y for columns) so input
//!    order does not matter. A button joins the sweep when its grouping coordinate is
//!    within half a button extent of a running comparison value; the value
//!    then moves towards the new member (`drift_gain`), so slightly tilted
//!    rows and columns still chain together. The seed always joins its own
//!    sweep.
//!
//! 2. **Ordering**: each sweep's final comparison value, floored at
//!    `sort_key_scale`, is its sort key. Sweeps are stably sorted by key.
//!
//! 3. **Collapse**: sweeps with identical member sets collapse into the
//!    first occurrence.
//!
//! 4. **Partition**: a button still claimed by two clusters stays in the
//!    earlier one. Emptied clusters disappear.

use crate::button::Footprint;
use crate::config::RelabelConfig;
use crate::error::RelabelError;

/// Grouping direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Buttons sharing a y coordinate.
    Row,
    /// Buttons sharing an x coordinate.
    Col,
}

impl Axis {
    #[inline]
    fn grouping_coord(self, p: [f64; 2]) -> f64 {
        match self {
            Self::Row => p[1],
            Self::Col => p[0],
        }
    }

    #[inline]
    fn member_coord(self, p: [f64; 2]) -> f64 {
        match self {
            Self::Row => p[0],
            Self::Col => p[1],
        }
    }
}

/// Buttons believed to share one row or one column.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cluster {
    /// Button indices, ordered along the cluster (left-to-right for rows,
    /// top-to-bottom for columns).
    pub members: Vec<usize>,
    /// Floored, scaled final comparison value of the sweep that produced
    /// this cluster. Only used for ordering.
    pub sort_key: i64,
    /// Mean grouping coordinate of the members.
    pub mean: f64,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Bookkeeping for one clustering axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClusterStats {
    /// Seed sweeps run (one per button).
    pub n_sweeps: usize,
    /// Sweeps dropped because an earlier sweep had the same members.
    pub n_duplicates_collapsed: usize,
    /// Memberships removed to keep each button in a single cluster.
    pub n_overlaps_resolved: usize,
}

/// Row and column clusters of one panel.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelClusters {
    /// Rows, top to bottom.
    pub rows: Vec<Cluster>,
    /// Columns, left to right.
    pub cols: Vec<Cluster>,
    pub row_stats: ClusterStats,
    pub col_stats: ClusterStats,
}

struct Sweep {
    members: Vec<usize>,
    sort_key: i64,
}

fn sweep_from_seed(
    positions: &[[f64; 2]],
    order: &[usize],
    seed: usize,
    axis: Axis,
    half_extent: f64,
    config: &RelabelConfig,
) -> Sweep {
    let mut compare = axis.grouping_coord(positions[seed]);
    let mut members = Vec::new();
    for &j in order {
        let value = axis.grouping_coord(positions[j]);
        if j == seed || (value - compare).abs() < half_extent {
            members.push(j);
            compare += (value - compare) * config.drift_gain;
        }
    }
    members.sort_unstable();
    Sweep {
        members,
        sort_key: (compare * config.sort_key_scale).floor() as i64,
    }
}

/// Cluster button positions along one axis.
///
/// The result partitions `0..positions.len()`.
pub fn cluster_axis(
    positions: &[[f64; 2]],
    footprint: Footprint,
    axis: Axis,
    config: &RelabelConfig,
) -> (Vec<Cluster>, ClusterStats) {
    let half_extent = footprint.extent(axis) / 2.0;
    let mut stats = ClusterStats {
        n_sweeps: positions.len(),
        ..ClusterStats::default()
    };

    let by_member_coord = |&a: &usize, &b: &usize| {
        axis.member_coord(positions[a])
            .total_cmp(&axis.member_coord(positions[b]))
            .then(a.cmp(&b))
    };
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(by_member_coord);

    let mut sweeps: Vec<Sweep> = order
        .iter()
        .map(|&seed| sweep_from_seed(positions, &order, seed, axis, half_extent, config))
        .collect();
    // stable: equal keys keep seed order
    sweeps.sort_by_key(|s| s.sort_key);

    // Members are ascending by index, so vector equality is set equality.
    let mut unique: Vec<Sweep> = Vec::with_capacity(sweeps.len());
    for sweep in sweeps {
        if unique.iter().any(|u| u.members == sweep.members) {
            stats.n_duplicates_collapsed += 1;
        } else {
            unique.push(sweep);
        }
    }

    let mut owned = vec![false; positions.len()];
    let mut clusters = Vec::with_capacity(unique.len());
    for sweep in unique {
        let mut members: Vec<usize> = Vec::with_capacity(sweep.members.len());
        for i in sweep.members {
            if owned[i] {
                stats.n_overlaps_resolved += 1;
            } else {
                owned[i] = true;
                members.push(i);
            }
        }
        if members.is_empty() {
            continue;
        }
        members.sort_by(by_member_coord);
        let mean = members
            .iter()
            .map(|&i| axis.grouping_coord(positions[i]))
            .sum::<f64>()
            / members.len() as f64;
        clusters.push(Cluster {
            members,
            sort_key: sweep.sort_key,
            mean,
        });
    }

    (clusters, stats)
}

/// Cluster rows and columns and enforce the physical cluster-count bound.
pub fn cluster_panel(
    positions: &[[f64; 2]],
    footprint: Footprint,
    config: &RelabelConfig,
) -> Result<PanelClusters, RelabelError> {
    let (rows, row_stats) = cluster_axis(positions, footprint, Axis::Row, config);
    let max_rows = footprint.max_clusters(Axis::Row);
    if rows.len() > max_rows {
        return Err(RelabelError::TooManyRows {
            found: rows.len(),
            max: max_rows,
        });
    }

    let (cols, col_stats) = cluster_axis(positions, footprint, Axis::Col, config);
    let max_cols = footprint.max_clusters(Axis::Col);
    if cols.len() > max_cols {
        return Err(RelabelError::TooManyCols {
            found: cols.len(),
            max: max_cols,
        });
    }

    tracing::debug!(
        n_rows = rows.len(),
        n_cols = cols.len(),
        row_overlaps = row_stats.n_overlaps_resolved,
        col_overlaps = col_stats.n_overlaps_resolved,
        "clustered panel"
    );

    Ok(PanelClusters {
        rows,
        cols,
        row_stats,
        col_stats,
    })
}
