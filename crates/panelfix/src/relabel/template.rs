use crate::cluster::{Cluster, PanelClusters};
use crate::config::RelabelConfig;

/// Candidate reading order of a panel, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrder {
    RowsForward,
    RowsBackward,
    ColumnsForward,
    ColumnsBackward,
}

impl ReadingOrder {
    /// All candidates; earlier entries win rank ties.
    pub const ALL: [ReadingOrder; 4] = [
        Self::RowsForward,
        Self::RowsBackward,
        Self::ColumnsForward,
        Self::ColumnsBackward,
    ];

    pub fn is_row_major(self) -> bool {
        matches!(self, Self::RowsForward | Self::RowsBackward)
    }

    pub fn is_forward(self) -> bool {
        matches!(self, Self::RowsForward | Self::ColumnsForward)
    }

    pub fn from_priorities(left_right: bool, row_major: bool) -> Self {
        match (row_major, left_right) {
            (true, true) => Self::RowsForward,
            (true, false) => Self::RowsBackward,
            (false, true) => Self::ColumnsForward,
            (false, false) => Self::ColumnsBackward,
        }
    }
}

/// Score of one candidate reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandidateRank {
    pub order: ReadingOrder,
    /// Number of locally monotonic adjacent pairs.
    pub rank: usize,
    /// The first row was dropped before columns were built.
    pub first_row_suppressed: bool,
}

/// The selected reading order together with every candidate's score.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    pub priority_left_right: bool,
    pub priority_row_major: bool,
    pub ranks: [CandidateRank; 4],
}

impl Template {
    pub fn order(&self) -> ReadingOrder {
        ReadingOrder::from_priorities(self.priority_left_right, self.priority_row_major)
    }

    /// Rank computed for `order` during selection.
    pub fn rank_of(&self, order: ReadingOrder) -> usize {
        self.ranks
            .iter()
            .find(|c| c.order == order)
            .map_or(0, |c| c.rank)
    }
}

/// Columns used by column-major reading orders.
pub(crate) struct ColumnLayout {
    pub(crate) columns: Vec<Vec<usize>>,
    /// Buttons of a dropped partial first row.
    pub(crate) suppressed: Vec<usize>,
}

/// Drop a short first row and rebuild columns from the remaining rows.
///
/// The first row counts as partial when the mean row size exceeds its size.
/// Without suppression the clustered columns are used as they are.
pub(crate) fn column_layout(clusters: &PanelClusters, config: &RelabelConfig) -> ColumnLayout {
    let rows = &clusters.rows;
    let keep_columns = || ColumnLayout {
        columns: clusters.cols.iter().map(|c| c.members.clone()).collect(),
        suppressed: Vec::new(),
    };
    if !config.suppress_partial_first_row || rows.is_empty() {
        return keep_columns();
    }

    let n_buttons: usize = rows.iter().map(Cluster::len).sum();
    let mean_row = n_buttons as f64 / rows.len() as f64;
    if mean_row <= rows[0].len() as f64 {
        return keep_columns();
    }

    ColumnLayout {
        columns: columns_from_rows(&rows[1..]),
        suppressed: rows[0].members.clone(),
    }
}

/// Column `k` collects the `k`-th member of every row long enough to have one.
fn columns_from_rows(rows: &[Cluster]) -> Vec<Vec<usize>> {
    let n_cols = rows.iter().map(Cluster::len).max().unwrap_or(0);
    (0..n_cols)
        .map(|k| rows.iter().filter_map(|r| r.members.get(k).copied()).collect())
        .collect()
}

/// Count adjacent pairs `(a, b)` with `b > a` and `|b| - |a| < max_step`,
/// walking `labels` forwards or backwards.
pub fn count_rank(labels: &[i32], forward: bool, max_step: i32) -> usize {
    let monotonic = |a: i32, b: i32| {
        b > a && i64::from(b).abs() - i64::from(a).abs() < i64::from(max_step)
    };
    if forward {
        labels.windows(2).filter(|w| monotonic(w[0], w[1])).count()
    } else {
        labels
            .windows(2)
            .filter(|w| monotonic(w[1], w[0]))
            .count()
    }
}

fn flatten_labels(groups: &[Vec<usize>], labels: &[i32]) -> Vec<i32> {
    groups.iter().flatten().map(|&i| labels[i]).collect()
}

/// Score all four reading orders and pick the best one.
///
/// `labels[i]` is the raw label of button `i`. Ties go to the earlier entry
/// of [`ReadingOrder::ALL`].
pub fn select_template(
    clusters: &PanelClusters,
    labels: &[i32],
    config: &RelabelConfig,
) -> Template {
    let rows: Vec<Vec<usize>> = clusters.rows.iter().map(|c| c.members.clone()).collect();
    let row_labels = flatten_labels(&rows, labels);
    let layout = column_layout(clusters, config);
    let col_labels = flatten_labels(&layout.columns, labels);
    let col_suppressed = !layout.suppressed.is_empty();

    let ranks = ReadingOrder::ALL.map(|order| {
        let (flat, first_row_suppressed) = if order.is_row_major() {
            (&row_labels, false)
        } else {
            (&col_labels, col_suppressed)
        };
        CandidateRank {
            order,
            rank: count_rank(flat, order.is_forward(), config.rank_max_abs_step),
            first_row_suppressed,
        }
    });

    let best = ranks[1..]
        .iter()
        .fold(ranks[0], |best, c| if c.rank > best.rank { *c } else { best });

    tracing::debug!(
        order = ?best.order,
        rank = best.rank,
        ranks = ?ranks.map(|c| c.rank),
        "selected reading order"
    );

    Template {
        priority_left_right: best.order.is_forward(),
        priority_row_major: best.order.is_row_major(),
        ranks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterStats;

    fn cluster(members: &[usize]) -> Cluster {
        Cluster {
            members: members.to_vec(),
            sort_key: 0,
            mean: 0.0,
        }
    }

    fn panel(rows: &[&[usize]], cols: &[&[usize]]) -> PanelClusters {
        PanelClusters {
            rows: rows.iter().map(|m| cluster(m)).collect(),
            cols: cols.iter().map(|m| cluster(m)).collect(),
            row_stats: ClusterStats::default(),
            col_stats: ClusterStats::default(),
        }
    }

    fn grid3() -> PanelClusters {
        panel(
            &[&[0, 1, 2], &[3, 4, 5], &[6, 7, 8]],
            &[&[0, 3, 6], &[1, 4, 7], &[2, 5, 8]],
        )
    }

    #[test]
    fn rank_counts_tolerant_monotonic_pairs() {
        assert_eq!(count_rank(&[1, 2, 3, 4], true, 3), 3);
        assert_eq!(count_rank(&[1, 2, 3, 4], false, 3), 0);
        assert_eq!(count_rank(&[4, 3, 2, 1], false, 3), 3);
        // skipped 13 still counts, a jump of three does not
        assert_eq!(count_rank(&[12, 14, 17], true, 3), 1);
        // magnitudes are compared, so basement levels going up count
        assert_eq!(count_rank(&[-2, -1, 1], true, 3), 2);
        assert_eq!(count_rank(&[], true, 3), 0);
        assert_eq!(count_rank(&[7], true, 3), 0);
    }

    #[test]
    fn row_major_grid_selects_rows_forward() {
        let labels: Vec<i32> = (1..=9).collect();
        let t = select_template(&grid3(), &labels, &RelabelConfig::default());
        assert_eq!(t.order(), ReadingOrder::RowsForward);
        assert!(t.priority_left_right && t.priority_row_major);
        assert_eq!(t.rank_of(ReadingOrder::RowsForward), 8);
        assert_eq!(t.rank_of(ReadingOrder::RowsBackward), 0);
    }

    #[test]
    fn column_major_grid_selects_columns_forward() {
        // 1 4 7 / 2 5 8 / 3 6 9
        let labels = vec![1, 4, 7, 2, 5, 8, 3, 6, 9];
        let t = select_template(&grid3(), &labels, &RelabelConfig::default());
        assert_eq!(t.order(), ReadingOrder::ColumnsForward);
        assert_eq!(t.rank_of(ReadingOrder::ColumnsForward), 8);
    }

    #[test]
    fn all_zero_ranks_fall_back_to_rows_forward() {
        let labels = vec![5; 9];
        let t = select_template(&grid3(), &labels, &RelabelConfig::default());
        assert!(t.ranks.iter().all(|c| c.rank == 0));
        assert_eq!(t.order(), ReadingOrder::RowsForward);
    }

    #[test]
    fn rows_backward_beats_columns_on_tie() {
        // a single column read bottom-up: rows and columns flatten alike
        let clusters = panel(&[&[0], &[1], &[2]], &[&[0, 1, 2]]);
        let labels = vec![3, 2, 1];
        let t = select_template(&clusters, &labels, &RelabelConfig::default());
        assert_eq!(t.rank_of(ReadingOrder::RowsBackward), 2);
        assert_eq!(t.rank_of(ReadingOrder::ColumnsBackward), 2);
        assert_eq!(t.order(), ReadingOrder::RowsBackward);
    }

    #[test]
    fn partial_first_row_is_suppressed_for_columns() {
        // top row holds a single button above a full 3x2 block
        let clusters = panel(
            &[&[0], &[1, 2, 3], &[4, 5, 6]],
            &[&[1, 4], &[0, 2, 5], &[3, 6]],
        );
        let layout = column_layout(&clusters, &RelabelConfig::default());
        assert_eq!(layout.suppressed, vec![0]);
        assert_eq!(layout.columns, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);

        let labels = vec![99, 1, 3, 5, 2, 4, 6];
        let t = select_template(&clusters, &labels, &RelabelConfig::default());
        assert_eq!(t.order(), ReadingOrder::ColumnsForward);
        assert!(t.ranks[2].first_row_suppressed);
        assert!(!t.ranks[0].first_row_suppressed);
    }

    #[test]
    fn suppression_can_be_disabled() {
        let clusters = panel(&[&[0], &[1, 2, 3]], &[&[1], &[0, 2], &[3]]);
        let cfg = RelabelConfig {
            suppress_partial_first_row: false,
            ..RelabelConfig::default()
        };
        let layout = column_layout(&clusters, &cfg);
        assert!(layout.suppressed.is_empty());
        assert_eq!(layout.columns, vec![vec![1], vec![0, 2], vec![3]]);
    }

    #[test]
    fn priorities_round_trip_through_order() {
        for order in ReadingOrder::ALL {
            let back = ReadingOrder::from_priorities(order.is_forward(), order.is_row_major());
            assert_eq!(back, order);
        }
    }
}
