use std::ops::Range;

use crate::button::LabelStatus;

use super::events::CorrectionEvent;
use super::sequence::{Sequence, SequenceEntry};

/// Result of correcting one sequence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Correction {
    /// Corrected label per sequence position.
    pub labels: Vec<i32>,
    /// Outcome per sequence position.
    pub status: Vec<LabelStatus>,
    /// Decisions in the order they were taken.
    pub events: Vec<CorrectionEvent>,
}

impl Correction {
    /// Whether each corrected label is trusted.
    pub fn is_valid(&self) -> Vec<bool> {
        self.status.iter().map(|s| s.is_valid()).collect()
    }
}

/// A trusted position next to an inconsistent run.
#[derive(Debug, Clone, Copy)]
struct Bound {
    index: usize,
    value: i64,
}

#[derive(Debug, Clone, Copy)]
struct RunBounds {
    left: Option<Bound>,
    right: Option<Bound>,
}

impl RunBounds {
    fn expected_from_left(&self, k: usize) -> Option<i64> {
        self.left.map(|b| b.value + (k - b.index) as i64)
    }

    fn expected_from_right(&self, k: usize) -> Option<i64> {
        self.right.map(|b| b.value - (b.index - k) as i64)
    }

    /// Linear-gap test of `label` at `k` against either bound.
    fn fits_sequence(&self, label: i64, k: usize) -> bool {
        self.expected_from_left(k) == Some(label) || self.expected_from_right(k) == Some(label)
    }

    /// Values that sequential numbering could put at `k`: the closed range
    /// over both bounds and the labels they predict for `k`.
    fn sequential_span(&self, k: usize) -> Option<(i64, i64)> {
        [
            self.left.map(|b| b.value),
            self.right.map(|b| b.value),
            self.expected_from_left(k),
            self.expected_from_right(k),
        ]
        .into_iter()
        .flatten()
        .fold(None, |span, v| match span {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    fn fits_jump(&self, label: i64, k: usize) -> bool {
        self.sequential_span(k)
            .is_some_and(|(lo, hi)| label < lo || label > hi)
    }
}

/// How many run positions may be filled by each kind of fit.
#[derive(Debug, Clone, Copy)]
struct Slots {
    sequential: usize,
    jump: usize,
}

impl Slots {
    /// Run bounded on one side by a trusted anchor. Jumps are still possible
    /// but only where no alternate continues the numbering.
    fn one_sided(n: usize) -> Self {
        Self {
            sequential: n,
            jump: n,
        }
    }

    /// Run whose far end is untrusted; only sequential fits are taken.
    fn sequential_only(n: usize) -> Self {
        Self {
            sequential: n,
            jump: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    Sequential,
    Jump,
}

#[derive(Debug, Clone, Copy)]
struct Pick {
    candidate_rank: usize,
    label: i32,
    fit: Fit,
}

fn find_anchor(consistent: &[bool], from: usize) -> Option<usize> {
    (from + 1..consistent.len()).find(|&j| consistent[j])
}

fn to_label(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

struct CorrectionPass<'a> {
    entries: &'a [SequenceEntry],
    candidates: &'a [&'a [i32]],
    labels: Vec<i32>,
    status: Vec<LabelStatus>,
    events: Vec<CorrectionEvent>,
}

impl CorrectionPass<'_> {
    fn bound(&self, index: usize) -> Bound {
        Bound {
            index,
            value: i64::from(self.labels[index]),
        }
    }

    fn record(&mut self, event: CorrectionEvent) {
        tracing::debug!(?event, "label correction");
        self.events.push(event);
    }

    fn repair_run(&mut self, run: Range<usize>, bounds: RunBounds) {
        let (Some(left), Some(right)) = (bounds.left, bounds.right) else {
            let n = run.len();
            self.resolve_candidates(run, bounds, Slots::one_sided(n));
            return;
        };

        let gap = (right.index - left.index) as u64;
        let delta = (right.value - left.value).unsigned_abs();
        if delta == gap {
            self.linear_repair(run, left, right);
            return;
        }

        // Every label missing from the numeric gap marks one run position
        // that sits outside the numbering.
        let run_len = run.len();
        let jump = (gap.saturating_sub(delta) as usize).min(run_len);
        let slots = Slots {
            sequential: run_len - jump,
            jump,
        };
        self.resolve_candidates(run, bounds, slots);
    }

    fn linear_repair(&mut self, run: Range<usize>, left: Bound, right: Bound) {
        let step = (right.value - left.value).signum();
        for k in run {
            let from = self.labels[k];
            let to = to_label(left.value + step * (k - left.index) as i64);
            self.labels[k] = to;
            self.status[k] = LabelStatus::Repaired;
            self.record(CorrectionEvent::LinearRepair {
                position: k,
                button: self.entries[k].button,
                from,
                to,
            });
        }
    }

    fn is_duplicate(&self, k: usize, label: i32) -> bool {
        self.labels
            .iter()
            .enumerate()
            .any(|(j, &v)| j != k && v == label)
    }

    /// Best-ranked alternate of position `k` passing `fits` that is not
    /// already used elsewhere in the sequence.
    fn first_fit(&self, k: usize, fits: impl Fn(i64) -> bool) -> Option<(usize, i32)> {
        let candidates = self.candidates.get(k).copied().unwrap_or(&[]);
        candidates
            .iter()
            .enumerate()
            .find(|&(_, &c)| !self.is_duplicate(k, c) && fits(i64::from(c)))
            .map(|(rank, &c)| (rank, c))
    }

    /// Resolve a run from classifier alternates.
    ///
    /// Sequential fits are handed out over the whole run first; jump slots
    /// only go to positions none of whose alternates continue the numbering.
    fn resolve_candidates(&mut self, run: Range<usize>, bounds: RunBounds, slots: Slots) {
        let mut picks: Vec<Option<Pick>> = vec![None; run.len()];

        if bounds.left.is_some() || bounds.right.is_some() {
            let mut open = slots.sequential;
            for (pick, k) in picks.iter_mut().zip(run.clone()) {
                if open == 0 {
                    break;
                }
                if let Some((candidate_rank, label)) =
                    self.first_fit(k, |v| bounds.fits_sequence(v, k))
                {
                    self.labels[k] = label;
                    open -= 1;
                    *pick = Some(Pick {
                        candidate_rank,
                        label,
                        fit: Fit::Sequential,
                    });
                }
            }

            let mut open = slots.jump;
            for (pick, k) in picks.iter_mut().zip(run.clone()) {
                if open == 0 {
                    break;
                }
                if pick.is_some() {
                    continue;
                }
                if let Some((candidate_rank, label)) =
                    self.first_fit(k, |v| bounds.fits_jump(v, k))
                {
                    self.labels[k] = label;
                    open -= 1;
                    *pick = Some(Pick {
                        candidate_rank,
                        label,
                        fit: Fit::Jump,
                    });
                }
            }
        }

        for (pick, k) in picks.into_iter().zip(run) {
            let entry = self.entries[k];
            let (position, button, from) = (k, entry.button, entry.label);
            match pick {
                // the read label continues the numbering after all
                Some(p) if p.fit == Fit::Sequential && p.label == from => {
                    self.status[k] = LabelStatus::Consistent;
                }
                Some(p) if p.fit == Fit::Sequential => {
                    self.status[k] = LabelStatus::CandidateAdopted;
                    self.record(CorrectionEvent::CandidateAdopted {
                        position,
                        button,
                        from,
                        to: p.label,
                        candidate_rank: p.candidate_rank,
                    });
                }
                Some(p) => {
                    self.status[k] = LabelStatus::JumpAccepted;
                    self.record(CorrectionEvent::JumpAccepted {
                        position,
                        button,
                        from,
                        label: p.label,
                        candidate_rank: p.candidate_rank,
                    });
                }
                None => {
                    self.status[k] = LabelStatus::Unresolved;
                    self.record(CorrectionEvent::Unresolved {
                        position,
                        button,
                        label: from,
                    });
                }
            }
        }
    }
}

/// Repair inconsistent runs of `seq`.
///
/// `candidates[i]` holds the classifier alternates for sequence position
/// `i`, most confident first.
///
/// Each run of inconsistent positions ends at the next consistent position
/// (the anchor). A run whose bracketing labels differ by exactly its index
/// distance is renumbered linearly. Otherwise positions first adopt the best
/// alternate that continues the numbering from either side; positions left
/// over may keep an alternate outside the numbering as a jump button while
/// the numeric gap leaves room for one. Runs touching the sequence start are
/// only resolved through alternates. A trailing run without anchor only
/// takes sequential alternates and stays unresolved otherwise.
pub fn correct_sequence(seq: &Sequence, candidates: &[&[i32]]) -> Correction {
    let n = seq.len();
    let mut pass = CorrectionPass {
        entries: &seq.entries,
        candidates,
        labels: seq.labels(),
        status: seq
            .consistent
            .iter()
            .map(|&ok| {
                if ok {
                    LabelStatus::Consistent
                } else {
                    LabelStatus::Unresolved
                }
            })
            .collect(),
        events: Vec::new(),
    };

    let mut i = 0;
    while i < n {
        if seq.consistent[i] {
            i += 1;
            continue;
        }
        let left = (i > 0).then(|| pass.bound(i - 1));
        match find_anchor(&seq.consistent, i) {
            Some(anchor) => {
                let right = Some(pass.bound(anchor));
                pass.repair_run(i..anchor, RunBounds { left, right });
                i = anchor + 1;
            }
            None => {
                pass.record(CorrectionEvent::AnchorFallback { position: i });
                pass.resolve_candidates(
                    i..n,
                    RunBounds { left, right: None },
                    Slots::sequential_only(n - i),
                );
                i = n;
            }
        }
    }

    Correction {
        labels: pass.labels,
        status: pass.status,
        events: pass.events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relabel::CorrectionStats;

    fn run(labels: &[i32], candidates: &[&[i32]]) -> Correction {
        let seq = Sequence::from_labels(labels);
        correct_sequence(&seq, candidates)
    }

    #[test]
    fn consistent_sequence_is_left_alone() {
        let c = run(&[1, 2, 3, 4, 5], &[]);
        assert_eq!(c.labels, vec![1, 2, 3, 4, 5]);
        assert!(c.events.is_empty());
        assert!(c.status.iter().all(|&s| s == LabelStatus::Consistent));
    }

    #[test]
    fn single_mislabel_is_renumbered() {
        let c = run(&[1, 2, 3, 4, 6, 6, 7, 8, 9], &[]);
        assert_eq!(c.labels, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(
            c.events,
            vec![CorrectionEvent::LinearRepair {
                position: 4,
                button: 4,
                from: 6,
                to: 5
            }]
        );
        assert_eq!(c.status[4], LabelStatus::Repaired);
        assert!(c.is_valid().iter().all(|&v| v));
    }

    #[test]
    fn longer_run_is_interpolated() {
        let c = run(&[1, 2, 3, 9, 9, 6, 7], &[]);
        assert_eq!(c.labels, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(c.events.len(), 2);
    }

    #[test]
    fn jump_button_keeps_its_label() {
        let none: &[i32] = &[];
        let c = run(&[1, 2, 98, 3, 4], &[none, none, &[98, 2, 3], none, none]);
        assert_eq!(c.labels, vec![1, 2, 98, 3, 4]);
        assert_eq!(c.status[2], LabelStatus::JumpAccepted);
        assert_eq!(
            c.events,
            vec![CorrectionEvent::JumpAccepted {
                position: 2,
                button: 2,
                from: 98,
                label: 98,
                candidate_rank: 0
            }]
        );
    }

    #[test]
    fn skipped_floor_adopts_sequential_candidate() {
        // 9 is a misread 4; floor 5 does not exist on this panel
        let none: &[i32] = &[];
        let c = run(&[1, 2, 3, 9, 6, 7], &[none, none, none, &[9, 4, 5], none, none]);
        assert_eq!(c.labels, vec![1, 2, 3, 4, 6, 7]);
        assert_eq!(
            c.events,
            vec![CorrectionEvent::CandidateAdopted {
                position: 3,
                button: 3,
                from: 9,
                to: 4,
                candidate_rank: 1
            }]
        );
    }

    #[test]
    fn no_fitting_candidate_is_unresolved() {
        // every alternate is already on the panel
        let none: &[i32] = &[];
        let c = run(&[1, 2, 98, 3, 4], &[none, none, &[2, 3, 1], none, none]);
        assert_eq!(c.labels, vec![1, 2, 98, 3, 4]);
        assert_eq!(c.status[2], LabelStatus::Unresolved);
        assert_eq!(
            c.events,
            vec![CorrectionEvent::Unresolved {
                position: 2,
                button: 2,
                label: 98
            }]
        );
        assert_eq!(c.is_valid(), vec![true, true, false, true, true]);
    }

    #[test]
    fn leading_jump_button_resolves_against_right_anchor() {
        let none: &[i32] = &[];
        let c = run(&[98, 1, 2, 3], &[&[98, 5], none, none, none]);
        assert_eq!(c.labels, vec![98, 1, 2, 3]);
        assert_eq!(c.status[0], LabelStatus::JumpAccepted);
    }

    #[test]
    fn leading_mislabel_adopts_candidate() {
        let none: &[i32] = &[];
        let c = run(&[2, 2, 3, 4], &[&[2, 1], none, none, none]);
        assert_eq!(c.labels, vec![1, 2, 3, 4]);
        assert_eq!(c.status[0], LabelStatus::CandidateAdopted);
    }

    #[test]
    fn trailing_run_falls_back_without_renumbering() {
        let c = run(&[1, 2, 3, 4, 9], &[]);
        assert_eq!(c.labels, vec![1, 2, 3, 4, 9]);
        assert_eq!(
            c.events,
            vec![
                CorrectionEvent::AnchorFallback { position: 4 },
                CorrectionEvent::Unresolved {
                    position: 4,
                    button: 4,
                    label: 9
                },
            ]
        );
    }

    #[test]
    fn trailing_run_only_adopts_sequential_candidates() {
        let none: &[i32] = &[];
        let c = run(&[1, 2, 3, 4, 9], &[none, none, none, none, &[9, 5]]);
        assert_eq!(c.labels, vec![1, 2, 3, 4, 5]);
        assert_eq!(c.status[4], LabelStatus::CandidateAdopted);

        let c = run(&[1, 2, 3, 4, 9], &[none, none, none, none, &[4, 5]]);
        assert_eq!(c.labels[4], 5);
        assert_eq!(c.status[4], LabelStatus::CandidateAdopted);

        // no anchor on the right, so 9 is never confirmed as a jump
        let c = run(&[1, 2, 3, 4, 9], &[none, none, none, none, &[9]]);
        assert_eq!(c.labels[4], 9);
        assert_eq!(c.status[4], LabelStatus::Unresolved);
        assert!(!c.is_valid()[4]);
    }

    #[test]
    fn trailing_misread_prefers_lower_ranked_sequential_fit() {
        let mut labels: Vec<i32> = (1..=9).collect();
        labels.push(16);
        let none: &[i32] = &[];
        let mut candidates = vec![none; 9];
        candidates.push(&[16, 10, 18]);
        let c = run(&labels, &candidates);
        assert_eq!(c.labels[9], 10);
        assert_eq!(
            c.events,
            vec![
                CorrectionEvent::AnchorFallback { position: 9 },
                CorrectionEvent::CandidateAdopted {
                    position: 9,
                    button: 9,
                    from: 16,
                    to: 10,
                    candidate_rank: 1
                },
            ]
        );
        assert!(c.is_valid().iter().all(|&v| v));
    }

    #[test]
    fn leading_misread_prefers_lower_ranked_sequential_fit() {
        let none: &[i32] = &[];
        let c = run(
            &[7, 2, 3, 4, 5, 6],
            &[&[7, 1, 4], none, none, none, none, none],
        );
        assert_eq!(c.labels, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(c.status[0], LabelStatus::CandidateAdopted);
        assert_eq!(
            c.events,
            vec![CorrectionEvent::CandidateAdopted {
                position: 0,
                button: 0,
                from: 7,
                to: 1,
                candidate_rank: 1
            }]
        );
    }

    #[test]
    fn misread_before_jump_leaves_the_jump_slot_free() {
        let none: &[i32] = &[];
        let c = run(
            &[1, 2, 7, 98, 4, 5],
            &[none, none, &[7, 3], &[98, 4], none, none],
        );
        assert_eq!(c.labels, vec![1, 2, 3, 98, 4, 5]);
        assert_eq!(c.status[2], LabelStatus::CandidateAdopted);
        assert_eq!(c.status[3], LabelStatus::JumpAccepted);
        assert_eq!(
            c.events,
            vec![
                CorrectionEvent::CandidateAdopted {
                    position: 2,
                    button: 2,
                    from: 7,
                    to: 3,
                    candidate_rank: 1
                },
                CorrectionEvent::JumpAccepted {
                    position: 3,
                    button: 3,
                    from: 98,
                    label: 98,
                    candidate_rank: 0
                },
            ]
        );
        assert!(c.is_valid().iter().all(|&v| v));
    }

    #[test]
    fn confirmed_read_label_emits_no_event() {
        let none: &[i32] = &[];
        let c = run(
            &[1, 2, 50, 4, 60, 7, 8],
            &[none, none, none, &[4], none, none, none],
        );
        assert_eq!(c.labels, vec![1, 2, 50, 4, 60, 7, 8]);
        assert_eq!(c.status[3], LabelStatus::Consistent);
        assert_eq!(
            c.events,
            vec![
                CorrectionEvent::Unresolved {
                    position: 2,
                    button: 2,
                    label: 50
                },
                CorrectionEvent::Unresolved {
                    position: 4,
                    button: 4,
                    label: 60
                },
            ]
        );
        let stats = CorrectionStats::from_events(&c.events);
        assert_eq!(stats.n_candidates_adopted, 0);
        assert_eq!(stats.n_unresolved, 2);
    }

    #[test]
    fn garbage_sequence_stays_unresolved() {
        let c = run(&[5, 9, 1], &[&[5], &[9], &[1]]);
        assert_eq!(c.labels, vec![5, 9, 1]);
        assert!(c.status.iter().all(|&s| s == LabelStatus::Unresolved));
        assert_eq!(c.events[0], CorrectionEvent::AnchorFallback { position: 0 });
        assert_eq!(c.events.len(), 4);
    }

    #[test]
    fn correcting_twice_is_a_no_op() {
        let first = run(&[1, 2, 3, 4, 6, 6, 7, 8, 9], &[]);
        let again = run(&first.labels, &[]);
        assert_eq!(again.labels, first.labels);
        assert!(again.events.is_empty());
    }
}
