//! Reading-order inference and label repair over clustered buttons.
//!
//! ## Algorithm
//!
//! 1. **Score reading orders**: flatten the clusters rows-first and
//!    columns-first and count tolerant monotonic label pairs walking each
//!    flattening forwards and backwards. Column flattenings drop a partial
//!    first row. The best of the four wins, earlier orders win ties.
//!
//! 2. **Flatten**: lay all buttons out along the winning order.
//!
//! 3. **Validate**: flag every position whose label does not continue its
//!    left neighbor or lead into its right one.
//!
//! 4. **Correct**: each run of flagged positions is bounded by its trusted
//!    neighbors. Runs whose bounds differ by exactly their distance are
//!    renumbered; other runs are resolved from classifier alternates, keeping
//!    non-sequential labels as jump buttons where the numeric gap allows.

mod correct;
mod events;
mod sequence;
mod template;

pub use correct::{correct_sequence, Correction};
pub use events::{CorrectionEvent, CorrectionStats};
pub use sequence::{build_sequence, validate_sequence, FlattenedSequence, Sequence, SequenceEntry};
pub use template::{count_rank, select_template, CandidateRank, ReadingOrder, Template};
