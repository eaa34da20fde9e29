//! # recoval
//!
//! Validation metrics for a particle-physics event reconstruction pipeline:
//! Monte-Carlo truth versus the reconstruction's best-match ("BM") output.
//!
//! The core is the parent-link classifier in [`hierarchy`]: given co-indexed
//! ragged branches (true/reco hierarchy depth, true/reco parent index, match
//! flag) and a selection mask, it buckets each particle into correct-parent,
//! false-primary, wrong-parent, or parent-unmatched and derives fractions.
//! Around it sit selection-mask builders ([`selection`]), efficiency and
//! confusion metrics ([`metrics`]), and the bucketed breakdown tables
//! ([`table`]) that downstream writers and plotters consume.
//!
//! Everything operates on immutable [`Jagged`] snapshots; co-indexed shape
//! mismatches fail fast, and inconsistent hierarchy records surface in a
//! [`QualityReport`] instead of crashing a run.
//!
//! ```rust
//! use recoval::{HierarchyBranches, Jagged, Mask, Tier};
//!
//! let branches = HierarchyBranches::new(
//!     Jagged::from_nested(vec![vec![1, 2]]),     // true depth
//!     Jagged::from_nested(vec![vec![1, 2]]),     // BM depth
//!     Jagged::from_nested(vec![vec![-1, 0]]),    // true parent
//!     Jagged::from_nested(vec![vec![-1, 0]]),    // BM parent
//!     Jagged::from_nested(vec![vec![true, true]]),
//! )?;
//!
//! let mask = branches.has_match().and(&branches.tier_mask(Tier::Secondary))?;
//! let c = branches.classify(Tier::Secondary, &mask, false)?;
//! assert_eq!(c.counts.n_correct_parent, 1);
//! # Ok::<(), recoval::Error>(())
//! ```

pub mod diagnostics;
/// Error types used across `recoval`.
pub mod error;
pub mod hierarchy;
pub mod jagged;
pub mod labels;
pub mod metrics;
pub mod selection;
pub mod table;

pub use diagnostics::{QualityIssue, QualityReport, Severity};
pub use error::{Error, Result};
pub use hierarchy::{
    Classification, HierarchyBranches, ParentCounts, ParentFractions, NO_PARENT,
};
pub use jagged::{Jagged, Mask};
pub use labels::{Interaction, Species, Tier};
pub use metrics::{
    binned_efficiency, efficiency, histogram, normalized_histogram, summary_counts,
    track_shower_matrix, BinnedEfficiency, Binning, EfficiencyCounts, SummaryCounts,
};
pub use selection::{interaction_mask, species_mask, tier_mask};
pub use table::{
    efficiency_table, hierarchy_table, EfficiencyRow, HierarchyRow, HierarchyTable, TableRequest,
};
