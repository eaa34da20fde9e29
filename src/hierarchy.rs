//! Parent-link correctness classification.
//!
//! The reconstruction's best-match ("BM") hierarchy is compared against the
//! Monte-Carlo truth, per particle. For a selected particle the outcome is
//! one of four buckets:
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | correct parent | BM parent index equals the true parent index |
//! | false primary | BM promoted the particle to the primary tier |
//! | wrong parent | BM assigned a parent, but not the true one |
//! | parent unmatched | BM assigned no parent at all |
//!
//! Primaries have no parent by definition, so for the primary tier "correct"
//! reduces to "BM also called it a primary" and the false-primary and
//! parent-unmatched buckets are 0 by construction.
//!
//! Parent indices are event-local back-references into the same ragged
//! arrays. They are treated as lookup keys into a read-only snapshot, never
//! traversed, so cyclic or self-referential records in malformed data cannot
//! hang the classification; they surface in the [`QualityReport`] instead.

use crate::diagnostics::QualityReport;
use crate::error::Result;
use crate::jagged::{Jagged, Mask};
use crate::labels::Tier;
use crate::selection;

/// Sentinel parent index meaning "no parent assigned".
pub const NO_PARENT: i32 = -1;

/// Hierarchy-depth value marking a primary.
const PRIMARY_DEPTH: i32 = 1;

/// Read-only co-indexed snapshot of the hierarchy branches for one sample.
///
/// All five branches must share exactly the same ragged shape; the
/// constructor rejects anything else.
#[derive(Debug, Clone)]
pub struct HierarchyBranches {
    true_tier: Jagged<i32>,
    reco_tier: Jagged<i32>,
    true_parent: Jagged<i32>,
    reco_parent: Jagged<i32>,
    has_match: Mask,
}

impl HierarchyBranches {
    /// Build a snapshot, validating that all branches are co-indexed.
    pub fn new(
        true_tier: Jagged<i32>,
        reco_tier: Jagged<i32>,
        true_parent: Jagged<i32>,
        reco_parent: Jagged<i32>,
        has_match: Mask,
    ) -> Result<Self> {
        true_tier.check_shape(&reco_tier)?;
        true_tier.check_shape(&true_parent)?;
        true_tier.check_shape(&reco_parent)?;
        true_tier.check_shape(&has_match)?;
        Ok(Self {
            true_tier,
            reco_tier,
            true_parent,
            reco_parent,
            has_match,
        })
    }

    /// True hierarchy depth branch.
    pub fn true_tier(&self) -> &Jagged<i32> {
        &self.true_tier
    }

    /// Best-match hierarchy depth branch.
    pub fn reco_tier(&self) -> &Jagged<i32> {
        &self.reco_tier
    }

    /// Mask of particles matched to any reconstructed object.
    pub fn has_match(&self) -> &Mask {
        &self.has_match
    }

    /// Mask of particles whose true depth falls in `tier`.
    pub fn tier_mask(&self, tier: Tier) -> Mask {
        selection::tier_mask(tier, &self.true_tier)
    }

    /// Classify parent-link correctness for one tier bucket.
    ///
    /// `mask` is the full target selection: it must already encode tier
    /// membership, species, interaction type, and the `has_match`
    /// requirement. With `demand_parent_matched`, particles whose true
    /// parent was not itself reconstructed are excluded from the denominator
    /// before partitioning (false primaries are kept: promoting a particle
    /// is wrong whether or not its parent was found).
    pub fn classify(
        &self,
        tier: Tier,
        mask: &Mask,
        demand_parent_matched: bool,
    ) -> Result<Classification> {
        self.classify_impl(tier.is_primary(), mask, demand_parent_matched)
    }

    /// Classify a pre-selected set of non-primary particles.
    ///
    /// Used for selections that are not tier buckets, e.g. Michel-electron
    /// candidates: every selected particle is treated as a non-primary and
    /// the parent-matched precondition is not applied.
    pub fn classify_selection(&self, mask: &Mask) -> Result<Classification> {
        self.classify_impl(false, mask, false)
    }

    fn classify_impl(
        &self,
        primary: bool,
        mask: &Mask,
        demand_parent_matched: bool,
    ) -> Result<Classification> {
        self.true_tier.check_shape(mask)?;

        let mut counts = ParentCounts::default();
        let mut report = QualityReport::new();

        for (e, selected) in mask.events().enumerate() {
            let reco_tier = self.reco_tier.event(e);
            let true_parent = self.true_parent.event(e);
            let reco_parent = self.reco_parent.event(e);
            let has_match = self.has_match.event(e);
            let n = selected.len();

            for p in 0..n {
                if !selected[p] {
                    continue;
                }

                if primary {
                    if reco_tier[p] == PRIMARY_DEPTH {
                        counts.n_correct_parent += 1;
                    } else {
                        counts.n_wrong_parent += 1;
                    }
                    counts.n_total += 1;
                    continue;
                }

                if reco_tier[p] == PRIMARY_DEPTH {
                    counts.n_false_primary += 1;
                    counts.n_total += 1;
                    continue;
                }

                let tp = true_parent[p];
                let parent_valid = tp >= 0 && (tp as usize) < n && (tp as usize) != p;
                if tp == NO_PARENT {
                    report.warn_at(e, p, "non-primary particle has no true parent");
                } else if !parent_valid {
                    if tp >= 0 && (tp as usize) == p {
                        report.error_at(e, p, "particle recorded as its own parent");
                    } else {
                        report.error_at(e, p, format!("true parent index {tp} out of range"));
                    }
                }

                if demand_parent_matched {
                    // A parent we cannot look up was certainly not
                    // reconstructed, so the particle drops out here too.
                    let parent_matched = parent_valid && has_match[tp as usize];
                    if !parent_matched {
                        continue;
                    }
                }

                counts.n_total += 1;
                let rp = reco_parent[p];
                if rp == NO_PARENT {
                    counts.n_parent_unmatched += 1;
                } else if rp == tp {
                    counts.n_correct_parent += 1;
                } else {
                    counts.n_wrong_parent += 1;
                }
            }
        }

        if !report.is_clean() {
            log::warn!(
                "hierarchy classification recorded {} data-quality issue(s)",
                report.issues.len()
            );
        }

        Ok(Classification { counts, report })
    }
}

/// Exact outcome counts for one classified selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParentCounts {
    /// BM parent agrees with the true parent (for primaries: BM tier is
    /// also primary).
    pub n_correct_parent: u64,
    /// BM promoted a non-primary to the primary tier.
    pub n_false_primary: u64,
    /// BM assigned a parent other than the true one.
    pub n_wrong_parent: u64,
    /// BM assigned no parent.
    pub n_parent_unmatched: u64,
    /// Denominator: all classified particles.
    pub n_total: u64,
}

impl ParentCounts {
    /// Fractions of the total, rounded to 2 decimal places.
    ///
    /// All 0.0 when the selection is empty; an empty selection is not an
    /// error.
    pub fn fractions(&self) -> ParentFractions {
        let frac = |n: u64| {
            if self.n_total == 0 {
                0.0
            } else {
                round2(n as f64 / self.n_total as f64)
            }
        };
        ParentFractions {
            correct_parent: frac(self.n_correct_parent),
            false_primary: frac(self.n_false_primary),
            wrong_parent: frac(self.n_wrong_parent),
            parent_unmatched: frac(self.n_parent_unmatched),
        }
    }
}

/// Outcome fractions derived from [`ParentCounts`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParentFractions {
    pub correct_parent: f64,
    pub false_primary: f64,
    pub wrong_parent: f64,
    pub parent_unmatched: f64,
}

/// Result of one classification pass: counts plus any data-quality findings.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Outcome counts.
    pub counts: ParentCounts,
    /// Inconsistent-hierarchy findings encountered along the way.
    pub report: QualityReport,
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
