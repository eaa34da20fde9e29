//! Bucketed validation breakdowns.
//!
//! Assembles the numbers behind the validation tables: one row per
//! (interaction, species, tier) bucket. Buckets never interact, so the
//! (interaction, species) groups are evaluated in parallel. The external
//! table writer takes care of rendering.

use rayon::prelude::*;

use crate::diagnostics::QualityReport;
use crate::error::Result;
use crate::hierarchy::{HierarchyBranches, ParentCounts, ParentFractions};
use crate::jagged::{Jagged, Mask};
use crate::labels::{Interaction, Species, Tier};
use crate::metrics::{efficiency, EfficiencyCounts};
use crate::selection::{interaction_mask, species_mask};

/// What to compute for a hierarchy table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRequest {
    /// Only judge parent links whose true parent was itself reconstructed.
    pub demand_parent_matched: bool,
    /// One row group per species instead of a single all-species group.
    pub split_by_species: bool,
}

/// One hierarchy-table row.
#[derive(Debug, Clone)]
pub struct HierarchyRow {
    pub interaction: Interaction,
    /// `None` for the all-species rows.
    pub species: Option<Species>,
    pub tier: Tier,
    pub counts: ParentCounts,
    pub fractions: ParentFractions,
}

/// All hierarchy-table rows plus the merged data-quality findings.
#[derive(Debug, Clone)]
pub struct HierarchyTable {
    /// Rows in (interaction, species, tier) order.
    pub rows: Vec<HierarchyRow>,
    /// Findings merged across all buckets.
    pub report: QualityReport,
}

fn bucket_groups(split_by_species: bool) -> Vec<(Interaction, Option<Species>)> {
    let mut groups = Vec::new();
    for interaction in Interaction::ALL {
        if split_by_species {
            groups.extend(Species::ALL.map(|s| (interaction, Some(s))));
        } else {
            groups.push((interaction, None));
        }
    }
    groups
}

/// Parent-link correctness per (interaction, species, tier) bucket.
///
/// `is_cc` and `nu_pdg` are per-event; `true_pdg` is co-indexed with the
/// hierarchy branches. Every bucket restricts to matched particles
/// (`has_match`), as the parent-link comparison is only defined for them.
pub fn hierarchy_table(
    branches: &HierarchyBranches,
    true_pdg: &Jagged<i32>,
    is_cc: &[bool],
    nu_pdg: &[i32],
    request: TableRequest,
) -> Result<HierarchyTable> {
    branches.true_tier().check_shape(true_pdg)?;

    let groups = bucket_groups(request.split_by_species);
    let per_group: Vec<(Vec<HierarchyRow>, QualityReport)> = groups
        .par_iter()
        .map(|&(interaction, species)| {
            let int_mask = interaction_mask(interaction, is_cc, nu_pdg, true_pdg)?;
            let sp_mask = match species {
                Some(s) => species_mask(s, true_pdg),
                None => Mask::ones_like(true_pdg),
            };
            let base = branches.has_match().and(&int_mask)?.and(&sp_mask)?;

            let mut rows = Vec::with_capacity(Tier::ALL.len());
            let mut report = QualityReport::new();
            for tier in Tier::ALL {
                let mask = base.and(&branches.tier_mask(tier))?;
                let c = branches.classify(tier, &mask, request.demand_parent_matched)?;
                rows.push(HierarchyRow {
                    interaction,
                    species,
                    tier,
                    counts: c.counts,
                    fractions: c.counts.fractions(),
                });
                report.merge(c.report);
            }
            Ok((rows, report))
        })
        .collect::<Result<_>>()?;

    let mut rows = Vec::with_capacity(per_group.len() * Tier::ALL.len());
    let mut report = QualityReport::new();
    for (group_rows, group_report) in per_group {
        rows.extend(group_rows);
        report.merge(group_report);
    }
    Ok(HierarchyTable { rows, report })
}

/// One efficiency-table row.
#[derive(Debug, Clone)]
pub struct EfficiencyRow {
    pub interaction: Interaction,
    /// `None` for the all-species rows.
    pub species: Option<Species>,
    pub tier: Tier,
    pub counts: EfficiencyCounts,
}

/// Reconstruction efficiency per (interaction, species, tier) bucket.
///
/// Unlike [`hierarchy_table`], targets are all true particles in the bucket;
/// `has_match` enters only through the numerator.
pub fn efficiency_table(
    branches: &HierarchyBranches,
    true_pdg: &Jagged<i32>,
    is_cc: &[bool],
    nu_pdg: &[i32],
    split_by_species: bool,
) -> Result<Vec<EfficiencyRow>> {
    branches.true_tier().check_shape(true_pdg)?;

    let groups = bucket_groups(split_by_species);
    let per_group: Vec<Vec<EfficiencyRow>> = groups
        .par_iter()
        .map(|&(interaction, species)| {
            let int_mask = interaction_mask(interaction, is_cc, nu_pdg, true_pdg)?;
            let sp_mask = match species {
                Some(s) => species_mask(s, true_pdg),
                None => Mask::ones_like(true_pdg),
            };
            let base = int_mask.and(&sp_mask)?;

            let mut rows = Vec::with_capacity(Tier::ALL.len());
            for tier in Tier::ALL {
                let target = base.and(&branches.tier_mask(tier))?;
                let reco = target.and(branches.has_match())?;
                rows.push(EfficiencyRow {
                    interaction,
                    species,
                    tier,
                    counts: efficiency(&target, &reco)?,
                });
            }
            Ok(rows)
        })
        .collect::<Result<_>>()?;

    Ok(per_group.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two events: one CC numu, one NC. Each holds a primary muon with a
    /// secondary proton hanging off it.
    fn fixture() -> (HierarchyBranches, Jagged<i32>, Vec<bool>, Vec<i32>) {
        let true_tier = Jagged::from_nested(vec![vec![1, 2], vec![1, 2]]);
        let reco_tier = Jagged::from_nested(vec![vec![1, 2], vec![1, 1]]);
        let true_parent = Jagged::from_nested(vec![vec![-1, 0], vec![-1, 0]]);
        let reco_parent = Jagged::from_nested(vec![vec![-1, 0], vec![-1, -1]]);
        let has_match = Jagged::from_nested(vec![vec![true, true], vec![true, false]]);
        let branches =
            HierarchyBranches::new(true_tier, reco_tier, true_parent, reco_parent, has_match)
                .unwrap();
        let true_pdg = Jagged::from_nested(vec![vec![13, 2212], vec![13, 2212]]);
        (branches, true_pdg, vec![true, false], vec![14, 14])
    }

    #[test]
    fn test_hierarchy_table_bucket_count_and_order() {
        let (branches, true_pdg, is_cc, nu_pdg) = fixture();
        let table = hierarchy_table(
            &branches,
            &true_pdg,
            &is_cc,
            &nu_pdg,
            TableRequest::default(),
        )
        .unwrap();

        assert_eq!(table.rows.len(), Interaction::ALL.len() * Tier::ALL.len());
        assert_eq!(table.rows[0].interaction, Interaction::CcNuMu);
        assert_eq!(table.rows[0].tier, Tier::Primary);
        assert!(table.rows.iter().all(|r| r.species.is_none()));
    }

    #[test]
    fn test_hierarchy_table_split_by_species() {
        let (branches, true_pdg, is_cc, nu_pdg) = fixture();
        let request = TableRequest {
            split_by_species: true,
            ..Default::default()
        };
        let table = hierarchy_table(&branches, &true_pdg, &is_cc, &nu_pdg, request).unwrap();

        assert_eq!(
            table.rows.len(),
            Interaction::ALL.len() * Species::ALL.len() * Tier::ALL.len()
        );

        // CC numu / muon / primary: the one matched muon is a correct primary.
        let row = table
            .rows
            .iter()
            .find(|r| {
                r.interaction == Interaction::CcNuMu
                    && r.species == Some(Species::Muon)
                    && r.tier == Tier::Primary
            })
            .unwrap();
        assert_eq!(row.counts.n_total, 1);
        assert_eq!(row.counts.n_correct_parent, 1);
    }

    #[test]
    fn test_hierarchy_table_counts() {
        let (branches, true_pdg, is_cc, nu_pdg) = fixture();
        let table = hierarchy_table(
            &branches,
            &true_pdg,
            &is_cc,
            &nu_pdg,
            TableRequest::default(),
        )
        .unwrap();

        // CC numu secondary: the matched proton has the correct parent.
        let row = table
            .rows
            .iter()
            .find(|r| r.interaction == Interaction::CcNuMu && r.tier == Tier::Secondary)
            .unwrap();
        assert_eq!(row.counts.n_total, 1);
        assert_eq!(row.counts.n_correct_parent, 1);
        assert_eq!(row.fractions.correct_parent, 1.0);

        // NC secondary: the proton is unmatched, so nothing to classify.
        let row = table
            .rows
            .iter()
            .find(|r| r.interaction == Interaction::Nc && r.tier == Tier::Secondary)
            .unwrap();
        assert_eq!(row.counts.n_total, 0);
        assert_eq!(row.fractions.correct_parent, 0.0);
    }

    #[test]
    fn test_efficiency_table() {
        let (branches, true_pdg, is_cc, nu_pdg) = fixture();
        let rows = efficiency_table(&branches, &true_pdg, &is_cc, &nu_pdg, false).unwrap();

        // NC secondary: one target proton, not matched.
        let row = rows
            .iter()
            .find(|r| r.interaction == Interaction::Nc && r.tier == Tier::Secondary)
            .unwrap();
        assert_eq!(row.counts.n_target, 1);
        assert_eq!(row.counts.n_reco, 0);
        assert_eq!(row.counts.efficiency, 0.0);

        // CC numu primary: one target muon, matched.
        let row = rows
            .iter()
            .find(|r| r.interaction == Interaction::CcNuMu && r.tier == Tier::Primary)
            .unwrap();
        assert_eq!(row.counts.efficiency, 1.0);
    }

    #[test]
    fn test_table_rejects_mismatched_pdg_branch() {
        let (branches, _, is_cc, nu_pdg) = fixture();
        let bad_pdg = Jagged::from_nested(vec![vec![13], vec![13]]);
        let err = hierarchy_table(
            &branches,
            &bad_pdg,
            &is_cc,
            &nu_pdg,
            TableRequest::default(),
        );
        assert!(err.is_err());
    }
}
