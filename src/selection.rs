//! Selection mask builders.
//!
//! Each builder produces one per-criterion [`Mask`]; the analysis ANDs them
//! together into a target selection. Per-event quantities (CC flag, neutrino
//! PDG) are expanded across particles with an explicit broadcast so the
//! result is co-indexed with the particle branches.

use crate::error::Result;
use crate::jagged::{Jagged, Mask};
use crate::labels::{Interaction, Species, Tier};

/// Mask selecting particles from events of the given interaction type.
///
/// `is_cc` and `nu_pdg` are per-event scalars; `shape` is any particle-level
/// branch supplying the ragged layout.
pub fn interaction_mask<S>(
    interaction: Interaction,
    is_cc: &[bool],
    nu_pdg: &[i32],
    shape: &Jagged<S>,
) -> Result<Mask> {
    let cc = Jagged::broadcast(is_cc, shape)?;
    let pdg = Jagged::broadcast(nu_pdg, shape)?;
    let mask = match interaction {
        Interaction::CcNuMu => cc.and(&pdg.to_mask(|p| p.abs() == 14))?,
        Interaction::CcNuE => cc.and(&pdg.to_mask(|p| p.abs() == 12))?,
        Interaction::Nc => cc.not(),
    };
    Ok(mask)
}

/// Mask selecting particles whose true PDG code matches `species`.
pub fn species_mask(species: Species, true_pdg: &Jagged<i32>) -> Mask {
    true_pdg.to_mask(|p| p.abs() == species.pdg())
}

/// Mask selecting particles whose true hierarchy depth falls in `tier`.
pub fn tier_mask(tier: Tier, true_depth: &Jagged<i32>) -> Mask {
    true_depth.to_mask(|d| tier.matches(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdg_branch() -> Jagged<i32> {
        Jagged::from_nested(vec![vec![13, 2212, -211], vec![11, 22]])
    }

    #[test]
    fn test_interaction_masks_partition_events() {
        let shape = pdg_branch();
        let is_cc = vec![true, false];
        let nu_pdg = vec![14, 12];

        let numu = interaction_mask(Interaction::CcNuMu, &is_cc, &nu_pdg, &shape).unwrap();
        let nue = interaction_mask(Interaction::CcNuE, &is_cc, &nu_pdg, &shape).unwrap();
        let nc = interaction_mask(Interaction::Nc, &is_cc, &nu_pdg, &shape).unwrap();

        // Event 0 is CC numu, event 1 is NC (is_cc false trumps nu PDG).
        assert_eq!(numu.flat(), &[true, true, true, false, false]);
        assert_eq!(nue.flat(), &[false, false, false, false, false]);
        assert_eq!(nc.flat(), &[false, false, false, true, true]);
    }

    #[test]
    fn test_interaction_mask_checks_event_count() {
        let shape = pdg_branch();
        let err = interaction_mask(Interaction::Nc, &[true], &[14, 12], &shape);
        assert!(err.is_err());
    }

    #[test]
    fn test_species_mask_uses_absolute_pdg() {
        let m = species_mask(Species::ChargedPion, &pdg_branch());
        assert_eq!(m.flat(), &[false, false, true, false, false]);
    }

    #[test]
    fn test_tier_mask() {
        let depth = Jagged::from_nested(vec![vec![1, 2, 3], vec![1, 4]]);
        assert_eq!(
            tier_mask(Tier::Primary, &depth).flat(),
            &[true, false, false, true, false]
        );
        assert_eq!(
            tier_mask(Tier::Deeper, &depth).flat(),
            &[false, false, true, false, true]
        );
    }
}
