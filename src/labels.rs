//! Interaction, species, and hierarchy-tier enumerations.
//!
//! Fixed lookup tables for the analysis buckets. Display strings match the
//! validation table conventions.

use core::fmt;

/// True neutrino interaction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Interaction {
    /// Charged-current muon neutrino.
    CcNuMu,
    /// Charged-current electron neutrino.
    CcNuE,
    /// Neutral current.
    Nc,
}

impl Interaction {
    /// All interaction buckets, in table order.
    pub const ALL: [Interaction; 3] = [Interaction::CcNuMu, Interaction::CcNuE, Interaction::Nc];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Interaction::CcNuMu => "CC \u{03bd}\u{03bc}",
            Interaction::CcNuE => "CC \u{03bd}e",
            Interaction::Nc => "NC",
        }
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True particle species tracked by the validation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    Muon,
    Proton,
    ChargedPion,
    Photon,
    Electron,
}

impl Species {
    /// All species buckets, in table order.
    pub const ALL: [Species; 5] = [
        Species::Muon,
        Species::Proton,
        Species::ChargedPion,
        Species::Photon,
        Species::Electron,
    ];

    /// Absolute PDG code.
    pub fn pdg(&self) -> i32 {
        match self {
            Species::Muon => 13,
            Species::Proton => 2212,
            Species::ChargedPion => 211,
            Species::Photon => 22,
            Species::Electron => 11,
        }
    }

    /// Species for a (signed) PDG code, if tracked.
    pub fn from_pdg(pdg: i32) -> Option<Species> {
        Species::ALL.into_iter().find(|s| s.pdg() == pdg.abs())
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Species::Muon => "Muon",
            Species::Proton => "Proton",
            Species::ChargedPion => "ChPion",
            Species::Photon => "Photon",
            Species::Electron => "Electron",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hierarchy tier bucket: depth of a particle in the parent-child tree.
///
/// Depth 1 particles hang directly off the interaction vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// True hierarchy depth 1.
    Primary,
    /// True hierarchy depth 2.
    Secondary,
    /// True hierarchy depth greater than 2.
    Deeper,
}

impl Tier {
    /// All tier buckets, in table order.
    pub const ALL: [Tier; 3] = [Tier::Primary, Tier::Secondary, Tier::Deeper];

    /// Whether a true hierarchy depth falls in this bucket.
    pub fn matches(&self, depth: i32) -> bool {
        match self {
            Tier::Primary => depth == 1,
            Tier::Secondary => depth == 2,
            Tier::Deeper => depth > 2,
        }
    }

    /// Whether this is the primary bucket.
    pub fn is_primary(&self) -> bool {
        matches!(self, Tier::Primary)
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Primary => "Primary",
            Tier::Secondary => "Secondary",
            Tier::Deeper => "Other",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
