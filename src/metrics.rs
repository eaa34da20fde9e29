//! Reconstruction performance metrics.
//!
//! Numeric building blocks for the validation tables and plots. Everything
//! here consumes selection masks and branch snapshots and produces plain
//! counts or dense arrays; rendering is the caller's problem.
//!
//! | Metric | Output | Notes |
//! |--------|--------|-------|
//! | [`efficiency`] | [`EfficiencyCounts`] | matched / targets, 2 dp |
//! | [`histogram`] | `Array1<u64>` | fixed-range binning |
//! | [`normalized_histogram`] | `Array1<f64>` | per-entry weight 1/n |
//! | [`binned_efficiency`] | [`BinnedEfficiency`] | binomial errors |
//! | [`track_shower_matrix`] | `Array2<f64>` | species × {track, shower} |
//! | [`summary_counts`] | [`SummaryCounts`] | MC vs matched, species × tier |
//!
//! Bins are half-open `[lo + i·w, lo + (i+1)·w)` with the last bin closed at
//! `hi`; entries outside the range are dropped.

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};
use crate::hierarchy::round2;
use crate::jagged::{Jagged, Mask};
use crate::labels::{Species, Tier};
use crate::selection::{species_mask, tier_mask};

/// Reconstruction efficiency for one selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyCounts {
    /// Reconstructable targets.
    pub n_target: u64,
    /// Targets matched to a reconstructed object.
    pub n_reco: u64,
    /// `n_reco / n_target`, rounded to 2 decimal places; 0.0 when there are
    /// no targets.
    pub efficiency: f64,
}

/// Overall efficiency: how many target particles were reconstructed at all.
///
/// `reco_mask` should be `target_mask AND has_match`.
pub fn efficiency(target_mask: &Mask, reco_mask: &Mask) -> Result<EfficiencyCounts> {
    target_mask.check_shape(reco_mask)?;
    let n_target = target_mask.count() as u64;
    let n_reco = reco_mask.count() as u64;
    let efficiency = if n_target == 0 {
        0.0
    } else {
        round2(n_reco as f64 / n_target as f64)
    };
    Ok(EfficiencyCounts {
        n_target,
        n_reco,
        efficiency,
    })
}

/// A fixed-range binning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binning {
    /// Number of bins.
    pub n_bins: usize,
    /// Lower edge of the first bin.
    pub lo: f64,
    /// Upper edge of the last bin.
    pub hi: f64,
}

impl Binning {
    /// Create a binning; the range must be non-empty and non-degenerate.
    pub fn new(n_bins: usize, lo: f64, hi: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::InvalidParameter {
                name: "n_bins",
                message: "must be at least 1",
            });
        }
        if !(hi > lo) {
            return Err(Error::InvalidParameter {
                name: "range",
                message: "upper edge must exceed lower edge",
            });
        }
        Ok(Self { n_bins, lo, hi })
    }

    /// Bin width.
    pub fn width(&self) -> f64 {
        (self.hi - self.lo) / self.n_bins as f64
    }

    /// Bin centers.
    pub fn centers(&self) -> Array1<f64> {
        let w = self.width();
        Array1::from_iter((0..self.n_bins).map(|i| self.lo + (i as f64 + 0.5) * w))
    }

    /// Bin index for a value, or `None` if outside the range. The last bin
    /// is closed at the upper edge.
    pub fn bin_of(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < self.lo || x > self.hi {
            return None;
        }
        let i = ((x - self.lo) / self.width()) as usize;
        Some(i.min(self.n_bins - 1))
    }
}

/// Histogram of `values` over `binning`.
pub fn histogram(values: &[f64], binning: &Binning) -> Array1<u64> {
    let mut counts = Array1::<u64>::zeros(binning.n_bins);
    for &v in values {
        if let Some(i) = binning.bin_of(v) {
            counts[i] += 1;
        }
    }
    counts
}

/// Histogram where each entry carries weight `1/n`, so the bins hold the
/// fraction of entries. All zeros for empty input.
pub fn normalized_histogram(values: &[f64], binning: &Binning) -> Array1<f64> {
    let counts = histogram(values, binning);
    let n = values.len();
    if n == 0 {
        return Array1::zeros(binning.n_bins);
    }
    counts.mapv(|c| c as f64 / n as f64)
}

/// Per-bin efficiency curve with binomial uncertainties.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedEfficiency {
    /// Bin centers.
    pub centers: Array1<f64>,
    /// `n_reco / n_target` per bin; 0.0 where a bin has no targets.
    pub efficiency: Array1<f64>,
    /// Binomial error `sqrt(eff·(1−eff)/n_target)` per bin.
    pub error: Array1<f64>,
}

/// Efficiency as a function of a true quantity.
///
/// `target_values` are the quantity for all reconstructable targets,
/// `reco_values` the same quantity restricted to matched targets.
pub fn binned_efficiency(
    target_values: &[f64],
    reco_values: &[f64],
    binning: &Binning,
) -> BinnedEfficiency {
    let target = histogram(target_values, binning);
    let reco = histogram(reco_values, binning);

    let mut eff = Array1::<f64>::zeros(binning.n_bins);
    let mut err = Array1::<f64>::zeros(binning.n_bins);
    for i in 0..binning.n_bins {
        if target[i] > 0 {
            let e = reco[i] as f64 / target[i] as f64;
            eff[i] = e;
            err[i] = (e * (1.0 - e) / target[i] as f64).sqrt();
        }
    }

    BinnedEfficiency {
        centers: binning.centers(),
        efficiency: eff,
        error: err,
    }
}

/// Track/shower confusion matrix.
///
/// One row per [`Species::ALL`] entry, columns `[track fraction, shower
/// fraction]`, rounded to 2 decimal places. Only particles with a
/// reconstructed classification (`is_track != -1`) are considered; a row
/// with no such particles is all zeros.
pub fn track_shower_matrix(
    is_track: &Jagged<i32>,
    is_shower: &Jagged<i32>,
    true_pdg: &Jagged<i32>,
    mask: &Mask,
) -> Result<Array2<f64>> {
    is_track.check_shape(is_shower)?;
    is_track.check_shape(true_pdg)?;
    is_track.check_shape(mask)?;

    let classified = is_track.to_mask(|t| t != -1);
    let base = mask.and(&classified)?;

    let mut matrix = Array2::<f64>::zeros((Species::ALL.len(), 2));
    for (row, species) in Species::ALL.into_iter().enumerate() {
        let sel = base.and(&species_mask(species, true_pdg))?;
        let n = sel.count();
        if n == 0 {
            continue;
        }
        let n_track = is_track
            .select(&sel)?
            .into_iter()
            .filter(|&t| t == 1)
            .count();
        let n_shower = is_shower
            .select(&sel)?
            .into_iter()
            .filter(|&s| s == 1)
            .count();
        matrix[[row, 0]] = round2(n_track as f64 / n as f64);
        matrix[[row, 1]] = round2(n_shower as f64 / n as f64);
    }
    Ok(matrix)
}

/// MC vs matched counts per (species × tier) for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCounts {
    /// True particles per (species row, tier column).
    pub n_true: Array2<u64>,
    /// Of those, particles matched to a reconstructed object.
    pub n_matched: Array2<u64>,
}

/// Count true and matched particles per species and tier under `mask`
/// (typically an interaction mask).
pub fn summary_counts(
    true_pdg: &Jagged<i32>,
    true_depth: &Jagged<i32>,
    has_match: &Mask,
    mask: &Mask,
) -> Result<SummaryCounts> {
    true_pdg.check_shape(true_depth)?;
    true_pdg.check_shape(has_match)?;
    true_pdg.check_shape(mask)?;

    let mut n_true = Array2::<u64>::zeros((Species::ALL.len(), Tier::ALL.len()));
    let mut n_matched = n_true.clone();

    for (row, species) in Species::ALL.into_iter().enumerate() {
        let by_species = mask.and(&species_mask(species, true_pdg))?;
        for (col, tier) in Tier::ALL.into_iter().enumerate() {
            let target = by_species.and(&tier_mask(tier, true_depth))?;
            n_true[[row, col]] = target.count() as u64;
            n_matched[[row, col]] = target.and(has_match)?.count() as u64;
        }
    }

    Ok(SummaryCounts { n_true, n_matched })
}
