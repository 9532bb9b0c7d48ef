// src/physics/dos.rs
use nalgebra::DVector;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Settings for the density-of-states curve
#[derive(Debug, Clone)]
pub struct DosSettings {
    pub broadening: f64, // Lorentzian half width (same units as the bands)
    pub npoints: usize,
    pub padding: f64, // Window extension beyond the band edges, in broadenings
}

impl Default for DosSettings {
    fn default() -> Self {
        Self {
            broadening: 0.05,
            npoints: 500,
            padding: 5.0,
        }
    }
}

/// Density of states per k-point at one energy
///
/// **Formula**: DOS(E) = -1/(π N_k) Σ_{k,n} Im G(E), G = 1 / (E + iδ - ε_nk)
///
/// which is a normalized Lorentzian of half width δ around every level.
pub fn density_of_states(energy: f64, broadening: f64, bands: &[DVector<f64>]) -> f64 {
    if bands.is_empty() {
        return 0.0;
    }

    let delta2 = broadening * broadening;
    let sum: f64 = bands
        .iter()
        .flat_map(|b| b.iter())
        .map(|e| broadening / ((energy - e).powi(2) + delta2))
        .sum();

    sum / (PI * bands.len() as f64)
}

/// Sampled DOS curve as (energy, dos) pairs spanning all bands.
pub fn dos_curve(bands: &[DVector<f64>], settings: &DosSettings) -> Vec<(f64, f64)> {
    let (min_e, max_e) = bands
        .iter()
        .flat_map(|b| b.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| (lo.min(e), hi.max(e)));

    if !min_e.is_finite() || settings.npoints == 0 {
        return Vec::new();
    }

    let pad = settings.padding * settings.broadening;
    let start = min_e - pad;
    let end = max_e + pad;
    let step = if settings.npoints > 1 {
        (end - start) / (settings.npoints - 1) as f64
    } else {
        0.0
    };

    (0..settings.npoints)
        .into_par_iter()
        .map(|i| {
            let e = start + i as f64 * step;
            (e, density_of_states(e, settings.broadening, bands))
        })
        .collect()
}
