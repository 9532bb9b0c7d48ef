// src/model/crystal.rs

use super::motif::Atom;
use crate::utils::linalg::{frac_to_cart, reciprocal_lattice};
use serde::{Deserialize, Serialize};

/// Unit cell geometry, motif and the list of cells entering real-space sums.
///
/// Coordinates:
/// - Bravais vectors and translations are Cartesian
/// - the number of Bravais vectors fixes the dimensionality (1, 2 or 3)
/// - `translations[i]` is the cell whose couplings are stored in slice `i`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Crystal {
    pub bravais_lattice: Vec<[f64; 3]>,
    pub motif: Vec<Atom>,
    pub translations: Vec<[f64; 3]>,
}

impl Crystal {
    pub fn new(bravais_lattice: Vec<[f64; 3]>, motif: Vec<Atom>, translations: Vec<[f64; 3]>) -> Self {
        Self {
            bravais_lattice,
            motif,
            translations,
        }
    }

    pub fn ndim(&self) -> usize {
        self.bravais_lattice.len()
    }

    pub fn natoms(&self) -> usize {
        self.motif.len()
    }

    pub fn ncells(&self) -> usize {
        self.translations.len()
    }

    /// Reciprocal vectors, one per Bravais vector (2π convention).
    pub fn reciprocal_lattice(&self) -> Option<Vec<[f64; 3]>> {
        reciprocal_lattice(&self.bravais_lattice)
    }

    /// Length, area or volume of the unit cell depending on dimensionality.
    pub fn cell_measure(&self) -> f64 {
        let v: Vec<nalgebra::Vector3<f64>> = self
            .bravais_lattice
            .iter()
            .map(|a| nalgebra::Vector3::from(*a))
            .collect();
        match v.len() {
            1 => v[0].norm(),
            2 => v[0].cross(&v[1]).norm(),
            3 => v[0].cross(&v[1]).dot(&v[2]).abs(),
            _ => 0.0,
        }
    }

    /// Uniform mesh of n^ndim k-points spanning the reciprocal cell.
    ///
    /// k = Σ_j (m_j / n) b_j with m_j = 0..n-1, ordered with the first
    /// reciprocal vector varying slowest. Returns an empty mesh for n = 0 or
    /// a degenerate lattice.
    pub fn brillouin_zone_mesh(&self, n: usize) -> Vec<[f64; 3]> {
        let recip = match self.reciprocal_lattice() {
            Some(r) => r,
            None => return Vec::new(),
        };
        if n == 0 {
            return Vec::new();
        }

        let ndim = recip.len();
        let total = n.pow(ndim as u32);
        let mut mesh = Vec::with_capacity(total);
        let mut coeffs = vec![0.0; ndim];

        for idx in 0..total {
            let mut rest = idx;
            for j in (0..ndim).rev() {
                coeffs[j] = (rest % n) as f64 / n as f64;
                rest /= n;
            }
            mesh.push(frac_to_cart(&coeffs, &recip));
        }

        mesh
    }

    /// Cartesian k-point from reduced reciprocal coordinates.
    pub fn reduced_to_cartesian_k(&self, reduced: [f64; 3]) -> Option<[f64; 3]> {
        let recip = self.reciprocal_lattice()?;
        Some(frac_to_cart(&reduced, &recip))
    }
}
