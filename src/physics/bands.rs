// src/physics/bands.rs

use super::system::{System, SystemError};
use nalgebra::{Cholesky, DMatrix, DVector, SymmetricEigen};
use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversion applied to energies of the generalized (non-orthogonal) solve.
pub const AU_TO_EV: f64 = 13.6;

// Largest relative imaginary part accepted on a Cholesky pivot
const PIVOT_TOLERANCE: f64 = 1e-12;

// Lower bound on QR sweeps before declaring non-convergence
const MIN_EIGEN_ITERATIONS: usize = 10_000;

/// Units of [`BandSolution::energies`].
///
/// The generalized solve converts to eV while the orthogonal solve returns
/// the couplings' own units; the tag keeps that difference visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    Native,
    ElectronVolt,
}

/// Bands at one k-point, sorted by ascending energy.
#[derive(Debug, Clone)]
pub struct BandSolution {
    pub k: [f64; 3],
    pub energies: DVector<f64>,
    // Column n is the eigenvector of band n; S-normalized (xᴴ S x = 1) for
    // the generalized solve, so not unit length there
    pub eigenvectors: DMatrix<Complex64>,
    pub unit: EnergyUnit,
}

impl BandSolution {
    pub fn nbands(&self) -> usize {
        self.energies.len()
    }

    pub fn eigenvector(&self, band: usize) -> DVector<Complex64> {
        self.eigenvectors.column(band).into_owned()
    }

    /// Energy difference between `band + 1` and `band`.
    pub fn gap_above(&self, band: usize) -> Option<f64> {
        let lower = self.energies.get(band)?;
        let upper = self.energies.get(band + 1)?;
        Some(upper - lower)
    }

    pub fn into_parts(self) -> (DVector<f64>, DMatrix<Complex64>) {
        (self.energies, self.eigenvectors)
    }
}

/// Hermitian eigenproblem H x = λ x, eigenpairs sorted ascending.
pub fn solve_hermitian(
    h: DMatrix<Complex64>,
    k: &[f64; 3],
) -> Result<(DVector<f64>, DMatrix<Complex64>), SystemError> {
    let max_niter = MIN_EIGEN_ITERATIONS.max(100 * h.nrows());
    let eigen = SymmetricEigen::try_new(h, f64::EPSILON, max_niter).ok_or(SystemError::NonConvergence { k: *k })?;
    Ok(sort_ascending(eigen.eigenvalues, eigen.eigenvectors))
}

/// Generalized eigenproblem H x = λ S x with Hermitian positive-definite S.
///
/// Reduced through the Cholesky factor S = L Lᴴ:
///
/// ```text
/// H' = L⁻¹ H L⁻ᴴ,   H' y = λ y,   x = L⁻ᴴ y
/// ```
///
/// The returned columns satisfy xᴴ S x = I.
pub fn solve_generalized(
    h: DMatrix<Complex64>,
    s: DMatrix<Complex64>,
    k: &[f64; 3],
) -> Result<(DVector<f64>, DMatrix<Complex64>), SystemError> {
    let singular = || SystemError::SingularOverlap { k: *k };

    let l = Cholesky::new(s).ok_or_else(singular)?.l();

    // A negative pivot still factors over the complex field (its square root
    // is imaginary), so positive definiteness is read off the diagonal of L.
    let positive = l
        .diagonal()
        .iter()
        .all(|d| d.re > 0.0 && d.im.abs() <= PIVOT_TOLERANCE * d.norm());
    if !positive {
        return Err(singular());
    }
    let left = l.solve_lower_triangular(&h).ok_or_else(singular)?;
    let reduced = l.solve_lower_triangular(&left.adjoint()).ok_or_else(singular)?;

    // Round-off leaves H' slightly non-Hermitian
    let reduced = (&reduced + reduced.adjoint()) * Complex64::new(0.5, 0.0);

    let (values, y) = solve_hermitian(reduced, k)?;
    let x = l.adjoint().solve_upper_triangular(&y).ok_or_else(singular)?;
    Ok((values, x))
}

fn sort_ascending(values: DVector<f64>, vectors: DMatrix<Complex64>) -> (DVector<f64>, DMatrix<Complex64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let sorted = DVector::from_iterator(order.len(), order.iter().map(|&i| values[i]));
    (sorted, vectors.select_columns(order.iter()))
}

impl System {
    /// Eigenpairs of the Bloch problem at `k`, sorted by energy.
    ///
    /// With overlap data the generalized problem is solved and energies are
    /// converted with [`AU_TO_EV`]; otherwise H(k) is diagonalized directly.
    /// A failed decomposition is fatal for this k-point.
    pub fn solve_bands(&self, k: &[f64; 3], triangular: bool) -> Result<BandSolution, SystemError> {
        let h = self.hamiltonian(k, triangular);

        let (energies, eigenvectors, unit) = match self.overlap(k, triangular) {
            Some(s) => {
                let (values, vectors) = solve_generalized(h, s, k)?;
                (values * AU_TO_EV, vectors, EnergyUnit::ElectronVolt)
            }
            None => {
                let (values, vectors) = solve_hermitian(h, k)?;
                (values, vectors, EnergyUnit::Native)
            }
        };

        Ok(BandSolution {
            k: *k,
            energies,
            eigenvectors,
            unit,
        })
    }

    /// Solve every k-point in parallel, preserving input order.
    ///
    /// The first failing k-point aborts the whole pass; no partial results
    /// are returned.
    pub fn solve_bands_mesh(&self, kpoints: &[[f64; 3]], triangular: bool) -> Result<Vec<BandSolution>, SystemError> {
        log::debug!("Solving bands on {} k-points", kpoints.len());

        kpoints
            .par_iter()
            .map(|k| self.solve_bands(k, triangular))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                log::error!("Band pass aborted: {}", e);
                e
            })
    }

    /// [`System::solve_bands`] with the configured storage convention.
    pub fn solve_bands_at(&self, k: &[f64; 3]) -> Result<BandSolution, SystemError> {
        self.solve_bands(k, self.triangular())
    }

    /// [`System::solve_bands_mesh`] with the configured storage convention.
    pub fn solve_bands_mesh_at(&self, kpoints: &[[f64; 3]]) -> Result<Vec<BandSolution>, SystemError> {
        self.solve_bands_mesh(kpoints, self.triangular())
    }

    /// Band energies only, one row per k-point.
    pub fn band_energies(&self, kpoints: &[[f64; 3]], triangular: bool) -> Result<DMatrix<f64>, SystemError> {
        let solutions = self.solve_bands_mesh(kpoints, triangular)?;
        Ok(DMatrix::from_fn(solutions.len(), self.basisdim(), |i, n| {
            solutions[i].energies[n]
        }))
    }
}
