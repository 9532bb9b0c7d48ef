// src/physics/bloch.rs

use super::system::System;
use crate::utils::linalg::dot3;
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Fourier sum of a coupling stack
///
/// **Formula**: M(k) = Σ_i exp(i k·R_i) M_i
///
/// `translations` and `stack` are zipped, so callers must have checked that
/// their lengths agree (System::new does).
pub fn bloch_sum(
    translations: &[[f64; 3]],
    stack: &[DMatrix<Complex64>],
    k: &[f64; 3],
    basisdim: usize,
) -> DMatrix<Complex64> {
    let mut m = DMatrix::<Complex64>::zeros(basisdim, basisdim);
    for (cell, slice) in translations.iter().zip(stack) {
        let phase = Complex64::from_polar(1.0, dot3(k, cell));
        m.zip_apply(slice, |acc, x| *acc += x * phase);
    }
    m
}

/// Recover a full Hermitian matrix from upper-triangular storage.
///
/// Adding the conjugate transpose would count the diagonal twice, so it is
/// halved first.
pub fn symmetrize_half_storage(mut m: DMatrix<Complex64>) -> DMatrix<Complex64> {
    for i in 0..m.nrows().min(m.ncols()) {
        m[(i, i)] *= 0.5;
    }
    let adjoint = m.adjoint();
    m + adjoint
}

impl System {
    /// Bloch Hamiltonian H(k).
    ///
    /// `triangular` marks couplings stored as their upper triangle only (see
    /// [`symmetrize_half_storage`]); k is used as given, without folding into
    /// the first zone.
    pub fn hamiltonian(&self, k: &[f64; 3], triangular: bool) -> DMatrix<Complex64> {
        self.bloch_matrix(self.hamiltonian_stack(), k, triangular)
    }

    /// Bloch overlap S(k), or None for an orthogonal basis.
    pub fn overlap(&self, k: &[f64; 3], triangular: bool) -> Option<DMatrix<Complex64>> {
        if self.is_orthogonal() {
            return None;
        }
        Some(self.bloch_matrix(self.overlap_stack(), k, triangular))
    }

    /// H(k) using the storage convention declared in the configuration.
    pub fn hamiltonian_at(&self, k: &[f64; 3]) -> DMatrix<Complex64> {
        self.hamiltonian(k, self.triangular())
    }

    /// S(k) using the storage convention declared in the configuration.
    pub fn overlap_at(&self, k: &[f64; 3]) -> Option<DMatrix<Complex64>> {
        self.overlap(k, self.triangular())
    }

    fn bloch_matrix(&self, stack: &[DMatrix<Complex64>], k: &[f64; 3], triangular: bool) -> DMatrix<Complex64> {
        let m = bloch_sum(&self.crystal().translations, stack, k, self.basisdim());
        if triangular {
            symmetrize_half_storage(m)
        } else {
            m
        }
    }
}
