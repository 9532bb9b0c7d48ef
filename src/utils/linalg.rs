// src/utils/linalg.rs

use nalgebra::{DMatrix, Matrix3, Vector3};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Convert reduced coordinates to Cartesian using a (possibly partial) basis
///
/// # Arguments
/// * `frac` - Coefficients along each basis vector
/// * `basis` - Basis vectors as rows [[ax, ay, az], [bx, by, bz], ...]
///
/// # Formula
/// ```text
/// Cartesian = Σ_i frac_i · basis_i
/// ```
///
/// Extra coefficients beyond the number of basis vectors are ignored.
pub fn frac_to_cart(frac: &[f64], basis: &[[f64; 3]]) -> [f64; 3] {
    let mut cart = Vector3::zeros();
    for (c, v) in frac.iter().zip(basis) {
        cart += Vector3::from(*v) * *c;
    }
    [cart.x, cart.y, cart.z]
}

/// Reciprocal basis of a 1, 2 or 3 dimensional Bravais lattice
///
/// Satisfies `b_i · a_j = 2π δ_ij`. Lower-dimensional lattices are completed
/// with unit vectors orthogonal to the given ones before inversion, so the
/// returned vectors lie in the span of the direct ones.
///
/// # Returns
/// One reciprocal vector per direct vector, or None for degenerate input
pub fn reciprocal_lattice(basis: &[[f64; 3]]) -> Option<Vec<[f64; 3]>> {
    let ndim = basis.len();
    if ndim == 0 || ndim > 3 {
        return None;
    }

    let mut rows: Vec<Vector3<f64>> = basis.iter().map(|v| Vector3::from(*v)).collect();
    match ndim {
        1 => {
            let a = rows[0];
            // Any vector not parallel to a seeds the orthogonal completion
            let seed = if a.x.abs() < 0.9 * a.norm() {
                Vector3::x()
            } else {
                Vector3::y()
            };
            let n1 = a.cross(&seed).try_normalize(1e-12)?;
            let n2 = a.cross(&n1).try_normalize(1e-12)?;
            rows.push(n1);
            rows.push(n2);
        }
        2 => {
            let n = rows[0].cross(&rows[1]).try_normalize(1e-12)?;
            rows.push(n);
        }
        _ => {}
    }

    // Rows of A are direct vectors: B = 2π (A^T)^-1
    let a = Matrix3::from_rows(&[rows[0].transpose(), rows[1].transpose(), rows[2].transpose()]);
    if a.determinant().abs() < 1e-12 {
        return None;
    }
    let b = a.transpose().try_inverse()? * (2.0 * PI);

    Some(
        (0..ndim)
            .map(|i| [b[(i, 0)], b[(i, 1)], b[(i, 2)]])
            .collect(),
    )
}

pub fn dot3(u: &[f64; 3], v: &[f64; 3]) -> f64 {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

/// Largest elementwise deviation between `m` and its conjugate transpose.
pub fn hermiticity_error(m: &DMatrix<Complex64>) -> f64 {
    if !m.is_square() {
        return f64::INFINITY;
    }
    let adj = m.adjoint();
    m.iter()
        .zip(adj.iter())
        .map(|(a, b)| (a - b).norm())
        .fold(0.0, f64::max)
}

pub fn is_hermitian(m: &DMatrix<Complex64>, tol: f64) -> bool {
    hermiticity_error(m) <= tol
}
