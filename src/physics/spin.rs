// src/physics/spin.rs

use super::system::{System, SystemError};
use crate::model::OrbitalLayout;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinAxis {
    X,
    Y,
    Z,
}

/// Spin operator S = σ/2 (ħ = 1) in the Bloch basis.
///
/// Built from [`OrbitalLayout::spin_pairs`], so it follows the layout's
/// up/down convention instead of fixed index ranges.
pub fn spin_operator(layout: &OrbitalLayout, axis: SpinAxis) -> Result<DMatrix<Complex64>, SystemError> {
    let n = layout.basisdim();
    let mut op = DMatrix::<Complex64>::zeros(n, n);

    for (up, down) in layout.spin_pairs()? {
        match axis {
            SpinAxis::X => {
                op[(up, down)] = Complex64::new(0.5, 0.0);
                op[(down, up)] = Complex64::new(0.5, 0.0);
            }
            SpinAxis::Y => {
                op[(up, down)] = Complex64::new(0.0, -0.5);
                op[(down, up)] = Complex64::new(0.0, 0.5);
            }
            SpinAxis::Z => {
                op[(up, up)] = Complex64::new(0.5, 0.0);
                op[(down, down)] = Complex64::new(-0.5, 0.0);
            }
        }
    }

    Ok(op)
}

/// Diagonal of Sz: +1/2 for spin-up functions, -1/2 for spin-down.
pub fn spin_z_labels(layout: &OrbitalLayout) -> Result<DVector<f64>, SystemError> {
    let basis = layout.spin_basis()?;
    Ok(DVector::from_iterator(basis.len(), basis.iter().map(|f| f.spin.sz())))
}

/// ⟨v|S_axis|v⟩ / ⟨v|v⟩.
///
/// Sz uses the elementwise form Re⟨v | v ⊙ s⟩; Sx and Sy only touch the
/// up/down pairs, with z = conj(v_up) v_down:
///
/// ```text
/// ⟨Sx⟩ = Σ Re z,   ⟨Sy⟩ = Σ Im z
/// ```
///
/// Eigenvectors of the generalized solve are S-normalized rather than unit
/// length, hence the division by ⟨v|v⟩. A zero vector gives 0.
pub fn expected_spin(layout: &OrbitalLayout, eigvec: &DVector<Complex64>, axis: SpinAxis) -> Result<f64, SystemError> {
    if eigvec.len() != layout.basisdim() {
        return Err(SystemError::DimensionMismatch {
            expected: layout.basisdim(),
            got: eigvec.len(),
        });
    }

    let norm2 = eigvec.norm_squared();
    if norm2 == 0.0 {
        return Ok(0.0);
    }

    let value = match axis {
        SpinAxis::Z => {
            let labels = spin_z_labels(layout)?;
            let weighted = eigvec.zip_map(&labels, |v, s| v * s);
            eigvec.dotc(&weighted).re
        }
        SpinAxis::X | SpinAxis::Y => {
            let mut total = 0.0;
            for (up, down) in layout.spin_pairs()? {
                let z = eigvec[up].conj() * eigvec[down];
                total += if axis == SpinAxis::X { z.re } else { z.im };
            }
            total
        }
    };

    Ok(value / norm2)
}

impl System {
    /// Expected Sz of a band eigenvector.
    pub fn expected_spin_z(&self, eigvec: &DVector<Complex64>) -> Result<f64, SystemError> {
        expected_spin(self.layout(), eigvec, SpinAxis::Z)
    }

    pub fn expected_spin_x(&self, eigvec: &DVector<Complex64>) -> Result<f64, SystemError> {
        expected_spin(self.layout(), eigvec, SpinAxis::X)
    }

    pub fn expected_spin_y(&self, eigvec: &DVector<Complex64>) -> Result<f64, SystemError> {
        expected_spin(self.layout(), eigvec, SpinAxis::Y)
    }

    pub fn spin_operator(&self, axis: SpinAxis) -> Result<DMatrix<Complex64>, SystemError> {
        spin_operator(self.layout(), axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Atom;
    use crate::physics::system::tests::chain_config;
    use crate::utils::linalg::is_hermitian;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    // Species 0 carries 2 orbitals (s up/down), species 1 carries 6 (p up/down)
    fn layout() -> OrbitalLayout {
        let motif = vec![Atom::new([0.0, 0.0, 0.0], 0), Atom::new([1.0, 0.0, 0.0], 1)];
        OrbitalLayout::new(&[2, 6], &motif, 8).unwrap()
    }

    fn basis_vector(n: usize, i: usize) -> DVector<Complex64> {
        let mut v = DVector::<Complex64>::zeros(n);
        v[i] = c(1.0, 0.0);
        v
    }

    #[test]
    fn test_sz_pure_states() {
        let system = System::new(chain_config(1.0)).unwrap();
        let up = basis_vector(2, 0);
        let down = basis_vector(2, 1);
        assert!((system.expected_spin_z(&up).unwrap() - 0.5).abs() < 1e-12);
        assert!((system.expected_spin_z(&down).unwrap() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sz_second_atom_block() {
        let layout = layout();
        // p-up orbitals of the second atom are basis functions 2..5
        let mut v = DVector::<Complex64>::zeros(8);
        v[2] = c(0.6, 0.0);
        v[4] = c(0.0, 0.8);
        assert!((expected_spin(&layout, &v, SpinAxis::Z).unwrap() - 0.5).abs() < 1e-12);

        let down = basis_vector(8, 6);
        assert!((expected_spin(&layout, &down, SpinAxis::Z).unwrap() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_transverse_components() {
        let system = System::new(chain_config(1.0)).unwrap();
        let r = 0.5f64.sqrt();

        let plus_x = DVector::from_vec(vec![c(r, 0.0), c(r, 0.0)]);
        let minus_x = DVector::from_vec(vec![c(r, 0.0), c(-r, 0.0)]);
        let plus_y = DVector::from_vec(vec![c(r, 0.0), c(0.0, r)]);

        assert!((system.expected_spin_x(&plus_x).unwrap() - 0.5).abs() < 1e-12);
        assert!((system.expected_spin_x(&minus_x).unwrap() + 0.5).abs() < 1e-12);
        assert!(system.expected_spin_y(&plus_x).unwrap().abs() < 1e-12);
        assert!((system.expected_spin_y(&plus_y).unwrap() - 0.5).abs() < 1e-12);
        assert!(system.expected_spin_z(&plus_y).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_operators_match_direct_expectation() {
        let layout = layout();
        let v = DVector::from_vec(vec![
            c(0.1, 0.2),
            c(-0.3, 0.1),
            c(0.2, 0.0),
            c(0.0, -0.4),
            c(0.1, 0.1),
            c(0.5, -0.2),
            c(-0.2, 0.3),
            c(0.3, 0.1),
        ]);
        let v = &v / Complex64::new(v.norm(), 0.0);

        for axis in [SpinAxis::X, SpinAxis::Y, SpinAxis::Z] {
            let op = spin_operator(&layout, axis).unwrap();
            assert!(is_hermitian(&op, 1e-14));

            let from_operator = v.dotc(&(&op * &v)).re;
            let direct = expected_spin(&layout, &v, axis).unwrap();
            assert!((from_operator - direct).abs() < 1e-12, "{:?}", axis);
        }
    }

    #[test]
    fn test_spin_algebra() {
        // [Sx, Sy] = i Sz
        let layout = layout();
        let sx = spin_operator(&layout, SpinAxis::X).unwrap();
        let sy = spin_operator(&layout, SpinAxis::Y).unwrap();
        let sz = spin_operator(&layout, SpinAxis::Z).unwrap();

        let commutator = &sx * &sy - &sy * &sx;
        assert!((commutator - sz * c(0.0, 1.0)).norm() < 1e-14);
    }

    fn overlap_system(h: DMatrix<Complex64>) -> System {
        // Single 2-orbital atom with S = 2·I, so eigenvectors have norm 1/√2
        let mut config = chain_config(1.0);
        config.bravais_vectors = vec![[0.0, 0.0, 0.0]];
        config.hamiltonian = vec![h];
        config.overlap = vec![DMatrix::identity(2, 2) * c(2.0, 0.0)];
        System::new(config).unwrap()
    }

    #[test]
    fn test_spin_of_generalized_eigenvectors() {
        let gamma = [0.0, 0.0, 0.0];

        let sz_system = overlap_system(DMatrix::from_row_slice(2, 2, &[c(-1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)]));
        let bands = sz_system.solve_bands(&gamma, false).unwrap();
        let lowest = bands.eigenvector(0);
        assert!((lowest.norm() - 0.5f64.sqrt()).abs() < 1e-12);
        assert!((sz_system.expected_spin_z(&lowest).unwrap() - 0.5).abs() < 1e-12);
        assert!((sz_system.expected_spin_z(&bands.eigenvector(1)).unwrap() + 0.5).abs() < 1e-12);

        // H = σx: lowest state points along -x
        let sx_system = overlap_system(DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)]));
        let lowest = sx_system.solve_bands(&gamma, false).unwrap().eigenvector(0);
        assert!((sx_system.expected_spin_x(&lowest).unwrap() + 0.5).abs() < 1e-10);
        assert!(sx_system.expected_spin_y(&lowest).unwrap().abs() < 1e-10);
        assert!(sx_system.expected_spin_z(&lowest).unwrap().abs() < 1e-10);

        // H = σy: lowest state points along -y
        let sy_system = overlap_system(DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)]));
        let lowest = sy_system.solve_bands(&gamma, false).unwrap().eigenvector(0);
        assert!((sy_system.expected_spin_y(&lowest).unwrap() + 0.5).abs() < 1e-10);
        assert!(sy_system.expected_spin_x(&lowest).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_zero_vector() {
        let system = System::new(chain_config(1.0)).unwrap();
        let v = DVector::<Complex64>::zeros(2);
        assert_eq!(system.expected_spin_x(&v).unwrap(), 0.0);
        assert_eq!(system.expected_spin_z(&v).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let system = System::new(chain_config(1.0)).unwrap();
        let v = DVector::<Complex64>::zeros(3);
        assert!(matches!(
            system.expected_spin_z(&v),
            Err(SystemError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_odd_block_fails_loudly() {
        let motif = vec![Atom::new([0.0, 0.0, 0.0], 0)];
        let layout = OrbitalLayout::new(&[3], &motif, 3).unwrap();
        let v = basis_vector(3, 0);
        for axis in [SpinAxis::X, SpinAxis::Y, SpinAxis::Z] {
            assert!(matches!(
                expected_spin(&layout, &v, axis),
                Err(SystemError::OddOrbitalBlock { .. })
            ));
        }
    }
}
