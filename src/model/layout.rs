// src/model/layout.rs

use super::motif::Atom;
use crate::physics::system::SystemError;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    /// Sz eigenvalue in units of ħ.
    pub fn sz(self) -> f64 {
        match self {
            Spin::Up => 0.5,
            Spin::Down => -0.5,
        }
    }
}

/// Position of one basis function in the spinful orbital basis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasisFunction {
    pub atom: usize,
    // Spatial orbital index within the atom (0..n/2)
    pub orbital: usize,
    pub spin: Spin,
}

/// Orbital bookkeeping for a motif: how many orbitals each species carries
/// and where each atom's block starts in the Bloch basis.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalLayout {
    orbitals: Vec<usize>,
    offsets: Vec<usize>,
    basisdim: usize,
}

impl OrbitalLayout {
    /// Build the layout and check it against the declared basis dimension.
    pub fn new(orbitals: &[usize], motif: &[Atom], declared_basisdim: usize) -> Result<Self, SystemError> {
        let mut offsets = Vec::with_capacity(motif.len());
        let mut basisdim = 0;

        for (i, atom) in motif.iter().enumerate() {
            let norb = *orbitals.get(atom.species).ok_or(SystemError::UnknownSpecies {
                atom: i,
                species: atom.species,
                nspecies: orbitals.len(),
            })?;
            offsets.push(basisdim);
            basisdim += norb;
        }

        if basisdim != declared_basisdim {
            return Err(SystemError::BasisDimensionMismatch {
                declared: declared_basisdim,
                computed: basisdim,
            });
        }

        Ok(Self {
            orbitals: orbitals.to_vec(),
            offsets,
            basisdim,
        })
    }

    pub fn basisdim(&self) -> usize {
        self.basisdim
    }

    pub fn natoms(&self) -> usize {
        self.offsets.len()
    }

    pub fn orbitals(&self) -> &[usize] {
        &self.orbitals
    }

    /// Basis indices belonging to atom `atom`.
    pub fn atom_block(&self, atom: usize) -> Range<usize> {
        let start = self.offsets[atom];
        let end = self.offsets.get(atom + 1).copied().unwrap_or(self.basisdim);
        start..end
    }

    /// Spin-resolved map of every basis function.
    ///
    /// Within an atom block of n functions the first n/2 are spin up and the
    /// last n/2 spin down, with orbital j paired to j + n/2.
    // NOTE: the halving does not hold for every orbital ordering; validate
    // against a reference spectrum before trusting spin-resolved output.
    pub fn spin_basis(&self) -> Result<Vec<BasisFunction>, SystemError> {
        let mut basis = Vec::with_capacity(self.basisdim);
        for atom in 0..self.natoms() {
            let block = self.atom_block(atom);
            let n = block.len();
            if n % 2 != 0 {
                return Err(SystemError::OddOrbitalBlock { atom, norbitals: n });
            }
            let half = n / 2;
            for j in 0..n {
                let (orbital, spin) = if j < half { (j, Spin::Up) } else { (j - half, Spin::Down) };
                basis.push(BasisFunction { atom, orbital, spin });
            }
        }
        Ok(basis)
    }

    /// Pairs of basis indices (up, down) sharing atom and spatial orbital.
    pub fn spin_pairs(&self) -> Result<Vec<(usize, usize)>, SystemError> {
        let mut pairs = Vec::with_capacity(self.basisdim / 2);
        for atom in 0..self.natoms() {
            let block = self.atom_block(atom);
            let n = block.len();
            if n % 2 != 0 {
                return Err(SystemError::OddOrbitalBlock { atom, norbitals: n });
            }
            let half = n / 2;
            for j in 0..half {
                pairs.push((block.start + j, block.start + j + half));
            }
        }
        Ok(pairs)
    }
}
