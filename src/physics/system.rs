// src/physics/system.rs

use crate::config::{ConfigError, SystemConfiguration};
use crate::model::{Crystal, OrbitalLayout};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::path::Path;

// --- Errors ---

/// Errors raised while building a [`System`] or solving its bands.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Number of unit cells ({cells}) does not match number of Hamiltonian matrices ({matrices})")]
    CellCountMismatch { cells: usize, matrices: usize },

    #[error("Number of overlap matrices ({overlaps}) does not match number of Hamiltonian matrices ({matrices})")]
    OverlapCountMismatch { overlaps: usize, matrices: usize },

    #[error("{stack} matrix {index} is {rows}x{cols}, expected {expected}x{expected}")]
    MatrixShape {
        stack: &'static str,
        index: usize,
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("Orbital table gives basis dimension {computed}, declared {declared}")]
    BasisDimensionMismatch { declared: usize, computed: usize },

    #[error("Atom {atom} has species {species}, but orbitals are only given for {nspecies} species")]
    UnknownSpecies { atom: usize, species: usize, nspecies: usize },

    #[error("Filling must be a positive integer (got {0})")]
    InvalidFilling(i64),

    #[error("Eigensolver did not converge at k = {k:?}")]
    NonConvergence { k: [f64; 3] },

    #[error("Overlap matrix is not positive definite at k = {k:?}")]
    SingularOverlap { k: [f64; 3] },

    #[error("Atom {atom} has {norbitals} orbitals; spin blocks need an even count")]
    OddOrbitalBlock { atom: usize, norbitals: usize },

    #[error("Vector has length {got}, basis dimension is {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// --- System ---

/// Tight-binding system: real-space couplings plus the bookkeeping needed to
/// turn them into Bloch matrices.
///
/// Built once from a [`SystemConfiguration`]; afterwards only the filling
/// may change (see [`System::set_filling`]).
#[derive(Debug, Clone)]
pub struct System {
    name: String,
    crystal: Crystal,
    layout: OrbitalLayout,
    hamiltonians: Vec<DMatrix<Complex64>>,
    overlaps: Vec<DMatrix<Complex64>>,
    filling: usize,
    fermi_level: usize,
    triangular: bool,
}

impl System {
    /// Validate a configuration snapshot and take ownership of its matrices.
    pub fn new(config: SystemConfiguration) -> Result<Self, SystemError> {
        let crystal = config.crystal();
        let layout = OrbitalLayout::new(&config.norbitals, &crystal.motif, config.basisdim)?;
        let basisdim = layout.basisdim();

        if config.hamiltonian.len() != crystal.ncells() {
            return Err(SystemError::CellCountMismatch {
                cells: crystal.ncells(),
                matrices: config.hamiltonian.len(),
            });
        }
        if !config.overlap.is_empty() && config.overlap.len() != config.hamiltonian.len() {
            return Err(SystemError::OverlapCountMismatch {
                overlaps: config.overlap.len(),
                matrices: config.hamiltonian.len(),
            });
        }
        check_shapes("Hamiltonian", &config.hamiltonian, basisdim)?;
        check_shapes("Overlap", &config.overlap, basisdim)?;

        if config.filling <= 0 {
            return Err(SystemError::InvalidFilling(config.filling));
        }
        let filling = config.filling as usize;

        let system = Self {
            name: config.name,
            crystal,
            layout,
            hamiltonians: config.hamiltonian,
            overlaps: config.overlap,
            filling,
            fermi_level: filling - 1,
            triangular: config.triangular,
        };

        log::info!(
            "System '{}' initialized: {} atoms, {} orbitals, {} cells, {} basis",
            system.name,
            system.crystal.natoms(),
            basisdim,
            system.ncells(),
            if system.is_orthogonal() { "orthogonal" } else { "non-orthogonal" }
        );

        Ok(system)
    }

    /// Load a JSON configuration and build the system from it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SystemError> {
        let config = SystemConfiguration::load(path)?;
        Self::new(config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn crystal(&self) -> &Crystal {
        &self.crystal
    }

    pub fn layout(&self) -> &OrbitalLayout {
        &self.layout
    }

    pub fn basisdim(&self) -> usize {
        self.layout.basisdim()
    }

    pub fn ncells(&self) -> usize {
        self.crystal.ncells()
    }

    pub fn filling(&self) -> usize {
        self.filling
    }

    /// Index of the highest occupied band.
    pub fn fermi_level(&self) -> usize {
        self.fermi_level
    }

    /// Whether the configuration declared upper-triangular storage.
    pub fn triangular(&self) -> bool {
        self.triangular
    }

    pub fn is_orthogonal(&self) -> bool {
        self.overlaps.is_empty()
    }

    pub fn hamiltonian_stack(&self) -> &[DMatrix<Complex64>] {
        &self.hamiltonians
    }

    pub fn overlap_stack(&self) -> &[DMatrix<Complex64>] {
        &self.overlaps
    }

    /// Change the electron count per cell.
    ///
    /// Non-positive values are rejected with a warning and leave the
    /// filling and Fermi level untouched.
    pub fn set_filling(&mut self, filling: i64) -> Result<(), SystemError> {
        if filling <= 0 {
            log::warn!("Filling must be a positive integer (got {}); keeping {}", filling, self.filling);
            return Err(SystemError::InvalidFilling(filling));
        }
        self.filling = filling as usize;
        self.fermi_level = self.filling - 1;
        Ok(())
    }
}

fn check_shapes(stack: &'static str, matrices: &[DMatrix<Complex64>], basisdim: usize) -> Result<(), SystemError> {
    for (index, m) in matrices.iter().enumerate() {
        if m.nrows() != basisdim || m.ncols() != basisdim {
            return Err(SystemError::MatrixShape {
                stack,
                index,
                rows: m.nrows(),
                cols: m.ncols(),
                expected: basisdim,
            });
        }
    }
    Ok(())
}
