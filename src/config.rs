// src/config.rs

use crate::model::{Atom, Crystal};
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

// --- Errors ---

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

// --- System configuration snapshot ---

/// Everything a [`crate::System`] is built from.
///
/// Complex matrices are stored row-major as nested `[re, im]` pairs:
///
/// ```json
/// "hamiltonian": [ [ [[0.0, 0.0], [1.0, 0.0]], [[1.0, 0.0], [0.0, 0.0]] ] ]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SystemConfiguration {
    #[serde(default)]
    pub name: String,

    pub bravais_lattice: Vec<[f64; 3]>,
    pub motif: Vec<Atom>,

    // Orbitals per species, indexed by Atom::species
    pub norbitals: Vec<usize>,
    pub basisdim: usize,
    pub filling: i64,

    // Cartesian translations, one per Hamiltonian slice
    pub bravais_vectors: Vec<[f64; 3]>,

    #[serde(with = "complex_stack")]
    pub hamiltonian: Vec<DMatrix<Complex64>>,

    // Empty for an orthogonal basis
    #[serde(default, with = "complex_stack")]
    pub overlap: Vec<DMatrix<Complex64>>,

    // Couplings hold only their upper triangle (diagonal stored once)
    #[serde(default)]
    pub triangular: bool,
}

impl SystemConfiguration {
    /// Loads a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        log::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Saves the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        log::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    pub fn crystal(&self) -> Crystal {
        Crystal::new(
            self.bravais_lattice.clone(),
            self.motif.clone(),
            self.bravais_vectors.clone(),
        )
    }
}

/// (De)serializes a stack of complex matrices as nested rows.
mod complex_stack {
    use nalgebra::DMatrix;
    use num_complex::Complex64;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    type Rows = Vec<Vec<Complex64>>;

    pub fn serialize<S: Serializer>(stack: &[DMatrix<Complex64>], serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Rows> = stack
            .iter()
            .map(|m| m.row_iter().map(|r| r.iter().copied().collect()).collect())
            .collect();
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<DMatrix<Complex64>>, D::Error> {
        let raw: Vec<Rows> = Vec::deserialize(deserializer)?;
        raw.into_iter()
            .enumerate()
            .map(|(index, rows)| {
                let nrows = rows.len();
                let ncols = rows.first().map_or(0, |r| r.len());
                if rows.iter().any(|r| r.len() != ncols) {
                    return Err(D::Error::custom(format!(
                        "matrix {} has rows of unequal length",
                        index
                    )));
                }
                Ok(DMatrix::from_row_iterator(nrows, ncols, rows.into_iter().flatten()))
            })
            .collect()
    }
}
