// src/model/motif.rs
use serde::{Deserialize, Serialize};

/// An atom of the unit cell motif.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    // Cartesian position inside the reference cell
    pub position: [f64; 3],
    // Index into the orbital-count table (see OrbitalLayout)
    pub species: usize,
}

impl Atom {
    pub fn new(position: [f64; 3], species: usize) -> Self {
        Self { position, species }
    }
}

/// Number of atoms of each species, indexed by species.
pub fn species_counts(motif: &[Atom]) -> Vec<usize> {
    let nspecies = motif.iter().map(|a| a.species + 1).max().unwrap_or(0);
    let mut counts = vec![0; nspecies];
    for atom in motif {
        counts[atom.species] += 1;
    }
    counts
}
