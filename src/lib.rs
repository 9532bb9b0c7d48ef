// src/lib.rs

//! Tight-binding electronic structure for excitonic calculations.
//!
//! A [`System`] is built once from a [`SystemConfiguration`] and then answers
//! Bloch-matrix and band queries for arbitrary k-points. Band energies and
//! eigenvectors are the input of the Bethe-Salpeter layer.

pub mod config;
pub mod io;
pub mod model;
pub mod physics;
pub mod utils;

pub use config::{ConfigError, SystemConfiguration};
pub use model::{Atom, Crystal, OrbitalLayout};
pub use physics::bands::{BandSolution, EnergyUnit, AU_TO_EV};
pub use physics::spin::SpinAxis;
pub use physics::system::{System, SystemError};
