//src/model/mod.rs
pub mod crystal;
pub mod layout;
pub mod motif;

// Re-exports for cleaner imports
pub use crystal::Crystal;
pub use layout::{BasisFunction, OrbitalLayout, Spin};
pub use motif::Atom;
