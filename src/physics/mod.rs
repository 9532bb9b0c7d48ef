// src/physics/mod.rs
pub mod bands;
pub mod bloch;
pub mod dos;
pub mod kpath;
pub mod spin;
pub mod system;
