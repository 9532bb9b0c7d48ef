// src/io/mod.rs
pub mod kpoints;
