//! Lecture Notebooks - Library Root
//!
//! Builds Jupyter lecture notebooks from a concept outline, a demo script
//! and interpretation notes. Re-exports all modules for integration
//! tests and benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
