//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Lecture material and notebooks both live on
//! the local filesystem.
//!
//! Adapter categories:
//! - `fs`: Source reader and atomic notebook writer

pub mod fs;
