//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the notebook build workflow.
//!
//! Use cases:
//! - `NotebookBuilder`: Read lecture sources, assemble, write notebooks

pub mod notebook_builder;
