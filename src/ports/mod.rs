//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `TextSource`: Lecture material input (outline, demo, interpretation)
//! - `NotebookSink`: Assembled notebook output

pub mod notebook_sink;
pub mod text_source;
