//! Domain layer - lecture text processing and notebook assembly.
//!
//! Pure functions over source text: no file or network I/O happens here.
//! Missing text is an empty string and every parser tolerates it.

pub mod assembler;
pub mod code_blocks;
pub mod error;
pub mod interpretation;
pub mod notebook;
pub mod outline;
pub mod plan;

// Re-export core types for convenience
pub use assembler::{Assembler, Assembly, LectureSources};
pub use code_blocks::{CodeBlock, CodePartition, MarkerPattern, DEFAULT_MARKER_PATTERN};
pub use error::AssemblyError;
pub use interpretation::{ExcerptRule, InterpretationDoc, PrintedOutput};
pub use notebook::{Cell, CellKind, Notebook, NotebookMetadata};
pub use outline::{lecture_body, Concept, ConceptOutline};
pub use plan::{
    AssemblyPlan, ClosingItem, CommentaryDefault, CommentaryRule, ConceptLink, LeadConcept,
};
