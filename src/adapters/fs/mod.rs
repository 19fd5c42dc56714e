//! Filesystem Adapters
//!
//! Sub-modules:
//! - `source`: Lecture material reader (`TextSource`)
//! - `notebook_writer`: Atomic `.ipynb` writer (`NotebookSink`)

pub mod notebook_writer;
pub mod source;

pub use notebook_writer::NotebookWriter;
pub use source::FsTextSource;
