//! Pipeline crate for docfuse: page loading, link rewriting, and
//! merged-document assembly for one documentation set at a time.

mod assembler;
mod loader;
mod pipeline;
mod progress;

pub use assembler::{DocAssembly, UnresolvedLink, demote_headings};
pub use loader::{FileReader, FsReader, storage_path};
pub use pipeline::{assemble_documentation, write_document};
pub use progress::{ProgressReporter, SilentProgress};
