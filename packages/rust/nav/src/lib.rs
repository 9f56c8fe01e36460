//! Navigation-tree ingestion for docfuse.
//!
//! Two steps: [`normalize`] turns the loosely-shaped extracted sidebar
//! literal into the closed [`NavNode`](docfuse_shared::NavNode) union, and
//! [`flatten`] turns that tree into the ordered leaf sequence that defines
//! the merged document's reading order.
//!
//! The literal itself is produced by an external, sandboxed extraction
//! step; this crate only consumes the already-parsed JSON value and never
//! evaluates extracted code.

mod flatten;
mod normalize;

pub use flatten::flatten;
pub use normalize::normalize;
