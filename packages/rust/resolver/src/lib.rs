//! Reference resolution and link rewriting for docfuse.
//!
//! [`resolve`] maps one in-page reference to an absolute URL using the
//! overlap heuristic over the set's known page paths; [`rewrite_links`]
//! applies that to every markdown link and inline `<img>` source in a
//! page, leaving unresolvable references verbatim and reporting them.

mod resolve;
mod rewrite;

pub use resolve::{Resolution, resolve};
pub use rewrite::{RewrittenPage, rewrite_links};
