//! End-to-end assembly pipeline for one documentation set.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use docfuse_shared::{DocfuseError, ProjectProfile, Result};

use crate::assembler::{DocAssembly, assemble};
use crate::loader::{FileReader, load_pages};
use crate::progress::ProgressReporter;

/// Run the whole pipeline: normalize and flatten the navigation tree,
/// load every page, rewrite links, and assemble the merged document.
///
/// `tree` is the extracted sidebar literal, already parsed to JSON.
/// Missing pages and unresolved links are collected on the returned
/// [`DocAssembly`], not raised as errors.
#[instrument(skip_all, fields(set = %profile.id))]
pub async fn assemble_documentation(
    tree: &serde_json::Value,
    profile: &ProjectProfile,
    reader: Arc<dyn FileReader>,
    concurrency: usize,
    progress: &dyn ProgressReporter,
) -> Result<DocAssembly> {
    profile.validate()?;

    let nodes = docfuse_nav::normalize(tree)?;
    let leaves = docfuse_nav::flatten(&nodes);
    // An empty tree is valid input: the merge is a header-only document.
    if leaves.is_empty() {
        warn!(set = %profile.id, "navigation tree contains no pages");
    }
    progress.begin(leaves.len());

    let known_paths: Vec<String> = leaves
        .iter()
        .map(|leaf| profile.site_path(&leaf.path))
        .collect();

    let (records, missing) = load_pages(&leaves, profile, reader, concurrency, progress).await?;
    let assembly = assemble(&leaves, &records, missing, profile, &known_paths);

    info!(
        pages = assembly.page_count,
        missing = assembly.missing_pages.len(),
        unresolved = assembly.unresolved_links.len(),
        "documentation set assembled"
    );
    progress.finish(&format!(
        "{}: {} pages merged",
        profile.id, assembly.page_count
    ));
    Ok(assembly)
}

/// Write the merged document under `out_dir` and return its path.
///
/// The filename derives from the set identifier with path separators
/// flattened, e.g. `@pinia/root` becomes `pinia-root-merged.md`.
pub fn write_document(out_dir: &Path, profile: &ProjectProfile, text: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir).map_err(|e| DocfuseError::io(out_dir, e))?;
    let path = out_dir.join(format!("{}-merged.md", profile.file_stem()));
    std::fs::write(&path, text).map_err(|e| DocfuseError::io(&path, e))?;
    info!(path = %path.display(), "merged document written");
    Ok(path)
}
