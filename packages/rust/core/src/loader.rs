//! Concurrent page loading.
//!
//! Logical navigation paths are mapped to on-disk storage paths, then the
//! page bodies are read through a [`FileReader`] with bounded concurrency.
//! A missing page is not fatal: it is skipped and reported, so one stale
//! navigation entry cannot sink an otherwise-good merge.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use docfuse_shared::{DocfuseError, FlatLeaf, PageRecord, ProjectProfile, Result};

use crate::progress::ProgressReporter;

/// Abstraction over page storage, so the pipeline can be driven from the
/// filesystem in production and from memory in tests.
pub trait FileReader: Send + Sync {
    fn read(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads pages from a directory on disk.
pub struct FsReader {
    base: PathBuf,
}

impl FsReader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(self.base.join(path))
    }
}

/// Map a logical navigation path to the page's storage path under the
/// profile's content root.
///
/// `.md` paths are taken as-is; `.html` paths are stored as `.md`;
/// directory paths (trailing `/`) resolve to the profile's index-file
/// convention; anything else gains a `.md` suffix.
pub fn storage_path(profile: &ProjectProfile, logical: &str) -> PathBuf {
    // Drop a stray fragment; it has no on-disk counterpart.
    let relative = match logical.split_once('#') {
        Some((path, _)) => path,
        None => logical,
    };
    let relative = relative.trim_start_matches('/');
    let file = if relative.ends_with(".md") {
        relative.to_string()
    } else if let Some(stem) = relative.strip_suffix(".html") {
        format!("{stem}.md")
    } else if relative.is_empty() || relative.ends_with('/') {
        format!("{relative}{}", profile.index_file.filename())
    } else {
        format!("{relative}.md")
    };
    Path::new(&profile.content_root).join(file)
}

/// Load every page in navigation order.
///
/// Returns the loaded records plus the logical paths of pages whose file
/// was missing. Order of the records matches the leaf order exactly.
#[instrument(skip_all, fields(set = %profile.id, pages = leaves.len()))]
pub async fn load_pages(
    leaves: &[FlatLeaf],
    profile: &ProjectProfile,
    reader: Arc<dyn FileReader>,
    concurrency: usize,
    progress: &dyn ProgressReporter,
) -> Result<(Vec<Option<PageRecord>>, Vec<String>)> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(leaves.len());

    for leaf in leaves {
        let semaphore = Arc::clone(&semaphore);
        let reader = Arc::clone(&reader);
        let path = storage_path(profile, &leaf.path);
        let logical = leaf.path.clone();
        let title = leaf.display_title();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| DocfuseError::validation(format!("load pool closed: {e}")))?;
            // Reads are blocking; keep them off the runtime workers.
            let read_path = path.clone();
            let read = tokio::task::spawn_blocking(move || reader.read(&read_path))
                .await
                .map_err(|e| DocfuseError::validation(format!("read task panicked: {e}")))?;
            match read {
                Ok(raw_text) => Ok(Some(PageRecord {
                    logical_path: logical,
                    title,
                    raw_text,
                })),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(path = %path.display(), logical, "page file missing, skipping");
                    Ok(None)
                }
                Err(e) => Err(DocfuseError::io(path, e)),
            }
        }));
    }

    let mut records = Vec::with_capacity(leaves.len());
    let mut missing = Vec::new();
    for (leaf, handle) in leaves.iter().zip(handles) {
        let loaded = handle
            .await
            .map_err(|e| DocfuseError::validation(format!("load task panicked: {e}")))??;
        if loaded.is_none() {
            missing.push(leaf.path.clone());
        }
        progress.page_done(&leaf.path);
        records.push(loaded);
    }

    debug!(
        loaded = records.iter().filter(|r| r.is_some()).count(),
        missing = missing.len(),
        "page load complete"
    );
    Ok((records, missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::collections::HashMap;

    use docfuse_shared::IndexConvention;

    use crate::progress::SilentProgress;
    use crate::testutil::MapReader;

    fn profile(index_file: IndexConvention) -> ProjectProfile {
        ProjectProfile {
            id: "test-docs".into(),
            display_name: None,
            content_root: "docs".into(),
            host: "https://example.org".into(),
            root_segment: None,
            index_file,
            nav_file: None,
            image_overrides: BTreeMap::new(),
            html_exceptions: Vec::new(),
        }
    }

    #[test]
    fn storage_path_conventions() {
        let p = profile(IndexConvention::Index);
        assert_eq!(storage_path(&p, "/guide/intro.md"), Path::new("docs/guide/intro.md"));
        assert_eq!(storage_path(&p, "/guide/intro.html"), Path::new("docs/guide/intro.md"));
        assert_eq!(storage_path(&p, "/guide/intro"), Path::new("docs/guide/intro.md"));
        assert_eq!(storage_path(&p, "/guide/"), Path::new("docs/guide/index.md"));
        assert_eq!(storage_path(&p, "/"), Path::new("docs/index.md"));

        let readme = profile(IndexConvention::Readme);
        assert_eq!(storage_path(&readme, "/guide/"), Path::new("docs/guide/README.md"));
    }

    #[test]
    fn storage_path_drops_fragments() {
        let p = profile(IndexConvention::Index);
        assert_eq!(
            storage_path(&p, "/guide/intro#options"),
            Path::new("docs/guide/intro.md")
        );
        assert_eq!(
            storage_path(&p, "/guide/#top"),
            Path::new("docs/guide/index.md")
        );
    }

    #[tokio::test]
    async fn missing_pages_are_collected_not_fatal() {
        let p = profile(IndexConvention::Index);
        let reader = Arc::new(MapReader(HashMap::from([(
            PathBuf::from("docs/here.md"),
            "content".to_string(),
        )])));
        let leaves = vec![
            FlatLeaf {
                path: "/here".into(),
                title: None,
                group_title: None,
                depth: 0,
                sections: Vec::new(),
            },
            FlatLeaf {
                path: "/gone".into(),
                title: None,
                group_title: None,
                depth: 0,
                sections: Vec::new(),
            },
        ];

        let (records, missing) = load_pages(&leaves, &p, reader, 4, &SilentProgress)
            .await
            .expect("load");
        assert_eq!(records.len(), 2);
        assert!(records[0].is_some());
        assert!(records[1].is_none());
        assert_eq!(missing, vec!["/gone".to_string()]);
    }

    #[tokio::test]
    async fn records_preserve_navigation_order() {
        let p = profile(IndexConvention::Index);
        let mut files = HashMap::new();
        let mut leaves = Vec::new();
        for i in 0..20 {
            files.insert(PathBuf::from(format!("docs/p{i}.md")), format!("body {i}"));
            leaves.push(FlatLeaf {
                path: format!("/p{i}"),
                title: None,
                group_title: None,
                depth: 0,
                sections: Vec::new(),
            });
        }

        let (records, missing) = load_pages(&leaves, &p, Arc::new(MapReader(files)), 3, &SilentProgress)
            .await
            .expect("load");
        assert!(missing.is_empty());
        for (i, record) in records.iter().enumerate() {
            let record = record.as_ref().expect("record present");
            assert_eq!(record.logical_path, format!("/p{i}"));
            assert_eq!(record.raw_text, format!("body {i}"));
        }
    }
}
