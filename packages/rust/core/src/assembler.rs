//! Merged-document assembly.
//!
//! Pages are concatenated in navigation order under a single document
//! heading. Each enclosing title (document, group sections, leaf title)
//! contributes one level of heading demotion, so a page's own `#` heading
//! always lands below the heading inserted for it.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use docfuse_resolver::rewrite_links;
use docfuse_shared::{FlatLeaf, PageRecord, ProjectProfile};

/// The finished merge for one documentation set.
#[derive(Debug, Clone)]
pub struct DocAssembly {
    /// The merged document text.
    pub text: String,
    /// References that matched no known page, with the page they sit on.
    pub unresolved_links: Vec<UnresolvedLink>,
    /// Logical paths of navigation entries whose file was missing.
    pub missing_pages: Vec<String>,
    /// Count of pages that made it into the document.
    pub page_count: usize,
}

/// One reference left verbatim because it resolved to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub page: String,
    pub target: String,
}

/// Push every markdown heading in `text` down by `levels`.
///
/// A heading marker is a `#` run at line start or after whitespace, which
/// also covers markers that ended up mid-line after upstream processing.
pub fn demote_headings(text: &str, levels: usize) -> String {
    if levels == 0 {
        return text.to_string();
    }
    static HEADING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)(^|\s)(#+)").expect("valid regex"));
    let extra = "#".repeat(levels);
    HEADING_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{}{extra}{}", &caps[1], &caps[2])
        })
        .into_owned()
}

/// Assemble the merged document from loaded pages.
///
/// `records` aligns index-for-index with `leaves`; `None` marks a missing
/// page, already reported by the loader. `known_paths` are the leaves'
/// site paths in navigation order.
pub fn assemble(
    leaves: &[FlatLeaf],
    records: &[Option<PageRecord>],
    missing_pages: Vec<String>,
    profile: &ProjectProfile,
    known_paths: &[String],
) -> DocAssembly {
    let mut pieces = vec![format!("# {}", profile.title())];
    let mut unresolved_links = Vec::new();
    let mut page_count = 0;

    for (leaf, record) in leaves.iter().zip(records) {
        let Some(record) = record else { continue };
        page_count += 1;

        for (level, title) in &leaf.sections {
            pieces.push(format!("{} {title}", "#".repeat(level + 1)));
        }

        // A heading is inserted only for a leaf-declared title; an
        // untitled leaf keeps its body's own first heading as its title.
        let mut demotion = leaf.depth + 1;
        if leaf.title.is_some() {
            pieces.push(format!("{} {}", "#".repeat(leaf.depth + 2), record.title));
            demotion += 1;
        }

        let current_page = profile.site_path(&leaf.path);
        let rewritten = rewrite_links(&record.raw_text, &current_page, known_paths, profile);
        for target in rewritten.unresolved {
            unresolved_links.push(UnresolvedLink {
                page: leaf.path.clone(),
                target,
            });
        }

        // One demotion per enclosing title: the document heading, each
        // titled group, and the leaf title when declared.
        let body = demote_headings(rewritten.text.trim(), demotion);
        if !body.is_empty() {
            pieces.push(body);
        }
    }

    debug!(
        pages = page_count,
        unresolved = unresolved_links.len(),
        "document assembled"
    );

    let mut text = pieces.join("\n\n");
    text.push('\n');
    DocAssembly {
        text,
        unresolved_links,
        missing_pages,
        page_count,
    }
}
