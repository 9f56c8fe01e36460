//! Core domain types for documentation-set assembly.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NavNode
// ---------------------------------------------------------------------------

/// A normalized navigation-tree node.
///
/// The extracted sidebar literal is loosely shaped (strings vs. objects,
/// `items` vs. `children`, `text` vs. `title`); normalization in
/// `docfuse-nav` collapses all of that into this closed union. Leaves read
/// left-to-right depth-first define the merged document's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavNode {
    /// A reference to exactly one page.
    Leaf(NavLeaf),
    /// A titled (or anonymous) grouping of child nodes.
    Group(NavGroup),
}

/// A navigation leaf: one page reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLeaf {
    /// Logical path relative to the set's content root (may lack an
    /// extension, end in `/`, or carry a `#fragment`).
    pub path: String,
    /// Display title override; when present it becomes an inserted heading
    /// above the page body.
    pub title: Option<String>,
}

/// A navigation group: shared heading over an ordered child sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    /// Group display title (a group without one adds no heading).
    pub title: Option<String>,
    /// Ordered children, exactly as declared.
    pub children: Vec<NavNode>,
}

// ---------------------------------------------------------------------------
// FlatLeaf
// ---------------------------------------------------------------------------

/// Flattener output: one entry per reachable leaf, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLeaf {
    /// Logical path of the page.
    pub path: String,
    /// The leaf's own title, if any.
    pub title: Option<String>,
    /// Nearest enclosing group's title (display fallback for untitled leaves).
    pub group_title: Option<String>,
    /// Count of enclosing group titles; drives heading demotion depth.
    pub depth: usize,
    /// Group headings that open at this leaf, outermost first.
    /// The level is the 1-based count of titles above and including it.
    pub sections: Vec<(usize, String)>,
}

impl FlatLeaf {
    /// Best display title: own, then nearest group, then derived from the
    /// last path segment.
    pub fn display_title(&self) -> String {
        if let Some(t) = &self.title {
            return t.clone();
        }
        if let Some(t) = &self.group_title {
            return t.clone();
        }
        title_from_path(&self.path)
    }
}

/// Extract a human-readable title from a logical path.
pub fn title_from_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/').trim_end_matches(".md");
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);

    if segment.is_empty() || segment == "index" || segment == "README" {
        return "Overview".to_string();
    }

    segment
        .replace('-', " ")
        .replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.collect::<String>())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// PageRecord
// ---------------------------------------------------------------------------

/// One loaded page, immutable after load and owned by the pipeline run
/// that produced it.
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// Logical path as referenced by the navigation tree.
    pub logical_path: String,
    /// Display title (leaf title, group fallback, or path-derived).
    pub title: String,
    /// Raw page text, untouched.
    pub raw_text: String,
}
