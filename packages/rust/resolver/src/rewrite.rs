//! In-place rewriting of markdown link and image targets.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use docfuse_shared::ProjectProfile;

use crate::resolve::{Resolution, resolve};

/// One page's text after link rewriting, plus the references that
/// matched no known page (left verbatim in the text).
#[derive(Debug, Clone)]
pub struct RewrittenPage {
    pub text: String,
    pub unresolved: Vec<String>,
}

/// Markdown link targets, covering both `[..](..)` and `![..](..)`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(([^)]+)\)").expect("valid regex"));

/// Inline HTML image sources.
static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]*?src="([^"]+)""#).expect("valid regex"));

/// Rewrite every resolvable reference in `text` to an absolute URL.
///
/// Each distinct target is resolved once and every occurrence replaced,
/// except occurrences wrapped in braces (`{#anchor}` custom-id syntax),
/// which are heading metadata rather than links. Unresolvable targets
/// stay verbatim and are reported in [`RewrittenPage::unresolved`].
pub fn rewrite_links(
    text: &str,
    current_page: &str,
    known_paths: &[String],
    profile: &ProjectProfile,
) -> RewrittenPage {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut targets: Vec<&str> = Vec::new();
    for caps in LINK_RE.captures_iter(text).chain(IMG_RE.captures_iter(text)) {
        if let Some(m) = caps.get(1) {
            let target = m.as_str();
            if !skip_target(target) && seen.insert(target) {
                targets.push(target);
            }
        }
    }

    let mut rewritten = text.to_string();
    let mut unresolved = Vec::new();
    for target in targets {
        match resolve(target, current_page, known_paths, profile) {
            Resolution::Url(url) => {
                rewritten = replace_unbraced(&rewritten, target, &url);
            }
            Resolution::Keep => {}
            Resolution::Unresolved => unresolved.push(target.to_string()),
        }
    }

    if !unresolved.is_empty() {
        debug!(
            page = current_page,
            count = unresolved.len(),
            "page has unresolved references"
        );
    }

    RewrittenPage {
        text: rewritten,
        unresolved,
    }
}

/// Targets that are never candidates for rewriting: empty strings and
/// inline-HTML or generic-syntax fragments that the link regex can
/// over-capture.
fn skip_target(target: &str) -> bool {
    matches!(target.chars().next(), None | Some('=' | '<' | '>' | '(' | ')'))
}

/// Replace every occurrence of `target` that is not wrapped in braces.
fn replace_unbraced(text: &str, target: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(offset) = text[pos..].find(target) {
        let start = pos + offset;
        let end = start + target.len();
        out.push_str(&text[pos..start]);
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        if before == Some('{') || after == Some('}') {
            out.push_str(target);
        } else {
            out.push_str(replacement);
        }
        pos = end;
    }
    out.push_str(&text[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use docfuse_shared::IndexConvention;

    fn profile() -> ProjectProfile {
        ProjectProfile {
            id: "test-docs".into(),
            display_name: None,
            content_root: "docs".into(),
            host: "https://example.org".into(),
            root_segment: None,
            index_file: IndexConvention::Index,
            nav_file: None,
            image_overrides: BTreeMap::new(),
            html_exceptions: Vec::new(),
        }
    }

    fn known(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn rewrites_relative_links_in_context() {
        let p = profile();
        let k = known(&["/guide/intro", "/guide/start"]);
        let page = rewrite_links(
            "See [Getting Started](./start.md) for details.",
            "/guide/intro",
            &k,
            &p,
        );
        assert_eq!(
            page.text,
            "See [Getting Started](https://example.org/guide/start) for details."
        );
        assert!(page.unresolved.is_empty());
    }

    #[test]
    fn external_links_are_untouched() {
        let p = profile();
        let k = known(&["/guide/intro"]);
        let text = "Docs live at [the site](https://vuejs.org/guide/).";
        let page = rewrite_links(text, "/guide/intro", &k, &p);
        assert_eq!(page.text, text);
    }

    #[test]
    fn every_occurrence_of_a_target_is_replaced() {
        let p = profile();
        let k = known(&["/guide/intro", "/guide/api"]);
        let page = rewrite_links(
            "[API](./api.md) first, then [the API again](./api.md).",
            "/guide/intro",
            &k,
            &p,
        );
        assert_eq!(
            page.text,
            "[API](https://example.org/guide/api) first, then [the API again](https://example.org/guide/api)."
        );
    }

    #[test]
    fn braced_occurrences_are_preserved() {
        let p = profile();
        let k = known(&["/guide/intro", "/guide/api"]);
        // Heading carries a custom-id with the same text as a link target.
        let page = rewrite_links(
            "## API {api}\n\nSee [API](api).",
            "/guide/intro",
            &k,
            &p,
        );
        assert_eq!(
            page.text,
            "## API {api}\n\nSee [API](https://example.org/guide/api)."
        );
    }

    #[test]
    fn img_src_is_rewritten_via_override() {
        let mut p = profile();
        p.image_overrides.insert(
            "/flow.png".into(),
            "https://example.org/flow.png".into(),
        );
        let k = known(&["/guide/intro"]);
        let page = rewrite_links(
            r#"<img src="/flow.png" alt="flow"/>"#,
            "/guide/intro",
            &k,
            &p,
        );
        assert_eq!(
            page.text,
            r#"<img src="https://example.org/flow.png" alt="flow"/>"#
        );
    }

    #[test]
    fn unresolved_targets_stay_verbatim_and_are_reported() {
        let p = profile();
        let k = known(&["/guide/intro"]);
        let page = rewrite_links(
            "See [missing](./nowhere.md) and [also](../gone).",
            "/guide/intro",
            &k,
            &p,
        );
        assert_eq!(page.text, "See [missing](./nowhere.md) and [also](../gone).");
        assert_eq!(
            page.unresolved,
            vec!["./nowhere.md".to_string(), "../gone".to_string()]
        );
    }

    #[test]
    fn generic_syntax_captures_are_skipped() {
        let p = profile();
        let k = known(&["/guide/intro"]);
        let text = "Array[string](=> weird) and [x](<T>).";
        let page = rewrite_links(text, "/guide/intro", &k, &p);
        assert_eq!(page.text, text);
        assert!(page.unresolved.is_empty());
    }

    #[test]
    fn same_page_anchor_is_rewritten() {
        let p = profile();
        let k = known(&["/guide/api"]);
        let page = rewrite_links(
            "Jump to [options](#options).",
            "/guide/api",
            &k,
            &p,
        );
        assert_eq!(
            page.text,
            "Jump to [options](https://example.org/guide/api#options)."
        );
    }
}
