//! Relative-reference resolution against the set's known page paths.
//!
//! References inside pages use filesystem-flavored relative paths; the
//! published site uses extension-less (or `.html`) URLs under a public
//! host. Resolution strips the relative noise off a reference, then finds
//! the best-matching known page by trailing-character overlap.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use docfuse_shared::ProjectProfile;

/// Extensions treated as images; these consult the override table
/// instead of the overlap search.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

/// Outcome of resolving one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The reference maps to this absolute URL.
    Url(String),
    /// Leave the original reference untouched (external target, or an
    /// image with no override entry).
    Keep,
    /// No known page contains the candidate path.
    Unresolved,
}

/// Resolve one in-page reference to an absolute URL.
///
/// `current_page` and `known_paths` are in the published site's path
/// space (see [`ProjectProfile::site_path`]); `known_paths` keeps
/// navigation order, which is the documented final tie-break.
pub fn resolve(
    reference: &str,
    current_page: &str,
    known_paths: &[String],
    profile: &ProjectProfile,
) -> Resolution {
    // Absolute external URLs are never rewritten.
    if is_external(reference) {
        return Resolution::Keep;
    }

    // Strip relative dot-segments and the .md/.html suffix; the published
    // site serves pages without either.
    static DOT_SEG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\.\.?/").expect("valid regex"));
    static EXT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\.(md|html)").expect("valid regex"));

    let stripped = DOT_SEG_RE.replace_all(reference, "");
    let stripped = EXT_RE.replace_all(&stripped, "").to_string();

    // Bare fragment: the reference targets the current page itself.
    if stripped.starts_with('#') {
        let url = format!(
            "{}{}{stripped}",
            profile.host,
            public_path(profile, current_page)
        );
        return Resolution::Url(url);
    }

    // Images bypass the overlap search entirely.
    if IMAGE_EXTENSIONS.iter().any(|ext| stripped.ends_with(ext)) {
        return match profile.image_overrides.get(&stripped) {
            Some(url) => Resolution::Url(url.clone()),
            None => {
                debug!(reference, "image has no override entry, keeping as-is");
                Resolution::Keep
            }
        };
    }

    // Split the bare candidate path from its fragment.
    static PATH_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([A-Za-z0-9_/-]+)(#\S+)?").expect("valid regex"));

    let Some(caps) = PATH_RE.captures(&stripped) else {
        return Resolution::Unresolved;
    };
    let pure = caps.get(1).map_or("", |m| m.as_str());
    let fragment = caps.get(2).map_or("", |m| m.as_str());
    if pure.is_empty() {
        return Resolution::Unresolved;
    }

    // A root-separator reference is rooted at the content root; put it
    // into the site's path space before searching. A trailing separator
    // (directory reference) would defeat the substring search, so it is
    // dropped here; known paths may still carry one.
    let candidate = if pure.starts_with('/') {
        profile.site_path(pure)
    } else {
        pure.to_string()
    };
    let candidate = candidate.trim_end_matches('/').to_string();
    if candidate.is_empty() {
        return Resolution::Unresolved;
    }

    match best_match(&candidate, known_paths) {
        Some(found) => {
            let url = format!(
                "{}{}{fragment}",
                profile.host,
                public_path(profile, found)
            );
            Resolution::Url(url)
        }
        None => {
            warn!(reference, candidate, current_page, "reference matches no known page");
            Resolution::Unresolved
        }
    }
}

/// Overlap heuristic over the known paths.
///
/// Score is the count of characters in the known path after the match
/// start (minus one): smaller means the candidate sits closer to the
/// path's tail. Ties go to the shortest known path, then to navigation
/// order. Heuristic, not a correctness guarantee.
fn best_match<'a>(candidate: &str, known_paths: &'a [String]) -> Option<&'a String> {
    let mut matches: Vec<(usize, usize, &'a String)> = known_paths
        .iter()
        .filter_map(|known| {
            known
                .find(candidate)
                .map(|idx| (known.len() - (idx + 1), known.len(), known))
        })
        .collect();

    if matches.is_empty() {
        return None;
    }

    // Stable sort keeps navigation order as the final tie-break.
    matches.sort_by_key(|(remain, len, _)| (*remain, *len));

    if matches.len() >= 2 {
        debug!(
            candidate,
            chosen = %matches[0].2,
            considered = matches.len(),
            "ambiguous reference resolved by overlap heuristic"
        );
    }

    Some(matches[0].2)
}

/// Map a site path to its published form: `.md` stripped, and the
/// per-project `.html` exceptions applied.
pub(crate) fn public_path(profile: &ProjectProfile, site_path: &str) -> String {
    let mut public = site_path.replace(".md", "");
    if profile.html_exceptions.iter().any(|ex| site_path.contains(ex))
        && !public.ends_with(".html")
    {
        public.push_str(".html");
    }
    public
}

/// True for absolute http(s) URLs.
pub(crate) fn is_external(reference: &str) -> bool {
    match url::Url::parse(reference) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
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
    fn external_urls_are_kept() {
        let p = profile();
        let k = known(&["/guide/api"]);
        assert_eq!(
            resolve("https://other.org/page", "/guide/api", &k, &p),
            Resolution::Keep
        );
        assert_eq!(
            resolve("http://other.org", "/guide/api", &k, &p),
            Resolution::Keep
        );
    }

    #[test]
    fn same_page_anchor_composes_host_page_fragment() {
        let p = profile();
        let k = known(&["/guide/api"]);
        assert_eq!(
            resolve("#options", "/guide/api", &k, &p),
            Resolution::Url("https://example.org/guide/api#options".into())
        );
    }

    #[test]
    fn relative_reference_matches_by_overlap() {
        let p = profile();
        let k = known(&["/guide/intro", "/guide/start"]);
        assert_eq!(
            resolve("./start.md", "/guide/intro", &k, &p),
            Resolution::Url("https://example.org/guide/start".into())
        );
    }

    #[test]
    fn fragment_survives_resolution() {
        let p = profile();
        let k = known(&["/guide/api"]);
        assert_eq!(
            resolve("../api/#test", "/guide/intro", &k, &p),
            Resolution::Url("https://example.org/guide/api#test".into())
        );
    }

    #[test]
    fn tie_break_prefers_shorter_known_path() {
        let p = profile();
        let k = known(&["/guide/api", "/core/api"]);
        assert_eq!(
            resolve("api", "/guide/intro", &k, &p),
            Resolution::Url("https://example.org/core/api".into())
        );
    }

    #[test]
    fn equal_length_tie_break_uses_navigation_order() {
        let p = profile();
        let k = known(&["/aaaaa/api", "/bbbbb/api"]);
        assert_eq!(
            resolve("api", "/x", &k, &p),
            Resolution::Url("https://example.org/aaaaa/api".into())
        );
    }

    #[test]
    fn suffix_closer_match_wins_over_prefix_match() {
        let p = profile();
        // "api" appears mid-path in one candidate and at the tail of another.
        let k = known(&["/api/extras/notes", "/guide/api"]);
        assert_eq!(
            resolve("api", "/x", &k, &p),
            Resolution::Url("https://example.org/guide/api".into())
        );
    }

    #[test]
    fn unmatched_reference_is_unresolved() {
        let p = profile();
        let k = known(&["/guide/intro"]);
        assert_eq!(
            resolve("./missing-page", "/guide/intro", &k, &p),
            Resolution::Unresolved
        );
    }

    #[test]
    fn image_override_hit_bypasses_search() {
        let mut p = profile();
        p.image_overrides.insert(
            "/logo.png".into(),
            "https://cdn.example/logo.png".into(),
        );
        let k = known(&["/guide/intro"]);
        assert_eq!(
            resolve("/logo.png", "/guide/intro", &k, &p),
            Resolution::Url("https://cdn.example/logo.png".into())
        );
    }

    #[test]
    fn image_without_override_is_kept() {
        let p = profile();
        let k = known(&["/guide/intro"]);
        assert_eq!(
            resolve("../images/flow.svg", "/guide/intro", &k, &p),
            Resolution::Keep
        );
    }

    #[test]
    fn rooted_reference_uses_root_segment() {
        let mut p = profile();
        p.root_segment = Some("/zh".into());
        let k = known(&["/zh/guide/api"]);
        assert_eq!(
            resolve("/guide/api", "/zh/guide/intro", &k, &p),
            Resolution::Url("https://example.org/zh/guide/api".into())
        );
    }

    #[test]
    fn html_exception_appends_suffix() {
        let mut p = profile();
        p.html_exceptions.push("dynamic-matching".into());
        let k = known(&["/guide/essentials/dynamic-matching.md"]);
        assert_eq!(
            resolve("./dynamic-matching.md", "/guide/essentials/intro", &k, &p),
            Resolution::Url(
                "https://example.org/guide/essentials/dynamic-matching.html".into()
            )
        );
    }

    #[test]
    fn known_path_md_suffix_is_stripped_in_url() {
        let p = profile();
        let k = known(&["/guide/start.md"]);
        assert_eq!(
            resolve("./start.md", "/guide/intro", &k, &p),
            Resolution::Url("https://example.org/guide/start".into())
        );
    }
}
