//! Per-documentation-set project profiles.
//!
//! A [`ProjectProfile`] bundles everything that differs between sets:
//! content root, public host, index-file convention, the image-override
//! table, and per-project path/extension quirks. One profile value is
//! threaded explicitly through every call so multiple sets can be
//! processed concurrently without cross-talk.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DocfuseError, Result};
use crate::types::title_from_path;

/// Fallback file stem when a set identifier sanitizes to nothing.
pub const DEFAULT_FILE_STEM: &str = "docs";

/// Index-file convention for directory references (`.../` logical paths).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexConvention {
    /// VitePress-style `index.md`.
    #[default]
    Index,
    /// VuePress-style `README.md`.
    Readme,
}

impl IndexConvention {
    /// The on-disk filename this convention resolves a directory to.
    pub fn filename(self) -> &'static str {
        match self {
            Self::Index => "index.md",
            Self::Readme => "README.md",
        }
    }
}

/// Static per-set configuration, loaded once per run and read-only after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectProfile {
    /// Set identifier (often the upstream package name, e.g. `@pinia/root`).
    pub id: String,

    /// Human-readable name; becomes the merged document's top heading.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Filesystem prefix joined in front of every logical path.
    pub content_root: String,

    /// Public host the published site is served from, no trailing slash.
    pub host: String,

    /// Prefix for root-separator references (e.g. `/zh`); references
    /// starting with `/` are rooted here before the overlap search.
    #[serde(default)]
    pub root_segment: Option<String>,

    /// Directory-reference convention (`index.md` vs `README.md`).
    #[serde(default)]
    pub index_file: IndexConvention,

    /// Default path of the extracted navigation-tree JSON for this set.
    #[serde(default)]
    pub nav_file: Option<String>,

    /// Bare image path → absolute URL, used verbatim on a hit.
    #[serde(default)]
    pub image_overrides: BTreeMap<String, String>,

    /// Known paths containing any of these substrings are served under a
    /// `.html` URL although stored as `.md`.
    #[serde(default)]
    pub html_exceptions: Vec<String>,
}

impl ProjectProfile {
    /// Display name, deriving one from the identifier when unset.
    pub fn title(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => title_from_path(&self.file_stem()),
        }
    }

    /// Output file stem: path separators (`/` runs) become `-`, every
    /// other character stays; an empty identifier maps to a fixed
    /// default.
    pub fn file_stem(&self) -> String {
        let mut stem = String::new();
        let mut last_sep = false;
        for c in self.id.chars() {
            if c == '/' {
                if !last_sep && !stem.is_empty() {
                    stem.push('-');
                }
                last_sep = true;
            } else {
                stem.push(c);
                last_sep = false;
            }
        }
        let stem = stem.trim_end_matches('-').to_string();
        if stem.is_empty() {
            DEFAULT_FILE_STEM.to_string()
        } else {
            stem
        }
    }

    /// Map a logical path into the published site's path space by
    /// prefixing the root segment (unless the path already carries it).
    pub fn site_path(&self, logical: &str) -> String {
        match &self.root_segment {
            Some(root) if logical == root || logical.starts_with(&format!("{root}/")) => {
                logical.to_string()
            }
            Some(root) if logical.starts_with('/') => format!("{root}{logical}"),
            Some(root) => format!("{root}/{logical}"),
            None => logical.to_string(),
        }
    }

    /// Validate fields that the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.host).map_err(|e| {
            DocfuseError::config(format!("profile '{}': invalid host '{}': {e}", self.id, self.host))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(DocfuseError::config(format!(
                "profile '{}': host must be http(s), got '{}'",
                self.id, self.host
            )));
        }
        if self.content_root.is_empty() {
            return Err(DocfuseError::config(format!(
                "profile '{}': content_root must not be empty",
                self.id
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in profile table
// ---------------------------------------------------------------------------

/// Profiles for the documentation sets supported out of the box.
///
/// User config (`[[profiles]]` in docfuse.toml) can add new sets or
/// override these by id.
pub fn builtin_profiles() -> Vec<ProjectProfile> {
    vec![
        ProjectProfile {
            id: "vuex".into(),
            display_name: Some("Vuex".into()),
            content_root: "vuex/docs".into(),
            host: "https://vuex.vuejs.org".into(),
            root_segment: Some("/zh".into()),
            index_file: IndexConvention::Index,
            nav_file: None,
            image_overrides: BTreeMap::from([
                ("/flow.png".to_string(), "https://vuex.vuejs.org/flow.png".to_string()),
                ("/vuex.png".to_string(), "https://vuex.vuejs.org/vuex.png".to_string()),
            ]),
            // Served online only as .html although stored as .md.
            html_exceptions: vec!["migrating-to-4-0-from-3-x".into()],
        },
        ProjectProfile {
            id: "vue-router".into(),
            display_name: Some("Vue Router".into()),
            content_root: "vue-router/docs".into(),
            host: "https://v3.router.vuejs.org".into(),
            root_segment: Some("/zh".into()),
            index_file: IndexConvention::Readme,
            nav_file: None,
            image_overrides: BTreeMap::new(),
            html_exceptions: vec!["dynamic-matching".into()],
        },
        ProjectProfile {
            id: "@pinia/root".into(),
            display_name: Some("Pinia".into()),
            content_root: "pinia/packages/docs".into(),
            host: "https://pinia.vuejs.org".into(),
            root_segment: Some("/zh".into()),
            index_file: IndexConvention::Index,
            nav_file: None,
            image_overrides: BTreeMap::new(),
            html_exceptions: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(id: &str) -> ProjectProfile {
        ProjectProfile {
            id: id.into(),
            display_name: None,
            content_root: "docs".into(),
            host: "https://example.org".into(),
            root_segment: None,
            index_file: IndexConvention::default(),
            nav_file: None,
            image_overrides: BTreeMap::new(),
            html_exceptions: Vec::new(),
        }
    }

    #[test]
    fn file_stem_sanitizes_separators() {
        // Only separators change; other characters pass through.
        assert_eq!(minimal("@pinia/root").file_stem(), "@pinia-root");
        assert_eq!(minimal("vue-router").file_stem(), "vue-router");
        assert_eq!(minimal("a//b").file_stem(), "a-b");
        assert_eq!(minimal("").file_stem(), DEFAULT_FILE_STEM);
        assert_eq!(minimal("///").file_stem(), DEFAULT_FILE_STEM);
    }

    #[test]
    fn title_derives_from_stem_when_unset() {
        assert_eq!(minimal("vue-router").title(), "Vue Router");

        let mut named = minimal("vuex");
        named.display_name = Some("Vuex".into());
        assert_eq!(named.title(), "Vuex");
    }

    #[test]
    fn validate_rejects_bad_host() {
        let mut p = minimal("x");
        p.host = "not a url".into();
        assert!(p.validate().is_err());

        p.host = "ftp://example.org".into();
        assert!(p.validate().is_err());

        p.host = "https://example.org".into();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn builtin_profiles_are_valid() {
        for profile in builtin_profiles() {
            profile.validate().expect("builtin profile must validate");
        }
    }

    #[test]
    fn site_path_prefixes_root_segment_once() {
        let mut p = minimal("x");
        p.root_segment = Some("/zh".into());
        assert_eq!(p.site_path("/guide/intro"), "/zh/guide/intro");
        assert_eq!(p.site_path("/zh/guide/intro"), "/zh/guide/intro");
        assert_eq!(p.site_path("guide/intro"), "/zh/guide/intro");

        p.root_segment = None;
        assert_eq!(p.site_path("/guide/intro"), "/guide/intro");
    }

    #[test]
    fn index_convention_filenames() {
        assert_eq!(IndexConvention::Index.filename(), "index.md");
        assert_eq!(IndexConvention::Readme.filename(), "README.md");
    }

    #[test]
    fn profile_toml_roundtrip() {
        let profile = minimal("my-docs");
        let s = toml::to_string_pretty(&profile).expect("serialize");
        let parsed: ProjectProfile = toml::from_str(&s).expect("deserialize");
        assert_eq!(parsed.id, "my-docs");
        assert_eq!(parsed.index_file, IndexConvention::Index);
    }
}
