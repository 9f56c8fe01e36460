//! Normalization of extracted navigation-tree literals.
//!
//! Sidebar literals pulled out of build-tool configs are loosely shaped:
//! a node may be a bare string or an object, children may live under
//! `items` or `children`, titles under `text` or `title`. All of that is
//! collapsed here, once, into the closed [`NavNode`] union so the rest of
//! the pipeline never probes shapes again.

use serde_json::Value;
use tracing::debug;

use docfuse_shared::{DocfuseError, NavGroup, NavLeaf, NavNode, Result};

/// Normalize an extracted nav-tree JSON value into an ordered node list.
///
/// A top-level array is the root sequence; a single string or object is
/// treated as a one-node sequence. An empty array is a valid, empty tree.
pub fn normalize(value: &Value) -> Result<Vec<NavNode>> {
    match value {
        Value::Array(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for item in items {
                if let Some(node) = normalize_node(item)? {
                    nodes.push(node);
                }
            }
            Ok(nodes)
        }
        Value::String(_) | Value::Object(_) => {
            Ok(normalize_node(value)?.into_iter().collect())
        }
        other => Err(DocfuseError::parse(format!(
            "nav tree must be an array, string, or object, got {}",
            type_name(other)
        ))),
    }
}

/// Normalize one node. Returns `None` for no-op nodes (empty groups).
fn normalize_node(value: &Value) -> Result<Option<NavNode>> {
    match value {
        Value::String(path) => Ok(Some(NavNode::Leaf(NavLeaf {
            path: path.clone(),
            title: None,
        }))),

        Value::Object(map) => {
            let title = string_field(map, "text").or_else(|| string_field(map, "title"));

            // A node with a `link` is a leaf no matter what else it carries.
            if let Some(link) = string_field(map, "link") {
                return Ok(Some(NavNode::Leaf(NavLeaf { path: link, title })));
            }

            let raw_children = select_children(map);
            let Some(raw_children) = raw_children else {
                return Err(DocfuseError::parse(format!(
                    "nav object has neither 'link' nor 'children'/'items': {}",
                    compact(value)
                )));
            };

            let mut children = Vec::with_capacity(raw_children.len());
            for child in raw_children {
                if let Some(node) = normalize_node(child)? {
                    children.push(node);
                }
            }

            if children.is_empty() {
                debug!(title = title.as_deref().unwrap_or(""), "skipping empty nav group");
                return Ok(None);
            }

            Ok(Some(NavNode::Group(NavGroup { title, children })))
        }

        other => Err(DocfuseError::parse(format!(
            "unexpected nav node type {}: {}",
            type_name(other),
            compact(other)
        ))),
    }
}

/// Pick the child array: `children` and `items` mean the same thing,
/// `children` preferred when both are present and non-empty.
fn select_children(map: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    let children = map.get("children").and_then(Value::as_array);
    let items = map.get("items").and_then(Value::as_array);

    match (children, items) {
        (Some(c), _) if !c.is_empty() => Some(c),
        (_, Some(i)) => Some(i),
        (Some(c), None) => Some(c),
        (None, None) => None,
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn compact(value: &Value) -> String {
    let s = value.to_string();
    match s.char_indices().nth(80) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s,
    }
}
