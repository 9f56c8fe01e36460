//! Pre-order flattening of the navigation tree into reading order.

use tracing::debug;

use docfuse_shared::{FlatLeaf, NavNode};

/// Flatten a normalized nav tree into an ordered leaf list.
///
/// Traversal is pre-order, depth-first, preserving declared sibling order;
/// this order IS the merged document's order. Groups emit no standalone
/// entry: a titled group's heading is attached to the first leaf emitted
/// beneath it (`sections`), and untitled leaves carry the nearest group
/// title as a display fallback.
pub fn flatten(nodes: &[NavNode]) -> Vec<FlatLeaf> {
    let mut out = Vec::new();
    let mut titles: Vec<String> = Vec::new();
    let mut pending: Vec<(usize, String)> = Vec::new();

    for node in nodes {
        walk(node, &mut titles, &mut pending, &mut out);
    }

    if !pending.is_empty() {
        debug!(dropped = pending.len(), "titled groups without pages contributed no headings");
    }

    out
}

fn walk(
    node: &NavNode,
    titles: &mut Vec<String>,
    pending: &mut Vec<(usize, String)>,
    out: &mut Vec<FlatLeaf>,
) {
    match node {
        NavNode::Leaf(leaf) => {
            out.push(FlatLeaf {
                path: leaf.path.clone(),
                title: leaf.title.clone(),
                group_title: titles.last().cloned(),
                depth: titles.len(),
                sections: std::mem::take(pending),
            });
        }
        NavNode::Group(group) => {
            match &group.title {
                Some(title) => {
                    let mark = pending.len();
                    pending.push((titles.len() + 1, title.clone()));
                    titles.push(title.clone());
                    for child in &group.children {
                        walk(child, titles, pending, out);
                    }
                    titles.pop();
                    // No leaf consumed the heading: the group was leafless.
                    if pending.len() > mark {
                        pending.truncate(mark);
                    }
                }
                None => {
                    for child in &group.children {
                        walk(child, titles, pending, out);
                    }
                }
            }
        }
    }
}
