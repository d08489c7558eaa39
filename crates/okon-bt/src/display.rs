//! Plain-text rendering of a tree and its statuses.

use std::fmt::Write;

use okon_core::VehicleMut;

use crate::node::status_label;
use crate::{Node, NodeKind};

const INDENT: &str = "    ";

/// One line per node, children indented under their parent:
///
/// ```text
/// [o] Selector [RUNNING] -- Current depth 0.412. Waiting for target depth of 1.1 m.
///     [-] Sequence 1 [RUNNING] -- ...
///         --> Try detect gate 3 times [SUCCESS] -- Object gate detected in attempt number 1
/// ```
pub fn ascii_tree<V>(root: &Node<V>) -> String
where
    V: VehicleMut + 'static,
{
    let mut out = String::new();
    render(root, 0, &mut out);
    out
}

fn render<V>(node: &Node<V>, depth: usize, out: &mut String)
where
    V: VehicleMut + 'static,
{
    let marker = match node.kind() {
        NodeKind::Leaf => "-->",
        NodeKind::Sequence => "[-]",
        NodeKind::Selector => "[o]",
    };

    for _ in 0..depth {
        out.push_str(INDENT);
    }
    let _ = write!(out, "{marker} {} [{}]", node.name(), status_label(node.status()));
    if !node.feedback().is_empty() {
        let _ = write!(out, " -- {}", node.feedback());
    }
    out.push('\n');

    for child in node.children() {
        render(child, depth + 1, out);
    }
}
