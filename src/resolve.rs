use tree_sitter::Node;

use crate::reconstruct::txt;
use crate::unit::strip_decorators;

/// Depth-first pre-order search for the first node satisfying `pred`.
///
/// Pre-order over a syntax tree visits declarations in source order, so
/// duplicate names resolve to the first one in the file.
fn find_node<'t, F>(node: Node<'t>, pred: &F) -> Option<Node<'t>>
where
    F: Fn(Node<'t>) -> bool,
{
    if pred(node) {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_node(child, pred) {
            return Some(found);
        }
    }
    None
}

fn has_name(node: Node, src: &[u8], want: &str) -> bool {
    node.child_by_field_name("name")
        .is_some_and(|n| txt(n, src) == want)
}

/// Return the `decorated_definition` wrapper of a definition when present,
/// so reconstruction keeps decorators.
fn with_decorators(node: Node) -> Node {
    match node.parent() {
        Some(parent) if parent.kind() == "decorated_definition" => parent,
        _ => node,
    }
}

/// Locate a class declaration by name anywhere in the unit.
pub fn find_class<'t>(root: Node<'t>, src: &[u8], name: &str) -> Option<Node<'t>> {
    find_node(root, &|n| {
        n.kind() == "class_definition" && has_name(n, src, name)
    })
}

/// Locate a function declaration by name.
///
/// With `class`, only that class's direct body is searched; a miss there is
/// a miss, never a fallback to top-level. Without, the whole unit is
/// searched depth-first, first match in source order.
pub fn find_function<'t>(
    root: Node<'t>,
    src: &[u8],
    name: &str,
    class: Option<&str>,
) -> Option<Node<'t>> {
    match class {
        Some(class_name) => {
            let class_node = find_class(root, src, class_name)?;
            let body = class_node.child_by_field_name("body")?;
            let mut cursor = body.walk();
            for stmt in body.children(&mut cursor) {
                let def = strip_decorators(stmt);
                if def.kind() == "function_definition" && has_name(def, src, name) {
                    return Some(stmt);
                }
            }
            None
        }
        None => find_node(root, &|n| {
            n.kind() == "function_definition" && has_name(n, src, name)
        })
        .map(with_decorators),
    }
}
