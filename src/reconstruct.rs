use tree_sitter::Node;

/// Extract UTF-8 text from a tree-sitter node, returning `""` on failure.
pub fn txt<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Render a syntax node back into source text.
///
/// The node's byte range is sliced verbatim from the original source. For a
/// node that starts past column zero (a method inside a class body),
/// continuation lines are dedented by the starting column so the result
/// re-parses as a top-level declaration.
pub fn node_source(node: Node, src: &str) -> String {
    let text = &src[node.byte_range()];
    let col = node.start_position().column;
    if col == 0 || !text.contains('\n') {
        return text.to_string();
    }

    let mut lines = text.lines();
    let mut out = String::from(lines.next().unwrap_or(""));
    for line in lines {
        out.push('\n');
        out.push_str(strip_indent(line, col));
    }
    out
}

/// Remove up to `width` bytes of leading whitespace from a line.
fn strip_indent(line: &str, width: usize) -> &str {
    let mut rest = line;
    let mut taken = 0;
    while taken < width {
        match rest.as_bytes().first() {
            Some(b' ') | Some(b'\t') => {
                rest = &rest[1..];
                taken += 1;
            }
            _ => break,
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn top_level_node_is_sliced_verbatim() {
        let src = "def f(a, b):\n    return a + b\n";
        let tree = parse_source(src).unwrap();
        let func = tree.root_node().child(0).unwrap();
        assert_eq!(node_source(func, src), "def f(a, b):\n    return a + b");
    }

    #[test]
    fn single_line_nested_node_keeps_text() {
        let src = "x = {'k': 1}\n";
        let tree = parse_source(src).unwrap();
        let assign = tree.root_node().child(0).unwrap().child(0).unwrap();
        let value = assign.child_by_field_name("right").unwrap();
        assert_eq!(node_source(value, src), "{'k': 1}");
    }

    #[test]
    fn method_is_dedented_to_top_level() {
        let src = "class C:\n    def m(self):\n        if True:\n            return 1\n";
        let tree = parse_source(src).unwrap();
        let class = tree.root_node().child(0).unwrap();
        let body = class.child_by_field_name("body").unwrap();
        let method = body.child(0).unwrap();

        let rendered = node_source(method, src);
        assert_eq!(rendered, "def m(self):\n    if True:\n        return 1");
        // the dedented text must re-parse as a standalone declaration
        assert!(parse_source(&rendered).is_ok());
    }

    #[test]
    fn strip_indent_stops_at_content() {
        assert_eq!(strip_indent("        return 1", 4), "    return 1");
        assert_eq!(strip_indent("  x", 8), "x");
        assert_eq!(strip_indent("x", 4), "x");
    }
}
