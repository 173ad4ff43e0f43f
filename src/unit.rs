use tree_sitter::Node;

use crate::reconstruct::{node_source, txt};

/// A top-level declaration discovered in a parsed unit.
#[derive(Debug, PartialEq)]
pub enum Decl {
    Class(String),
    Function(String),
}

impl Decl {
    /// Segment name under which this declaration appears in the tree.
    pub fn segment(&self) -> String {
        match self {
            Decl::Class(name) => format!("class:{name}"),
            Decl::Function(name) => format!("func:{name}"),
        }
    }
}

/// A method declared directly in a class body.
#[derive(Debug, PartialEq)]
pub struct Method {
    pub name: String,
    pub is_static: bool,
}

impl Method {
    /// Segment name, kind-tagged for static methods.
    pub fn segment(&self) -> String {
        if self.is_static {
            format!("func:static:{}", self.name)
        } else {
            format!("func:{}", self.name)
        }
    }
}

/// Unwrap a `decorated_definition` to the definition it wraps.
pub fn strip_decorators(node: Node) -> Node {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

fn node_name<'a>(node: Node, src: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name("name").map(|n| txt(n, src))
}

// ── File outline ──

/// Top-level class and function declarations, in source order.
pub fn outline(root: Node, src: &[u8]) -> Vec<Decl> {
    let mut decls = Vec::new();
    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        let def = strip_decorators(node);
        match def.kind() {
            "class_definition" => {
                if let Some(name) = node_name(def, src) {
                    decls.push(Decl::Class(name.to_string()));
                }
            }
            "function_definition" => {
                if let Some(name) = node_name(def, src) {
                    decls.push(Decl::Function(name.to_string()));
                }
            }
            _ => {}
        }
    }
    decls
}

// ── Imports ──

/// The unit's import statements as newline-joined source lines.
pub fn imports_text(root: Node, src: &str) -> String {
    let mut lines = Vec::new();
    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        match node.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                lines.push(node_source(node, src));
            }
            _ => {}
        }
    }
    lines.join("\n")
}

// ── Root-level code ──

/// Reconstructed source for every top-level statement that is not an
/// import, class, or function definition. Comments are skipped.
pub fn root_code(root: Node, src: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        match node.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement"
            | "comment" => continue,
            _ => {}
        }
        match strip_decorators(node).kind() {
            "class_definition" | "function_definition" => continue,
            _ => fragments.push(node_source(node, src)),
        }
    }
    fragments
}

// ── Class detail ──

/// Base-class names from a class's superclass list.
///
/// Keyword arguments (`metaclass=...`) are not bases and are excluded.
pub fn class_bases(class: Node, src: &[u8]) -> Vec<String> {
    let Some(args) = class.child_by_field_name("superclasses") else {
        return Vec::new();
    };
    let mut bases = Vec::new();
    let mut cursor = args.walk();
    for child in args.children(&mut cursor) {
        if child.is_named() && child.kind() != "keyword_argument" && child.kind() != "comment" {
            bases.push(txt(child, src).to_string());
        }
    }
    bases
}

/// Methods declared directly in a class body, in source order, tagged
/// static when decorated with `@staticmethod`.
pub fn class_methods(class: Node, src: &[u8]) -> Vec<Method> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for stmt in body.children(&mut cursor) {
        let def = strip_decorators(stmt);
        if def.kind() != "function_definition" {
            continue;
        }
        if let Some(name) = node_name(def, src) {
            methods.push(Method {
                name: name.to_string(),
                is_static: has_decorator(stmt, src, "staticmethod"),
            });
        }
    }
    methods
}

/// Whether a decorated definition carries the named decorator, matched on
/// the bare or attribute-qualified name, ignoring call arguments.
fn has_decorator(node: Node, src: &[u8], want: &str) -> bool {
    if node.kind() != "decorated_definition" {
        return false;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        let text = txt(child, src).trim_start_matches('@').trim();
        let name = text.split('(').next().unwrap_or(text).trim();
        if name == want || name.ends_with(&format!(".{want}")) {
            return true;
        }
    }
    false
}

/// `name = reconstructed-expression` for every assignment directly in a
/// class body, in source order.
pub fn static_fields(class: Node, src: &str) -> Vec<String> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    let mut cursor = body.walk();
    for stmt in body.children(&mut cursor) {
        if stmt.kind() != "expression_statement" {
            continue;
        }
        let Some(expr) = stmt.named_child(0) else {
            continue;
        };
        if expr.kind() != "assignment" {
            continue;
        }
        let (Some(left), Some(right)) = (
            expr.child_by_field_name("left"),
            expr.child_by_field_name("right"),
        ) else {
            continue;
        };
        fields.push(format!(
            "{} = {}",
            txt(left, src.as_bytes()),
            node_source(right, src)
        ));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn parsed(src: &str) -> tree_sitter::Tree {
        parse_source(src).unwrap()
    }

    #[test]
    fn outline_lists_declarations_in_source_order() {
        let src = "import os\n\ndef first():\n    pass\n\nclass Second:\n    pass\n\ndef third():\n    pass\n";
        let tree = parsed(src);
        let decls = outline(tree.root_node(), src.as_bytes());
        assert_eq!(
            decls,
            vec![
                Decl::Function("first".to_string()),
                Decl::Class("Second".to_string()),
                Decl::Function("third".to_string()),
            ]
        );
    }

    #[test]
    fn outline_sees_through_decorators() {
        let src = "@app.route('/')\ndef handler():\n    pass\n";
        let tree = parsed(src);
        let decls = outline(tree.root_node(), src.as_bytes());
        assert_eq!(decls, vec![Decl::Function("handler".to_string())]);
    }

    #[test]
    fn imports_render_verbatim() {
        let src = "import os\nfrom typing import List, Optional\nimport numpy as np\n\nx = 1\n";
        let tree = parsed(src);
        assert_eq!(
            imports_text(tree.root_node(), src),
            "import os\nfrom typing import List, Optional\nimport numpy as np"
        );
    }

    #[test]
    fn imports_empty_unit_is_empty_string() {
        let src = "x = 1\n";
        let tree = parsed(src);
        assert_eq!(imports_text(tree.root_node(), src), "");
    }

    #[test]
    fn root_code_keeps_only_loose_statements() {
        let src = "import os\n# setup\nGREETING = 'hi'\n\ndef f():\n    pass\n\nif __name__ == '__main__':\n    f()\n";
        let tree = parsed(src);
        let fragments = root_code(tree.root_node(), src);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], "GREETING = 'hi'");
        assert!(fragments[1].starts_with("if __name__ == '__main__':"));
    }

    #[test]
    fn class_bases_excludes_keyword_arguments() {
        let src = "class C(Base, mixins.Extra, metaclass=Meta):\n    pass\n";
        let tree = parsed(src);
        let class = tree.root_node().child(0).unwrap();
        assert_eq!(class_bases(class, src.as_bytes()), vec!["Base", "mixins.Extra"]);
    }

    #[test]
    fn class_without_bases_has_none() {
        let src = "class C:\n    pass\n";
        let tree = parsed(src);
        let class = tree.root_node().child(0).unwrap();
        assert!(class_bases(class, src.as_bytes()).is_empty());
    }

    #[test]
    fn class_methods_tag_static() {
        let src = "class C:\n    def m(self):\n        pass\n\n    @staticmethod\n    def s():\n        pass\n";
        let tree = parsed(src);
        let class = tree.root_node().child(0).unwrap();
        assert_eq!(
            class_methods(class, src.as_bytes()),
            vec![
                Method { name: "m".to_string(), is_static: false },
                Method { name: "s".to_string(), is_static: true },
            ]
        );
    }

    #[test]
    fn other_decorators_are_not_static() {
        let src = "class C:\n    @property\n    def p(self):\n        return 1\n";
        let tree = parsed(src);
        let class = tree.root_node().child(0).unwrap();
        let methods = class_methods(class, src.as_bytes());
        assert_eq!(methods.len(), 1);
        assert!(!methods[0].is_static);
    }

    #[test]
    fn static_fields_render_assignments() {
        let src = "class C:\n    X = 1\n    NAMES = ['a', 'b']\n\n    def m(self):\n        self.y = 2\n";
        let tree = parsed(src);
        let class = tree.root_node().child(0).unwrap();
        assert_eq!(
            static_fields(class, src),
            vec!["X = 1", "NAMES = ['a', 'b']"]
        );
    }

    #[test]
    fn method_segment_tags_static() {
        let m = Method { name: "s".to_string(), is_static: true };
        assert_eq!(m.segment(), "func:static:s");
        let m = Method { name: "m".to_string(), is_static: false };
        assert_eq!(m.segment(), "func:m");
    }
}
