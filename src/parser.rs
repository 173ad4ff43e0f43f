use std::path::Path;

use tree_sitter::{Parser, Tree};

use crate::error::ViewError;

/// Parse Python source text into a tree-sitter tree.
///
/// tree-sitter always produces a tree; a root containing error nodes is the
/// parse-failure signal and is rejected rather than surfaced as an empty or
/// partial structure.
pub fn parse_source(source: &str) -> Result<Tree, ViewError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ViewError::ParseFailed(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ViewError::ParseFailed("parser produced no tree".to_string()))?;

    if tree.root_node().has_error() {
        return Err(ViewError::ParseFailed("syntax error in unit".to_string()));
    }

    Ok(tree)
}

/// Read and parse a source file, returning the tree and its text.
///
/// The file is read fresh on every call so external edits are visible on the
/// next materialization.
pub fn parse_file(path: &Path) -> Result<(Tree, String), ViewError> {
    let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ViewError::EntryNotFound {
            path: path.display().to_string(),
        },
        _ => ViewError::Io {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    let tree = parse_source(&source)?;
    Ok((tree, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_source_accepts_valid_python() {
        let tree = parse_source("def f():\n    return 1\n").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn parse_source_rejects_broken_python() {
        let result = parse_source("def f(:\n");
        assert!(matches!(result, Err(ViewError::ParseFailed(_))));
    }

    #[test]
    fn parse_file_missing_is_entry_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_file(&dir.path().join("missing.py"));
        assert!(matches!(result, Err(ViewError::EntryNotFound { .. })));
    }

    #[test]
    fn parse_file_reads_and_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "x = 1\n").unwrap();

        let (tree, source) = parse_file(&path).unwrap();
        assert_eq!(source, "x = 1\n");
        assert_eq!(tree.root_node().kind(), "module");
    }
}
