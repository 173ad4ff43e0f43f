use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ViewError;
use crate::parser;
use crate::reconstruct::node_source;
use crate::resolve;
use crate::scan;
use crate::unit;

/// Extension of the source units this tree knows how to open.
pub const SOURCE_EXT: &str = ".py";

/// One node in the view tree.
///
/// Every state a node can hold is a variant; materialization and rendering
/// dispatch exhaustively over the closed set.
#[derive(Debug, PartialEq)]
pub enum Entry {
    /// Known to exist; children not loaded.
    Collapsed,
    /// Expanded internal node; children in first-materialization order.
    Branch(Children),
    /// Expanded leaf holding one reconstructed string.
    Text(String),
    /// Expanded leaf holding an ordered run of source fragments.
    Fragments(Vec<String>),
}

pub type Children = Vec<(String, Entry)>;

/// Structural category encoded by a path segment's shape.
enum SegmentKind<'a> {
    Directory,
    File,
    Class(&'a str),
    Function(&'a str),
    Imports,
    RootCode,
    StaticVars,
    Inherits,
}

/// Classify a segment by its naming convention. Total over the recognized
/// shapes; anything else is an unknown entry kind.
fn classify(segment: &str) -> Option<SegmentKind<'_>> {
    if segment.len() > 1 && segment.ends_with('/') {
        return Some(SegmentKind::Directory);
    }
    if segment.ends_with(SOURCE_EXT) {
        return Some(SegmentKind::File);
    }
    if let Some(name) = segment.strip_prefix("class:") {
        return Some(SegmentKind::Class(name));
    }
    if let Some(name) = segment.strip_prefix("func:") {
        // static methods are kind-tagged: `func:static:name`
        return Some(SegmentKind::Function(
            name.strip_prefix("static:").unwrap_or(name),
        ));
    }
    match segment {
        "imports" => Some(SegmentKind::Imports),
        "root_code" => Some(SegmentKind::RootCode),
        "static_vars" => Some(SegmentKind::StaticVars),
        "inherits" => Some(SegmentKind::Inherits),
        _ => None,
    }
}

fn lookup<'a>(children: &'a Children, name: &str) -> Option<&'a Entry> {
    children.iter().find(|(n, _)| n == name).map(|(_, e)| e)
}

fn lookup_mut<'a>(children: &'a mut Children, name: &str) -> Option<&'a mut Entry> {
    children
        .iter_mut()
        .find(|(n, _)| n == name)
        .map(|(_, e)| e)
}

/// The mutable view over a source tree: what is currently expanded versus
/// collapsed, materialized lazily from the filesystem on `open`.
pub struct EntryTree {
    root_dir: PathBuf,
    root: Children,
}

impl EntryTree {
    /// Build a tree rooted at `root_dir` from a single shallow scan.
    pub fn new(root_dir: impl Into<PathBuf>) -> Result<Self, ViewError> {
        let root_dir = root_dir.into();
        let names = scan::scan_dir(&root_dir)?;
        Ok(Self {
            root_dir,
            root: names.into_iter().map(|n| (n, Entry::Collapsed)).collect(),
        })
    }

    /// Expand the entry at `path`, materializing every not-yet-expanded
    /// prefix along the way. Opening an already-expanded entry is a no-op.
    ///
    /// A failure partway leaves already-opened prefixes open: opening
    /// `a/b/c` that fails at `c` still leaves `a/b` open.
    pub fn open(&mut self, path: &[String]) -> Result<(), ViewError> {
        for depth in 1..=path.len() {
            self.open_at(&path[..depth], path)?;
        }
        Ok(())
    }

    /// Collapse the entry at `path`, discarding its entire subtree.
    pub fn close(&mut self, path: &[String]) -> Result<(), ViewError> {
        if path.is_empty() {
            return Ok(());
        }
        *self.locate_mut(path, path)? = Entry::Collapsed;
        Ok(())
    }

    /// Re-materialize every currently-expanded entry from the backing
    /// files, parents first. The set of expanded paths is unchanged except
    /// for entries whose backing declaration no longer exists, which are
    /// left collapsed or dropped with their parent's re-scan.
    pub fn refresh(&mut self) -> Result<(), ViewError> {
        for path in self.expanded_paths() {
            let Ok(entry) = self.locate_mut(&path, &path) else {
                // vanished when an ancestor was re-materialized
                continue;
            };
            *entry = Entry::Collapsed;
            match self.open(&path) {
                Ok(()) => {}
                Err(ViewError::EntryNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Pre-order list of every expanded path, parents before children.
    fn expanded_paths(&self) -> Vec<Vec<String>> {
        fn collect(children: &Children, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
            for (name, entry) in children {
                if matches!(entry, Entry::Collapsed) {
                    continue;
                }
                prefix.push(name.clone());
                out.push(prefix.clone());
                if let Entry::Branch(c) = entry {
                    collect(c, prefix, out);
                }
                prefix.pop();
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Ensure the final segment of `prefix` is materialized.
    fn open_at(&mut self, prefix: &[String], full: &[String]) -> Result<(), ViewError> {
        let segment = prefix.last().expect("prefix is non-empty");
        // shape is validated before membership: an unrecognizable segment
        // is an unknown kind even when it is also absent from the tree
        if classify(segment).is_none() {
            return Err(ViewError::unknown_kind(full));
        }
        if !matches!(self.locate(prefix, full)?, Entry::Collapsed) {
            return Ok(());
        }
        let fresh = materialize(&self.root_dir, prefix, full)?;
        *self.locate_mut(prefix, full)? = fresh;
        Ok(())
    }

    /// Walk to the entry at `path`. Descent passes only through expanded
    /// branches; a missing name or a leaf in the way is `EntryNotFound`.
    fn locate<'a>(&'a self, path: &[String], full: &[String]) -> Result<&'a Entry, ViewError> {
        let (last, parents) = path.split_last().ok_or_else(|| ViewError::not_found(full))?;
        let mut children = &self.root;
        for segment in parents {
            match lookup(children, segment) {
                Some(Entry::Branch(c)) => children = c,
                Some(_) | None => return Err(ViewError::not_found(full)),
            }
        }
        lookup(children, last).ok_or_else(|| ViewError::not_found(full))
    }

    fn locate_mut<'a>(
        &'a mut self,
        path: &[String],
        full: &[String],
    ) -> Result<&'a mut Entry, ViewError> {
        let (last, parents) = path.split_last().ok_or_else(|| ViewError::not_found(full))?;
        let mut children = &mut self.root;
        for segment in parents {
            match lookup_mut(children, segment) {
                Some(Entry::Branch(c)) => children = c,
                Some(_) | None => return Err(ViewError::not_found(full)),
            }
        }
        lookup_mut(children, last).ok_or_else(|| ViewError::not_found(full))
    }
}

// ── Materialization ──

/// Materialize a collapsed entry according to its segment's kind.
///
/// The backing file is read and parsed fresh on every call; nothing is
/// cached across materializations.
fn materialize(root_dir: &Path, prefix: &[String], full: &[String]) -> Result<Entry, ViewError> {
    let segment = prefix.last().expect("prefix is non-empty");
    let kind = classify(segment).ok_or_else(|| ViewError::unknown_kind(full))?;
    let target = fs_path(root_dir, prefix);

    match kind {
        SegmentKind::Directory => {
            let names = scan::scan_dir(&target)?;
            Ok(Entry::Branch(
                names.into_iter().map(|n| (n, Entry::Collapsed)).collect(),
            ))
        }
        SegmentKind::File => {
            let (tree, src) = parser::parse_file(&target)?;
            let mut children: Children = vec![
                ("imports".to_string(), Entry::Collapsed),
                ("root_code".to_string(), Entry::Collapsed),
            ];
            for decl in unit::outline(tree.root_node(), src.as_bytes()) {
                children.push((decl.segment(), Entry::Collapsed));
            }
            Ok(Entry::Branch(children))
        }
        SegmentKind::Imports => {
            let (tree, src) = parser::parse_file(&target)?;
            Ok(Entry::Text(unit::imports_text(tree.root_node(), &src)))
        }
        SegmentKind::RootCode => {
            let (tree, src) = parser::parse_file(&target)?;
            Ok(Entry::Fragments(unit::root_code(tree.root_node(), &src)))
        }
        SegmentKind::Class(name) => {
            let (tree, src) = parser::parse_file(&target)?;
            let class = resolve::find_class(tree.root_node(), src.as_bytes(), name)
                .ok_or_else(|| ViewError::not_found(full))?;

            let bases = unit::class_bases(class, src.as_bytes());
            let inherits = if bases.is_empty() {
                Entry::Collapsed
            } else {
                Entry::Text(bases.join(", "))
            };

            let mut children: Children = vec![
                ("inherits".to_string(), inherits),
                ("static_vars".to_string(), Entry::Collapsed),
            ];
            for method in unit::class_methods(class, src.as_bytes()) {
                children.push((method.segment(), Entry::Collapsed));
            }
            Ok(Entry::Branch(children))
        }
        SegmentKind::Function(name) => {
            let (tree, src) = parser::parse_file(&target)?;
            let func =
                resolve::find_function(tree.root_node(), src.as_bytes(), name, enclosing_class(prefix))
                    .ok_or_else(|| ViewError::not_found(full))?;
            Ok(Entry::Text(node_source(func, &src)))
        }
        SegmentKind::StaticVars => {
            let class_name = enclosing_class(prefix).ok_or_else(|| ViewError::not_found(full))?;
            let (tree, src) = parser::parse_file(&target)?;
            let class = resolve::find_class(tree.root_node(), src.as_bytes(), class_name)
                .ok_or_else(|| ViewError::not_found(full))?;
            Ok(Entry::Fragments(unit::static_fields(class, &src)))
        }
        SegmentKind::Inherits => {
            let class_name = enclosing_class(prefix).ok_or_else(|| ViewError::not_found(full))?;
            let (tree, src) = parser::parse_file(&target)?;
            let class = resolve::find_class(tree.root_node(), src.as_bytes(), class_name)
                .ok_or_else(|| ViewError::not_found(full))?;
            Ok(Entry::Text(
                unit::class_bases(class, src.as_bytes()).join(", "),
            ))
        }
    }
}

/// Map a tree path onto the filesystem: directory segments stripped of the
/// trailing separator, a source-file segment kept verbatim and ending the
/// mapping. Declaration segments never contribute.
fn fs_path(root_dir: &Path, segments: &[String]) -> PathBuf {
    let mut path = root_dir.to_path_buf();
    for segment in segments {
        if segment.ends_with(SOURCE_EXT) {
            path.push(segment);
            break;
        }
        match segment.strip_suffix('/') {
            Some(dir) => path.push(dir),
            None => break,
        }
    }
    path
}

/// The enclosing class name for a segment nested under `class:Name`.
fn enclosing_class(prefix: &[String]) -> Option<&str> {
    if prefix.len() < 2 {
        return None;
    }
    prefix[prefix.len() - 2].strip_prefix("class:")
}

// ── Rendering ──

impl fmt::Display for EntryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_children(f, &self.root, "")
    }
}

/// Write entries at one depth, recursing into expanded branches with a
/// two-space-deeper indent.
fn write_children(f: &mut fmt::Formatter<'_>, children: &Children, indent: &str) -> fmt::Result {
    for (name, entry) in children {
        match entry {
            Entry::Collapsed => writeln!(f, "{indent}{name} (closed)")?,
            Entry::Branch(c) if c.is_empty() => writeln!(f, "{indent}{name} (empty)")?,
            Entry::Branch(c) => {
                writeln!(f, "{indent}{name}")?;
                let deeper = format!("{indent}  ");
                write_children(f, c, &deeper)?;
            }
            Entry::Text(s) if s.is_empty() => writeln!(f, "{indent}{name} (empty)")?,
            Entry::Text(s) if !s.contains('\n') => writeln!(f, "{indent}{name}: {s}")?,
            Entry::Text(s) => {
                writeln!(f, "{indent}{name}")?;
                write_lines(f, s, indent)?;
            }
            Entry::Fragments(v) if v.is_empty() => writeln!(f, "{indent}{name} (empty)")?,
            Entry::Fragments(v) => {
                writeln!(f, "{indent}{name}")?;
                for fragment in v {
                    write_lines(f, fragment, indent)?;
                }
            }
        }
    }
    Ok(())
}

fn write_lines(f: &mut fmt::Formatter<'_>, text: &str, indent: &str) -> fmt::Result {
    for line in text.lines() {
        writeln!(f, "{indent}  {line}")?;
    }
    Ok(())
}
