/// Errors produced while navigating or materializing the view tree.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("entry {path} not found")]
    EntryNotFound { path: String },

    #[error("unknown entry kind in {path}")]
    UnknownEntryKind { path: String },

    #[error("parse failed: {0}")]
    ParseFailed(String),

    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("bad command: {0}")]
    BadCommand(String),
}

impl ViewError {
    /// `EntryNotFound` for a tree path, rendered segment-by-segment.
    pub fn not_found(path: &[String]) -> Self {
        Self::EntryNotFound {
            path: path.join("/"),
        }
    }

    /// `UnknownEntryKind` for a tree path.
    pub fn unknown_kind(path: &[String]) -> Self {
        Self::UnknownEntryKind {
            path: path.join("/"),
        }
    }
}
