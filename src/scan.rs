use std::path::Path;

use crate::error::ViewError;

/// List a directory's immediate entries, sub-directories suffixed `/`.
///
/// Hidden files are included. The listing is sorted by name so repeated
/// scans of an unchanged directory render identically.
pub fn scan_dir(dir: &Path) -> Result<Vec<String>, ViewError> {
    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ViewError::EntryNotFound {
            path: dir.display().to_string(),
        },
        _ => ViewError::Io {
            path: dir.display().to_string(),
            source: e,
        },
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ViewError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.path().is_dir() {
            name.push('/');
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}
