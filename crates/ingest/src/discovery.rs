//! Breadth-first source file discovery.
//!
//! Within each directory the matching files come first (sorted by name),
//! then the subdirectories are queued (sorted by name). The resulting order
//! is stable across platforms and runs, which keeps concatenated submission
//! text deterministic. Symbolic links are not followed.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ExtensionFilter;
use crate::error::IngestError;

/// Entries directly inside `dir`, sorted by file name, split into
/// (files, directories).
pub(crate) fn list_dir(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), IngestError> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| IngestError::walk(dir, e))?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            dirs.push(entry.into_path());
        } else if file_type.is_file() {
            files.push(entry.into_path());
        }
    }
    Ok((files, dirs))
}

/// All files under `root` accepted by `filter`, in breadth-first order.
pub fn discover_source_files(
    root: &Path,
    filter: &ExtensionFilter,
) -> Result<Vec<PathBuf>, IngestError> {
    if !root.is_dir() {
        return Err(IngestError::NotADirectory(root.to_path_buf()));
    }

    let mut found = Vec::new();
    let mut queue = VecDeque::from([root.to_path_buf()]);
    while let Some(dir) = queue.pop_front() {
        let (files, dirs) = list_dir(&dir)?;
        found.extend(files.into_iter().filter(|path| filter.matches(path)));
        queue.extend(dirs);
    }
    Ok(found)
}
