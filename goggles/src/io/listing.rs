//! Directory enumeration for batch input.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::io::config::EntryOrder;

/// One entry of the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: OsString,
    pub path: PathBuf,
    /// Regular file (symlinks are followed).
    pub is_file: bool,
}

/// List the direct children of `dir`, without recursion.
///
/// The whole listing is collected before returning, so files created in `dir`
/// afterwards are not picked up by the caller.
pub fn list_entries(dir: &Path, order: EntryOrder) -> Result<Vec<ListedEntry>> {
    let read = fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.with_context(|| format!("list {}", dir.display()))?;
        let path = entry.path();
        entries.push(ListedEntry {
            name: entry.file_name(),
            is_file: path.is_file(),
            path,
        });
    }
    if order == EntryOrder::Name {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_order_is_lexicographic() {
        let temp = tempfile::tempdir().expect("tempdir");
        for name in ["c.txt", "a.txt", "B.txt"] {
            fs::write(temp.path().join(name), name).expect("write");
        }
        let names: Vec<OsString> = list_entries(temp.path(), EntryOrder::Name)
            .expect("list")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["B.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn marks_directories_as_non_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("nested")).expect("mkdir");
        fs::write(temp.path().join("file.txt"), "x").expect("write");

        let entries = list_entries(temp.path(), EntryOrder::Name).expect("list");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_file);
        assert_eq!(entries[1].name, "nested");
        assert!(!entries[1].is_file);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = list_entries(&temp.path().join("absent"), EntryOrder::Listing).unwrap_err();
        assert!(err.to_string().contains("list"));
    }
}
