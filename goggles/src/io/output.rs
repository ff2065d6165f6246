//! Results file helpers.
//!
//! The results file is opened, appended and closed once per response so that
//! earlier responses survive a failure later in the batch.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Create `dir` (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create results dir {}", dir.display()))
}

/// Append `text` plus a trailing newline to `path`, creating the file if needed.
pub fn append_line(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut buf = String::with_capacity(text.len() + 1);
    buf.push_str(text);
    buf.push('\n');
    file.write_all(buf.as_bytes())
        .with_context(|| format!("append {}", path.display()))
}

/// Empty `path` if it exists. A missing file is left missing.
pub fn truncate(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    fs::write(path, "").with_context(|| format!("truncate {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_line_accumulates() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("out.txt");
        append_line(&path, "first").expect("append");
        append_line(&path, "second").expect("append");
        assert_eq!(fs::read_to_string(&path).expect("read"), "first\nsecond\n");
    }

    #[test]
    fn truncate_empties_existing_and_ignores_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("out.txt");
        truncate(&path).expect("truncate missing");
        assert!(!path.exists());

        fs::write(&path, "old\n").expect("write");
        truncate(&path).expect("truncate");
        assert_eq!(fs::read_to_string(&path).expect("read"), "");
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("results");
        ensure_dir(&dir).expect("create");
        ensure_dir(&dir).expect("exists");
        assert!(dir.is_dir());
    }
}
