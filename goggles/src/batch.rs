//! Orchestration for one batch over an input directory.
//!
//! A batch seeds the session with the directory's guideline file, then sends
//! every other regular file in turn and appends each reply to
//! `<results_dir>/<directory-name>.txt`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::io::backend::ChatBackend;
use crate::io::config::BatchConfig;
use crate::io::listing::list_entries;
use crate::io::output;
use crate::session::ChatSession;

/// Batch preconditions that fail before any file is sent.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("guidelines file '{file}' not found in '{}'", .dir.display())]
    GuidelinesNotFound { file: String, dir: PathBuf },
    #[error("cannot derive a batch name from '{}'", .0.display())]
    UnnamedDirectory(PathBuf),
}

/// Paths resolved for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub source_dir: PathBuf,
    pub guidelines_path: PathBuf,
    pub output_path: PathBuf,
}

impl BatchJob {
    /// Resolve the guideline and output paths for `source_dir`.
    ///
    /// The output file is named after the directory's last component. Paths
    /// such as `.` are canonicalized first to find that name.
    pub fn resolve(source_dir: &Path, config: &BatchConfig) -> Result<Self> {
        let name = batch_name(source_dir)?;
        let mut file_name = name;
        file_name.push(".txt");
        Ok(Self {
            source_dir: source_dir.to_path_buf(),
            guidelines_path: source_dir.join(&config.guidelines_file),
            output_path: config.results_dir.join(file_name),
        })
    }
}

/// Progress notification emitted after a reply has been appended.
#[derive(Debug, Clone)]
pub struct FileProcessed<'a> {
    /// 1-based position within the batch.
    pub index: usize,
    pub path: &'a Path,
    pub output_path: &'a Path,
}

/// Result of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub output_path: PathBuf,
    /// Input files in the order they were sent.
    pub processed: Vec<PathBuf>,
}

/// Run one batch over `source_dir`.
///
/// Any read, backend or write failure aborts the batch at that file. Replies
/// already appended stay in the output file.
pub fn process_directory<B: ChatBackend>(
    source_dir: &Path,
    session: &mut ChatSession<B>,
    config: &BatchConfig,
) -> Result<BatchOutcome> {
    process_directory_with_progress(source_dir, session, config, |_| {})
}

/// Like [`process_directory`], calling `on_file` after each appended reply.
#[instrument(skip_all, fields(source_dir = %source_dir.display()))]
pub fn process_directory_with_progress<B: ChatBackend, F: FnMut(&FileProcessed<'_>)>(
    source_dir: &Path,
    session: &mut ChatSession<B>,
    config: &BatchConfig,
    mut on_file: F,
) -> Result<BatchOutcome> {
    let job = BatchJob::resolve(source_dir, config)?;
    output::ensure_dir(&config.results_dir)?;

    if !job.guidelines_path.is_file() {
        return Err(BatchError::GuidelinesNotFound {
            file: config.guidelines_file.clone(),
            dir: source_dir.to_path_buf(),
        }
        .into());
    }
    info!(output = %job.output_path.display(), model = session.model(), "starting batch");

    let guidelines = read_text(&job.guidelines_path)?;
    session
        .send(&guidelines)
        .with_context(|| format!("send guidelines {}", job.guidelines_path.display()))?;

    // Previous results are only dropped once the backend has answered the seed.
    if config.fresh_output {
        debug!(output = %job.output_path.display(), "truncating previous results");
        output::truncate(&job.output_path)?;
    }

    let guidelines_name = OsString::from(&config.guidelines_file);
    let mut processed = Vec::new();
    for entry in list_entries(&job.source_dir, config.order)? {
        if entry.name == guidelines_name {
            continue;
        }
        if !entry.is_file {
            debug!(path = %entry.path.display(), "skipping non-file entry");
            continue;
        }

        let content = read_text(&entry.path)?;
        let reply = session
            .send(&content)
            .with_context(|| format!("process {}", entry.path.display()))?;
        output::append_line(&job.output_path, &reply)?;
        info!(path = %entry.path.display(), bytes = reply.len(), "recorded response");

        on_file(&FileProcessed {
            index: processed.len() + 1,
            path: &entry.path,
            output_path: &job.output_path,
        });
        processed.push(entry.path);
    }

    info!(files = processed.len(), output = %job.output_path.display(), "batch complete");
    Ok(BatchOutcome {
        output_path: job.output_path,
        processed,
    })
}

fn batch_name(source_dir: &Path) -> Result<OsString> {
    if let Some(name) = source_dir.file_name() {
        return Ok(name.to_os_string());
    }
    let canonical = fs::canonicalize(source_dir)
        .with_context(|| format!("resolve {}", source_dir.display()))?;
    canonical
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| BatchError::UnnamedDirectory(source_dir.to_path_buf()).into())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
