//! Test-only helpers: scripted chat backends and temporary batch layouts.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::core::message::Message;
use crate::io::backend::ChatBackend;

/// One queued backend reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Fail(String),
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// A request observed by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Backend that replays queued replies and records every request.
///
/// Running out of replies is an error, so tests notice unexpected calls.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: RefCell<VecDeque<ScriptedReply>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl ChatBackend for ScriptedBackend {
    fn chat(&self, model: &str, messages: &[Message]) -> Result<String> {
        self.calls.borrow_mut().push(RecordedCall {
            model: model.to_string(),
            messages: messages.to_vec(),
        });
        match self.replies.borrow_mut().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("scripted backend exhausted")),
        }
    }
}

/// Backend that answers `"R:" + last message`, failing on the n-th call (1-based).
#[derive(Debug, Default)]
pub struct FlakyEchoBackend {
    fail_on_call: Option<usize>,
    seen: Cell<usize>,
}

impl FlakyEchoBackend {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            seen: Cell::new(0),
        }
    }
}

impl ChatBackend for FlakyEchoBackend {
    fn chat(&self, _model: &str, messages: &[Message]) -> Result<String> {
        let seen = self.seen.get() + 1;
        self.seen.set(seen);
        if self.fail_on_call == Some(seen) {
            return Err(anyhow!("backend unavailable on call {seen}"));
        }
        let last = messages.last().map(Message::content).unwrap_or_default();
        Ok(format!("R:{last}"))
    }
}

/// Temporary workspace with an input directory and a results directory.
pub struct TestBatch {
    temp: TempDir,
    input: PathBuf,
}

impl TestBatch {
    /// Create `<tmp>/<name>/` as the input directory.
    pub fn new(name: &str) -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let input = temp.path().join(name);
        fs::create_dir_all(&input).with_context(|| format!("create {}", input.display()))?;
        Ok(Self { temp, input })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn input_dir(&self) -> &Path {
        &self.input
    }

    pub fn results_dir(&self) -> PathBuf {
        self.temp.path().join("results")
    }

    /// Write `contents` to `<input>/<name>`.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.input.join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn mkdir(&self, name: &str) -> Result<PathBuf> {
        let path = self.input.join(name);
        fs::create_dir_all(&path).with_context(|| format!("create {}", path.display()))?;
        Ok(path)
    }
}
