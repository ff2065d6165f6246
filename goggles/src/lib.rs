//! Batch processing of text files through a chat model.
//!
//! A batch seeds one conversation with a directory's guideline file and then
//! sends every other file in that directory, appending each reply to a single
//! results file. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (messages, request composition).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (chat backends, filesystem, config).
//!   Isolated behind small functions and the [`io::backend::ChatBackend`] trait.
//!
//! Orchestration modules ([`session`], [`batch`]) combine the two to implement
//! CLI commands.

pub mod batch;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
