//! Deterministic, pure logic shared by the session and batch layers.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! messages and return deterministic outputs suitable for tests.

pub mod message;
pub mod request;
