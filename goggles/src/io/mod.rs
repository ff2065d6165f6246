//! I/O helpers for batch commands.

pub mod backend;
pub mod config;
pub mod listing;
pub mod output;
