//! Stable exit codes for the `goggles` CLI.

use crate::batch::BatchError;

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed (config, backend, I/O or any other error).
pub const FAILED: i32 = 1;
/// `goggles process` found no guideline file in the input directory.
pub const GUIDELINES_MISSING: i32 = 2;

/// Map a command error to its exit code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BatchError>() {
        Some(BatchError::GuidelinesNotFound { .. }) => GUIDELINES_MISSING,
        _ => FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_guidelines_has_dedicated_code() {
        let err = anyhow::Error::from(BatchError::GuidelinesNotFound {
            file: "fleubers.txt".to_string(),
            dir: PathBuf::from("data"),
        })
        .context("process data");
        assert_eq!(for_error(&err), GUIDELINES_MISSING);
    }

    #[test]
    fn other_errors_fail() {
        assert_eq!(for_error(&anyhow::anyhow!("boom")), FAILED);
    }
}
