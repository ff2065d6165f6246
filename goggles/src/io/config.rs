//! Configuration stored in `goggles.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, resolved against the working directory by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "goggles.toml";

/// Top-level configuration (TOML).
///
/// Intended to be edited by humans. Missing fields fall back to defaults, so an
/// empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GogglesConfig {
    /// Model identifier passed to the backend on every request.
    pub model: String,

    pub backend: BackendConfig,

    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the Ollama server.
    pub host: String,
    pub temperature: f64,
    pub top_p: f64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BatchConfig {
    /// Name of the guideline file at the root of the input directory.
    pub guidelines_file: String,
    /// Directory receiving `<directory-name>.txt` output files.
    pub results_dir: PathBuf,
    pub order: EntryOrder,
    /// Truncate the output file before the batch instead of appending to it.
    pub fresh_output: bool,
}

/// Order in which directory entries are processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrder {
    /// Whatever order the platform lists entries in.
    #[default]
    Listing,
    /// Lexicographic by file name.
    Name,
}

impl Default for GogglesConfig {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            backend: BackendConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            temperature: 0.0,
            top_p: 0.9,
            timeout_secs: 5 * 60,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            guidelines_file: "fleubers.txt".to_string(),
            results_dir: PathBuf::from("results"),
            order: EntryOrder::Listing,
            fresh_output: false,
        }
    }
}

impl GogglesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must not be empty"));
        }
        if self.backend.host.trim().is_empty() {
            return Err(anyhow!("backend.host must not be empty"));
        }
        let temperature = self.backend.temperature;
        if temperature.is_nan() || temperature < 0.0 {
            return Err(anyhow!("backend.temperature must be >= 0"));
        }
        let top_p = self.backend.top_p;
        if top_p.is_nan() || top_p <= 0.0 || top_p > 1.0 {
            return Err(anyhow!("backend.top_p must be in (0, 1]"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(anyhow!("backend.timeout_secs must be > 0"));
        }
        let guidelines = &self.batch.guidelines_file;
        if guidelines.trim().is_empty() {
            return Err(anyhow!("batch.guidelines_file must not be empty"));
        }
        if guidelines.contains(['/', '\\']) || guidelines == "." || guidelines == ".." {
            return Err(anyhow!(
                "batch.guidelines_file must be a bare file name (got '{guidelines}')"
            ));
        }
        if self.batch.results_dir.as_os_str().is_empty() {
            return Err(anyhow!("batch.results_dir must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GogglesConfig::default()`.
pub fn load_config(path: &Path) -> Result<GogglesConfig> {
    if !path.exists() {
        let cfg = GogglesConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GogglesConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &GogglesConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, GogglesConfig::default());
        assert_eq!(cfg.batch.guidelines_file, "fleubers.txt");
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("goggles.toml");
        let mut cfg = GogglesConfig::default();
        cfg.model = "mistral".to_string();
        cfg.batch.order = EntryOrder::Name;
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("goggles.toml");
        fs::write(&path, "model = \"qwen2\"\n\n[batch]\norder = \"name\"\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.model, "qwen2");
        assert_eq!(cfg.batch.order, EntryOrder::Name);
        assert_eq!(cfg.batch.guidelines_file, "fleubers.txt");
        assert_eq!(cfg.backend, BackendConfig::default());
    }

    #[test]
    fn rejects_guidelines_path() {
        let mut cfg = GogglesConfig::default();
        cfg.batch.guidelines_file = "sub/fleubers.txt".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("bare file name"));
    }

    #[test]
    fn rejects_out_of_range_sampling() {
        let mut cfg = GogglesConfig::default();
        cfg.backend.top_p = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = GogglesConfig::default();
        cfg.backend.temperature = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn invalid_file_reports_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("goggles.toml");
        fs::write(&path, "model = \"\"\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("model must not be empty"));
    }
}
