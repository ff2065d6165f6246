//! Batch chat runner.
//!
//! `goggles process <dir>` seeds a conversation with `<dir>/fleubers.txt` and
//! appends the model's reply to every other file in `<dir>` to
//! `results/<dir-name>.txt`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use goggles::batch::process_directory_with_progress;
use goggles::exit_codes;
use goggles::io::backend::{ChatBackend, EchoBackend, OllamaBackend};
use goggles::io::config::{
    DEFAULT_CONFIG_FILE, EntryOrder, GogglesConfig, load_config, write_config,
};
use goggles::logging;
use goggles::session::ChatSession;

#[derive(Parser)]
#[command(
    name = "goggles",
    version,
    about = "Batch-process a folder of text files through a chat model"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send every file in DIR to the model, seeded with the guideline file.
    Process(ProcessArgs),
    /// Write a default config file if missing.
    Init {
        /// Config file to write.
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
struct ProcessArgs {
    /// Input directory.
    dir: PathBuf,
    /// Config file (defaults apply when missing).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Model identifier.
    #[arg(long)]
    model: Option<String>,
    /// Backend base URL.
    #[arg(long)]
    host: Option<String>,
    /// Guideline file name inside DIR.
    #[arg(long)]
    guidelines: Option<String>,
    /// Directory receiving the results file.
    #[arg(long)]
    results_dir: Option<PathBuf>,
    /// Process files in name order instead of listing order.
    #[arg(long)]
    sorted: bool,
    /// Truncate the results file before the batch instead of appending.
    #[arg(long)]
    fresh: bool,
    /// Answer with each file's own content instead of calling the backend.
    #[arg(long)]
    echo: bool,
}

impl ProcessArgs {
    fn apply(&self, cfg: &mut GogglesConfig) {
        if let Some(model) = &self.model {
            cfg.model = model.clone();
        }
        if let Some(host) = &self.host {
            cfg.backend.host = host.clone();
        }
        if let Some(guidelines) = &self.guidelines {
            cfg.batch.guidelines_file = guidelines.clone();
        }
        if let Some(results_dir) = &self.results_dir {
            cfg.batch.results_dir = results_dir.clone();
        }
        if self.sorted {
            cfg.batch.order = EntryOrder::Name;
        }
        if self.fresh {
            cfg.batch.fresh_output = true;
        }
    }
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::for_error(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Process(args) => cmd_process(&args),
        Command::Init { config, force } => cmd_init(&config, force),
    }
}

fn cmd_process(args: &ProcessArgs) -> Result<()> {
    let mut cfg = load_config(&args.config)?;
    args.apply(&mut cfg);
    cfg.validate().context("invalid options")?;
    debug!(?cfg, "resolved config");

    if args.echo {
        return run_batch(&args.dir, &cfg, EchoBackend::default());
    }
    let backend = OllamaBackend::connect(&cfg.backend)?;
    run_batch(&args.dir, &cfg, backend)
}

fn run_batch<B: ChatBackend>(dir: &Path, cfg: &GogglesConfig, backend: B) -> Result<()> {
    let mut session = ChatSession::new(cfg.model.clone(), backend);
    let outcome = process_directory_with_progress(dir, &mut session, &cfg.batch, |file| {
        println!("[{}] {}", file.index, file.path.display());
    })
    .with_context(|| format!("process {}", dir.display()))?;
    println!(
        "{} file(s) -> {}",
        outcome.processed.len(),
        outcome.output_path.display()
    );
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &GogglesConfig::default())?;
    println!("wrote {}", path.display());
    Ok(())
}
