//! `matmul-plots` command line.
//!
//! ```text
//! matmul-plots [FOLDER] [--root DIR] [--config FILE] [--format png|svg] [--threads N]
//!              [--all-folders]
//! ```
//!
//! Reads CSVs from `<root>/data/chrono[/FOLDER]` and writes charts to
//! `<root>/data/plots[/FOLDER]`. Missing inputs skip their chart; the exit code is non-zero only
//! when the command line or the config file is invalid.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use matmul_plots::batch::{discover_folders, run_batch, BatchConfig, BatchReport};
use matmul_plots::charts::ImageFormat;
use matmul_plots::ingestion::{PipelineObserver, StdErrObserver};

const USAGE: &str = "usage: matmul-plots [FOLDER] [--root DIR] [--config FILE] \
                     [--format png|svg] [--threads N] [--all-folders]";

#[derive(Debug, Default)]
struct Args {
    folder: Option<String>,
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    format: Option<ImageFormat>,
    threads: Option<i64>,
    all_folders: bool,
    help: bool,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "--all-folders" => args.all_folders = true,
            "--root" => args.root = Some(PathBuf::from(value_of(&mut it, "--root")?)),
            "--config" => args.config = Some(PathBuf::from(value_of(&mut it, "--config")?)),
            "--format" => {
                let v = value_of(&mut it, "--format")?;
                match ImageFormat::from_extension(&v) {
                    Some(f) => args.format = Some(f),
                    None => bail!("unsupported format '{v}' (expected png or svg)"),
                }
            }
            "--threads" => {
                let v = value_of(&mut it, "--threads")?;
                let n = v
                    .parse::<i64>()
                    .with_context(|| format!("--threads expects an integer, got '{v}'"))?;
                args.threads = Some(n);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
            positional => {
                if args.folder.is_some() {
                    bail!("unexpected argument '{positional}'\n{USAGE}");
                }
                args.folder = Some(positional.to_string());
            }
        }
    }
    Ok(args)
}

fn value_of(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next()
        .with_context(|| format!("{flag} needs a value\n{USAGE}"))
}

fn build_config(args: &Args) -> Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if args.folder.is_some() {
        config.folder = args.folder.clone();
    }
    if let Some(format) = args.format {
        config.style.format = format;
    }
    if args.threads.is_some() {
        config.threads_filter = args.threads;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    let config = build_config(&args)?;
    let observer: Arc<dyn PipelineObserver> = Arc::new(StdErrObserver);

    let folders: Vec<Option<String>> = if args.all_folders {
        let found = discover_folders(&config.root);
        if found.is_empty() {
            vec![None]
        } else {
            found.into_iter().map(Some).collect()
        }
    } else {
        vec![config.folder.clone()]
    };

    let mut report = BatchReport::default();
    for folder in folders {
        let run = BatchConfig {
            folder,
            ..config.clone()
        };
        let dirs = run.directories();
        eprintln!(
            "[batch] {} -> {}",
            dirs.data_dir.display(),
            dirs.plots_dir.display()
        );
        report.extend(run_batch(&run, Some(observer.clone())).context("running batch")?);
    }

    println!("{}", report.summary());
    Ok(())
}
