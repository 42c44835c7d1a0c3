use std::path::PathBuf;

use clap::Parser;
use schema_assemble_core::{Assembler, AssemblyConfig, Freshness};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "schema-assemble", version)]
#[command(about = "Assemble a combined schema file from ordered fragments")]
struct Cli {
    /// YAML file with the fragment manifest, preamble, and paths
    /// (default: built-in Prisma layout under ./prisma).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory fragment paths are resolved against.
    #[arg(long)]
    base_dir: Option<PathBuf>,
    /// Output file, relative to the base directory unless absolute.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Verify the output is up to date without writing it.
    #[arg(long)]
    check: bool,
    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => AssemblyConfig::load(path).map_err(|e| e.to_string())?,
        None => AssemblyConfig::default(),
    };
    if let Some(base_dir) = cli.base_dir {
        config = config.with_base_dir(base_dir);
    }
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }
    config.validate().map_err(|e| e.to_string())?;

    debug!(
        base_dir = %config.base_dir.display(),
        fragments = config.fragments.len(),
        "resolved configuration"
    );

    let assembler = Assembler::new(&config);
    let output = config.output_path();

    if cli.check {
        return match assembler.check().map_err(|e| e.to_string())? {
            Freshness::UpToDate => {
                println!("{} is up to date.", output.display());
                Ok(())
            }
            Freshness::Stale => Err(format!(
                "'{}' is out of date; rerun schema-assemble",
                output.display()
            )),
            Freshness::Missing => Err(format!(
                "'{}' does not exist; run schema-assemble",
                output.display()
            )),
        };
    }

    let report = assembler.assemble().map_err(|e| e.to_string())?;
    let name = report
        .output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.output.display().to_string());
    println!("Merged {name} generated.");
    Ok(())
}
