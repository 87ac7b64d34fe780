use anyhow::{Context, Result, bail};
use clap::Parser;
use immigrant_ingest::{ParseError, StatementParser};
use immigrant_ofx::OfxEmitter;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

mod config;

#[derive(Parser, Debug)]
#[command(
    name = "immigrant",
    version,
    about = "Convert bank CSV transaction exports to OFX"
)]
struct Cli {
    /// One or more CSV exports; each is written next to itself as <name>.ofx
    #[arg(required_unless_present = "print_config")]
    files: Vec<PathBuf>,

    /// TOML file describing the export layout (defaults to the built-in one)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write .ofx files into this directory instead
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the built-in layout as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", config::default_config_toml()?);
        return Ok(());
    }

    let cfg = config::load_config(cli.config.as_deref())?;
    let parser = StatementParser::new(cfg.clone())?;
    let emitter = OfxEmitter::new(cfg);

    let mut failed = 0;
    for input in &cli.files {
        info!("opening {}", input.display());

        let statement = match parser.parse_file(input) {
            Ok(s) => s,
            Err(ParseError::Open { source, .. }) => {
                error!("file {} couldn't be opened: {source}", input.display());
                failed += 1;
                continue;
            }
            Err(e) => {
                error!("{}: {:#}", input.display(), anyhow::Error::from(e));
                failed += 1;
                continue;
            }
        };

        if statement.metadata.is_empty() {
            warn!("{} contains no transactions", input.display());
        }
        let synthesized = statement.synthesized_ids();
        if synthesized > 0 {
            warn!(
                "{}: {synthesized} transaction(s) have no reference; using date-based FITIDs",
                input.display()
            );
        }

        let output = output_path(input, cli.output_dir.as_deref());
        fs::write(&output, emitter.render(&statement))
            .with_context(|| format!("output file {} couldn't be created", output.display()))?;

        info!(
            "wrote {} transactions to {}",
            statement.transactions.len(),
            output.display()
        );
    }

    if failed > 0 {
        bail!("{failed} of {} file(s) failed to convert", cli.files.len());
    }

    Ok(())
}

fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let out = input.with_extension("ofx");
    match (output_dir, out.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => out,
    }
}
