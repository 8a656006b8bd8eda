use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use runstrap_boot::{bootstrap, BootstrapReport, BootstrapRequest, GitCli};
use runstrap_core::RunError;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "runstrap",
    version,
    about = "Create a timestamped run directory with provenance and initialise the run database"
)]
struct Cli {
    /// YAML configuration with `paths.outputs_dir`, `paths.db_path` and `project.run_tag`.
    config: PathBuf,
    /// Project root that relative `paths.*` entries and `sql/schema.sql` resolve against.
    ///
    /// Defaults to the current working directory, not the location of the
    /// installed binary; pass the project checkout when running from elsewhere.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Schema script to apply instead of `<root>/sql/schema.sql`.
    #[arg(long)]
    schema: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Exits with status 2 and a usage message when the config argument is missing.
    let cli = Cli::parse();
    init_tracing();
    match run(&cli) {
        Ok(report) => {
            println!("OK: created run folder: {}", report.run_dir.display());
            println!("OK: initialized db: {}", report.db_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!(code = err.code(), detail = ?err.info(), "bootstrap failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<BootstrapReport, RunError> {
    let mut request = BootstrapRequest::new(&cli.config, &cli.root);
    if let Some(schema) = &cli.schema {
        request = request.with_schema(schema);
    }
    bootstrap(&request, &GitCli::new(&cli.root))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
