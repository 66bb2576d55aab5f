use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use harvest::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "harvest=debug,harvest_core=debug"
    } else {
        "harvest=info,harvest_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.load_config()?;

    match cli.command {
        Commands::Config => cli::config::run(&config),
        Commands::Extract { file } => {
            let pipeline = cli::build_pipeline(&config);
            cli::extract::run(&pipeline, &file, cli.kind).await
        }
        Commands::Text { input } => {
            let pipeline = cli::build_pipeline(&config);
            cli::text::run(&pipeline, &input, cli.kind).await
        }
        Commands::Batch {
            dir,
            output,
            with_source,
        } => {
            let pipeline = cli::build_pipeline(&config);
            cli::batch::run(&pipeline, &dir, cli.kind, output.as_deref(), with_source).await
        }
    }
}
