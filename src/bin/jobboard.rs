use clap::Parser;
use jobboard_admin::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so JOBBOARD_API_URL etc. can live next to the binary
    let _ = dotenvy::dotenv();

    let config = jobboard_admin::config::config();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_directive())),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Using API at {} ({:?})", config.api.base_url, config.environment);

    let cli = Cli::parse();

    if let Err(e) = jobboard_admin::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
