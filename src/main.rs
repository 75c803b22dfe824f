use clap::Parser;
use media_jobs::{Config, Error, JobManager, Result, run_with_shutdown};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Asynchronous media fetch job server")]
struct CliArgs {
    /// Path to TOML configuration file. CLI flags override values in the file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8000.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory receiving produced files.
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Path to the yt-dlp executable (searched on PATH when omitted).
    #[arg(long)]
    ytdlp: Option<PathBuf>,
}

impl CliArgs {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading configuration");
                Config::from_toml_file(path)?
            }
            None => Config::default(),
        };

        if let Some(bind) = self.bind {
            config.server.api.bind_address = bind;
        }
        if let Some(dir) = &self.download_dir {
            config.download.download_dir = dir.clone();
        }
        if let Some(path) = &self.ytdlp {
            config.tools.ytdlp_path = Some(path.clone());
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|e| Error::Other(format!("failed to initialize logging: {e}")))?;

    let config = cli_args.resolve_config()?;
    let manager = JobManager::new(config).await?;

    run_with_shutdown(manager).await
}
