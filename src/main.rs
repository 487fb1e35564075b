use anyhow::Result;
use clap::Parser;
use itemsets_core::config::ServerConfig;
use itemsets_core::server::ItemSetServer;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Item set kit commands, driven from the console.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Config file to load. Missing keys are filled in with defaults.
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "itemsets.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("ITEMSETS_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    info!("Loading config from {}", args.config.display());
    let config = ServerConfig::load(&args.config)?;
    ItemSetServer::run(config)
}
