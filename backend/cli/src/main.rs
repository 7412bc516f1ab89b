mod app;
mod extract_cmd;
mod status_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use labelscan_config::{load_and_prepare, resolve_config_path, LabelScanConfig};
use labelscan_logging::init_logger;

#[derive(Parser)]
#[command(name = "labelscan")]
#[command(about = "Reads dates and company names off product label photos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP extraction server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Config file (defaults to $LABELSCAN_CONFIG or ~/.labelscan/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the extraction pipeline on a local image and print the JSON result
    Extract {
        image: PathBuf,
        /// Write the annotated JPEG here instead of embedding it in the output
        #[arg(long)]
        annotated_out: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Query a running server's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

async fn load(config: Option<PathBuf>) -> Result<LabelScanConfig> {
    let path = resolve_config_path(config.as_deref());
    let prepared = load_and_prepare(&path).await?;
    let logging = &prepared.config.logging;
    init_logger(logging.dir.as_deref(), &logging.level);
    prepared.log_warnings();
    info!(path = %path.display(), from_file = path.exists(), "Configuration ready");
    Ok(prepared.config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let mut config = load(config).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            let pipeline = app::build_pipeline(&config)?;
            info!(
                port = config.server.port,
                bind = %config.server.bind_address,
                engine = pipeline.recognizer_name(),
                "Starting labelscan server"
            );
            labelscan_gateway::start_server(config, pipeline).await?;
        }
        Commands::Extract {
            image,
            annotated_out,
            config,
        } => {
            let config = load(config).await?;
            let pipeline = app::build_pipeline(&config)?;
            extract_cmd::run(&pipeline, &image, annotated_out.as_deref()).await?;
        }
        Commands::Status { port } => {
            let port = port.unwrap_or(LabelScanConfig::default().server.port);
            status_cmd::run(port).await?;
        }
    }

    Ok(())
}
