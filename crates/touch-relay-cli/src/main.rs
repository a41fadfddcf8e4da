//! touch-relay CLI — producer and consumer entry points.

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use touch_relay_injector::{EventSink, TraceSink};
use touch_relay_protocol::{SinkClient, SinkServer};
use touch_relay_session::{Config, Session};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "touch-relay",
    about = "Synthesize multi-touch gestures and relay them to a privileged sink",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the producer: command listener, gesture engine, frame sender.
    Serve,

    /// Run the privileged consumer: accept one producer and inject frames.
    Sink,

    /// Write a default configuration file.
    InitConfig,
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = touch_relay_session::load_config(cli.config.as_deref())?;
            init_logging(&config.session.log_level);

            serve(config).await
        }
        Commands::Sink => {
            let config = touch_relay_session::load_config(cli.config.as_deref())?;
            init_logging(&config.session.log_level);

            sink(&config).await
        }
        Commands::InitConfig => {
            init_logging("info");

            let path = touch_relay_session::write_default_config(cli.config.as_deref())?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Producer: gestures in, paced frames out over the wire.
async fn serve(config: Config) -> anyhow::Result<()> {
    let sink_addr: SocketAddr = config
        .session
        .sink_addr()
        .parse()
        .context("invalid sink address")?;
    let client = SinkClient::new(sink_addr);

    let session = Session::bind(&config, Box::new(client)).await?;
    info!(sink = %sink_addr, "producer ready");

    let shutdown = session.shutdown_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("interrupt received");
        shutdown.shutdown().await;
    });

    session.run().await?;
    Ok(())
}

/// Consumer: accept one producer, inject every decoded frame. Any transport
/// error is fatal; the privileged side never limps along on a broken stream.
async fn sink(config: &Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .session
        .sink_addr()
        .parse()
        .context("invalid sink address")?;
    let server = SinkServer::bind(addr).await?;
    info!(addr = %server.local_addr()?, "waiting for producer");

    let mut receiver = server.accept().await?;
    info!("producer connected");

    let mut backend = TraceSink;
    while let Some(frame) = receiver.recv().await? {
        backend.inject(frame).await?;
    }

    info!("producer disconnected");
    Ok(())
}
