//! `procwatch` keeps a terminal in sync with the status endpoints of
//! long-running server-side processes.
//!
//! By default the processes are shown in a dashboard. `--headless` prints
//! every change as a line instead.

mod console;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use console::ConsoleSurface;
use pw_core::config::loader::load_page_config;
use pw_core::config::models::PageConfig;
use pw_core::scheduler::PollScheduler;
use pw_core::surface::ChannelSurface;
use pw_core::transport::HttpTransport;
use pw_tui::ProcessPanel;
use std::path::PathBuf;
use tokio::sync::mpsc::unbounded_channel;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DISABLED: &str = "Automatic status checking is disabled";

#[derive(Parser, Debug)]
#[command(name = "procwatch", version, about, long_about = None)]
struct Args {
    /// Page configuration file (TOML, or YAML for .yaml/.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Status endpoint of a single-process page
    #[arg(long)]
    status_url: Option<String>,

    /// Token sent with every status request
    #[arg(long)]
    csrf_token: Option<String>,

    /// Delay between polls, in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print changes to stdout instead of opening the dashboard
    #[arg(long)]
    headless: bool,

    /// Write diagnostics to this file while the dashboard is open
    #[arg(long)]
    trace_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Args {
    /// The configuration file, with command-line values taking precedence.
    fn page_config(&self) -> Result<PageConfig> {
        let mut config = match &self.config {
            Some(path) => load_page_config(path)?,
            None => PageConfig::default(),
        };

        if let Some(url) = &self.status_url {
            config.status_url = Some(url.clone());
        }
        if let Some(token) = &self.csrf_token {
            config.csrf_token = Some(token.clone());
        }
        if let Some(interval_ms) = self.interval_ms {
            config.poll_interval_ms = interval_ms;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = args.page_config()?;
    let transport = HttpTransport::new(config.request_timeout())?;

    if args.headless {
        init_tracing(std::io::stderr, !args.no_color);
        run_headless(&config, transport).await
    } else {
        match &args.trace_file {
            Some(path) => {
                let file = std::fs::File::create(path)
                    .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
                init_tracing(std::sync::Mutex::new(file), false);
            }
            None => init_tracing(std::io::sink, false),
        }
        run_dashboard(&config, transport).await
    }
}

fn init_tracing<W>(writer: W, ansi: bool)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pw_core=info,procwatch=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(false),
        )
        .init();
}

async fn run_headless(config: &PageConfig, transport: HttpTransport) -> Result<()> {
    let surface = ConsoleSurface::new(std::io::stdout());
    let closed = surface.closed();
    let mut scheduler =
        PollScheduler::from_config(config, transport, surface).wrap_err(DISABLED)?;

    let stop = async move {
        tokio::select! {
            _ = shutdown_signal() => {}
            _ = closed.notified() => {}
        }
    };
    scheduler.run(None, stop).await;
    Ok(())
}

async fn run_dashboard(config: &PageConfig, transport: HttpTransport) -> Result<()> {
    let (op_tx, op_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();

    let mut scheduler =
        PollScheduler::from_config(config, transport, ChannelSurface::new(event_tx))
            .wrap_err(DISABLED)?;
    let panels = ProcessPanel::from_registry(scheduler.registry());

    let poller = tokio::spawn(async move {
        scheduler.run(Some(op_rx), shutdown_signal()).await;
    });

    pw_tui::run_app(panels, op_tx, event_rx)
        .await
        .map_err(|e| eyre!(e))?;
    poller.await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
