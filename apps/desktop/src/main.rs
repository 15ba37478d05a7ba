use std::{path::Path, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{load_settings, ClientError, Coordinator, DocumentFile, HttpRemoteClient};
use shared::domain::BackendStatus;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{parse_command, Command, HELP};
use render::{render_event, render_status};

#[derive(Parser, Debug)]
#[command(about = "Ask questions about a PDF indexed by a remote service")]
struct Args {
    /// Overrides the configured API base address.
    #[arg(long)]
    server_url: Option<String>,
    /// PDF to upload before the prompt opens.
    #[arg(long)]
    file: Option<std::path::PathBuf>,
    /// Print timeline events as JSON lines.
    #[arg(long)]
    json: bool,
}

struct App {
    coordinator: Arc<Coordinator>,
    remote: Arc<HttpRemoteClient>,
    backend: BackendStatus,
    cursor: usize,
    json: bool,
}

impl App {
    async fn refresh_backend(&mut self) {
        self.backend = self.remote.probe().await;
        info!(status = ?self.backend, base_url = self.remote.base_url(), "backend: status");
        if self.backend != BackendStatus::Connected {
            println!(
                "backend unreachable at {}; use /retry once it is up",
                self.remote.base_url()
            );
        }
    }

    fn backend_ready(&self) -> bool {
        if self.backend == BackendStatus::Connected {
            return true;
        }
        println!("backend is not connected; use /retry");
        false
    }

    async fn upload(&mut self, path: &Path) {
        if !self.backend_ready() {
            return;
        }
        let file = match DocumentFile::from_path(path).await {
            Ok(file) => file,
            Err(err) => {
                println!("{err}");
                return;
            }
        };
        if let Err(ClientError::Busy) = self.coordinator.submit_file(Some(file)).await {
            println!("a request is already in progress");
        }
    }

    async fn ask(&mut self, question: &str) {
        if !self.backend_ready() {
            return;
        }
        if let Err(ClientError::Busy) = self.coordinator.submit_question(question).await {
            println!("a request is already in progress");
        }
    }

    fn flush_timeline(&mut self) -> Result<()> {
        let fresh = self.coordinator.timeline_since(self.cursor);
        for event in &fresh {
            println!("{}", render_event(event, self.json)?);
        }
        self.cursor += fresh.len();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(server_url) = args.server_url {
        settings.api_base_url = client_core::config::normalize_base_url(&server_url)?;
    }
    info!(base_url = %settings.api_base_url, mode = ?settings.mode, "client: starting");

    let remote = Arc::new(HttpRemoteClient::from_settings(&settings)?);
    let mut app = App {
        coordinator: Coordinator::new(remote.clone()),
        remote,
        backend: BackendStatus::Checking,
        cursor: 0,
        json: args.json,
    };
    app.refresh_backend().await;

    if let Some(path) = args.file {
        app.upload(&path).await;
        app.flush_timeline()?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Nothing) => {}
            Ok(Command::Upload(path)) => app.upload(&path).await,
            Ok(Command::Ask(question)) => app.ask(&question).await,
            Ok(Command::Reset) => match app.coordinator.reset() {
                Ok(()) => {
                    app.cursor = 0;
                    println!("started a new session");
                }
                Err(err) => println!("{err}"),
            },
            Ok(Command::Status) => {
                let snapshot = app.coordinator.snapshot();
                println!(
                    "{}",
                    render_status(&snapshot, app.backend, app.remote.base_url())
                );
            }
            Ok(Command::Retry) => app.refresh_backend().await,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(message) => println!("{message}"),
        }
        app.flush_timeline()?;
    }

    Ok(())
}
