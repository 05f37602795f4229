use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use warden::config::{Cli, Config};
use warden::http::router::Router;
use warden::privilege;
use warden::server::{listener, stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout may carry the response in --stdio mode, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::load(&cli)?;

    if cfg.stdio {
        return stdio::serve(Arc::new(Router::new(cfg.docroot))).await;
    }

    let listener = listener::bind(cfg.port)
        .with_context(|| format!("failed to listen on port {}", cfg.port))?;

    let docroot = match &cfg.privileges {
        Some(privileges) => {
            privilege::enter_jail(&cfg.docroot, privileges)?;
            PathBuf::new()
        }
        None => cfg.docroot.clone(),
    };
    let router = Arc::new(Router::new(docroot));

    tokio::select! {
        res = listener::serve(listener, router) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
