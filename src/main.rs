//! Backlog service entry point.
//!
//! Run with:
//!   RUST_LOG=debug cargo run -- [config-path]
//!
//! Try:
//!   curl -X POST localhost:8443/userstories -d '{"Description":"Find Airbnbs"}'
//!   curl -X PUT  localhost:8443/userstories/1 -d '{"ID":1,"Description":"Find Airbnbs","Closed":true}'
//!   curl localhost:8443/userstories/open

use std::sync::Arc;

use backlog::stories::{self, Backlog, Datastore};
use backlog::{Config, Server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = config.socket_addr()?;
    tracing::info!(%addr, level = %config.logging.level, "configuration loaded");

    let store: Arc<dyn Backlog> = Arc::new(Datastore::default());
    let table = stories::routes(store);

    Server::bind(addr)
        .max_body_bytes(config.server.max_body_bytes)
        .serve(table)
        .await?;
    Ok(())
}
