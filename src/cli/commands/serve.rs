//! `sparklab serve`: run the HTTP service.

use anyhow::Result;
use clap::Args;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::http;
use crate::infrastructure::logging::init_tracing;

#[derive(Args)]
pub struct ServeArgs {
    /// Load configuration from this file instead of .sparklab/
    #[arg(long)]
    pub config: Option<String>,

    /// Override the configured port
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config: Config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&config.logging);

    http::serve(config).await
}
