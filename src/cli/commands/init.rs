//! `sparklab init`: create the project configuration and database.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use tracing::info;

use crate::adapters::sqlite::{all_embedded_migrations, create_pool, Migrator};
use crate::domain::models::{Config, LoggingConfig};
use crate::infrastructure::logging::init_tracing;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: InitArgs) -> Result<()> {
    init_tracing(&LoggingConfig::default());

    let config_dir = Path::new(".sparklab");
    let config_path = config_dir.join("config.yaml");

    if config_path.exists() && !args.force {
        anyhow::bail!("{} already exists; use --force to overwrite", config_path.display());
    }

    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize default config")?;
    std::fs::write(&config_path, yaml)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    info!("Wrote {}", config_path.display());

    let database_url = format!("sqlite:{}", config.database.path);
    let pool = create_pool(&database_url, config.database.max_connections)
        .await
        .context("Failed to create database")?;
    let applied = Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to run database migrations")?;
    pool.close().await;

    info!(applied, "Database initialized at {}", config.database.path);

    Ok(())
}
