//! Implementation of the `initials init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tokio::fs;

use super::pool_config;
use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

const PROJECT_DIR: &str = ".initials";

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Delete an existing database and start empty
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub database_path: PathBuf,
    pub config_written: Option<PathBuf>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        lines.push(format!("Database: {}", self.database_path.display()));
        if let Some(path) = &self.config_written {
            lines.push(format!("Wrote default config to {}", path.display()));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let database_path = PathBuf::from(&config.database.path);

    if args.force && database_path.exists() {
        remove_database(&database_path).await?;
    }

    let pool = initialize_database(&config.database.url(), Some(pool_config(config)))
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let config_written = write_default_config(Path::new(PROJECT_DIR)).await?;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Database reinitialized.".to_string()
        } else {
            "Database initialized.".to_string()
        },
        database_path,
        config_written,
    };

    output(&output_data, json_mode);
    Ok(())
}

/// Remove the database along with its WAL side files.
async fn remove_database(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .await
        .with_context(|| format!("Failed to remove {}", path.display()))?;

    for suffix in ["-wal", "-shm"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            fs::remove_file(&side)
                .await
                .with_context(|| format!("Failed to remove {}", side.display()))?;
        }
    }
    Ok(())
}

/// Write `config.yaml` with the defaults if the project has none yet.
async fn write_default_config(project_dir: &Path) -> Result<Option<PathBuf>> {
    let path = project_dir.join("config.yaml");
    if path.exists() {
        return Ok(None);
    }

    fs::create_dir_all(project_dir)
        .await
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;
    let yaml = serde_yaml::to_string(&Config::default()).context("Failed to render default config")?;
    fs::write(&path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path))
}
