use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skipstore_core::IndexConfig;

/// Level bound used when neither a flag nor a config file sets one
pub const DRIVER_MAX_LEVEL: usize = 6;

/// Load a key-value file into a skip list index and exercise it
#[derive(Parser, Debug)]
#[command(name = "skipstore", version)]
pub struct Args {
    /// The data file to load, one `key: value` record per line
    pub file: PathBuf,
    #[arg(long)]
    /// Upper bound on skip list levels
    pub max_level: Option<usize>,
    #[arg(long)]
    /// Separator between key and value
    pub delimiter: Option<char>,
    #[arg(long)]
    /// Where to dump the index, defaults to the configured store file
    pub dump: Option<PathBuf>,
    #[arg(long)]
    /// JSON file holding an index config
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    /// Log every insert and delete
    pub verbose: bool,
}

impl Args {
    /// Build the index config: driver defaults or the config file, then flags
    pub fn index_config(&self) -> Result<IndexConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => IndexConfig {
                max_level: DRIVER_MAX_LEVEL,
                ..Default::default()
            },
        };

        if let Some(max_level) = self.max_level {
            config.max_level = max_level;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(dump) = &self.dump {
            config.store_file = dump.clone();
        }
        Ok(config)
    }
}
