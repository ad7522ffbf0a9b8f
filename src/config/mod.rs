pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::{LogFormat, TomlConfig};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "wardrobe-server")]
#[command(about = "Wardrobe catalog and weekly outfit planner")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "WARDROBE_CONFIG")]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding the data file and uploads/
    #[arg(long, env = "WARDROBE_DATA_DIR")]
    pub data_dir: Option<String>,

    #[arg(long)]
    pub data_file: Option<String>,

    /// Directory holding index.html
    #[arg(long)]
    pub static_dir: Option<String>,

    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Per-attempt ceiling on examined candidates
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Fixed planner seed for reproducible plans
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔 (若有) 後套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(data_file) = &self.data_file {
            config.storage.data_file = data_file.clone();
        }
        if let Some(static_dir) = &self.static_dir {
            config.storage.static_dir = static_dir.clone();
        }
        if let Some(mb) = self.max_upload_mb {
            config.storage.max_upload_mb = mb;
        }
        if let Some(attempts) = self.max_attempts {
            config.planner.max_attempts = attempts;
        }
        if let Some(steps) = self.max_steps {
            config.planner.max_steps_per_attempt = steps;
        }
        if self.seed.is_some() {
            config.planner.seed = self.seed;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if self.verbose {
            config.logging.verbose = true;
        }
    }
}
