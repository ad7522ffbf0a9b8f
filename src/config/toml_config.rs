use crate::core::planner::{PlannerConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_STEPS_PER_ATTEMPT};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, WardrobeError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_FILE: &str = "wardrobe_data.json";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub planner: PlannerSection,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 資料檔與 uploads/ 目錄所在位置
    pub data_dir: String,
    pub data_file: String,
    /// 前端 index.html 所在目錄
    pub static_dir: String,
    pub max_upload_mb: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            data_file: DEFAULT_DATA_FILE.to_string(),
            static_dir: "static".to_string(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSection {
    pub max_attempts: usize,
    pub max_steps_per_attempt: usize,
    pub seed: Option<u64>,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_steps_per_attempt: DEFAULT_MAX_STEPS_PER_ATTEMPT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub verbose: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WardrobeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| WardrobeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WardrobeError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;

        validate_path("storage.data_dir", &self.storage.data_dir)?;
        validate_path("storage.data_file", &self.storage.data_file)?;
        validate_path("storage.static_dir", &self.storage.static_dir)?;
        validate_positive_number("storage.max_upload_mb", self.storage.max_upload_mb, 1)?;

        validate_positive_number("planner.max_attempts", self.planner.max_attempts, 1)?;
        validate_positive_number(
            "planner.max_steps_per_attempt",
            self.planner.max_steps_per_attempt,
            1,
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn data_file(&self) -> &str {
        &self.storage.data_file
    }

    fn static_dir(&self) -> &str {
        &self.storage.static_dir
    }

    fn max_upload_bytes(&self) -> usize {
        self.storage.max_upload_mb * 1024 * 1024
    }

    fn planner(&self) -> PlannerConfig {
        PlannerConfig {
            max_attempts: self.planner.max_attempts,
            max_steps_per_attempt: self.planner.max_steps_per_attempt,
            seed: self.planner.seed,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8080

[storage]
data_dir = "./wardrobe"

[planner]
max_attempts = 50
seed = 7
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.data_dir(), "./wardrobe");
        assert_eq!(config.data_file(), DEFAULT_DATA_FILE);
        assert_eq!(config.max_upload_bytes(), 50 * 1024 * 1024);

        let planner = config.planner();
        assert_eq!(planner.max_attempts, 50);
        assert_eq!(planner.max_steps_per_attempt, DEFAULT_MAX_STEPS_PER_ATTEMPT);
        assert_eq!(planner.seed, Some(7));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WARDROBE_TEST_DATA_DIR", "/srv/wardrobe");

        let toml_content = r#"
[storage]
data_dir = "${WARDROBE_TEST_DATA_DIR}"
static_dir = "${WARDROBE_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.data_dir, "/srv/wardrobe");
        assert_eq!(config.storage.static_dir, "${WARDROBE_TEST_UNSET_VAR}");

        std::env::remove_var("WARDROBE_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[planner]
max_attempts = 0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("planner.max_attempts"));
    }

    #[test]
    fn test_invalid_toml_reports_parsing_error() {
        let err = TomlConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(
            err,
            WardrobeError::ConfigValidationError { ref field, .. } if field == "toml_parsing"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[logging]
format = "json"
verbose = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.verbose);
    }
}
