use crate::config::{DEFAULT_SHEET_NAME, DEFAULT_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: Option<PipelineConfig>,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
    pub parameters: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub sheet_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的變數視為錯誤
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let mut missing = None;
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        match missing {
            Some(var_name) => Err(EtlError::MissingConfigError {
                field: format!("${{{}}}", var_name),
            }),
            None => Ok(result.into_owned()),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_file_extensions(
            "load.output_path",
            std::slice::from_ref(&self.load.output_path),
            &["xls"],
        )?;
        validation::validate_sheet_name("load.sheet_name", self.sheet_name())?;

        Ok(())
    }

    pub fn pipeline_name(&self) -> &str {
        self.pipeline
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(env!("CARGO_PKG_NAME"))
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn sheet_name(&self) -> &str {
        self.load.sheet_name.as_deref().unwrap_or(DEFAULT_SHEET_NAME)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn query_parameters(&self) -> BTreeMap<String, String> {
        self.source.parameters.clone().unwrap_or_default()
    }

    fn request_headers(&self) -> BTreeMap<String, String> {
        self.source.headers.clone().unwrap_or_default()
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
[pipeline]
name = "comtrade-2019"
description = "Annual HS availability"

[source]
endpoint = "https://comtrade.un.org/api/refs/da/view"
timeout_seconds = 10

[source.parameters]
type = "C"
freq = "A"
ps = "2019"

[load]
output_path = "./out/UNComtrade.xls"
sheet_name = "2019"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline_name(), "comtrade-2019");
        assert_eq!(config.api_endpoint(), "https://comtrade.un.org/api/refs/da/view");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.sheet_name(), "2019");
        assert!(config.monitoring_enabled());

        let keys: Vec<String> = config.query_parameters().into_keys().collect();
        assert_eq!(keys, vec!["freq", "ps", "type"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_settings() {
        let toml_content = r#"
[source]
endpoint = "https://comtrade.un.org/api/refs/da/view"

[load]
output_path = "UNComtrade.xls"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.pipeline_name(), "comtrade-etl");
        assert_eq!(config.sheet_name(), "year1");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.query_parameters().is_empty());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("COMTRADE_TEST_API_ENDPOINT", "https://test.api.com");

        let toml_content = r#"
[source]
endpoint = "${COMTRADE_TEST_API_ENDPOINT}"

[load]
output_path = "./output.xls"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.endpoint, "https://test.api.com");

        std::env::remove_var("COMTRADE_TEST_API_ENDPOINT");
    }

    #[test]
    fn test_unset_env_var_is_error() {
        let toml_content = r#"
[source]
endpoint = "https://comtrade.un.org/api/refs/da/view"
headers = { Authorization = "Bearer ${COMTRADE_TEST_UNSET_TOKEN}" }

[load]
output_path = "./output.xls"
"#;

        let err = TomlConfig::from_toml_str(toml_content).unwrap_err();
        match err {
            EtlError::MissingConfigError { field } => {
                assert_eq!(field, "${COMTRADE_TEST_UNSET_TOKEN}")
            }
            other => panic!("expected a missing config error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[source]
endpoint = "invalid-url"

[load]
output_path = "./output.xls"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[source]
endpoint = "https://comtrade.un.org/api/refs/da/view"

[load]
output_path = "./output.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
endpoint = "https://comtrade.un.org/api/refs/da/view"

[load]
output_path = "./output.xls"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline_name(), "file-test");
    }
}
