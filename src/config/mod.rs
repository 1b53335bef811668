pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

/// Data-availability listing for 2019 annual HS commodity data, all reporters.
pub const DEFAULT_API_ENDPOINT: &str = "https://comtrade.un.org/api//refs/da/view?type=C&freq=A&px=HS&ps=2019&r=All&p=all&rg=all&cc=TOTAL&fmt=json";
pub const DEFAULT_OUTPUT_PATH: &str = "UNComtrade.xls";
pub const DEFAULT_SHEET_NAME: &str = "year1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "comtrade-etl")]
#[command(about = "Downloads the UN Comtrade data-availability listing into an .xls spreadsheet")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Load settings from a TOML file instead of the flags above
    #[arg(long)]
    pub config: Option<String>,

    /// Show what would be fetched and written without doing it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring (CPU, memory usage)")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            config: None,
            dry_run: false,
            verbose: false,
            monitor: false,
            json_logs: false,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extensions(
            "output_path",
            std::slice::from_ref(&self.output_path),
            &["xls"],
        )?;
        validation::validate_sheet_name("sheet_name", &self.sheet_name)?;
        validation::validate_range(
            "timeout_seconds",
            self.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        Ok(())
    }
}
