pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod xls;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{etl::EtlEngine, pipeline::ComtradePipeline};
pub use utils::error::{EtlError, Result};
