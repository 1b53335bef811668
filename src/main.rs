use clap::Parser;
use comtrade_etl::core::fetcher::endpoint_url;
use comtrade_etl::core::ConfigProvider;
use comtrade_etl::utils::{logger, validation::Validate};
use comtrade_etl::{CliConfig, ComtradePipeline, EtlEngine, LocalStorage, Result, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting comtrade-etl");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    match cli.config.as_deref() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)?;
            tracing::info!("Pipeline: {}", config.pipeline_name());
            let monitor = cli.monitor || config.monitoring_enabled();
            execute(config, cli.dry_run, monitor).await
        }
        None => {
            let (dry_run, monitor) = (cli.dry_run, cli.monitor);
            execute(cli, dry_run, monitor).await
        }
    }
}

async fn execute<C>(config: C, dry_run: bool, monitor: bool) -> Result<()>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        println!("Request URL:  {}", endpoint_url(&config)?);
        println!("Timeout:      {:?}", config.request_timeout());
        println!("Output file:  {}", config.output_path());
        println!("Sheet name:   {}", config.sheet_name());
        return Ok(());
    }

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = ComtradePipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);

    let output_path = engine.run().await?;
    tracing::info!("✅ ETL process completed successfully!");
    println!("📁 Output saved to: {}", output_path);
    Ok(())
}
