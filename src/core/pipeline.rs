use crate::core::fetcher::HttpFetcher;
use crate::core::tabulator::tabulate;
use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;
use crate::xls::XlsWriter;

/// Comtrade listing → `.xls` pipeline.
pub struct ComtradePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    fetcher: HttpFetcher,
    writer: XlsWriter,
}

impl<S: Storage, C: ConfigProvider> ComtradePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config)?;
        let writer = XlsWriter::new(config.sheet_name())?;
        Ok(Self {
            storage,
            config,
            fetcher,
            writer,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ComtradePipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        self.fetcher.fetch().await
    }

    async fn transform(&self, body: String) -> Result<TransformResult> {
        let rows = tabulate(&body)?;
        tracing::info!("Response holds {} records", rows.len());

        let encoded = self.writer.encode(rows)?;
        Ok(TransformResult {
            row_count: encoded.data_rows,
            workbook: encoded.bytes,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();

        tracing::debug!(
            "Writing workbook ({} bytes, {} rows) to {}",
            result.workbook.len(),
            result.row_count,
            output_path
        );
        self.storage.write_file(output_path, &result.workbook).await?;

        Ok(output_path.to_string())
    }
}
