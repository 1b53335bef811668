use crate::domain::model::TransformResult;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn sheet_name(&self) -> &str;
    fn request_timeout(&self) -> Duration;

    /// Query parameters appended to the endpoint, in key order.
    fn query_parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn request_headers(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Fetches the raw response body.
    async fn extract(&self) -> Result<String>;
    /// Tabulates the body and encodes the workbook.
    async fn transform(&self, body: String) -> Result<TransformResult>;
    /// Persists the workbook, returning where it was written.
    async fn load(&self, result: TransformResult) -> Result<String>;
}
