pub mod etl;
pub mod fetcher;
pub mod pipeline;
pub mod tabulator;

pub use crate::domain::model::{OutputRow, TradeRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
