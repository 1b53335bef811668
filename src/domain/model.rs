use serde::{Deserialize, Deserializer};

/// Number of columns written for every row, header included.
pub const COLUMN_COUNT: usize = 10;

/// Header titles, in the same order as the fields of [`TradeRecord`].
pub const HEADER: [&str; COLUMN_COUNT] = [
    "Type",
    "Freq",
    "PX",
    "R",
    "rDesc",
    "ps",
    "TotalRecords",
    "isOriginal",
    "PublicationDate",
    "IsPartnerDetail",
];

/// One entry of the Comtrade data-availability listing.
///
/// Every field is required; a missing key, a `null` or a value of the wrong
/// JSON type fails deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[serde(rename = "type")]
    pub trade_type: String,
    pub freq: String,
    pub px: String,
    pub r: String,
    pub r_desc: String,
    pub ps: String,
    #[serde(alias = "TotalRecords")]
    pub total_records: i64,
    #[serde(deserialize_with = "int_or_bool")]
    pub is_original: i64,
    pub publication_date: String,
    #[serde(deserialize_with = "int_or_bool")]
    pub is_partner_detail: i64,
}

// API 有時以 true/false 表示旗標
fn int_or_bool<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(i64),
        Bool(bool),
    }

    match Flag::deserialize(deserializer) {
        Ok(Flag::Int(v)) => Ok(v),
        Ok(Flag::Bool(b)) => Ok(i64::from(b)),
        Err(_) => Err(serde::de::Error::custom("expected an integer or a boolean")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

/// A record flattened into spreadsheet cells, in [`HEADER`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    cells: [CellValue; COLUMN_COUNT],
}

impl OutputRow {
    pub fn cells(&self) -> &[CellValue; COLUMN_COUNT] {
        &self.cells
    }

    pub fn header() -> Self {
        Self {
            cells: HEADER.map(CellValue::from),
        }
    }
}

impl From<TradeRecord> for OutputRow {
    fn from(record: TradeRecord) -> Self {
        Self {
            cells: [
                record.trade_type.into(),
                record.freq.into(),
                record.px.into(),
                record.r.into(),
                record.r_desc.into(),
                record.ps.into(),
                record.total_records.into(),
                record.is_original.into(),
                record.publication_date.into(),
                record.is_partner_detail.into(),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Data rows written, header excluded.
    pub row_count: usize,
    /// Encoded `.xls` file contents.
    pub workbook: Vec<u8>,
}
