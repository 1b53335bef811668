use crate::domain::model::{OutputRow, TradeRecord};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Parses `body` as a JSON array and returns its elements as rows.
///
/// Only the array itself is checked here; each element is decoded when the
/// returned iterator reaches it.
pub fn tabulate(body: &str) -> Result<Rows> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| EtlError::schema(None, format!("response is not valid JSON: {}", e)))?;

    match value {
        Value::Array(items) => Ok(Rows {
            items: items.into_iter(),
            index: 0,
        }),
        other => Err(EtlError::schema(
            None,
            format!("expected a JSON array, found {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One-shot sequence of rows, one per array element, in array order.
#[derive(Debug)]
pub struct Rows {
    items: std::vec::IntoIter<Value>,
    index: usize,
}

impl Iterator for Rows {
    type Item = Result<OutputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        let index = self.index;
        self.index += 1;

        Some(
            serde_json::from_value::<TradeRecord>(item)
                .map(OutputRow::from)
                .map_err(|e| EtlError::schema(Some(index), e.to_string())),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl ExactSizeIterator for Rows {}
