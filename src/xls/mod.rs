//! Legacy Excel (`.xls`) output: BIFF8 records inside an OLE2 compound file.

pub mod biff;
pub mod container;
pub mod writer;

pub use writer::{EncodedWorkbook, XlsWriter};
