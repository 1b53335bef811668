use crate::domain::model::{CellValue, OutputRow, COLUMN_COUNT};
use crate::utils::error::{EtlError, Result};
use crate::xls::biff::{self, RecordBuf, SharedStrings};
use crate::xls::container;

/// BIFF8 sheets hold at most 65536 rows, header included.
pub const MAX_ROWS: usize = 65_536;
/// Longest text a BIFF8 cell can hold, in UTF-16 code units.
pub const MAX_CELL_TEXT: usize = 32_767;

const WORKBOOK_STREAM: &str = "Workbook";

/// Encodes rows as a single-sheet `.xls` workbook.
#[derive(Debug, Clone)]
pub struct XlsWriter {
    sheet_name: String,
}

impl XlsWriter {
    pub fn new(sheet_name: impl Into<String>) -> Result<Self> {
        let sheet_name = sheet_name.into();
        crate::utils::validation::validate_sheet_name("sheet_name", &sheet_name)?;
        Ok(Self { sheet_name })
    }

    /// Writes the header row followed by every row of `rows`, in order.
    ///
    /// Stops at the first error yielded by `rows`.
    pub fn encode<I>(&self, rows: I) -> Result<EncodedWorkbook>
    where
        I: IntoIterator<Item = Result<OutputRow>>,
    {
        let (data_rows, stream) = self.encode_stream(rows)?;
        tracing::debug!(
            "Encoded {} data rows into a {} byte workbook stream",
            data_rows,
            stream.len()
        );

        Ok(EncodedWorkbook {
            data_rows,
            bytes: container::compound_file(WORKBOOK_STREAM, &stream)?,
        })
    }

    /// Builds the BIFF8 workbook stream and counts the data rows in it.
    fn encode_stream<I>(&self, rows: I) -> Result<(usize, Vec<u8>)>
    where
        I: IntoIterator<Item = Result<OutputRow>>,
    {
        let mut sheet = SheetBuilder::default();
        sheet.push(&OutputRow::header(), biff::XF_HEADER_CELL)?;
        for row in rows {
            sheet.push(&row?, biff::XF_DEFAULT_CELL)?;
        }

        let data_rows = sheet.rows - 1;
        Ok((data_rows, sheet.finish(&self.sheet_name)))
    }
}

#[derive(Debug, Clone)]
pub struct EncodedWorkbook {
    pub data_rows: usize,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct SheetBuilder {
    cells: RecordBuf,
    strings: SharedStrings,
    rows: usize,
}

impl SheetBuilder {
    fn push(&mut self, row: &OutputRow, xf: u16) -> Result<()> {
        if self.rows >= MAX_ROWS {
            return Err(EtlError::workbook(format!(
                "a sheet holds at most {} rows including the header",
                MAX_ROWS
            )));
        }
        let r = self.rows as u16;

        for (c, cell) in row.cells().iter().enumerate() {
            let c = c as u16;
            match cell {
                CellValue::Text(text) => {
                    if text.encode_utf16().count() > MAX_CELL_TEXT {
                        return Err(EtlError::workbook(format!(
                            "text in row {} column {} exceeds {} characters",
                            r, c, MAX_CELL_TEXT
                        )));
                    }
                    let index = self.strings.intern(text);
                    self.cells.label_sst(r, c, xf, index);
                }
                CellValue::Integer(value) => self.cells.number(r, c, xf, *value as f64),
            }
        }

        self.rows += 1;
        Ok(())
    }

    /// Assembles the workbook globals and the sheet substream.
    fn finish(self, sheet_name: &str) -> Vec<u8> {
        let mut globals = RecordBuf::new();
        globals.bof(biff::BOF_WORKBOOK_GLOBALS);
        globals.codepage();
        globals.window1();
        globals.fonts();
        globals.xfs();
        globals.normal_style();
        let sheet_offset_field = globals.boundsheet(sheet_name);
        globals.sst(&self.strings);
        globals.eof();

        // 工作表子串流緊接在全域區段之後
        let sheet_offset = globals.offset() as u32;
        globals.patch_u32(sheet_offset_field, sheet_offset);

        let mut sheet = RecordBuf::new();
        sheet.bof(biff::BOF_WORKSHEET);
        sheet.dimensions(self.rows as u32, COLUMN_COUNT as u16);
        sheet.append(self.cells);
        sheet.window2();
        sheet.eof();

        globals.append(sheet);
        globals.into_bytes()
    }
}
