//! BIFF8 record encoding.
//!
//! Every record is `id: u16, len: u16, body`. Bodies are capped at
//! [`MAX_RECORD_BODY`] bytes; longer payloads (only the shared string table
//! here) continue in `CONTINUE` records.

use std::collections::HashMap;

pub const MAX_RECORD_BODY: usize = 8224;

pub const BOF: u16 = 0x0809;
pub const EOF: u16 = 0x000A;
pub const CODEPAGE: u16 = 0x0042;
pub const WINDOW1: u16 = 0x003D;
pub const FONT: u16 = 0x0031;
pub const XF: u16 = 0x00E0;
pub const STYLE: u16 = 0x0293;
pub const BOUNDSHEET: u16 = 0x0085;
pub const SST: u16 = 0x00FC;
pub const CONTINUE: u16 = 0x003C;
pub const DIMENSIONS: u16 = 0x0200;
pub const WINDOW2: u16 = 0x023E;
pub const LABELSST: u16 = 0x00FD;
pub const NUMBER: u16 = 0x0203;

pub const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
pub const BOF_WORKSHEET: u16 = 0x0010;

/// Number of style XF records every workbook carries before the cell XFs.
pub const STYLE_XF_COUNT: u16 = 15;
pub const XF_DEFAULT_CELL: u16 = STYLE_XF_COUNT;
pub const XF_HEADER_CELL: u16 = STYLE_XF_COUNT + 1;

/// Index 4 is never written, so the fifth FONT record has index 5.
const FONT_BOLD: u16 = 5;

const CODEPAGE_UTF16: u16 = 1200;
/// Option flags of an uncompressed (UTF-16LE) unicode string.
const STRING_UNCOMPRESSED: u8 = 0x01;

#[derive(Debug, Default)]
pub struct RecordBuf {
    buf: Vec<u8>,
}

impl RecordBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: u16, body: &[u8]) {
        debug_assert!(body.len() <= MAX_RECORD_BODY);
        self.buf.extend_from_slice(&id.to_le_bytes());
        self.buf.extend_from_slice(&(body.len() as u16).to_le_bytes());
        self.buf.extend_from_slice(body);
    }

    /// Byte offset at which the next record will start.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    pub fn append(&mut self, other: RecordBuf) {
        self.buf.extend(other.buf);
    }

    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        self.buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn bof(&mut self, substream: u16) {
        let mut body = Vec::with_capacity(16);
        body.extend_from_slice(&0x0600u16.to_le_bytes()); // BIFF8
        body.extend_from_slice(&substream.to_le_bytes());
        body.extend_from_slice(&0x0DBBu16.to_le_bytes()); // build
        body.extend_from_slice(&0x07CCu16.to_le_bytes()); // year
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&0x0006u32.to_le_bytes());
        self.record(BOF, &body);
    }

    pub fn eof(&mut self) {
        self.record(EOF, &[]);
    }

    pub fn codepage(&mut self) {
        self.record(CODEPAGE, &CODEPAGE_UTF16.to_le_bytes());
    }

    pub fn window1(&mut self) {
        let fields: [u16; 9] = [
            0x01E0, 0x005A, 0x3FCF, 0x2A4E, // position and size, in twips
            0x0038, // show scroll bars and sheet tabs
            0,      // active sheet
            0,      // first visible tab
            1,      // selected tabs
            0x0258, // tab bar width ratio
        ];
        let body: Vec<u8> = fields.iter().flat_map(|f| f.to_le_bytes()).collect();
        self.record(WINDOW1, &body);
    }

    pub fn fonts(&mut self) {
        for _ in 0..4 {
            self.record(FONT, &font_body(false));
        }
        self.record(FONT, &font_body(true));
    }

    pub fn xfs(&mut self) {
        for _ in 0..STYLE_XF_COUNT {
            self.record(XF, &xf_body(0, true));
        }
        self.record(XF, &xf_body(0, false));
        self.record(XF, &xf_body(FONT_BOLD, false));
    }

    pub fn normal_style(&mut self) {
        // 內建樣式 "Normal"，對應第 0 個 XF
        self.record(STYLE, &[0x00, 0x80, 0x00, 0xFF]);
    }

    /// Writes a BOUNDSHEET record with a zero stream offset and returns the
    /// absolute offset of that field so it can be patched once known.
    pub fn boundsheet(&mut self, name: &str) -> usize {
        let units: Vec<u16> = name.encode_utf16().collect();
        let mut body = Vec::with_capacity(8 + units.len() * 2);
        body.extend_from_slice(&0u32.to_le_bytes());
        body.push(0x00); // visible
        body.push(0x00); // worksheet
        body.push(units.len() as u8);
        body.push(STRING_UNCOMPRESSED);
        body.extend(units.iter().flat_map(|u| u.to_le_bytes()));

        let offset = self.buf.len() + 4;
        self.record(BOUNDSHEET, &body);
        offset
    }

    pub fn dimensions(&mut self, rows: u32, columns: u16) {
        let mut body = Vec::with_capacity(14);
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&rows.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&columns.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        self.record(DIMENSIONS, &body);
    }

    pub fn window2(&mut self) {
        let mut body = Vec::with_capacity(18);
        body.extend_from_slice(&0x06B6u16.to_le_bytes()); // gridlines, headers, selected
        body.extend_from_slice(&0u16.to_le_bytes()); // top row
        body.extend_from_slice(&0u16.to_le_bytes()); // left column
        body.extend_from_slice(&0x0040u16.to_le_bytes()); // gridline colour
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes()); // page break preview zoom
        body.extend_from_slice(&0u16.to_le_bytes()); // normal zoom
        body.extend_from_slice(&0u32.to_le_bytes());
        self.record(WINDOW2, &body);
    }

    pub fn label_sst(&mut self, row: u16, col: u16, xf: u16, sst_index: u32) {
        let mut body = Vec::with_capacity(10);
        body.extend_from_slice(&row.to_le_bytes());
        body.extend_from_slice(&col.to_le_bytes());
        body.extend_from_slice(&xf.to_le_bytes());
        body.extend_from_slice(&sst_index.to_le_bytes());
        self.record(LABELSST, &body);
    }

    pub fn number(&mut self, row: u16, col: u16, xf: u16, value: f64) {
        let mut body = Vec::with_capacity(14);
        body.extend_from_slice(&row.to_le_bytes());
        body.extend_from_slice(&col.to_le_bytes());
        body.extend_from_slice(&xf.to_le_bytes());
        body.extend_from_slice(&value.to_le_bytes());
        self.record(NUMBER, &body);
    }

    pub fn sst(&mut self, strings: &SharedStrings) {
        for (i, chunk) in strings.encode().iter().enumerate() {
            self.record(if i == 0 { SST } else { CONTINUE }, chunk);
        }
    }
}

fn font_body(bold: bool) -> Vec<u8> {
    const NAME: &[u8] = b"Arial";
    let mut body = Vec::with_capacity(16 + NAME.len());
    body.extend_from_slice(&200u16.to_le_bytes()); // 10pt
    body.extend_from_slice(&0u16.to_le_bytes());
    body.extend_from_slice(&0x7FFFu16.to_le_bytes()); // automatic colour
    body.extend_from_slice(&(if bold { 700u16 } else { 400u16 }).to_le_bytes());
    body.extend_from_slice(&0u16.to_le_bytes()); // no super/subscript
    body.push(0); // underline
    body.push(0); // family
    body.push(0); // charset
    body.push(0);
    body.push(NAME.len() as u8);
    body.push(0x00); // compressed
    body.extend_from_slice(NAME);
    body
}

fn xf_body(font: u16, style: bool) -> [u8; 20] {
    let mut body = [0u8; 20];
    body[0..2].copy_from_slice(&font.to_le_bytes());
    // format 0 (General)
    let flags: u16 = if style { 0xFFF5 } else { 0x0001 };
    body[4..6].copy_from_slice(&flags.to_le_bytes());
    body[6] = 0x20; // bottom aligned
    body[9] = match (style, font) {
        (true, _) => 0xF4,
        (false, 0) => 0x00,
        (false, _) => 0x08, // font differs from the parent style
    };
    body[18..20].copy_from_slice(&0x20C0u16.to_le_bytes());
    body
}

/// Shared string table: every distinct text cell value, stored once.
#[derive(Debug, Default)]
pub struct SharedStrings {
    strings: Vec<Vec<u16>>,
    index: HashMap<String, u32>,
    references: u32,
}

impl SharedStrings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table index for `value`, adding it on first use.
    pub fn intern(&mut self, value: &str) -> u32 {
        self.references += 1;
        if let Some(&i) = self.index.get(value) {
            return i;
        }
        let i = self.strings.len() as u32;
        self.strings.push(value.encode_utf16().collect());
        self.index.insert(value.to_string(), i);
        i
    }

    #[cfg(test)]
    pub fn unique_count(&self) -> usize {
        self.strings.len()
    }

    #[cfg(test)]
    pub fn reference_count(&self) -> u32 {
        self.references
    }

    /// Encodes the table as record bodies: the first is the SST body, the
    /// rest are CONTINUE bodies.
    ///
    /// A string header never straddles a record boundary. When character
    /// data does, the continuation starts with a fresh option-flags byte.
    pub fn encode(&self) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        let mut current = Vec::with_capacity(MAX_RECORD_BODY);
        current.extend_from_slice(&self.references.to_le_bytes());
        current.extend_from_slice(&(self.strings.len() as u32).to_le_bytes());

        for units in &self.strings {
            let first_char = if units.is_empty() { 0 } else { 2 };
            if current.len() + 3 + first_char > MAX_RECORD_BODY {
                chunks.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(MAX_RECORD_BODY),
                ));
            }
            current.extend_from_slice(&(units.len() as u16).to_le_bytes());
            current.push(STRING_UNCOMPRESSED);

            let mut rest = units.as_slice();
            loop {
                let room = (MAX_RECORD_BODY - current.len()) / 2;
                let (now, later) = rest.split_at(room.min(rest.len()));
                current.extend(now.iter().flat_map(|u| u.to_le_bytes()));
                rest = later;
                if rest.is_empty() {
                    break;
                }
                chunks.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(MAX_RECORD_BODY),
                ));
                current.push(STRING_UNCOMPRESSED);
            }
        }

        chunks.push(current);
        chunks
    }
}
