//! Reads back the `.xls` files the pipeline writes: Workbook stream →
//! BIFF8 records → cells.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(s) => s,
            other => panic!("expected text cell, got {:?}", other),
        }
    }

    pub fn number(&self) -> f64 {
        match self {
            Cell::Number(n) => *n,
            other => panic!("expected number cell, got {:?}", other),
        }
    }
}

#[derive(Debug)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

fn u16_at(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn u32_at(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

/// Extracts the `Workbook` stream from the compound file.
pub fn workbook_stream(file: &[u8]) -> Vec<u8> {
    let mut comp = cfb::CompoundFile::open(Cursor::new(file)).expect("compound file");
    let mut stream = Vec::new();
    comp.open_stream("/Workbook")
        .expect("Workbook stream")
        .read_to_end(&mut stream)
        .expect("readable stream");
    stream
}

fn records(stream: &[u8]) -> Vec<(u16, &[u8])> {
    let mut out = Vec::new();
    let mut pos = 0;
    let mut eofs = 0;
    while eofs < 2 && pos + 4 <= stream.len() {
        let id = u16_at(stream, pos);
        let len = u16_at(stream, pos + 2) as usize;
        out.push((id, &stream[pos + 4..pos + 4 + len]));
        if id == 0x000A {
            eofs += 1;
        }
        pos += 4 + len;
    }
    out
}

/// Decodes the SST body and its CONTINUE bodies.
fn shared_strings(chunks: &[&[u8]]) -> Vec<String> {
    let unique = u32_at(chunks[0], 4) as usize;
    let mut chunk = 0;
    let mut pos = 8;
    let mut strings = Vec::with_capacity(unique);

    for _ in 0..unique {
        if pos >= chunks[chunk].len() {
            chunk += 1;
            pos = 0;
        }
        let cch = u16_at(chunks[chunk], pos) as usize;
        let mut wide = chunks[chunk][pos + 2] & 0x01 == 0x01;
        pos += 3;

        let mut units = Vec::with_capacity(cch);
        while units.len() < cch {
            if pos >= chunks[chunk].len() {
                chunk += 1;
                wide = chunks[chunk][0] & 0x01 == 0x01;
                pos = 1;
            }
            if wide {
                units.push(u16_at(chunks[chunk], pos));
                pos += 2;
            } else {
                units.push(chunks[chunk][pos] as u16);
                pos += 1;
            }
        }
        strings.push(String::from_utf16(&units).expect("valid UTF-16"));
    }
    strings
}

pub fn read_sheet(file: &[u8]) -> Sheet {
    let stream = workbook_stream(file);
    let records = records(&stream);

    let mut sst_chunks: Vec<&[u8]> = Vec::new();
    let mut in_sst = false;
    let mut name = String::new();
    for (id, body) in &records {
        match *id {
            0x00FC => {
                sst_chunks.push(body);
                in_sst = true;
            }
            0x003C if in_sst => sst_chunks.push(body),
            0x0085 => {
                let cch = body[6] as usize;
                let units: Vec<u16> = (0..cch).map(|i| u16_at(body, 8 + i * 2)).collect();
                name = String::from_utf16_lossy(&units);
                in_sst = false;
            }
            _ => in_sst = false,
        }
    }
    let strings = if sst_chunks.is_empty() {
        Vec::new()
    } else {
        shared_strings(&sst_chunks)
    };

    let mut cells: BTreeMap<(u16, u16), Cell> = BTreeMap::new();
    for (id, body) in &records {
        match *id {
            0x00FD => {
                let index = u32_at(body, 6) as usize;
                cells.insert(
                    (u16_at(body, 0), u16_at(body, 2)),
                    Cell::Text(strings[index].clone()),
                );
            }
            0x0203 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&body[6..14]);
                cells.insert(
                    (u16_at(body, 0), u16_at(body, 2)),
                    Cell::Number(f64::from_le_bytes(raw)),
                );
            }
            _ => {}
        }
    }

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for ((r, c), cell) in cells {
        let (r, c) = (r as usize, c as usize);
        while rows.len() <= r {
            rows.push(Vec::new());
        }
        assert_eq!(rows[r].len(), c, "cells must be contiguous");
        rows[r].push(cell);
    }

    Sheet { name, rows }
}

pub fn record_json(reporter: &str, desc: &str, total: i64) -> serde_json::Value {
    serde_json::json!({
        "type": "C", "freq": "A", "px": "HS", "r": reporter, "rDesc": desc,
        "ps": "2019", "totalRecords": total, "isOriginal": 1,
        "publicationDate": "2020-01-01", "isPartnerDetail": 0
    })
}
