//! OLE2 compound file holding the single `Workbook` stream.

use crate::utils::error::{EtlError, Result};
use cfb::{CompoundFile, Version};
use std::io::{Cursor, Write};

/// Streams shorter than this would be stored in the mini stream.
pub const MINI_STREAM_CUTOFF: usize = 4096;

/// Wraps `data` as the only stream of a new version 3 (512-byte sector)
/// compound file. Short streams are zero-padded up to the mini stream
/// cutoff so the stream always lives in regular sectors.
pub fn compound_file(stream_name: &str, data: &[u8]) -> Result<Vec<u8>> {
    let container_error =
        |e: std::io::Error| EtlError::workbook(format!("cannot build compound file: {}", e));

    let mut file = CompoundFile::create_with_version(Version::V3, Cursor::new(Vec::new()))
        .map_err(container_error)?;

    {
        let mut stream = file
            .create_stream(format!("/{}", stream_name))
            .map_err(container_error)?;
        stream.write_all(data).map_err(container_error)?;
        if data.len() < MINI_STREAM_CUTOFF {
            stream
                .write_all(&vec![0u8; MINI_STREAM_CUTOFF - data.len()])
                .map_err(container_error)?;
        }
        stream.flush().map_err(container_error)?;
    }

    file.flush().map_err(container_error)?;
    Ok(file.into_inner().into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_stream(file: Vec<u8>, name: &str) -> Vec<u8> {
        let mut comp = CompoundFile::open(Cursor::new(file)).unwrap();
        let mut data = Vec::new();
        comp.open_stream(name).unwrap().read_to_end(&mut data).unwrap();
        data
    }

    #[test]
    fn test_small_stream_is_padded_to_cutoff() {
        let file = compound_file("Workbook", b"hello").unwrap();

        let comp = CompoundFile::open(Cursor::new(file.clone())).unwrap();
        assert_eq!(comp.version(), Version::V3);
        assert!(comp.is_stream("/Workbook"));

        let data = read_stream(file, "/Workbook");
        assert_eq!(data.len(), MINI_STREAM_CUTOFF);
        assert_eq!(&data[..5], b"hello");
        assert!(data[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_large_stream_round_trips() {
        // Large enough to need more than 109 FAT sectors.
        let data: Vec<u8> = (0..8_000_000u32).map(|i| (i % 251) as u8).collect();
        let file = compound_file("Workbook", &data).unwrap();
        assert_eq!(read_stream(file, "/Workbook"), data);
    }

    #[test]
    fn test_output_is_deterministic() {
        let data = vec![7u8; 10_000];
        assert_eq!(
            compound_file("Workbook", &data).unwrap(),
            compound_file("Workbook", &data).unwrap()
        );
    }

    #[test]
    fn test_rejects_long_stream_name() {
        let err = compound_file(&"n".repeat(32), b"").unwrap_err();
        assert!(matches!(err, EtlError::WorkbookError { .. }));
    }
}
