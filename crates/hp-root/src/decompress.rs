//! Inflate ROOT compression blocks.
//!
//! A compressed payload is a sequence of blocks, each behind a 9-byte header:
//! ```text
//! bytes 0-1  algorithm tag: "ZL" zlib, "L4" lz4, "ZS" zstd, "XZ" lzma
//! byte  2    method (unused here)
//! bytes 3-5  compressed size, little-endian u24
//! bytes 6-8  uncompressed size, little-endian u24
//! ```

use std::io::Read;

use crate::error::{Result, RootError};

const BLOCK_HEADER_LEN: usize = 9;

/// ROOT prefixes every LZ4 block with an 8-byte xxhash64 of its output.
const LZ4_CHECKSUM_LEN: usize = 8;

/// Inflate `src` into exactly `expected_len` bytes.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut offset = 0;

    while out.len() < expected_len {
        let header = src.get(offset..offset + BLOCK_HEADER_LEN).ok_or_else(|| {
            RootError::Decompression(format!(
                "truncated block header at offset {offset} ({} of {expected_len} bytes inflated)",
                out.len()
            ))
        })?;
        let tag = [header[0], header[1]];
        let c_size = read_le24(&header[3..6]);
        let u_size = read_le24(&header[6..9]);
        offset += BLOCK_HEADER_LEN;

        let block = src.get(offset..offset + c_size).ok_or_else(|| {
            RootError::Decompression(format!(
                "block claims {c_size} bytes but only {} remain",
                src.len().saturating_sub(offset)
            ))
        })?;

        let inflated = match &tag {
            b"ZL" => inflate_zlib(block, u_size)?,
            b"L4" => inflate_lz4(block, u_size)?,
            b"ZS" => inflate_zstd(block, u_size)?,
            b"XZ" => inflate_xz(block, u_size)?,
            other => {
                return Err(RootError::Decompression(format!(
                    "unsupported compression algorithm {:?}",
                    String::from_utf8_lossy(other)
                )));
            }
        };
        if inflated.len() != u_size {
            return Err(RootError::Decompression(format!(
                "block inflated to {} bytes, header says {u_size}",
                inflated.len()
            )));
        }

        out.extend_from_slice(&inflated);
        offset += c_size;
    }

    if out.len() != expected_len {
        return Err(RootError::Decompression(format!(
            "inflated {} bytes, expected {expected_len}",
            out.len()
        )));
    }
    Ok(out)
}

fn inflate_zlib(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| RootError::Decompression(format!("zlib: {e}")))?;
    Ok(out)
}

fn inflate_lz4(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let payload = data
        .get(LZ4_CHECKSUM_LEN..)
        .ok_or_else(|| RootError::Decompression("lz4 block shorter than its checksum".into()))?;
    lz4_flex::decompress(payload, expected).map_err(|e| RootError::Decompression(format!("lz4: {e}")))
}

fn inflate_zstd(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut decoder = ruzstd::decoding::FrameDecoder::new();
    let mut out = vec![0u8; expected];
    let written = decoder
        .decode_all(data, &mut out)
        .map_err(|e| RootError::Decompression(format!("zstd: {e}")))?;
    out.truncate(written);
    Ok(out)
}

fn inflate_xz(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    lzma_rs::xz_decompress(&mut std::io::BufReader::new(data), &mut out)
        .map_err(|e| RootError::Decompression(format!("xz: {e}")))?;
    Ok(out)
}

fn read_le24(b: &[u8]) -> usize {
    usize::from(b[0]) | usize::from(b[1]) << 8 | usize::from(b[2]) << 16
}

/// Wrap `compressed` in a ROOT block header.
#[cfg(any(test, feature = "fixtures"))]
pub(crate) fn root_block(tag: &[u8; 2], method: u8, compressed: &[u8], u_len: usize) -> Vec<u8> {
    let mut block = Vec::with_capacity(BLOCK_HEADER_LEN + compressed.len());
    block.extend_from_slice(tag);
    block.push(method);
    block.extend_from_slice(&(compressed.len() as u32).to_le_bytes()[..3]);
    block.extend_from_slice(&(u_len as u32).to_le_bytes()[..3]);
    block.extend_from_slice(compressed);
    block
}
