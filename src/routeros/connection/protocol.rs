// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! RouterOS wire protocol length prefix
//!
//! Words on the wire are prefixed with a variable-length size: the high
//! bits of the first byte select how many bytes the length occupies
//! (1 to 5).

use tokio::io::{AsyncRead, AsyncReadExt};

// Intentional truncation is part of the wire format
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn encode_length(len: usize) -> Vec<u8> {
    match len {
        0..0x80 => vec![len as u8],
        0x80..0x4000 => vec![((len >> 8) as u8) | 0x80, len as u8],
        0x4000..0x0020_0000 => vec![((len >> 16) as u8) | 0xC0, (len >> 8) as u8, len as u8],
        0x0020_0000..0x1000_0000 => vec![
            ((len >> 24) as u8) | 0xE0,
            (len >> 16) as u8,
            (len >> 8) as u8,
            len as u8,
        ],
        _ => vec![
            ((len >> 32) as u8) | 0xF0,
            (len >> 24) as u8,
            (len >> 16) as u8,
            (len >> 8) as u8,
            len as u8,
        ],
    }
}

/// Reads one length prefix from the stream.
///
/// Generic over the reader so it can be exercised against in-memory
/// buffers and reused by protocol peers in integration tests.
pub async fn read_length<R>(stream: &mut R) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let first = stream.read_u8().await?;
    if first & 0x80 == 0 {
        return Ok(first as usize);
    }

    let (mask, extra) = if first & 0xC0 == 0x80 {
        (0x3F, 1)
    } else if first & 0xE0 == 0xC0 {
        (0x1F, 2)
    } else if first & 0xF0 == 0xE0 {
        (0x0F, 3)
    } else {
        (0x07, 4)
    };

    let mut len = (first & mask) as usize;
    for _ in 0..extra {
        len = (len << 8) | stream.read_u8().await? as usize;
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_length_small() {
        assert_eq!(encode_length(0), vec![0]);
        assert_eq!(encode_length(1), vec![1]);
        assert_eq!(encode_length(127), vec![127]);
    }

    #[test]
    fn test_encode_length_medium() {
        assert_eq!(encode_length(128), vec![0x80, 0x80]);
        assert_eq!(encode_length(256), vec![0x81, 0x00]);
        assert_eq!(encode_length(0x3FFF), vec![0xBF, 0xFF]);
    }

    #[test]
    fn test_encode_length_large() {
        assert_eq!(encode_length(0x4000), vec![0xC0, 0x40, 0x00]);
        assert_eq!(encode_length(0x1F_FFFF), vec![0xDF, 0xFF, 0xFF]);
        assert_eq!(encode_length(0x0020_0000), vec![0xE0, 0x20, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_read_length_single_byte() {
        let mut data: &[u8] = &[0x7F];
        assert_eq!(read_length(&mut data).await.unwrap(), 0x7F);
    }

    #[tokio::test]
    async fn test_read_length_roundtrip() {
        let values: Vec<usize> = vec![
            0,
            1,
            0x7F,
            0x80,
            0xFF,
            0x100,
            0x3FFF,
            0x4000,
            0xFFFF,
            0x1F_FFFF,
            0x0020_0000,
            0x0FFF_FFFF,
            0x1000_0000,
            0xFFFF_FFFF,
        ];

        for value in values {
            let encoded = encode_length(value);
            let mut reader: &[u8] = &encoded;
            let decoded = read_length(&mut reader).await.unwrap();
            assert_eq!(decoded, value, "roundtrip failed for {value:#X}");
        }
    }

    #[tokio::test]
    async fn test_read_length_eof() {
        // Truncated two-byte prefix
        let mut data: &[u8] = &[0x80];
        assert!(read_length(&mut data).await.is_err());
    }
}
