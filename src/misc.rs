//! Small utilities shared across the decoder.
//!
//! Byte-source read helpers, the zig-zag permutation tables and the start of
//! frame marker constants live here.
#![allow(dead_code)]

use std::io::Read;

use crate::errors::DecodeErrors;

/// Start of baseline DCT Huffman coding
pub const START_OF_FRAME_BASE: u16 = 0xffc0;
/// Start of extended sequential DCT Huffman coding
pub const START_OF_FRAME_EXT_SEQ: u16 = 0xffc1;
/// Start of progressive DCT encoding
pub const START_OF_FRAME_PROG_DCT: u16 = 0xffc2;
/// Start of lossless sequential Huffman coding
pub const START_OF_FRAME_LOS_SEQ: u16 = 0xffc3;
/// Start of extended sequential DCT arithmetic coding
pub const START_OF_FRAME_EXT_AR: u16 = 0xffc9;
/// Start of progressive DCT arithmetic coding
pub const START_OF_FRAME_PROG_DCT_AR: u16 = 0xffca;
/// Start of lossless sequential arithmetic coding
pub const START_OF_FRAME_LOS_SEQ_AR: u16 = 0xffcb;

/// Undo run length encoding of coefficients by placing them in natural order.
///
/// `UN_ZIGZAG[i]` is the row-major position of the coefficient at zig-zag
/// position `i`.
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; 64] = [
    0,  1,  8,  16, 9,  2,  3, 10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Zig-zag position of each coefficient in row-major order, the inverse of
/// [`UN_ZIGZAG`].
#[rustfmt::skip]
pub const ZIGZAG: [usize; 64] = [
    0,  1,  5,  6,  14, 15, 27, 28,
    2,  4,  7,  13, 16, 26, 29, 42,
    3,  8,  12, 17, 25, 30, 41, 43,
    9,  11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54,
    20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61,
    35, 36, 48, 49, 57, 58, 62, 63,
];

/// Read a single byte from the stream.
///
/// # Errors
/// [`DecodeErrors::ExhaustedData`] when the stream ends, an
/// [`DecodeErrors::IoError`] for any other read failure.
#[inline]
pub fn read_u8<R>(reader: &mut R) -> Result<u8, DecodeErrors>
where
    R: Read,
{
    let mut tmp = [0; 1];

    reader.read_exact(&mut tmp).map_err(map_eof)?;

    Ok(tmp[0])
}

/// Read two bytes from the stream and combine them into a `u16` in big-endian
/// order, the byte order of all multi-byte JFIF header integers.
///
/// # Errors
/// [`DecodeErrors::ExhaustedData`] when the stream ends before both bytes are
/// read.
#[inline]
pub fn read_u16_be<R>(reader: &mut R) -> Result<u16, DecodeErrors>
where
    R: Read,
{
    let mut tmp: [u8; 2] = [0, 0];

    reader.read_exact(&mut tmp).map_err(map_eof)?;

    Ok(u16::from_be_bytes(tmp))
}

fn map_eof(err: std::io::Error) -> DecodeErrors
{
    if err.kind() == std::io::ErrorKind::UnexpectedEof
    {
        DecodeErrors::ExhaustedData
    }
    else
    {
        DecodeErrors::IoError(err)
    }
}
