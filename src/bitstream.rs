//! This file exposes a single struct that can decode the Huffman encoded
//! bitstream of a JPEG scan.
//!
//! The scan is a raw bitstream formed by concatenating each byte's bits
//! MSB-first. The standard allows markers inside the stream, so refills are
//! bytewise: a literal `0xFF` is escaped as `FF 00` and the zero byte is
//! dropped, any other byte after `0xFF` is a marker and ends the scan.
//!
//! The output of a block decode is the run-length encoded coefficient list
//! the MCU reconstructor expands, pairs of (zero run, value) in zig-zag
//! order with `(0, 0)` as the end-of-block terminator.

use std::io::Cursor;

use crate::errors::DecodeErrors;
use crate::huffman::{HuffmanTree, Walk, MAX_CODE_LENGTH};
use crate::marker::Marker;
use crate::misc::read_u8;

/// Largest DC category a baseline 8-bit scan can produce.
const MAX_DC_CATEGORY: u8 = 11;

/// A `BitStream` struct, capable of decoding the compressed data of a scan.
pub(crate) struct BitStream
{
    /// Bits not yet handed out, stored in the low `bits_left` bits
    buffer:    u32,
    /// Number of valid bits in `buffer`
    bits_left: u8,
    /// The marker that ended the scan, once one is seen no more bits are
    /// produced
    pub marker: Option<Marker>,
}

impl BitStream
{
    /// Create a new `BitStream`
    pub(crate) const fn new() -> BitStream
    {
        BitStream {
            buffer:    0,
            bits_left: 0,
            marker:    None,
        }
    }

    /// Pull one byte from the scan into the bit buffer, un-stuffing escaped
    /// `0xFF` bytes and stopping at markers.
    ///
    /// Returns `false` when the scan has ended at a marker.
    fn refill(&mut self, reader: &mut Cursor<Vec<u8>>) -> Result<bool, DecodeErrors>
    {
        if self.marker.is_some()
        {
            return Ok(false);
        }

        let byte = read_u8(reader)?;

        if byte == 0xff
        {
            let mut next = read_u8(reader)?;

            // 0xFF fill bytes may pad the stream before a marker
            while next == 0xff
            {
                next = read_u8(reader)?;
            }

            if next != 0x00
            {
                // a real marker terminates the scan
                self.marker = Some(Marker::from_u8(next).ok_or_else(|| {
                    DecodeErrors::Format(format!(
                        "Unknown marker 0xFF{:02X} inside the scan, cannot continue",
                        next
                    ))
                })?);

                return Ok(false);
            }
            // `FF 00` contributes the literal 0xFF, the zero byte is dropped
        }

        self.buffer = (self.buffer << 8) | u32::from(byte);
        self.bits_left += 8;

        Ok(true)
    }

    /// Produce the next bit of the scan, `None` once a marker ended it.
    #[inline]
    fn next_bit(&mut self, reader: &mut Cursor<Vec<u8>>) -> Result<Option<bool>, DecodeErrors>
    {
        if self.bits_left == 0 && !self.refill(reader)?
        {
            return Ok(None);
        }

        self.bits_left -= 1;

        Ok(Some((self.buffer >> self.bits_left) & 1 == 1))
    }

    /// Read `n` raw bits MSB-first as an unsigned value.
    fn get_bits(
        &mut self, reader: &mut Cursor<Vec<u8>>, n: u8,
    ) -> Result<u16, DecodeErrors>
    {
        let mut value = 0_u16;

        for _ in 0..n
        {
            let bit = self.next_bit(reader)?.ok_or(DecodeErrors::MCUError(
                "Scan data ended inside a coefficient".to_string(),
            ))?;

            value = (value << 1) | u16::from(bit);
        }

        Ok(value)
    }

    /// Walk a Huffman tree one bit at a time until a leaf is hit.
    fn decode_symbol(
        &mut self, reader: &mut Cursor<Vec<u8>>, tree: &HuffmanTree,
    ) -> Result<u8, DecodeErrors>
    {
        let mut at = tree.root();

        for _ in 0..MAX_CODE_LENGTH
        {
            let bit = self.next_bit(reader)?.ok_or(DecodeErrors::MCUError(
                "Scan data ended inside a Huffman code".to_string(),
            ))?;

            match tree.step(at, bit)
            {
                Walk::Leaf(symbol) => return Ok(symbol),
                Walk::Branch(id) => at = id,
                Walk::Miss =>
                {
                    return Err(DecodeErrors::HuffmanDecode(
                        "Invalid prefix code in scan, possibly corrupt data stream".to_string(),
                    ));
                }
            }
        }

        Err(DecodeErrors::HuffmanDecode(
            "Huffman code longer than 16 bits in scan".to_string(),
        ))
    }

    /// Decode one 8x8 coefficient block into its run-length encoded list.
    ///
    /// The first pair is always `(0, dc_difference)`. AC pairs follow in
    /// zig-zag order; `(0, 0)` terminates the block early (EOB), `(15, 0)`
    /// skips sixteen positions (ZRL).
    pub(crate) fn decode_block(
        &mut self, reader: &mut Cursor<Vec<u8>>, dc_tree: &HuffmanTree, ac_tree: &HuffmanTree,
    ) -> Result<Vec<(u8, i32)>, DecodeErrors>
    {
        let mut rle = Vec::with_capacity(16);

        // DC: the symbol is the difference's category, the category many raw
        // bits follow
        let category = self.decode_symbol(reader, dc_tree)?;

        if category > MAX_DC_CATEGORY
        {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid DC category {}, expected a value between 0 and 11",
                category
            )));
        }

        let bits = self.get_bits(reader, category)?;

        rle.push((0_u8, extend(bits, category)));

        // AC: up to 63 (run, size) symbols fill zig-zag positions 1..=63
        let mut pos: usize = 1;

        while pos < 64
        {
            let symbol = self.decode_symbol(reader, ac_tree)?;

            let run = symbol >> 4;
            let size = symbol & 0x0f;

            if size == 0
            {
                if symbol == 0x00
                {
                    // EOB, the remaining positions stay zero
                    rle.push((0, 0));
                    break;
                }

                if symbol == 0xf0
                {
                    // ZRL, sixteen zeros
                    rle.push((15, 0));
                    pos += 16;
                    continue;
                }

                return Err(DecodeErrors::HuffmanDecode(format!(
                    "Invalid AC symbol {:#04x} with zero size and run {}",
                    symbol, run
                )));
            }

            pos += usize::from(run);

            if pos > 63
            {
                return Err(DecodeErrors::MCUError(
                    "Block coefficient index ran past position 63".to_string(),
                ));
            }

            let bits = self.get_bits(reader, size)?;

            rle.push((run, extend(bits, size)));
            pos += 1;
        }

        Ok(rle)
    }
}

/// Convert a raw bit field to the signed value it encodes.
///
/// A category-`s` field whose leading bit is 1 is the positive value of the
/// bits; a leading 0 encodes `-(2^s - 1 - bits)`.
fn extend(bits: u16, category: u8) -> i32
{
    if category == 0
    {
        return 0;
    }

    let value = i32::from(bits);

    if (bits >> (category - 1)) & 1 == 1
    {
        value
    }
    else
    {
        value - (1 << category) + 1
    }
}

#[cfg(test)]
mod tests
{
    use std::io::Cursor;

    use super::{extend, BitStream};
    use crate::errors::DecodeErrors;
    use crate::huffman::HuffmanTree;
    use crate::marker::Marker;

    /// DC-style table, a single category symbol with code "0".
    fn single_symbol_tree(symbol: u8) -> HuffmanTree
    {
        let mut counts = [0_u8; 16];
        counts[0] = 1;

        HuffmanTree::new(&counts, &[symbol]).unwrap()
    }

    #[test]
    fn category_rule()
    {
        // leading bit set: the positive value of the bits
        assert_eq!(extend(0b1, 1), 1);
        assert_eq!(extend(0b1000, 4), 8);
        assert_eq!(extend(0b1111, 4), 15);

        // leading bit clear: -(2^s - 1 - bits)
        assert_eq!(extend(0b0, 1), -1);
        assert_eq!(extend(0b0000, 4), -15);
        assert_eq!(extend(0b0111, 4), -8);

        // category zero is always zero
        assert_eq!(extend(0, 0), 0);
    }

    #[test]
    fn destuffed_ff_contributes_bits()
    {
        // category 8 on code "0", the eighth raw bit comes from the
        // destuffed FF 00 pair
        let dc = single_symbol_tree(8);

        // AC: codes "0" and "1", the second is EOB
        let mut counts = [0_u8; 16];
        counts[0] = 2;
        let ac = HuffmanTree::new(&counts, &[0xf0, 0x00]).unwrap();

        let mut stream = BitStream::new();
        let mut reader = Cursor::new(vec![0x7f, 0xff, 0x00]);

        let block = stream.decode_block(&mut reader, &dc, &ac).unwrap();

        // raw bits 1111_1111 = +255
        assert_eq!(block, vec![(0, 255), (0, 0)]);
    }

    #[test]
    fn marker_in_scan_terminates()
    {
        let mut stream = BitStream::new();
        let mut reader = Cursor::new(vec![0xff, 0xd9]);

        let dc = single_symbol_tree(0);

        let err = stream
            .decode_block(&mut reader, &dc, &single_symbol_tree(0))
            .unwrap_err();

        assert!(matches!(err, DecodeErrors::MCUError(_)));
        assert_eq!(stream.marker, Some(Marker::EOI));
    }

    #[test]
    fn truncation_is_exhaustion()
    {
        let mut stream = BitStream::new();
        let mut reader = Cursor::new(vec![]);

        let dc = single_symbol_tree(0);

        let err = stream
            .decode_block(&mut reader, &dc, &single_symbol_tree(0))
            .unwrap_err();

        assert!(matches!(err, DecodeErrors::ExhaustedData));
    }

    #[test]
    fn eob_and_zrl_runs()
    {
        // DC tree: category 0 on code "0"
        // AC tree: code "0" = ZRL, code "10" = EOB
        let dc = single_symbol_tree(0);

        let mut counts = [0_u8; 16];
        counts[0] = 1;
        counts[1] = 1;
        let ac = HuffmanTree::new(&counts, &[0xf0, 0x00]).unwrap();

        // bits: DC "0", ZRL "0", EOB "10", padding
        let mut stream = BitStream::new();
        let mut reader = Cursor::new(vec![0b0010_1111]);

        let block = stream.decode_block(&mut reader, &dc, &ac).unwrap();

        assert_eq!(block, vec![(0, 0), (15, 0), (0, 0)]);
    }

    #[test]
    fn runs_past_the_block_end_are_rejected()
    {
        let dc = single_symbol_tree(0);

        // AC code "0" is (run 15, size 1), each pair fills 16 positions and
        // a fifth one must overflow the block
        let mut counts = [0_u8; 16];
        counts[0] = 1;
        let ac = HuffmanTree::new(&counts, &[0xf1]).unwrap();

        let mut stream = BitStream::new();
        // DC "0", then pairs of code "0" + raw bit "1" until overflow
        let mut reader = Cursor::new(vec![0b0010_1010, 0b1010_1010, 0b1010_1010]);

        let err = stream.decode_block(&mut reader, &dc, &ac).unwrap_err();

        assert!(matches!(err, DecodeErrors::MCUError(_)));
    }
}
