//! Decode JPEG markers/segments
//!
//! This file deals with decoding header information in a JPEG file.

use std::io::Read;

use crate::components::Components;
use crate::decoder::{Decoder, MAX_DIMENSIONS, MAX_TABLES};
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::huffman::HuffmanTree;
use crate::misc::{read_u16_be, read_u8};

/// **B.2.4.2 Huffman table-specification syntax**
///
/// A single DHT segment may carry several tables, each one is an info byte
/// (bit 4: class, 0 = DC / 1 = AC; low nibble: destination id), sixteen code
/// length counts and the concatenated symbol list.
pub(crate) fn parse_huffman<R>(decoder: &mut Decoder, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: Read,
{
    let dht_length = read_u16_be(buf).map_err(|_| {
        DecodeErrors::HuffmanDecode("Could not read Huffman length from image".to_string())
    })?;

    if dht_length < 2
    {
        return Err(DecodeErrors::HuffmanDecode(format!(
            "Invalid DHT length {}",
            dht_length
        )));
    }

    let mut length_left = dht_length - 2;

    while length_left > 0
    {
        let ht_info = read_u8(buf)?;

        // bit 4 indicates whether the table is DC or AC type
        let is_ac = (ht_info >> 4) & 0x01 == 1;
        // low nibble is the destination slot
        let index = (ht_info & 0x0f) as usize;

        if index >= MAX_TABLES
        {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid Huffman table destination {}, expected a value between 0 and {}",
                index,
                MAX_TABLES - 1
            )));
        }

        let mut counts: [u8; 16] = [0; 16];

        for count in counts.iter_mut()
        {
            *count = read_u8(buf)?;
        }

        let symbols_sum: u16 = counts.iter().map(|f| u16::from(*f)).sum();

        // the sum of the number of symbols cannot be greater than 256
        if symbols_sum > 256
        {
            return Err(DecodeErrors::HuffmanDecode(
                "Encountered Huffman table with excessive length in DHT".to_string(),
            ));
        }

        // symbols in increasing code length
        let mut symbols: Vec<u8> = vec![0; usize::from(symbols_sum)];

        for symbol in symbols.iter_mut()
        {
            *symbol = read_u8(buf)?;
        }

        length_left = length_left.checked_sub(17 + symbols_sum).ok_or_else(|| {
            DecodeErrors::HuffmanDecode(
                "DHT segment length inconsistent with its tables".to_string(),
            )
        })?;

        debug!(
            "Building {} Huffman tree for destination {} ({} symbols)",
            if is_ac { "AC" } else { "DC" },
            index,
            symbols_sum
        );

        let tree = HuffmanTree::new(&counts, &symbols)?;

        if is_ac
        {
            decoder.ac_trees[index] = Some(tree);
        }
        else
        {
            decoder.dc_trees[index] = Some(tree);
        }
    }

    Ok(())
}

/// **B.2.4.1 Quantization table-specification syntax**
///
/// Elements are stored exactly as they appear in the stream, i.e. in zig-zag
/// order; dequantization is element-wise against the zig-zag coefficient
/// vector.
pub(crate) fn parse_dqt<R>(decoder: &mut Decoder, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: Read,
{
    let qt_length = read_u16_be(buf)
        .map_err(|c| DecodeErrors::Format(format!("Could not read DQT length {}", c)))?;

    if qt_length < 2
    {
        return Err(DecodeErrors::DqtError(format!(
            "Invalid DQT length {}",
            qt_length
        )));
    }

    let mut length_left = qt_length - 2;

    // a single DQT segment may have multiple tables
    while length_left > 0
    {
        let qt_info = read_u8(buf)?;

        // 0 = 8 bit, 1 = 16 bit elements
        let precision = (qt_info >> 4) as usize;
        // last 4 bits give us the destination slot
        let table_position = (qt_info & 0x0f) as usize;

        if table_position >= MAX_TABLES
        {
            return Err(DecodeErrors::DqtError(format!(
                "Invalid quantization table destination {}, expected a value between 0 and {}",
                table_position,
                MAX_TABLES - 1
            )));
        }

        let mut table = [0_u16; 64];

        match precision
        {
            0 =>
            {
                for element in table.iter_mut()
                {
                    *element = u16::from(read_u8(buf)?);
                }
            }
            1 =>
            {
                for element in table.iter_mut()
                {
                    *element = read_u16_be(buf)?;
                }
            }
            _ =>
            {
                return Err(DecodeErrors::DqtError(format!(
                    "Expected QT precision value of either 0 or 1, found {:?}",
                    precision
                )));
            }
        }

        let table_bytes = (1 + 64 * (precision + 1)) as u16;

        length_left = length_left.checked_sub(table_bytes).ok_or_else(|| {
            DecodeErrors::DqtError("DQT segment length inconsistent with its tables".to_string())
        })?;

        debug!(
            "Stored {}-bit quantization table {}",
            8 * (precision + 1),
            table_position
        );

        decoder.qt_tables[table_position] = Some(table);
    }

    Ok(())
}

/// Section: `B.2.2 Frame header syntax`
///
/// Parses the baseline frame header and rejects the stream shapes this
/// decoder does not handle: precision other than 8 bits, component counts
/// other than three and any sub-sampled component.
pub(crate) fn parse_start_of_frame<R>(buf: &mut R, img: &mut Decoder) -> Result<(), DecodeErrors>
where
    R: Read,
{
    let length = read_u16_be(buf)
        .map_err(|_| DecodeErrors::Format("Cannot read SOF length, exhausted data".to_string()))?;

    // usually 8, can be 12 or 16 which we do not support
    let dt_precision = read_u8(buf)?;

    if dt_precision != 8
    {
        let feature = UnsupportedSchemes::HighBitDepth(dt_precision);

        error!("{:?}", feature);

        return Err(DecodeErrors::Unsupported(feature));
    }

    img.info.set_density(dt_precision);

    let img_height = read_u16_be(buf).map_err(|_| {
        DecodeErrors::Format("Cannot read image height, exhausted data".to_string())
    })?;

    img.info.set_height(img_height);

    let img_width = read_u16_be(buf)
        .map_err(|_| DecodeErrors::Format("Cannot read image width, exhausted data".to_string()))?;

    img.info.set_width(img_width);

    info!("Image dimensions {} x {} pixels", img_width, img_height);

    if img_width == 0 || img_height == 0
    {
        return Err(DecodeErrors::ZeroError);
    }

    let dimensions = usize::from(img_width) * usize::from(img_height);

    if dimensions > MAX_DIMENSIONS
    {
        return Err(DecodeErrors::LargeDimensions(dimensions));
    }

    let num_components = read_u8(buf)?;

    // length covers the fixed header plus three bytes per component
    let expected_length = 3 * u16::from(num_components) + 8;

    if length != expected_length
    {
        return Err(DecodeErrors::SofError(format!(
            "Length of start of frame differs from expected {}, value is {}",
            expected_length, length
        )));
    }

    if num_components != 3
    {
        return Err(DecodeErrors::SofError(format!(
            "The decoder handles three component YCbCr images, the frame declares {}",
            num_components
        )));
    }

    img.info.components = num_components;

    let mut components = Vec::with_capacity(usize::from(num_components));

    for _ in 0..num_components
    {
        let mut temp = [0; 3];

        for byte in temp.iter_mut()
        {
            *byte = read_u8(buf)?;
        }

        components.push(Components::from(temp)?);
    }

    // 4:4:4 only, every sampling factor must be one
    if components
        .iter()
        .any(|c| c.horizontal_sample != 1 || c.vertical_sample != 1)
    {
        let feature = UnsupportedSchemes::ChromaSubSampling;

        error!("{:?}", feature);

        return Err(DecodeErrors::Unsupported(feature));
    }

    img.components = components;

    Ok(())
}

/// Parse a start of scan segment.
///
/// Records each listed component's DC and AC Huffman table selectors, then
/// skips the three spectral selection bytes that are fixed for baseline
/// scans.
pub(crate) fn parse_sos<R>(buf: &mut R, image: &mut Decoder) -> Result<(), DecodeErrors>
where
    R: Read,
{
    // scan header length
    let ls = read_u16_be(buf)?;

    // number of image components in the scan
    let ns = read_u8(buf)?;

    if !(1..4).contains(&ns)
    {
        return Err(DecodeErrors::SosError(format!(
            "Number of components in start of scan should be between 1 and 3, found {}",
            ns
        )));
    }

    if ls != u16::from(6 + 2 * ns)
    {
        return Err(DecodeErrors::SosError(
            "Bad SOS length, corrupt jpeg".to_string(),
        ));
    }

    if usize::from(ns) != image.components.len()
    {
        return Err(DecodeErrors::SosError(format!(
            "Scan lists {} components, the frame declared {}",
            ns,
            image.components.len()
        )));
    }

    for _ in 0..ns
    {
        let id = read_u8(buf)?;

        // top 4 bits contain the DC table destination, the lower four the AC
        // table destination
        let tables = read_u8(buf)?;

        let component = image
            .components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| {
                DecodeErrors::SosError(format!("Scan references unknown component id {}", id))
            })?;

        component.dc_huff_table = usize::from((tables >> 4) & 0x0f);
        component.ac_huff_table = usize::from(tables & 0x0f);

        if component.dc_huff_table >= MAX_TABLES || component.ac_huff_table >= MAX_TABLES
        {
            return Err(DecodeErrors::SosError(format!(
                "Huffman table selectors ({}, {}) out of range for component id {}",
                component.dc_huff_table, component.ac_huff_table, id
            )));
        }

        trace!(
            "Component ID: {}, DC table: {}, AC table: {}",
            id,
            component.dc_huff_table,
            component.ac_huff_table
        );
    }

    // Ss, Se and Ah/Al are fixed for baseline scans, skip them
    for _ in 0..3
    {
        let _ = read_u8(buf)?;
    }

    Ok(())
}
