//! Implements routines to reconstruct an MCU and drive the scan decode.

use std::io::Cursor;

use crate::bitstream::BitStream;
use crate::color_convert::ycbcr_to_rgb;
use crate::decoder::Decoder;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::idct::{dequantize, idct_8x8};
use crate::image::create_image_from_mcus;
use crate::marker::Marker;
use crate::misc::{read_u8, UN_ZIGZAG};

/// The number of coefficients in one block.
pub(crate) const DCT_BLOCK: usize = 64;

/// One reconstructed 8x8 pixel tile covering the three components.
///
/// During reconstruction the channels hold Y, Cb, Cr coefficients and then
/// samples; once [`Mcu::from_rle`] returns, channels 0, 1, 2 hold the final
/// R, G, B values.
pub(crate) struct Mcu
{
    pub block: [[[i32; 8]; 8]; 3],
}

impl Mcu
{
    /// Reconstruct one MCU from its three run-length encoded coefficient
    /// lists.
    ///
    /// `qt_tables` are the zig-zag ordered quantization tables selected per
    /// component, `dc_preds` the components' running DC predictors which
    /// persist across the blocks of one scan. `order` is the MCU's position
    /// in raster order, used for tracing.
    pub fn from_rle(
        rle: &[Vec<(u8, i32)>; 3], qt_tables: [&[u16; 64]; 3], dc_preds: [&mut i32; 3],
        order: usize,
    ) -> Result<Mcu, DecodeErrors>
    {
        trace!("Constructing MCU {}", order);

        let mut block = [[[0_i32; 8]; 8]; 3];

        for (channel, pairs) in rle.iter().enumerate()
        {
            // materialize the dense zig-zag vector; the first pair is the DC
            // difference, (0, 0) afterwards is the end-of-block terminator
            let mut zig_zag = [0_i32; DCT_BLOCK];
            let mut pos: usize = 0;

            for (i, &(run, value)) in pairs.iter().enumerate()
            {
                if i != 0 && run == 0 && value == 0
                {
                    break;
                }

                pos += usize::from(run);

                if pos >= DCT_BLOCK
                {
                    return Err(DecodeErrors::MCUError(format!(
                        "Coefficient runs of MCU {} overflow the block",
                        order
                    )));
                }

                zig_zag[pos] = value;
                pos += 1;
            }

            // DC_i = DC_i-1 + DC-difference
            *dc_preds[channel] += zig_zag[0];
            zig_zag[0] = *dc_preds[channel];

            dequantize(&mut zig_zag, qt_tables[channel]);

            // zig-zag order to natural matrix order
            let mut coeffs = [[0_i32; 8]; 8];

            for (i, coeff) in zig_zag.iter().enumerate()
            {
                let natural = UN_ZIGZAG[i];

                coeffs[natural / 8][natural % 8] = *coeff;
            }

            let spatial = idct_8x8(&coeffs);

            // level shift centers the samples in the 0..=255 range
            for y in 0..8
            {
                for x in 0..8
                {
                    block[channel][y][x] = spatial[y][x].round() as i32 + 128;
                }
            }
        }

        ycbcr_to_rgb(&mut block);

        trace!("Finished constructing MCU {}", order);

        Ok(Mcu { block })
    }
}

impl Decoder
{
    /// Decode the scan of a non-interleaved 4:4:4 image, the components
    /// arranged Y, Cb, Cr within every MCU.
    ///
    /// Returns the cropped RGB raster.
    pub(crate) fn decode_mcu_ycbcr(
        &mut self, reader: &mut Cursor<Vec<u8>>,
    ) -> Result<Vec<u8>, DecodeErrors>
    {
        let width = usize::from(self.info.width);
        let height = usize::from(self.info.height);

        let mcu_width = (width + 7) / 8;
        let mcu_height = (height + 7) / 8;
        let mcu_count = mcu_width * mcu_height;

        let [comp_y, comp_cb, comp_cr] = self.components.as_mut_slice() else {
            return Err(DecodeErrors::SofError(
                "No frame header seen before the scan".to_string(),
            ));
        };

        // per-scan state, the predictors reset at the start of every scan
        comp_y.dc_pred = 0;
        comp_cb.dc_pred = 0;
        comp_cr.dc_pred = 0;

        // resolve every component's tables up front, the scan loop then
        // cannot fail on a missing table
        let mut tables = Vec::with_capacity(3);

        for component in [&*comp_y, &*comp_cb, &*comp_cr]
        {
            let dc_tree = self.dc_trees[component.dc_huff_table]
                .as_ref()
                .ok_or_else(|| {
                    DecodeErrors::HuffmanDecode(format!(
                        "No DC Huffman table for component {:?}",
                        component.component_id
                    ))
                })?;

            let ac_tree = self.ac_trees[component.ac_huff_table]
                .as_ref()
                .ok_or_else(|| {
                    DecodeErrors::HuffmanDecode(format!(
                        "No AC Huffman table for component {:?}",
                        component.component_id
                    ))
                })?;

            let qt_table = self.qt_tables[usize::from(component.quantization_table_number)]
                .as_ref()
                .ok_or_else(|| {
                    DecodeErrors::DqtError(format!(
                        "No quantization table for component {:?}",
                        component.component_id
                    ))
                })?;

            tables.push((dc_tree, ac_tree, qt_table));
        }

        let qt_tables = [tables[0].2, tables[1].2, tables[2].2];

        let mut stream = BitStream::new();
        let mut mcus = Vec::with_capacity(mcu_count);

        debug!(
            "Decoding {} MCUs ({} x {})",
            mcu_count, mcu_width, mcu_height
        );

        for _ in 0..mcu_count
        {
            let mut rle: [Vec<(u8, i32)>; 3] = [vec![], vec![], vec![]];

            for (pos, (dc_tree, ac_tree, _)) in tables.iter().enumerate()
            {
                match stream.decode_block(reader, dc_tree, ac_tree)
                {
                    Ok(pairs) => rle[pos] = pairs,
                    Err(e) =>
                    {
                        if let Some(marker) = stream.marker
                        {
                            return Err(match marker
                            {
                                Marker::RST(_) =>
                                {
                                    let feature = UnsupportedSchemes::RestartMarkers;

                                    error!("{:?}", feature);

                                    DecodeErrors::Unsupported(feature)
                                }
                                Marker::EOI => DecodeErrors::MCUError(
                                    "Scan data ended before every MCU was decoded".to_string(),
                                ),
                                _ => DecodeErrors::Format(format!(
                                    "Marker {:?} found inside the scan, cannot continue",
                                    marker
                                )),
                            });
                        }

                        return Err(e);
                    }
                }
            }

            let order = mcus.len() + 1;
            let dc_preds = [
                &mut comp_y.dc_pred,
                &mut comp_cb.dc_pred,
                &mut comp_cr.dc_pred,
            ];

            mcus.push(Mcu::from_rle(&rle, qt_tables, dc_preds, order)?);
        }

        for component in &self.components
        {
            trace!(
                "Final DC value for component {:?}: {}",
                component.component_id,
                component.dc_pred
            );
        }

        expect_end_of_image(reader, &stream)?;

        debug!("Finished decoding image");

        Ok(create_image_from_mcus(&mcus, width, height))
    }
}

/// Skip the padding bits after the final MCU and confirm the scan is
/// terminated by an End-Of-Image marker.
fn expect_end_of_image(
    reader: &mut Cursor<Vec<u8>>, stream: &BitStream,
) -> Result<(), DecodeErrors>
{
    match stream.marker
    {
        Some(Marker::EOI) => return Ok(()),
        Some(Marker::RST(_)) =>
        {
            return Err(DecodeErrors::Unsupported(UnsupportedSchemes::RestartMarkers));
        }
        Some(marker) =>
        {
            return Err(DecodeErrors::Format(format!(
                "Marker {:?} found after the final MCU, cannot continue",
                marker
            )));
        }
        None =>
        {}
    }

    // scan forward over the padding for the terminator
    loop
    {
        let mut byte = read_u8(reader)?;

        if byte != 0xff
        {
            continue;
        }

        byte = read_u8(reader)?;

        while byte == 0xff
        {
            byte = read_u8(reader)?;
        }

        match byte
        {
            0xd9 =>
            {
                trace!("Found EOI marker");
                return Ok(());
            }
            0x00 => continue,
            _ =>
            {
                return Err(DecodeErrors::Format(format!(
                    "Marker 0xFF{:02X} found after the final MCU, cannot continue",
                    byte
                )));
            }
        }
    }
}
