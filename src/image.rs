//! Assemble reconstructed MCUs into the final raster and write PPM output.

use std::io::Write;

use crate::mcu::Mcu;

/// Tile the MCU list into a flat RGB raster and crop it to the declared
/// dimensions.
///
/// The working raster is padded up to multiples of eight in both directions,
/// the `k`-th MCU covers the pixel rectangle starting at
/// `(8 * (k % mcus_per_row), 8 * (k / mcus_per_row))`. The padding columns
/// and rows are discarded by the crop, the result is exactly
/// `width * height * 3` bytes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn create_image_from_mcus(mcus: &[Mcu], width: usize, height: usize) -> Vec<u8>
{
    let padded_width = (width + 7) / 8 * 8;
    let padded_height = (height + 7) / 8 * 8;
    let mcus_per_row = padded_width / 8;

    debug!(
        "Creating {} x {} image from {} MCUs (padded to {} x {})",
        width,
        height,
        mcus.len(),
        padded_width,
        padded_height
    );

    let mut raster = vec![0_u8; padded_width * padded_height * 3];

    for (k, mcu) in mcus.iter().enumerate()
    {
        let x0 = 8 * (k % mcus_per_row);
        let y0 = 8 * (k / mcus_per_row);

        for v in 0..8
        {
            for u in 0..8
            {
                let offset = ((y0 + v) * padded_width + x0 + u) * 3;

                raster[offset] = mcu.block[0][v][u] as u8;
                raster[offset + 1] = mcu.block[1][v][u] as u8;
                raster[offset + 2] = mcu.block[2][v][u] as u8;
            }
        }
    }

    if padded_width == width && padded_height == height
    {
        return raster;
    }

    // crop by copying the surviving prefix of every row
    let mut cropped = vec![0_u8; width * height * 3];

    for row in 0..height
    {
        let src = row * padded_width * 3;
        let dst = row * width * 3;

        cropped[dst..dst + width * 3].copy_from_slice(&raster[src..src + width * 3]);
    }

    cropped
}

/// Write the raster as a binary PPM (P6) image.
///
/// The header is `P6`, a comment line naming the generator, the dimensions
/// and the maximum sample value, each on its own line; the payload is the
/// raw RGB bytes in row-major order.
///
/// # Errors
/// Propagates I/O errors of the underlying writer.
pub fn write_ppm<W>(writer: &mut W, pixels: &[u8], width: usize, height: usize)
    -> std::io::Result<()>
where
    W: Write,
{
    writer.write_all(b"P6\n")?;
    writer.write_all(b"# Decoded with kpeg\n")?;
    writer.write_all(format!("{} {}\n255\n", width, height).as_bytes())?;
    writer.write_all(pixels)?;

    Ok(())
}
