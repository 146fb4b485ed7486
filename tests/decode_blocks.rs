//! Whole-stream decodes of hand-assembled baseline images.

use kpeg::{write_ppm, Decoder};

mod common;

use common::baseline_jpeg;

#[test]
fn solid_grey_8x8()
{
    // one MCU, every DC difference zero: Y = Cb = Cr = 128 which is mid
    // grey in RGB
    //
    // scan bits: three blocks of DC "0" + EOB "0", padded with ones
    let jpeg = baseline_jpeg(8, 8, 0, &[0b0000_0011]);

    let mut decoder = Decoder::new();
    let pixels = decoder.decode_buffer(&jpeg).unwrap();

    assert_eq!(decoder.width(), 8);
    assert_eq!(decoder.height(), 8);
    assert_eq!(pixels.len(), 8 * 8 * 3);
    assert!(pixels.iter().all(|p| *p == 0x80));

    // the PPM payload is 192 bytes of 0x80 behind the text header
    let mut ppm = Vec::new();

    write_ppm(&mut ppm, &pixels, 8, 8).unwrap();

    assert!(ppm.starts_with(b"P6\n"));
    assert!(ppm.ends_with(&[0x80; 192]));
}

/// Scan data for four MCUs whose luma DC differences are all +8.
///
/// Per MCU: Y DC code "0" and raw bits "1000" (+8), Y EOB "0", then
/// category-zero DC and EOB for both chroma blocks. The predictors
/// accumulate 8, 16, 24, 32, so the tiles come out as greys 129 to 132.
const FOUR_TILE_SCAN: [u8; 5] = [0x40, 0x10, 0x04, 0x01, 0x00];

#[test]
fn four_tiles_land_in_their_quadrants()
{
    let jpeg = baseline_jpeg(16, 16, 4, &FOUR_TILE_SCAN);

    let mut decoder = Decoder::new();
    let pixels = decoder.decode_buffer(&jpeg).unwrap();

    assert_eq!(pixels.len(), 16 * 16 * 3);

    let pixel = |x: usize, y: usize| {
        let at = (y * 16 + x) * 3;

        // neutral chroma makes all three channels equal
        assert_eq!(pixels[at], pixels[at + 1]);
        assert_eq!(pixels[at], pixels[at + 2]);
        pixels[at]
    };

    assert_eq!(pixel(0, 0), 129);
    assert_eq!(pixel(8, 0), 130);
    assert_eq!(pixel(0, 8), 131);
    assert_eq!(pixel(8, 8), 132);

    // quadrant borders stay sharp
    assert_eq!(pixel(7, 7), 129);
    assert_eq!(pixel(8, 7), 130);
    assert_eq!(pixel(7, 8), 131);
    assert_eq!(pixel(15, 15), 132);
}

#[test]
fn non_multiple_of_eight_is_cropped()
{
    // same four tiles, but the frame declares 10 x 10: the right and
    // bottom six pixels of the edge MCUs are discarded
    let jpeg = baseline_jpeg(10, 10, 4, &FOUR_TILE_SCAN);

    let mut decoder = Decoder::new();
    let pixels = decoder.decode_buffer(&jpeg).unwrap();

    assert_eq!(decoder.width(), 10);
    assert_eq!(decoder.height(), 10);
    assert_eq!(pixels.len(), 10 * 10 * 3);

    let pixel = |x: usize, y: usize| pixels[(y * 10 + x) * 3];

    assert_eq!(pixel(0, 0), 129);
    assert_eq!(pixel(9, 0), 130);
    assert_eq!(pixel(0, 9), 131);
    assert_eq!(pixel(9, 9), 132);
}

#[test]
fn decoder_instances_are_reusable()
{
    // the DC predictors reset between decodes, the second run must not see
    // the first run's accumulated values
    let jpeg = baseline_jpeg(16, 16, 4, &FOUR_TILE_SCAN);

    let mut decoder = Decoder::new();
    let first = decoder.decode_buffer(&jpeg).unwrap();
    let second = decoder.decode_buffer(&jpeg).unwrap();

    assert_eq!(first, second);
}

#[test]
fn info_reports_frame_parameters()
{
    let jpeg = baseline_jpeg(8, 8, 0, &[0b0000_0011]);

    let mut decoder = Decoder::new();

    assert!(decoder.info().is_none());

    decoder.decode_buffer(&jpeg).unwrap();

    let info = decoder.info().unwrap();

    assert_eq!(info.width, 8);
    assert_eq!(info.height, 8);
    assert_eq!(info.components, 3);
    assert_eq!(info.pixel_density, 8);
}
