//! Rejection paths for malformed, unsupported and truncated streams.

use kpeg::errors::UnsupportedSchemes;
use kpeg::{DecodeErrors, Decoder};

mod common;

use common::{baseline_jpeg, sof0};

#[test]
fn stray_byte_instead_of_marker()
{
    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(&[0xff, 0xd8, 0xa4]).unwrap_err();

    assert!(matches!(err, DecodeErrors::Format(_)));
}

#[test]
fn garbage_after_soi()
{
    let mut decoder = Decoder::new();

    let err = decoder
        .decode_buffer(&[0xff, 0xd8, 0x00, 0x00, 0x00, 0x00])
        .unwrap_err();

    assert!(matches!(err, DecodeErrors::Format(_)));
}

#[test]
fn missing_soi()
{
    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(&[0x89, 0x50, 0x4e, 0x47]).unwrap_err();

    assert!(matches!(err, DecodeErrors::IllegalMagicBytes(0x8950)));
}

#[test]
fn unknown_marker_with_invalid_length()
{
    let mut decoder = Decoder::new();

    let err = decoder
        .decode_buffer(&[0xff, 0xd8, 0xff, 0x02, 0x00, 0x00])
        .unwrap_err();

    assert!(matches!(err, DecodeErrors::Format(_)));
}

#[test]
fn premature_end_of_image()
{
    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(&[0xff, 0xd8, 0xff, 0xd9]).unwrap_err();

    assert!(matches!(err, DecodeErrors::Format(_)));
}

#[test]
fn subsampled_luma_terminates()
{
    // 2x2 luma sampling is outside the decoder's 4:4:4 contract
    let mut jpeg = vec![0xff, 0xd8];
    jpeg.extend(sof0(16, 16, [0x22, 0x11, 0x11]));
    jpeg.extend([0xff, 0xd9]);

    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(&jpeg).unwrap_err();

    assert!(matches!(
        err,
        DecodeErrors::Unsupported(UnsupportedSchemes::ChromaSubSampling)
    ));
}

#[test]
fn progressive_frames_terminate()
{
    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(&[0xff, 0xd8, 0xff, 0xc2]).unwrap_err();

    assert!(matches!(
        err,
        DecodeErrors::Unsupported(UnsupportedSchemes::ProgressiveDctHuffman)
    ));
}

#[test]
fn restart_intervals_terminate()
{
    let mut decoder = Decoder::new();

    let err = decoder
        .decode_buffer(&[0xff, 0xd8, 0xff, 0xdd, 0x00, 0x04, 0x00, 0x08])
        .unwrap_err();

    assert!(matches!(
        err,
        DecodeErrors::Unsupported(UnsupportedSchemes::RestartMarkers)
    ));
}

#[test]
fn twelve_bit_precision_terminates()
{
    // SOF with precision 12
    let mut jpeg = vec![0xff, 0xd8];
    let mut sof = sof0(8, 8, [0x11; 3]);
    sof[4] = 12;
    jpeg.extend(sof);

    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(&jpeg).unwrap_err();

    assert!(matches!(
        err,
        DecodeErrors::Unsupported(UnsupportedSchemes::HighBitDepth(12))
    ));
}

#[test]
fn truncated_before_scan_data()
{
    // a valid stream cut right after the SOS header
    let full = baseline_jpeg(8, 8, 0, &[0b0000_0011]);
    let truncated = &full[..full.len() - 3];

    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(truncated).unwrap_err();

    assert!(matches!(err, DecodeErrors::ExhaustedData));
}

#[test]
fn truncated_mid_scan()
{
    // four MCUs declared, entropy data cut after the first byte
    let full = baseline_jpeg(16, 16, 4, &[0x40, 0x10, 0x04, 0x01, 0x00]);
    let truncated = &full[..full.len() - 6];

    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(truncated).unwrap_err();

    assert!(matches!(err, DecodeErrors::ExhaustedData));
}

#[test]
fn truncated_inside_headers()
{
    let full = baseline_jpeg(8, 8, 0, &[0b0000_0011]);
    // cut inside the first quantization table
    let truncated = &full[..20];

    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(truncated).unwrap_err();

    assert!(matches!(err, DecodeErrors::ExhaustedData));
}

#[test]
fn scan_without_huffman_tables()
{
    // headers declare tables the scan then references, drop the DHT
    // segments entirely
    let mut jpeg = vec![0xff, 0xd8];
    jpeg.extend(common::unit_dqt(0));
    jpeg.extend(common::unit_dqt(1));
    jpeg.extend(sof0(8, 8, [0x11; 3]));
    jpeg.extend(common::sos());
    jpeg.extend([0x03, 0xff, 0xd9]);

    let mut decoder = Decoder::new();

    let err = decoder.decode_buffer(&jpeg).unwrap_err();

    assert!(matches!(err, DecodeErrors::HuffmanDecode(_)));
}
