//! Hand-assembled JPEG streams for the integration tests.
//!
//! The streams use quantization tables of all ones and one-symbol Huffman
//! tables, so every decoded value can be worked out on paper: a DC-only
//! block with difference `d` reconstructs to the flat sample
//! `round(d / 8) + 128`.

/// A DQT segment holding one 8-bit table of all ones.
pub fn unit_dqt(id: u8) -> Vec<u8>
{
    let mut seg = vec![0xff, 0xdb, 0x00, 0x43, id];

    seg.extend([1_u8; 64]);
    seg
}

/// A baseline SOF segment for a three component image, one sampling byte
/// per component (`0x11` is 4:4:4).
pub fn sof0(width: u16, height: u16, sampling: [u8; 3]) -> Vec<u8>
{
    let mut seg = vec![0xff, 0xc0, 0x00, 0x11, 0x08];

    seg.extend(height.to_be_bytes());
    seg.extend(width.to_be_bytes());
    seg.push(3);
    // component id, sampling factors, quantization table
    seg.extend([1, sampling[0], 0]);
    seg.extend([2, sampling[1], 1]);
    seg.extend([3, sampling[2], 1]);
    seg
}

/// A DHT segment defining a single symbol on the one-bit code "0".
///
/// `class` is 0 for DC and 1 for AC tables.
pub fn single_code_dht(class: u8, id: u8, symbol: u8) -> Vec<u8>
{
    let mut seg = vec![0xff, 0xc4, 0x00, 0x14, (class << 4) | id];

    seg.push(1);
    seg.extend([0_u8; 15]);
    seg.push(symbol);
    seg
}

/// The SOS segment selecting DC/AC tables 0 for Y and 1 for Cb and Cr.
pub fn sos() -> Vec<u8>
{
    vec![
        0xff, 0xda, 0x00, 0x0c, 0x03, // three components
        0x01, 0x00, // Y: DC 0, AC 0
        0x02, 0x11, // Cb: DC 1, AC 1
        0x03, 0x11, // Cr: DC 1, AC 1
        0x00, 0x3f, 0x00, // Ss, Se, Ah/Al
    ]
}

/// A complete baseline 4:4:4 stream around the given entropy-coded bytes.
///
/// The luma DC table maps code "0" to `dc_y_category`; every other table
/// maps code "0" to symbol zero (category zero for DC, EOB for AC).
pub fn baseline_jpeg(width: u16, height: u16, dc_y_category: u8, scan: &[u8]) -> Vec<u8>
{
    let mut stream = vec![0xff, 0xd8];

    stream.extend(unit_dqt(0));
    stream.extend(unit_dqt(1));
    stream.extend(sof0(width, height, [0x11; 3]));
    stream.extend(single_code_dht(0, 0, dc_y_category));
    stream.extend(single_code_dht(1, 0, 0x00));
    stream.extend(single_code_dht(0, 1, 0x00));
    stream.extend(single_code_dht(1, 1, 0x00));
    stream.extend(sos());
    stream.extend(scan);
    stream.extend([0xff, 0xd9]);
    stream
}
