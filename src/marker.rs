//! JFIF marker discriminators.
//!
//! A marker is a two byte token, `0xFF` followed by a non-zero identifying
//! byte. The identifying byte is mapped to a `Marker` here; bytes we do not
//! recognize return `None` and the segment is skipped using its declared
//! length.

/// Markers defined in ITU-T T.81 Table B.1 that this decoder can encounter.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Marker
{
    /// Start of image
    SOI,
    /// End of image
    EOI,
    /// Start of scan
    SOS,
    /// Define quantization table(s)
    DQT,
    /// Define Huffman table(s)
    DHT,
    /// Define arithmetic coding conditioning(s)
    DAC,
    /// Define number of lines
    DNL,
    /// Define restart interval
    DRI,
    /// Comment
    COM,
    /// Temporary private use in arithmetic coding
    TEM,
    /// Start of frame, `SOF(0)` is baseline DCT
    SOF(u8),
    /// Restart marker, modulo-8 count in the payload
    RST(u8),
    /// Application segment
    APP(u8),
}

impl Marker
{
    /// Map the byte following `0xFF` to a marker.
    ///
    /// Returns `None` for reserved or unrecognized values, these are skipped
    /// by the caller using the segment's declared length.
    #[must_use]
    pub fn from_u8(n: u8) -> Option<Marker>
    {
        use self::Marker::{APP, COM, DAC, DHT, DNL, DQT, DRI, EOI, RST, SOF, SOI, SOS, TEM};

        match n
        {
            0x01 => Some(TEM),
            0xc0..=0xc3 | 0xc5..=0xc7 | 0xc9..=0xcb | 0xcd..=0xcf => Some(SOF(n - 0xc0)),
            0xc4 => Some(DHT),
            0xcc => Some(DAC),
            0xd0..=0xd7 => Some(RST(n - 0xd0)),
            0xd8 => Some(SOI),
            0xd9 => Some(EOI),
            0xda => Some(SOS),
            0xdb => Some(DQT),
            0xdc => Some(DNL),
            0xdd => Some(DRI),
            0xe0..=0xef => Some(APP(n - 0xe0)),
            0xfe => Some(COM),
            _ => None,
        }
    }
}
