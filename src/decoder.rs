//! Main decoder logic.
//!
//! The [`Decoder`] walks the JFIF segment structure, collects quantization
//! and Huffman tables, parses the frame header and finally drives the scan
//! decode. Everything is owned by the decoder value, a single instance can
//! decode several images in sequence.
#![allow(clippy::doc_markdown)]

use std::fs::read;
use std::io::{BufRead, Cursor, Read};
use std::path::Path;

use crate::components::Components;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::headers::{parse_dqt, parse_huffman, parse_sos, parse_start_of_frame};
use crate::huffman::HuffmanTree;
use crate::marker::Marker;
use crate::misc::{read_u16_be, read_u8, START_OF_FRAME_BASE};

/// Maximum number of quantization and Huffman table slots.
pub(crate) const MAX_TABLES: usize = 4;

/// Maximum image dimensions supported.
pub(crate) const MAX_DIMENSIONS: usize = 1 << 27;

/// A decoder instance.
#[allow(clippy::upper_case_acronyms)]
pub struct Decoder
{
    /// Struct to hold image information from the frame header
    pub(crate) info: ImageInfo,
    /// Quantization tables in zig-zag order, indexed by their DQT
    /// destination
    pub(crate) qt_tables: [Option<[u16; 64]>; MAX_TABLES],
    /// DC Huffman trees, indexed by their DHT destination
    pub(crate) dc_trees: [Option<HuffmanTree>; MAX_TABLES],
    /// AC Huffman trees, indexed by their DHT destination
    pub(crate) ac_trees: [Option<HuffmanTree>; MAX_TABLES],
    /// Image components from the frame header, in scan order Y, Cb, Cr
    pub(crate) components: Vec<Components>,
}

impl Decoder
{
    /// Create a new decoder instance
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Decoder
    {
        Decoder {
            info: ImageInfo::default(),
            qt_tables: [None, None, None, None],
            dc_trees: [None, None, None, None],
            ac_trees: [None, None, None, None],
            components: vec![],
        }
    }

    /// Decode a valid jpeg file, returning the RGB pixels.
    ///
    /// # Errors
    /// See [`DecodeErrors`] for an explanation.
    pub fn decode_file<P>(&mut self, file: P) -> Result<Vec<u8>, DecodeErrors>
    where
        P: AsRef<Path>,
    {
        // read to an in-memory buffer
        let buffer = Cursor::new(read(file)?);

        info!("File size: {} bytes", buffer.get_ref().len());

        self.decode_internal(buffer)
    }

    /// Decode a buffer already in memory.
    ///
    /// The buffer should be a valid jpeg file, perhaps created by the
    /// command `std::fs::read()` or a JPEG file downloaded from the
    /// internet.
    ///
    /// # Errors
    /// See [`DecodeErrors`] for an explanation.
    pub fn decode_buffer(&mut self, buf: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        self.decode_internal(Cursor::new(buf.to_vec()))
    }

    /// Returns the image information.
    ///
    /// This **must** be called after a call to `decode_file` or
    /// `decode_buffer`, otherwise it will return `None`.
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo>
    {
        if self.info == ImageInfo::default()
        {
            return None;
        }

        Some(self.info.clone())
    }

    /// Get the width of the image as a u16
    #[must_use]
    pub fn width(&self) -> u16
    {
        self.info.width
    }

    /// Get the height of the image as a u16
    #[must_use]
    pub fn height(&self) -> u16
    {
        self.info.height
    }

    fn decode_internal(&mut self, mut buf: Cursor<Vec<u8>>) -> Result<Vec<u8>, DecodeErrors>
    {
        // decoders are reusable, clear everything a previous decode left
        self.info = ImageInfo::default();
        self.qt_tables = [None, None, None, None];
        self.dc_trees = [None, None, None, None];
        self.ac_trees = [None, None, None, None];
        self.components.clear();

        self.decode_headers_internal(&mut buf)?;

        self.decode_mcu_ycbcr(&mut buf)
    }

    /// Parse headers from the stream up to and including the start of scan.
    ///
    /// # Supported headers
    ///  - APP(n), skipped
    ///  - COM, skipped
    ///  - SOF(0)
    ///  - DQT
    ///  - DHT
    ///  - SOS
    /// # Unsupported headers
    ///  - SOF(n), n != 0
    ///  - DAC, arithmetic tables
    ///  - DRI, restart intervals
    fn decode_headers_internal<R>(&mut self, buf: &mut R) -> Result<(), DecodeErrors>
    where
        R: Read + BufRead,
    {
        // first two bytes must be the SOI marker
        let magic_bytes = read_u16_be(buf)?;

        if magic_bytes != 0xffd8
        {
            return Err(DecodeErrors::IllegalMagicBytes(magic_bytes));
        }

        trace!("Found SOI marker");

        loop
        {
            let byte = read_u8(buf)?;

            if byte != 0xff
            {
                return Err(DecodeErrors::Format(format!(
                    "Expected a marker, found stray byte {:#04x}",
                    byte
                )));
            }

            // 0xFF fill bytes before a marker are legal padding
            let mut m = read_u8(buf)?;

            while m == 0xff
            {
                m = read_u8(buf)?;
            }

            match Marker::from_u8(m)
            {
                Some(marker) =>
                {
                    self.parse_marker_inner(marker, buf)?;

                    if marker == Marker::SOS
                    {
                        // what follows is the entropy coded image data
                        return Ok(());
                    }
                }
                None =>
                {
                    warn!("Marker 0xFF{:X} not known", m);

                    let length = read_u16_be(buf)?;

                    if length < 2
                    {
                        return Err(DecodeErrors::Format(format!(
                            "Found a marker with invalid length : {}",
                            length
                        )));
                    }

                    warn!("Skipping {} bytes", length - 2);
                    buf.consume((length - 2) as usize);
                }
            }
        }
    }

    pub(crate) fn parse_marker_inner<R>(&mut self, m: Marker, buf: &mut R) -> Result<(), DecodeErrors>
    where
        R: Read + BufRead,
    {
        match m
        {
            Marker::SOF(0) =>
            {
                info!("Image encoding scheme = `Baseline DCT`");

                parse_start_of_frame(buf, self)?;
            }
            // start of frame segments not supported
            Marker::SOF(v) =>
            {
                let feature = UnsupportedSchemes::from_int(START_OF_FRAME_BASE + u16::from(v));

                if let Some(feature) = feature
                {
                    error!("{:?}", feature);

                    return Err(DecodeErrors::Unsupported(feature));
                }

                return Err(DecodeErrors::Format("Unsupported image format".to_string()));
            }
            Marker::DQT =>
            {
                parse_dqt(self, buf)?;
            }
            Marker::DHT =>
            {
                parse_huffman(self, buf)?;
            }
            Marker::SOS =>
            {
                parse_sos(buf, self)?;
            }
            Marker::EOI =>
            {
                return Err(DecodeErrors::Format("Premature End of image".to_string()));
            }
            Marker::DRI =>
            {
                let feature = UnsupportedSchemes::RestartMarkers;

                error!("{:?}", feature);

                return Err(DecodeErrors::Unsupported(feature));
            }
            Marker::SOI =>
            {
                return Err(DecodeErrors::FormatStatic(
                    "Found SOI marker in the middle of the stream",
                ));
            }
            Marker::RST(_) =>
            {
                return Err(DecodeErrors::FormatStatic(
                    "Found RST marker outside the scan",
                ));
            }
            Marker::TEM =>
            {
                // no payload
                warn!("TEM marker found, ignoring");
            }
            Marker::DAC | Marker::DNL =>
            {
                return Err(DecodeErrors::Format(format!(
                    "Parsing of the following header `{:?}` is not supported, cannot continue",
                    m
                )));
            }
            Marker::APP(_) | Marker::COM =>
            {
                let length = read_u16_be(buf)?;

                if length < 2
                {
                    return Err(DecodeErrors::Format(format!(
                        "Found a marker with invalid length:{}",
                        length
                    )));
                }

                match m
                {
                    Marker::APP(n) => debug!("Skipping APP({}) segment, {} bytes", n, length - 2),
                    _ => debug!("Skipping COM segment, {} bytes", length - 2),
                }

                buf.consume((length - 2) as usize);
            }
        }

        Ok(())
    }
}

/// A struct representing image information from the frame header.
#[derive(Default, Clone, Eq, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct ImageInfo
{
    /// Width of the image
    pub width: u16,
    /// Height of image
    pub height: u16,
    /// Sample precision in bits
    pub pixel_density: u8,
    /// Number of components
    pub components: u8,
}

impl ImageInfo
{
    /// Set width of the image, found in the start of frame.
    pub(crate) fn set_width(&mut self, width: u16)
    {
        self.width = width;
    }

    /// Set height of the image, found in the start of frame.
    pub(crate) fn set_height(&mut self, height: u16)
    {
        self.height = height;
    }

    /// Set the sample precision, found in the start of frame.
    pub(crate) fn set_density(&mut self, density: u8)
    {
        self.pixel_density = density;
    }
}
