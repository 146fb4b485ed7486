//! Contains most common errors that may be encountered in decoding a JPEG
//! image.
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use crate::misc::{
    START_OF_FRAME_EXT_AR, START_OF_FRAME_EXT_SEQ, START_OF_FRAME_LOS_SEQ,
    START_OF_FRAME_LOS_SEQ_AR, START_OF_FRAME_PROG_DCT, START_OF_FRAME_PROG_DCT_AR,
};

/// Common decode errors.
///
/// Every segment parser returns one of these and the top level driver
/// short-circuits on the first failure. The variants group into four
/// outcomes:
///
/// - malformed input: [`Format`](Self::Format) and the per-segment variants,
/// - unsupported feature: [`Unsupported`](Self::Unsupported),
/// - truncated stream: [`ExhaustedData`](Self::ExhaustedData),
/// - I/O failure: [`IoError`](Self::IoError).
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors
{
    /// The first two bytes are not a Start-Of-Image marker
    IllegalMagicBytes(u16),
    /// A generic framing or value error in the stream
    Format(String),
    /// Like `Format` but without an allocation
    FormatStatic(&'static str),
    /// Problems with the Huffman tables or the entropy coded data
    HuffmanDecode(String),
    /// Quantization table errors
    DqtError(String),
    /// Start of frame errors
    SofError(String),
    /// Start of scan errors
    SosError(String),
    /// Errors constructing an MCU from entropy decoded coefficients
    MCUError(String),
    /// Image uses a coding scheme or shape this decoder does not handle
    Unsupported(UnsupportedSchemes),
    /// The stream ended before an End-Of-Image marker was seen
    ExhaustedData,
    /// Image width or height is set to zero
    ZeroError,
    /// Image dimensions exceed the decoder limit
    LargeDimensions(usize),
    /// Underlying I/O error when opening or reading the file
    IoError(std::io::Error),
}

impl DecodeErrors
{
    fn write(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::IllegalMagicBytes(bytes) =>
            {
                write!(f, "Error parsing image. Illegal start bytes:{:#06x}", bytes)
            }
            Self::Format(reason) => write!(f, "{}", reason),
            Self::FormatStatic(reason) => write!(f, "{}", reason),
            Self::HuffmanDecode(reason) =>
            {
                write!(f, "Error decoding huffman values. Reason:{}", reason)
            }
            Self::DqtError(reason) => write!(f, "Error parsing DQT segment. Reason:{}", reason),
            Self::SofError(reason) => write!(f, "Error parsing SOF segment. Reason:{}", reason),
            Self::SosError(reason) => write!(f, "Error parsing SOS segment. Reason:{}", reason),
            Self::MCUError(reason) => write!(f, "Error in decoding MCU. Reason:{}", reason),
            Self::Unsupported(scheme) => write!(f, "{:?}", scheme),
            Self::ExhaustedData => write!(f, "Stream ended before End-Of-Image, cannot continue"),
            Self::ZeroError => write!(f, "Image width or height is set to zero, cannot continue"),
            Self::LargeDimensions(dimensions) => write!(
                f,
                "Image dimensions {} larger than supported dimensions",
                dimensions
            ),
            Self::IoError(reason) => write!(f, "{}", reason),
        }
    }
}

impl Debug for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        self.write(f)
    }
}

impl Display for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        self.write(f)
    }
}

impl Error for DecodeErrors {}

impl From<std::io::Error> for DecodeErrors
{
    fn from(err: std::io::Error) -> DecodeErrors
    {
        DecodeErrors::IoError(err)
    }
}

/// Encoding schemes and stream shapes the decoder recognizes but refuses to
/// process.
///
/// Hitting one of these terminates the decode cleanly, they are not treated
/// as corruption.
#[derive(Eq, PartialEq, Copy, Clone)]
pub enum UnsupportedSchemes
{
    /// SOF_1 extended sequential DCT, Huffman coding
    ExtendedSequentialHuffman,
    /// Progressive DCT, Huffman coding
    ProgressiveDctHuffman,
    /// Lossless (sequential), Huffman coding
    LosslessHuffman,
    /// Extended sequential DCT, arithmetic coding
    ExtendedSequentialDctArithmetic,
    /// Progressive DCT, arithmetic coding
    ProgressiveDctArithmetic,
    /// Lossless (sequential), arithmetic coding
    LosslessArithmetic,
    /// Components use chroma sub-sampling, only 4:4:4 is handled
    ChromaSubSampling,
    /// Sample precision other than 8 bits
    HighBitDepth(u8),
    /// Restart intervals (DRI/RSTn markers)
    RestartMarkers,
}

impl Debug for UnsupportedSchemes
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::ExtendedSequentialHuffman =>
            {
                write!(f, "The library cannot decode images encoded with the Extended Sequential Huffman scheme")
            }
            Self::ProgressiveDctHuffman =>
            {
                write!(f, "The library cannot decode images encoded with the Progressive DCT Huffman scheme")
            }
            Self::LosslessHuffman =>
            {
                write!(f, "The library cannot decode images encoded with the Lossless Huffman scheme")
            }
            Self::ExtendedSequentialDctArithmetic =>
            {
                write!(f, "The library cannot decode images encoded with the Extended Sequential DCT Arithmetic scheme")
            }
            Self::ProgressiveDctArithmetic =>
            {
                write!(f, "The library cannot decode images encoded with the Progressive DCT Arithmetic scheme")
            }
            Self::LosslessArithmetic =>
            {
                write!(f, "The library cannot decode images encoded with the Lossless Arithmetic scheme")
            }
            Self::ChromaSubSampling =>
            {
                write!(f, "The library cannot decode images that use chroma sub-sampling, only 4:4:4 sampling is supported")
            }
            Self::HighBitDepth(depth) =>
            {
                write!(
                    f,
                    "The library can only decode 8-bit images, the image has {} bits of precision",
                    depth
                )
            }
            Self::RestartMarkers =>
            {
                write!(f, "The library cannot decode images that use restart intervals")
            }
        }
    }
}

impl UnsupportedSchemes
{
    /// Map an unsupported `SOFn` marker value to its scheme.
    #[must_use]
    pub fn from_int(int: u16) -> Option<UnsupportedSchemes>
    {
        match int
        {
            START_OF_FRAME_PROG_DCT => Some(Self::ProgressiveDctHuffman),
            START_OF_FRAME_PROG_DCT_AR => Some(Self::ProgressiveDctArithmetic),
            START_OF_FRAME_LOS_SEQ => Some(Self::LosslessHuffman),
            START_OF_FRAME_LOS_SEQ_AR => Some(Self::LosslessArithmetic),
            START_OF_FRAME_EXT_SEQ => Some(Self::ExtendedSequentialHuffman),
            START_OF_FRAME_EXT_AR => Some(Self::ExtendedSequentialDctArithmetic),
            _ => None,
        }
    }
}
