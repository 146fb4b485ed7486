//! A baseline JPEG/JFIF decoder.
//!
//! Decodes non-interleaved, non-subsampled (4:4:4) baseline DCT images into
//! an RGB raster:
//!
//! ```no_run
//! use kpeg::Decoder;
//!
//! let mut decoder = Decoder::new();
//! let pixels = decoder.decode_file("image.jpg").unwrap();
//!
//! println!(
//!     "{} x {} pixels",
//!     decoder.width(),
//!     decoder.height()
//! );
//! assert_eq!(
//!     pixels.len(),
//!     usize::from(decoder.width()) * usize::from(decoder.height()) * 3
//! );
//! ```
#![allow(clippy::needless_return, clippy::similar_names)]
#![warn(clippy::correctness, clippy::perf, clippy::pedantic)]
#[macro_use]
extern crate log;

pub use crate::decoder::{Decoder, ImageInfo};
pub use crate::errors::DecodeErrors;
pub use crate::image::write_ppm;

mod bitstream;
mod color_convert;
mod components;
mod decoder;
pub mod errors;
mod headers;
pub mod huffman;
mod idct;
pub mod image;
mod marker;
mod mcu;
mod misc;
