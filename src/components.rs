//! This module exports a single struct to store information about
//! JPEG image components
//!
//! The data is extracted from a SOF header.

use crate::decoder::MAX_TABLES;
use crate::errors::DecodeErrors;

/// Component data from the start of frame.
#[derive(Clone)]
pub(crate) struct Components
{
    /// The type of component that has the metadata below, can be Y, Cb or Cr
    pub component_id: ComponentID,
    /// Sub-sampling ratio of this component in the x-plane
    pub vertical_sample: usize,
    /// Sub-sampling ratio of this component in the y-plane
    pub horizontal_sample: usize,
    /// DC huffman table position, set from the start of scan
    pub dc_huff_table: usize,
    /// AC huffman table position, set from the start of scan
    pub ac_huff_table: usize,
    /// Quantization table number
    pub quantization_table_number: u8,
    /// DC prediction for the component, the running sum of decoded DC
    /// differences for one scan
    pub dc_pred: i32,
    /// Component ID as written in the stream
    pub id: u8,
}

impl Components
{
    /// Create a new instance from three bytes from the start of frame
    #[inline]
    pub fn from(a: [u8; 3]) -> Result<Components, DecodeErrors>
    {
        let component_id = match a[0]
        {
            1 => ComponentID::Y,
            2 => ComponentID::Cb,
            3 => ComponentID::Cr,
            r =>
            {
                return Err(DecodeErrors::Format(format!(
                    "Unknown component id found, {}, expected a value between 1 and 3",
                    r
                )));
            }
        };

        let horizontal_sample = (a[1] >> 4) as usize;
        let vertical_sample = (a[1] & 0x0f) as usize;
        let quantization_table_number = a[2];

        if usize::from(quantization_table_number) >= MAX_TABLES
        {
            return Err(DecodeErrors::Format(format!(
                "Too large quantization table number {}, expected a value between 0 and {}",
                quantization_table_number,
                MAX_TABLES - 1
            )));
        }

        if horizontal_sample == 0 || vertical_sample == 0
        {
            return Err(DecodeErrors::Format(format!(
                "Zero sampling factor for component {:?}, corrupt stream",
                component_id
            )));
        }

        trace!(
            "Component ID:{:?}\tHS:{} VS:{} QT:{}",
            component_id,
            horizontal_sample,
            vertical_sample,
            quantization_table_number
        );

        Ok(Components {
            component_id,
            vertical_sample,
            horizontal_sample,
            quantization_table_number,
            // set from the start of scan
            dc_huff_table: 0,
            ac_huff_table: 0,
            dc_pred: 0,
            id: a[0],
        })
    }
}

/// Component ID's
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum ComponentID
{
    /// Luminance channel
    Y,
    /// Blue chrominance
    Cb,
    /// Red chrominance
    Cr,
}
