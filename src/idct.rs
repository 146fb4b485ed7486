//! Dequantization and the inverse discrete cosine transform.
#![allow(clippy::excessive_precision, clippy::unreadable_literal)]

use std::f32::consts::{FRAC_1_SQRT_2, PI};

/// Multiply each zig-zag ordered coefficient with its quantization table
/// element.
///
/// Quantization tables are stored in zig-zag order exactly as read from the
/// DQT segment, so this is element-wise.
#[inline]
pub(crate) fn dequantize(coeffs: &mut [i32; 64], qt_table: &[u16; 64])
{
    for (coeff, q) in coeffs.iter_mut().zip(qt_table.iter())
    {
        *coeff *= i32::from(*q);
    }
}

/// Two dimensional 8x8 type-III (inverse) DCT.
///
/// ```text
/// p[x,y] = 1/4 * sum_u sum_v C(u) C(v) F[u,v] cos((2x+1)u pi/16) cos((2y+1)v pi/16)
/// ```
///
/// with `C(0) = 1/sqrt(2)` and `C(k) = 1` otherwise. `block` holds the
/// dequantized coefficients in natural (row, column) order; the output is
/// the spatial sample block before level shifting.
///
/// This is the straightforward O(64*64) evaluation. The 1/4 factor together
/// with the basis scaling produces the standard JPEG normalization.
pub(crate) fn idct_8x8(block: &[[i32; 8]; 8]) -> [[f32; 8]; 8]
{
    let mut out = [[0_f32; 8]; 8];

    for y in 0..8
    {
        for x in 0..8
        {
            let mut sum = 0_f32;

            for u in 0..8
            {
                for v in 0..8
                {
                    let cu = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                    let cv = if v == 0 { FRAC_1_SQRT_2 } else { 1.0 };

                    sum += cu
                        * cv
                        * (block[v][u] as f32)
                        * ((2 * x + 1) as f32 * u as f32 * PI / 16.0).cos()
                        * ((2 * y + 1) as f32 * v as f32 * PI / 16.0).cos();
                }
            }

            out[y][x] = 0.25 * sum;
        }
    }

    out
}
