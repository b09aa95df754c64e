//! Alpha-scaled chroma prediction.
//!
//! Accumulate-and-clip: each destination pixel becomes
//! `clip(dst + round_signed(alpha_q3 * pred_q3, 6))`. The Q3 source buffer
//! is read-only with row stride [`CFL_BUF_LINE`]; the destination carries its
//! own stride and is read-modified-written.

use super::{clip_pixel, clip_pixel_highbd, get_scaled_luma_q0, CFL_BUF_LINE};

/// Low bit depth prediction into an 8-bit destination plane.
pub(crate) fn predict_lbd<const W: usize, const H: usize>(
    pred_buf_q3: &[i16],
    dst: &mut [u8],
    dst_stride: usize,
    alpha_q3: i32,
) {
    let mut src_row = 0;
    let mut dst_row = 0;
    for _ in 0..H {
        for i in 0..W {
            let scaled = get_scaled_luma_q0(alpha_q3, pred_buf_q3[src_row + i]);
            dst[dst_row + i] = clip_pixel(scaled + i32::from(dst[dst_row + i]));
        }
        src_row += CFL_BUF_LINE;
        dst_row += dst_stride;
    }
}

/// High bit depth prediction into a 16-bit destination plane, clipped to the
/// range of `bd`-bit samples (unrecognized depths clip as 8-bit).
pub(crate) fn predict_hbd<const W: usize, const H: usize>(
    pred_buf_q3: &[i16],
    dst: &mut [u16],
    dst_stride: usize,
    alpha_q3: i32,
    bd: u8,
) {
    let mut src_row = 0;
    let mut dst_row = 0;
    for _ in 0..H {
        for i in 0..W {
            let scaled = get_scaled_luma_q0(alpha_q3, pred_buf_q3[src_row + i]);
            dst[dst_row + i] = clip_pixel_highbd(scaled + i32::from(dst[dst_row + i]), bd);
        }
        src_row += CFL_BUF_LINE;
        dst_row += dst_stride;
    }
}
