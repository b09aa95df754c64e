//! aarch64 NEON backend for the subtract-average kernel.
//!
//! The subsample and predict families stay scalar on aarch64 for now; the
//! averaging pass dominates the encoder-side search loop and is the one
//! worth vectorizing first.

use archmage::{arcane, rite, NeonToken, SimdToken};
use core::arch::aarch64::*;
use safe_unaligned_simd::aarch64 as simd_mem;

use super::subtract_average as sub_avg;
use super::CFL_BUF_LINE;

pub(crate) fn subtract_average<const W: usize, const H: usize>(pred_buf_q3: &mut [i16]) {
    if let Some(token) = NeonToken::summon() {
        subtract_average_neon(token, pred_buf_q3, W, H);
    } else {
        sub_avg::subtract_average::<W, H>(pred_buf_q3);
    }
}

/// Widen an i16x8 vector and accumulate it into an i32x4 running sum.
#[rite]
fn accumulate_s16(_token: NeonToken, acc: int32x4_t, v: int16x8_t) -> int32x4_t {
    let acc = vaddq_s32(acc, vmovl_s16(vget_low_s16(v)));
    vaddq_s32(acc, vmovl_s16(vget_high_s16(v)))
}

#[arcane]
fn subtract_average_neon(_token: NeonToken, pred_buf_q3: &mut [i16], width: usize, height: usize) {
    let mut acc = vdupq_n_s32(0);

    let mut row = 0;
    for _ in 0..height {
        let mut x = 0;
        while x + 8 <= width {
            let v = simd_mem::vld1q_s16(
                <&[i16; 8]>::try_from(&pred_buf_q3[row + x..row + x + 8]).unwrap(),
            );
            acc = accumulate_s16(_token, acc, v);
            x += 8;
        }
        if x < width {
            // Width 4: stage the half row through a zeroed temporary.
            let mut tmp = [0i16; 8];
            tmp[..width - x].copy_from_slice(&pred_buf_q3[row + x..row + width]);
            let v = simd_mem::vld1q_s16(&tmp);
            acc = accumulate_s16(_token, acc, v);
        }
        row += CFL_BUF_LINE;
    }

    let sum_q3 = vaddvq_s32(acc);
    let num_pel_log2 = (width * height).trailing_zeros();
    let avg_q3 = (sum_q3 + (1 << (num_pel_log2 - 1))) >> num_pel_log2;
    let avg_v = vdupq_n_s16(avg_q3 as i16);

    let mut row = 0;
    for _ in 0..height {
        let mut x = 0;
        while x + 8 <= width {
            let v = simd_mem::vld1q_s16(
                <&[i16; 8]>::try_from(&pred_buf_q3[row + x..row + x + 8]).unwrap(),
            );
            simd_mem::vst1q_s16(
                <&mut [i16; 8]>::try_from(&mut pred_buf_q3[row + x..row + x + 8]).unwrap(),
                vsubq_s16(v, avg_v),
            );
            x += 8;
        }
        while x < width {
            pred_buf_q3[row + x] -= avg_q3 as i16;
            x += 1;
        }
        row += CFL_BUF_LINE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CFL_BUF_SQUARE;

    fn fill_i16(buf: &mut [i16], seed: &mut u32) {
        for v in buf.iter_mut() {
            *seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *v = ((*seed >> 16) % 1024) as i16;
        }
    }

    #[test]
    fn subtract_average_matches_scalar() {
        fn check<const W: usize, const H: usize>(seed: &mut u32) {
            let mut scalar_buf = [0i16; CFL_BUF_SQUARE];
            fill_i16(&mut scalar_buf, seed);
            let mut simd_buf = scalar_buf;

            sub_avg::subtract_average::<W, H>(&mut scalar_buf);
            subtract_average::<W, H>(&mut simd_buf);

            assert_eq!(
                scalar_buf[..],
                simd_buf[..],
                "NEON subtract_average {W}x{H} doesn't match scalar"
            );
        }

        let mut seed = 1u32;
        check::<4, 4>(&mut seed);
        check::<8, 8>(&mut seed);
        check::<16, 16>(&mut seed);
        check::<32, 32>(&mut seed);
        check::<4, 16>(&mut seed);
        check::<32, 8>(&mut seed);
    }
}
