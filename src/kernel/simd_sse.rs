//! x86_64 SIMD backends for the CfL kernels.
//!
//! Uses archmage for safe SIMD intrinsics with token-based CPU feature
//! verification, and 128-bit SSE operations throughout (SSE4.1 and below,
//! all implied by the x86-64-v3 token).
//!
//! Every function here is bit-exact with its scalar counterpart: sums are
//! accumulated in 32-bit lanes (addition order is irrelevant because the
//! block sums never overflow `i32`), products are exact 32-bit signed
//! products built from `mullo`/`mulhi` pairs, and the rounding shifts use
//! the same round-half-up / ties-away-from-zero formulas as the scalar code.
//! Rows narrower than one vector (width 4) run the scalar tail loop.

use archmage::{arcane, rite, SimdToken, X64V3Token};
use core::arch::x86_64::*;
use safe_unaligned_simd::x86_64 as simd_mem;

use super::subsample;
use super::subtract_average as sub_avg;
use super::{clip_pixel, clip_pixel_highbd, get_scaled_luma_q0, CFL_BUF_LINE};

// ============================================================================
// Subtract-average
// ============================================================================

pub(crate) fn subtract_average<const W: usize, const H: usize>(pred_buf_q3: &mut [i16]) {
    if let Some(token) = X64V3Token::summon() {
        subtract_average_x86(token, pred_buf_q3, W, H);
    } else {
        sub_avg::subtract_average::<W, H>(pred_buf_q3);
    }
}

#[arcane]
fn subtract_average_x86(_token: X64V3Token, pred_buf_q3: &mut [i16], width: usize, height: usize) {
    let ones = _mm_set1_epi16(1);
    let mut acc = _mm_setzero_si128();

    let mut row = 0;
    for _ in 0..height {
        let mut x = 0;
        while x + 8 <= width {
            let v = simd_mem::_mm_loadu_si128(
                <&[i16; 8]>::try_from(&pred_buf_q3[row + x..row + x + 8]).unwrap(),
            );
            // madd with ones horizontally pairs samples into i32 lanes.
            acc = _mm_add_epi32(acc, _mm_madd_epi16(v, ones));
            x += 8;
        }
        if x < width {
            // Width 4: stage the half row through a zeroed temporary.
            let mut tmp = [0i16; 8];
            tmp[..width - x].copy_from_slice(&pred_buf_q3[row + x..row + width]);
            let v = simd_mem::_mm_loadu_si128(&tmp);
            acc = _mm_add_epi32(acc, _mm_madd_epi16(v, ones));
        }
        row += CFL_BUF_LINE;
    }

    // Horizontal sum of the four i32 lanes.
    let acc = _mm_add_epi32(acc, _mm_shuffle_epi32(acc, 0b10_11_00_01));
    let acc = _mm_add_epi32(acc, _mm_shuffle_epi32(acc, 0b01_00_11_10));
    let sum_q3 = _mm_cvtsi128_si32(acc);

    let num_pel_log2 = (width * height).trailing_zeros();
    let avg_q3 = (sum_q3 + (1 << (num_pel_log2 - 1))) >> num_pel_log2;
    let avg_v = _mm_set1_epi16(avg_q3 as i16);

    let mut row = 0;
    for _ in 0..height {
        let mut x = 0;
        while x + 8 <= width {
            let v = simd_mem::_mm_loadu_si128(
                <&[i16; 8]>::try_from(&pred_buf_q3[row + x..row + x + 8]).unwrap(),
            );
            simd_mem::_mm_storeu_si128(
                <&mut [i16; 8]>::try_from(&mut pred_buf_q3[row + x..row + x + 8]).unwrap(),
                _mm_sub_epi16(v, avg_v),
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

// ============================================================================
// Luma subsampling
// ============================================================================

pub(crate) fn luma_subsampling_420_lbd<const W: usize, const H: usize>(
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    if let Some(token) = X64V3Token::summon() {
        subsampling_420_lbd_x86(token, input, input_stride, output_q3, W, H);
    } else {
        subsample::luma_subsampling_420_lbd::<W, H>(input, input_stride, output_q3);
    }
}

#[arcane]
fn subsampling_420_lbd_x86(
    _token: X64V3Token,
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
    width: usize,
    height: usize,
) {
    let ones = _mm_set1_epi8(1);
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..height {
        let bot = in_row + input_stride;
        let mut i = 0;
        while i + 8 <= width {
            let t = simd_mem::_mm_loadu_si128(
                <&[u8; 16]>::try_from(&input[in_row + 2 * i..in_row + 2 * i + 16]).unwrap(),
            );
            let b = simd_mem::_mm_loadu_si128(
                <&[u8; 16]>::try_from(&input[bot + 2 * i..bot + 2 * i + 16]).unwrap(),
            );
            // maddubs with ones sums each horizontal pair; 255 + 255 = 510
            // never saturates i16.
            let tp = _mm_maddubs_epi16(t, ones);
            let bp = _mm_maddubs_epi16(b, ones);
            let s = _mm_slli_epi16(_mm_add_epi16(tp, bp), 1);
            simd_mem::_mm_storeu_si128(
                <&mut [i16; 8]>::try_from(&mut output_q3[out_row + i..out_row + i + 8]).unwrap(),
                s,
            );
            i += 8;
        }
        while i < width {
            let sum = i32::from(input[in_row + 2 * i])
                + i32::from(input[in_row + 2 * i + 1])
                + i32::from(input[bot + 2 * i])
                + i32::from(input[bot + 2 * i + 1]);
            output_q3[out_row + i] = (sum << 1) as i16;
            i += 1;
        }
        in_row += input_stride << 1;
        out_row += CFL_BUF_LINE;
    }
}

pub(crate) fn luma_subsampling_422_lbd<const W: usize, const H: usize>(
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    if let Some(token) = X64V3Token::summon() {
        subsampling_422_lbd_x86(token, input, input_stride, output_q3, W, H);
    } else {
        subsample::luma_subsampling_422_lbd::<W, H>(input, input_stride, output_q3);
    }
}

#[arcane]
fn subsampling_422_lbd_x86(
    _token: X64V3Token,
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
    width: usize,
    height: usize,
) {
    let ones = _mm_set1_epi8(1);
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..height {
        let mut i = 0;
        while i + 8 <= width {
            let v = simd_mem::_mm_loadu_si128(
                <&[u8; 16]>::try_from(&input[in_row + 2 * i..in_row + 2 * i + 16]).unwrap(),
            );
            let s = _mm_slli_epi16(_mm_maddubs_epi16(v, ones), 2);
            simd_mem::_mm_storeu_si128(
                <&mut [i16; 8]>::try_from(&mut output_q3[out_row + i..out_row + i + 8]).unwrap(),
                s,
            );
            i += 8;
        }
        while i < width {
            let sum = i32::from(input[in_row + 2 * i]) + i32::from(input[in_row + 2 * i + 1]);
            output_q3[out_row + i] = (sum << 2) as i16;
            i += 1;
        }
        in_row += input_stride;
        out_row += CFL_BUF_LINE;
    }
}

pub(crate) fn luma_subsampling_444_lbd<const W: usize, const H: usize>(
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    if let Some(token) = X64V3Token::summon() {
        subsampling_444_lbd_x86(token, input, input_stride, output_q3, W, H);
    } else {
        subsample::luma_subsampling_444_lbd::<W, H>(input, input_stride, output_q3);
    }
}

#[arcane]
fn subsampling_444_lbd_x86(
    _token: X64V3Token,
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
    width: usize,
    height: usize,
) {
    let zero = _mm_setzero_si128();
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..height {
        let mut i = 0;
        while i + 8 <= width {
            let v = simd_mem::_mm_loadu_si64(
                <&[u8; 8]>::try_from(&input[in_row + i..in_row + i + 8]).unwrap(),
            );
            let s = _mm_slli_epi16(_mm_unpacklo_epi8(v, zero), 3);
            simd_mem::_mm_storeu_si128(
                <&mut [i16; 8]>::try_from(&mut output_q3[out_row + i..out_row + i + 8]).unwrap(),
                s,
            );
            i += 8;
        }
        while i < width {
            output_q3[out_row + i] = i16::from(input[in_row + i]) << 3;
            i += 1;
        }
        in_row += input_stride;
        out_row += CFL_BUF_LINE;
    }
}

pub(crate) fn luma_subsampling_420_hbd<const W: usize, const H: usize>(
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    if let Some(token) = X64V3Token::summon() {
        subsampling_420_hbd_x86(token, input, input_stride, output_q3, W, H);
    } else {
        subsample::luma_subsampling_420_hbd::<W, H>(input, input_stride, output_q3);
    }
}

#[arcane]
fn subsampling_420_hbd_x86(
    _token: X64V3Token,
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
    width: usize,
    height: usize,
) {
    let ones = _mm_set1_epi16(1);
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..height {
        let bot = in_row + input_stride;
        let mut i = 0;
        while i + 8 <= width {
            let t_lo = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&input[in_row + 2 * i..in_row + 2 * i + 8]).unwrap(),
            );
            let t_hi = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&input[in_row + 2 * i + 8..in_row + 2 * i + 16]).unwrap(),
            );
            let b_lo = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&input[bot + 2 * i..bot + 2 * i + 8]).unwrap(),
            );
            let b_hi = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&input[bot + 2 * i + 8..bot + 2 * i + 16]).unwrap(),
            );
            // Samples are at most 4095, so i16 madd pairs are exact and the
            // Q3 result 4 * 4095 << 1 = 32760 never saturates the pack.
            let sum_lo = _mm_add_epi32(_mm_madd_epi16(t_lo, ones), _mm_madd_epi16(b_lo, ones));
            let sum_hi = _mm_add_epi32(_mm_madd_epi16(t_hi, ones), _mm_madd_epi16(b_hi, ones));
            let s = _mm_packs_epi32(_mm_slli_epi32(sum_lo, 1), _mm_slli_epi32(sum_hi, 1));
            simd_mem::_mm_storeu_si128(
                <&mut [i16; 8]>::try_from(&mut output_q3[out_row + i..out_row + i + 8]).unwrap(),
                s,
            );
            i += 8;
        }
        while i < width {
            let sum = i32::from(input[in_row + 2 * i])
                + i32::from(input[in_row + 2 * i + 1])
                + i32::from(input[bot + 2 * i])
                + i32::from(input[bot + 2 * i + 1]);
            output_q3[out_row + i] = (sum << 1) as i16;
            i += 1;
        }
        in_row += input_stride << 1;
        out_row += CFL_BUF_LINE;
    }
}

pub(crate) fn luma_subsampling_422_hbd<const W: usize, const H: usize>(
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    if let Some(token) = X64V3Token::summon() {
        subsampling_422_hbd_x86(token, input, input_stride, output_q3, W, H);
    } else {
        subsample::luma_subsampling_422_hbd::<W, H>(input, input_stride, output_q3);
    }
}

#[arcane]
fn subsampling_422_hbd_x86(
    _token: X64V3Token,
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
    width: usize,
    height: usize,
) {
    let ones = _mm_set1_epi16(1);
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..height {
        let mut i = 0;
        while i + 8 <= width {
            let v_lo = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&input[in_row + 2 * i..in_row + 2 * i + 8]).unwrap(),
            );
            let v_hi = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&input[in_row + 2 * i + 8..in_row + 2 * i + 16]).unwrap(),
            );
            let s = _mm_packs_epi32(
                _mm_slli_epi32(_mm_madd_epi16(v_lo, ones), 2),
                _mm_slli_epi32(_mm_madd_epi16(v_hi, ones), 2),
            );
            simd_mem::_mm_storeu_si128(
                <&mut [i16; 8]>::try_from(&mut output_q3[out_row + i..out_row + i + 8]).unwrap(),
                s,
            );
            i += 8;
        }
        while i < width {
            let sum = i32::from(input[in_row + 2 * i]) + i32::from(input[in_row + 2 * i + 1]);
            output_q3[out_row + i] = (sum << 2) as i16;
            i += 1;
        }
        in_row += input_stride;
        out_row += CFL_BUF_LINE;
    }
}

pub(crate) fn luma_subsampling_444_hbd<const W: usize, const H: usize>(
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    if let Some(token) = X64V3Token::summon() {
        subsampling_444_hbd_x86(token, input, input_stride, output_q3, W, H);
    } else {
        subsample::luma_subsampling_444_hbd::<W, H>(input, input_stride, output_q3);
    }
}

#[arcane]
fn subsampling_444_hbd_x86(
    _token: X64V3Token,
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
    width: usize,
    height: usize,
) {
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..height {
        let mut i = 0;
        while i + 8 <= width {
            let v = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&input[in_row + i..in_row + i + 8]).unwrap(),
            );
            // Values bounded by 4095 << 3 = 32760, exact as i16.
            let s = _mm_slli_epi16(v, 3);
            simd_mem::_mm_storeu_si128(
                <&mut [i16; 8]>::try_from(&mut output_q3[out_row + i..out_row + i + 8]).unwrap(),
                s,
            );
            i += 8;
        }
        while i < width {
            output_q3[out_row + i] = (i32::from(input[in_row + i]) << 3) as i16;
            i += 1;
        }
        in_row += input_stride;
        out_row += CFL_BUF_LINE;
    }
}

// ============================================================================
// Alpha-scaled prediction
// ============================================================================

/// Exact 32-bit signed products of 8 i16 lanes against a broadcast alpha,
/// rounded back to pixel units: `round_signed(alpha_q3 * pred_q3, 6)`.
#[rite]
fn scaled_luma_q0_x86(_token: X64V3Token, pred: __m128i, alpha_v: __m128i) -> (__m128i, __m128i) {
    let prod_lo16 = _mm_mullo_epi16(pred, alpha_v);
    let prod_hi16 = _mm_mulhi_epi16(pred, alpha_v);
    let prod_lo = _mm_unpacklo_epi16(prod_lo16, prod_hi16);
    let prod_hi = _mm_unpackhi_epi16(prod_lo16, prod_hi16);
    (
        round_q6_signed(_token, prod_lo),
        round_q6_signed(_token, prod_hi),
    )
}

/// Signed rounding shift by 6 on four i32 lanes, ties away from zero:
/// round the magnitude, then restore the sign.
#[rite]
fn round_q6_signed(_token: X64V3Token, v: __m128i) -> __m128i {
    let sign = _mm_srai_epi32(v, 31);
    let abs = _mm_sub_epi32(_mm_xor_si128(v, sign), sign);
    let rounded = _mm_srli_epi32(_mm_add_epi32(abs, _mm_set1_epi32(32)), 6);
    _mm_sub_epi32(_mm_xor_si128(rounded, sign), sign)
}

pub(crate) fn predict_lbd<const W: usize, const H: usize>(
    pred_buf_q3: &[i16],
    dst: &mut [u8],
    dst_stride: usize,
    alpha_q3: i32,
) {
    if let Some(token) = X64V3Token::summon() {
        predict_lbd_x86(token, pred_buf_q3, dst, dst_stride, alpha_q3, W, H);
    } else {
        super::predict::predict_lbd::<W, H>(pred_buf_q3, dst, dst_stride, alpha_q3);
    }
}

#[arcane]
fn predict_lbd_x86(
    _token: X64V3Token,
    pred_buf_q3: &[i16],
    dst: &mut [u8],
    dst_stride: usize,
    alpha_q3: i32,
    width: usize,
    height: usize,
) {
    let zero = _mm_setzero_si128();
    let alpha_v = _mm_set1_epi16(alpha_q3 as i16);
    let mut src_row = 0;
    let mut dst_row = 0;
    for _ in 0..height {
        let mut x = 0;
        while x + 8 <= width {
            let pred = simd_mem::_mm_loadu_si128(
                <&[i16; 8]>::try_from(&pred_buf_q3[src_row + x..src_row + x + 8]).unwrap(),
            );
            let (scaled_lo, scaled_hi) = scaled_luma_q0_x86(_token, pred, alpha_v);

            let d8 = simd_mem::_mm_loadu_si64(
                <&[u8; 8]>::try_from(&dst[dst_row + x..dst_row + x + 8]).unwrap(),
            );
            let d16 = _mm_unpacklo_epi8(d8, zero);
            let sum_lo = _mm_add_epi32(scaled_lo, _mm_unpacklo_epi16(d16, zero));
            let sum_hi = _mm_add_epi32(scaled_hi, _mm_unpackhi_epi16(d16, zero));

            // packus saturates i16 to [0, 255], which is exactly clip_pixel.
            let packed16 = _mm_packs_epi32(sum_lo, sum_hi);
            let packed8 = _mm_packus_epi16(packed16, packed16);
            simd_mem::_mm_storeu_si64(
                <&mut [u8; 8]>::try_from(&mut dst[dst_row + x..dst_row + x + 8]).unwrap(),
                packed8,
            );
            x += 8;
        }
        while x < width {
            let scaled = get_scaled_luma_q0(alpha_q3, pred_buf_q3[src_row + x]);
            dst[dst_row + x] = clip_pixel(scaled + i32::from(dst[dst_row + x]));
            x += 1;
        }
        src_row += CFL_BUF_LINE;
        dst_row += dst_stride;
    }
}

pub(crate) fn predict_hbd<const W: usize, const H: usize>(
    pred_buf_q3: &[i16],
    dst: &mut [u16],
    dst_stride: usize,
    alpha_q3: i32,
    bd: u8,
) {
    if let Some(token) = X64V3Token::summon() {
        predict_hbd_x86(token, pred_buf_q3, dst, dst_stride, alpha_q3, bd, W, H);
    } else {
        super::predict::predict_hbd::<W, H>(pred_buf_q3, dst, dst_stride, alpha_q3, bd);
    }
}

#[arcane]
fn predict_hbd_x86(
    _token: X64V3Token,
    pred_buf_q3: &[i16],
    dst: &mut [u16],
    dst_stride: usize,
    alpha_q3: i32,
    bd: u8,
    width: usize,
    height: usize,
) {
    let zero = _mm_setzero_si128();
    let alpha_v = _mm_set1_epi16(alpha_q3 as i16);
    // Unrecognized depths clip as 8-bit, matching clip_pixel_highbd.
    let max_val = match bd {
        10 => 1023i16,
        12 => 4095i16,
        _ => 255i16,
    };
    let max_v = _mm_set1_epi16(max_val);
    let mut src_row = 0;
    let mut dst_row = 0;
    for _ in 0..height {
        let mut x = 0;
        while x + 8 <= width {
            let pred = simd_mem::_mm_loadu_si128(
                <&[i16; 8]>::try_from(&pred_buf_q3[src_row + x..src_row + x + 8]).unwrap(),
            );
            let (scaled_lo, scaled_hi) = scaled_luma_q0_x86(_token, pred, alpha_v);

            let d = simd_mem::_mm_loadu_si128(
                <&[u16; 8]>::try_from(&dst[dst_row + x..dst_row + x + 8]).unwrap(),
            );
            let sum_lo = _mm_add_epi32(scaled_lo, _mm_unpacklo_epi16(d, zero));
            let sum_hi = _mm_add_epi32(scaled_hi, _mm_unpackhi_epi16(d, zero));

            let packed = _mm_packs_epi32(sum_lo, sum_hi);
            let clipped = _mm_min_epi16(_mm_max_epi16(packed, zero), max_v);
            simd_mem::_mm_storeu_si128(
                <&mut [u16; 8]>::try_from(&mut dst[dst_row + x..dst_row + x + 8]).unwrap(),
                clipped,
            );
            x += 8;
        }
        while x < width {
            let scaled = get_scaled_luma_q0(alpha_q3, pred_buf_q3[src_row + x]);
            dst[dst_row + x] = clip_pixel_highbd(scaled + i32::from(dst[dst_row + x]), bd);
            x += 1;
        }
        src_row += CFL_BUF_LINE;
        dst_row += dst_stride;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{predict, CFL_BUF_SQUARE};

    fn fill_i16(buf: &mut [i16], seed: &mut u32, range: i32) {
        for v in buf.iter_mut() {
            *seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *v = ((*seed >> 16) as i32 % range) as i16;
        }
    }

    #[test]
    fn subtract_average_matches_scalar() {
        fn check<const W: usize, const H: usize>(seed: &mut u32) {
            let mut scalar_buf = [0i16; CFL_BUF_SQUARE];
            fill_i16(&mut scalar_buf, seed, 1024);
            let mut simd_buf = scalar_buf;

            sub_avg::subtract_average::<W, H>(&mut scalar_buf);
            subtract_average::<W, H>(&mut simd_buf);

            assert_eq!(
                scalar_buf[..],
                simd_buf[..],
                "SIMD subtract_average {W}x{H} doesn't match scalar"
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

    #[test]
    fn subsampling_420_lbd_matches_scalar() {
        let mut input = [0u8; 64 * 64];
        let mut seed = 7u32;
        for v in input.iter_mut() {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *v = (seed >> 24) as u8;
        }
        let mut scalar_out = [0i16; CFL_BUF_SQUARE];
        let mut simd_out = [0i16; CFL_BUF_SQUARE];
        subsample::luma_subsampling_420_lbd::<16, 16>(&input, 64, &mut scalar_out);
        luma_subsampling_420_lbd::<16, 16>(&input, 64, &mut simd_out);
        assert_eq!(scalar_out[..], simd_out[..]);
    }

    #[test]
    fn subsampling_hbd_matches_scalar() {
        let mut input = [0u16; 64 * 64];
        let mut seed = 11u32;
        for v in input.iter_mut() {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *v = (seed >> 20) as u16 % 4096;
        }
        let mut scalar_out = [0i16; CFL_BUF_SQUARE];
        let mut simd_out = [0i16; CFL_BUF_SQUARE];

        subsample::luma_subsampling_420_hbd::<8, 8>(&input, 64, &mut scalar_out);
        luma_subsampling_420_hbd::<8, 8>(&input, 64, &mut simd_out);
        assert_eq!(scalar_out[..], simd_out[..]);

        subsample::luma_subsampling_422_hbd::<16, 16>(&input, 64, &mut scalar_out);
        luma_subsampling_422_hbd::<16, 16>(&input, 64, &mut simd_out);
        assert_eq!(scalar_out[..], simd_out[..]);

        subsample::luma_subsampling_444_hbd::<32, 32>(&input, 64, &mut scalar_out);
        luma_subsampling_444_hbd::<32, 32>(&input, 64, &mut simd_out);
        assert_eq!(scalar_out[..], simd_out[..]);
    }

    #[test]
    fn predict_lbd_matches_scalar() {
        let mut pred_buf = [0i16; CFL_BUF_SQUARE];
        let mut seed = 3u32;
        fill_i16(&mut pred_buf, &mut seed, 1024);
        sub_avg::subtract_average::<16, 16>(&mut pred_buf);

        for alpha_q3 in [-16, -3, 0, 1, 8, 16] {
            let mut scalar_dst = [128u8; 16 * 16];
            let mut simd_dst = [128u8; 16 * 16];
            predict::predict_lbd::<16, 16>(&pred_buf, &mut scalar_dst, 16, alpha_q3);
            predict_lbd::<16, 16>(&pred_buf, &mut simd_dst, 16, alpha_q3);
            assert_eq!(scalar_dst[..], simd_dst[..], "alpha_q3 = {alpha_q3}");
        }
    }

    #[test]
    fn predict_hbd_matches_scalar() {
        let mut pred_buf = [0i16; CFL_BUF_SQUARE];
        let mut seed = 5u32;
        fill_i16(&mut pred_buf, &mut seed, 8192);
        sub_avg::subtract_average::<8, 8>(&mut pred_buf);

        for bd in [8u8, 10, 12] {
            for alpha_q3 in [-16, -1, 0, 2, 16] {
                let mut scalar_dst = [512u16; 8 * 8];
                let mut simd_dst = [512u16; 8 * 8];
                predict::predict_hbd::<8, 8>(&pred_buf, &mut scalar_dst, 8, alpha_q3, bd);
                predict_hbd::<8, 8>(&pred_buf, &mut simd_dst, 8, alpha_q3, bd);
                assert_eq!(scalar_dst[..], simd_dst[..], "bd = {bd}, alpha = {alpha_q3}");
            }
        }
    }
}
