//! Luma subsampling into the Q3 prediction buffer.
//!
//! `W` and `H` are the chroma-plane output dimensions; the kernels read
//! `(W << sub_x) × (H << sub_y)` luma samples from `(input, input_stride)`
//! and write a `W`×`H` block with row stride [`CFL_BUF_LINE`].
//!
//! The Q3 convention makes each variant a shift, not a division: averaging a
//! 2×2 block then scaling by 8 is `(a + b + c + d) << 1`, a 1×2 pair is
//! `(a + b) << 2`, and a lone sample is `sample << 3`. For bit depths ≤ 12
//! none of these overflow `i16` (4 × 4095 << 1 = 32760).

use super::CFL_BUF_LINE;

/// Sample type a subsampling kernel can read: `u8` for low bit depth, `u16`
/// for high bit depth (values bounded by the configured depth).
pub(crate) trait LumaSample: Copy {
    fn widen(self) -> i32;
}

impl LumaSample for u8 {
    #[inline(always)]
    fn widen(self) -> i32 {
        i32::from(self)
    }
}

impl LumaSample for u16 {
    #[inline(always)]
    fn widen(self) -> i32 {
        i32::from(self)
    }
}

/// 4:2:0 subsampling: average each 2×2 luma block, Q3-scaled.
pub(crate) fn luma_subsampling_420<P: LumaSample, const W: usize, const H: usize>(
    input: &[P],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..H {
        let bot = in_row + input_stride;
        for i in 0..W {
            let sum = input[in_row + 2 * i].widen()
                + input[in_row + 2 * i + 1].widen()
                + input[bot + 2 * i].widen()
                + input[bot + 2 * i + 1].widen();
            output_q3[out_row + i] = (sum << 1) as i16;
        }
        in_row += input_stride << 1;
        out_row += CFL_BUF_LINE;
    }
}

/// 4:2:2 subsampling: average each horizontal luma pair, Q3-scaled.
pub(crate) fn luma_subsampling_422<P: LumaSample, const W: usize, const H: usize>(
    input: &[P],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..H {
        for i in 0..W {
            let sum = input[in_row + 2 * i].widen() + input[in_row + 2 * i + 1].widen();
            output_q3[out_row + i] = (sum << 2) as i16;
        }
        in_row += input_stride;
        out_row += CFL_BUF_LINE;
    }
}

/// 4:4:4 subsampling: direct Q3 conversion, no averaging.
pub(crate) fn luma_subsampling_444<P: LumaSample, const W: usize, const H: usize>(
    input: &[P],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    let mut in_row = 0;
    let mut out_row = 0;
    for _ in 0..H {
        for i in 0..W {
            output_q3[out_row + i] = (input[in_row + i].widen() << 3) as i16;
        }
        in_row += input_stride;
        out_row += CFL_BUF_LINE;
    }
}

// Monomorphic entry points for the dispatch tables, one per
// (format, bit depth) family.

pub(crate) fn luma_subsampling_420_lbd<const W: usize, const H: usize>(
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    luma_subsampling_420::<u8, W, H>(input, input_stride, output_q3);
}

pub(crate) fn luma_subsampling_422_lbd<const W: usize, const H: usize>(
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    luma_subsampling_422::<u8, W, H>(input, input_stride, output_q3);
}

pub(crate) fn luma_subsampling_444_lbd<const W: usize, const H: usize>(
    input: &[u8],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    luma_subsampling_444::<u8, W, H>(input, input_stride, output_q3);
}

pub(crate) fn luma_subsampling_420_hbd<const W: usize, const H: usize>(
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    luma_subsampling_420::<u16, W, H>(input, input_stride, output_q3);
}

pub(crate) fn luma_subsampling_422_hbd<const W: usize, const H: usize>(
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    luma_subsampling_422::<u16, W, H>(input, input_stride, output_q3);
}

pub(crate) fn luma_subsampling_444_hbd<const W: usize, const H: usize>(
    input: &[u16],
    input_stride: usize,
    output_q3: &mut [i16],
) {
    luma_subsampling_444::<u16, W, H>(input, input_stride, output_q3);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CFL_BUF_SQUARE;

    #[test]
    fn subsampling_420_of_constant_recovers_value() {
        // Averaging a uniform 2x2 block recovers the value; Q3 scale applies.
        let input = [57u8; 64 * 64];
        let mut out = [0i16; CFL_BUF_SQUARE];
        luma_subsampling_420::<u8, 8, 8>(&input, 64, &mut out);
        for j in 0..8 {
            for i in 0..8 {
                assert_eq!(out[j * CFL_BUF_LINE + i], 57 << 3);
            }
        }
    }

    #[test]
    fn subsampling_420_averages_2x2() {
        let mut input = [0u8; 64 * 2];
        input[0] = 10;
        input[1] = 20;
        input[64] = 30;
        input[65] = 44;
        let mut out = [0i16; CFL_BUF_SQUARE];
        luma_subsampling_420::<u8, 1, 1>(&input, 64, &mut out);
        assert_eq!(out[0], (10 + 20 + 30 + 44) << 1);
    }

    #[test]
    fn subsampling_422_pairs() {
        let mut input = [0u16; 32];
        input[0] = 100;
        input[1] = 300;
        input[2] = 4095;
        input[3] = 4095;
        let mut out = [0i16; CFL_BUF_SQUARE];
        luma_subsampling_422::<u16, 2, 1>(&input, 32, &mut out);
        assert_eq!(out[0], (100 + 300) << 2);
        assert_eq!(out[1], (4095 + 4095) << 2);
    }

    #[test]
    fn subsampling_444_is_elementwise_shift() {
        let mut input = [0u8; 32 * 4];
        for (i, v) in input.iter_mut().enumerate() {
            *v = (i % 251) as u8;
        }
        let mut out = [0i16; CFL_BUF_SQUARE];
        luma_subsampling_444::<u8, 4, 4>(&input, 32, &mut out);
        for j in 0..4 {
            for i in 0..4 {
                assert_eq!(
                    out[j * CFL_BUF_LINE + i],
                    i16::from(input[j * 32 + i]) << 3
                );
            }
        }
    }

    #[test]
    fn highbd_12bit_maximum_does_not_overflow() {
        let input = [4095u16; 64 * 2];
        let mut out = [0i16; CFL_BUF_SQUARE];
        luma_subsampling_420::<u16, 4, 1>(&input, 64, &mut out);
        assert_eq!(out[0], 32760);
    }
}
