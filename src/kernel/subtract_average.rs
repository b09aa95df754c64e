//! DC removal from the Q3 prediction buffer.

use super::CFL_BUF_LINE;

/// Subtract the rounded arithmetic mean from every sample of a `W`×`H` block
/// stored with row stride [`CFL_BUF_LINE`].
///
/// The mean uses round-half-up: `avg = (sum + (1 << (n - 1))) >> n` with
/// `n = log2(W * H)`. For the supported sizes (both dimensions ≤ 32) the
/// intermediate sum always fits an `i32`, so any summation order produces the
/// same average and SIMD backends can match this bit-for-bit.
pub(crate) fn subtract_average<const W: usize, const H: usize>(pred_buf_q3: &mut [i16]) {
    let mut sum_q3: i32 = 0;
    let mut row = 0;
    for _ in 0..H {
        for &v in &pred_buf_q3[row..row + W] {
            sum_q3 += i32::from(v);
        }
        row += CFL_BUF_LINE;
    }

    let num_pel_log2 = (W * H).trailing_zeros();
    let avg_q3 = (sum_q3 + (1 << (num_pel_log2 - 1))) >> num_pel_log2;

    // Loss is never more than 1/2 in Q3.
    let mut row = 0;
    for _ in 0..H {
        for v in &mut pred_buf_q3[row..row + W] {
            *v -= avg_q3 as i16;
        }
        row += CFL_BUF_LINE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CFL_BUF_SQUARE;

    fn reference_average(buf: &[i16], width: usize, height: usize) -> i32 {
        let mut sum = 0i32;
        for j in 0..height {
            for i in 0..width {
                sum += i32::from(buf[j * CFL_BUF_LINE + i]);
            }
        }
        let n = (width * height).trailing_zeros();
        (sum + (1 << (n - 1))) >> n
    }

    #[test]
    fn removes_rounded_mean_4x4() {
        let mut buf = [0i16; CFL_BUF_SQUARE];
        for j in 0..4 {
            for i in 0..4 {
                buf[j * CFL_BUF_LINE + i] = (j * 4 + i + 1) as i16;
            }
        }
        let avg = reference_average(&buf, 4, 4);
        let original = buf;

        subtract_average::<4, 4>(&mut buf);

        for j in 0..4 {
            for i in 0..4 {
                let idx = j * CFL_BUF_LINE + i;
                assert_eq!(buf[idx], original[idx] - avg as i16);
            }
        }
    }

    #[test]
    fn uniform_block_becomes_zero() {
        // A constant block's rounded mean is the constant itself.
        let mut buf = [0i16; CFL_BUF_SQUARE];
        for j in 0..16 {
            buf[j * CFL_BUF_LINE..j * CFL_BUF_LINE + 16].fill(700);
        }
        subtract_average::<16, 16>(&mut buf);
        for j in 0..16 {
            for i in 0..16 {
                assert_eq!(buf[j * CFL_BUF_LINE + i], 0);
            }
        }
    }

    #[test]
    fn rounding_is_half_up() {
        // Four samples summing to 6: avg = (6 + 2) >> 2 = 2, not 6/4 = 1.
        let mut buf = [0i16; CFL_BUF_SQUARE];
        buf[0] = 3;
        buf[1] = 1;
        buf[CFL_BUF_LINE] = 1;
        buf[CFL_BUF_LINE + 1] = 1;
        subtract_average::<2, 2>(&mut buf);
        assert_eq!(buf[0], 1);
        assert_eq!(buf[1], -1);
    }

    #[test]
    fn samples_outside_block_untouched() {
        let mut buf = [99i16; CFL_BUF_SQUARE];
        subtract_average::<8, 8>(&mut buf);
        // Column past the block width on a covered row.
        assert_eq!(buf[8], 99);
        // Row past the block height.
        assert_eq!(buf[8 * CFL_BUF_LINE], 99);
    }

    #[test]
    fn all_supported_sizes_match_reference() {
        fn check<const W: usize, const H: usize>() {
            let mut buf = [0i16; CFL_BUF_SQUARE];
            let mut seed = 0x2545_F491u32;
            for j in 0..H {
                for i in 0..W {
                    seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    buf[j * CFL_BUF_LINE + i] = (seed >> 22) as i16;
                }
            }
            let avg = reference_average(&buf, W, H);
            let original = buf;
            subtract_average::<W, H>(&mut buf);
            for j in 0..H {
                for i in 0..W {
                    let idx = j * CFL_BUF_LINE + i;
                    assert_eq!(buf[idx], original[idx] - avg as i16, "{W}x{H} at ({j},{i})");
                }
            }
        }

        check::<4, 4>();
        check::<4, 8>();
        check::<4, 16>();
        check::<8, 4>();
        check::<8, 8>();
        check::<8, 16>();
        check::<8, 32>();
        check::<16, 4>();
        check::<16, 8>();
        check::<16, 16>();
        check::<16, 32>();
        check::<32, 8>();
        check::<32, 16>();
        check::<32, 32>();
    }
}
