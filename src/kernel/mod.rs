//! Fixed-point CfL kernels: subtract-average, luma subsampling and
//! alpha-scaled prediction.
//!
//! All kernels are pure functions over caller-owned buffers. The Q3
//! prediction buffer always has row stride [`CFL_BUF_LINE`]; plane inputs and
//! destinations carry an explicit stride. Geometry (sizes, strides, slice
//! lengths) is a caller contract — kernels index directly and rely on Rust's
//! bounds checks instead of validating.

pub mod predict;
pub mod subsample;
pub mod subtract_average;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) mod simd_sse;

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
pub(crate) mod simd_neon;

/// Row stride of the Q3 prediction buffer, in samples.
pub const CFL_BUF_LINE: usize = 32;

/// Total capacity of a Q3 prediction buffer (32 rows of 32 samples).
pub const CFL_BUF_SQUARE: usize = CFL_BUF_LINE * CFL_BUF_LINE;

/// Shift down with rounding, for `n >= 1` and non-negative `value`.
#[inline(always)]
pub(crate) const fn round_power_of_two(value: i32, n: u32) -> i32 {
    (value + ((1 << n) >> 1)) >> n
}

/// Shift down with rounding for signed integers: the magnitude is rounded,
/// so ties go away from zero on the negative branch rather than toward
/// negative infinity.
#[inline(always)]
pub(crate) const fn round_power_of_two_signed(value: i32, n: u32) -> i32 {
    if value < 0 {
        -round_power_of_two(-value, n)
    } else {
        round_power_of_two(value, n)
    }
}

/// Scale a Q3 prediction sample by a Q3 alpha, rounding the Q6 product back
/// to integer pixel units.
#[inline(always)]
pub(crate) const fn get_scaled_luma_q0(alpha_q3: i32, pred_q3: i16) -> i32 {
    round_power_of_two_signed(alpha_q3 * pred_q3 as i32, 6)
}

/// Clip to the 8-bit pixel range.
#[inline(always)]
pub(crate) fn clip_pixel(val: i32) -> u8 {
    val.clamp(0, 255) as u8
}

/// Clip to the pixel range of `bd`-bit samples.
///
/// An unrecognized bit depth silently clips as 8-bit; do not turn it into
/// an error.
#[inline(always)]
pub(crate) fn clip_pixel_highbd(val: i32, bd: u8) -> u16 {
    match bd {
        10 => val.clamp(0, 1023) as u16,
        12 => val.clamp(0, 4095) as u16,
        _ => val.clamp(0, 255) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up() {
        assert_eq!(round_power_of_two(7, 2), 2);
        assert_eq!(round_power_of_two(6, 2), 2);
        assert_eq!(round_power_of_two(5, 2), 1);
        assert_eq!(round_power_of_two(0, 4), 0);
    }

    #[test]
    fn signed_rounding_is_symmetric() {
        for v in -2048..=2048 {
            assert_eq!(
                round_power_of_two_signed(v, 6),
                -round_power_of_two_signed(-v, 6),
                "v = {v}"
            );
        }
    }

    #[test]
    fn scaled_luma_matches_reference_rounding() {
        // alpha_q3 * pred_q3 = -96 -> -96/64 = -1.5, rounds away from zero.
        assert_eq!(get_scaled_luma_q0(-3, 32), -2);
        assert_eq!(get_scaled_luma_q0(3, 32), 2);
        assert_eq!(get_scaled_luma_q0(0, 12345), 0);
    }

    #[test]
    fn clip_saturates_at_pixel_range() {
        assert_eq!(clip_pixel(-1), 0);
        assert_eq!(clip_pixel(0), 0);
        assert_eq!(clip_pixel(255), 255);
        assert_eq!(clip_pixel(256), 255);
    }

    #[test]
    fn highbd_clip_falls_back_to_8bit() {
        assert_eq!(clip_pixel_highbd(5000, 10), 1023);
        assert_eq!(clip_pixel_highbd(5000, 12), 4095);
        assert_eq!(clip_pixel_highbd(5000, 8), 255);
        // Unsupported depth falls back to the 8-bit range.
        assert_eq!(clip_pixel_highbd(5000, 14), 255);
        assert_eq!(clip_pixel_highbd(-1, 10), 0);
    }
}
