//! Deterministic input generation for the parity harness.

/// SplitMix64 generator. Small, seedable and has no dependencies, which
/// keeps harness runs reproducible across platforms.
pub(crate) struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub(crate) fn new(seed: u64) -> Self {
        SplitMix64 { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, bound: u32) -> u32 {
        (self.next_u64() % u64::from(bound)) as u32
    }

    /// Fill a `width`x`height` region of a Q3 buffer (at `stride`) with
    /// values in `0..1024`, the range of 7-bit luma samples in Q3.
    pub(crate) fn fill_q3(&mut self, buf: &mut [i16], width: usize, height: usize, stride: usize) {
        for row in 0..height {
            for col in 0..width {
                buf[row * stride + col] = self.below(1024) as i16;
            }
        }
    }

    /// Fill a slice with 8-bit pixel values.
    pub(crate) fn fill_lbd(&mut self, buf: &mut [u8]) {
        for v in buf.iter_mut() {
            *v = self.below(256) as u8;
        }
    }

    /// Fill a slice with `bd`-bit pixel values.
    pub(crate) fn fill_hbd(&mut self, buf: &mut [u16], bd: u8) {
        for v in buf.iter_mut() {
            *v = self.below(1 << bd) as u16;
        }
    }
}
