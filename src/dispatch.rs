//! Size-indexed kernel dispatch.
//!
//! Each kernel family has a 19-entry table indexed by [`TxSize`] discriminant.
//! Entries for block sizes where CfL is not defined (either dimension above
//! 32) are explicit [no-op](SubtractAverageKernel::NoOp) variants rather than
//! absent entries, so a lookup never fails and calling through an invalid
//! size leaves every buffer untouched.
//!
//! Two complete kernel sets are provided: [`SCALAR`] (the portable reference)
//! and [`VECTOR`] (SIMD-backed where the target and the `simd` feature allow,
//! otherwise identical to scalar). Both are plain statics of fn pointers;
//! lookups are reads of immutable data and safe from any thread.

use crate::tx_size::{ChromaFormat, TxSize, TX_SIZES_ALL};

/// Subtract-average over a Q3 prediction buffer.
pub type SubtractAverageFn = fn(pred_buf_q3: &mut [i16]);

/// Luma subsampling from an 8-bit plane into a Q3 prediction buffer.
pub type SubsampleLbdFn = fn(input: &[u8], input_stride: usize, output_q3: &mut [i16]);

/// Luma subsampling from a 10/12-bit plane into a Q3 prediction buffer.
pub type SubsampleHbdFn = fn(input: &[u16], input_stride: usize, output_q3: &mut [i16]);

/// Alpha-scaled prediction into an 8-bit destination.
pub type PredictLbdFn = fn(pred_buf_q3: &[i16], dst: &mut [u8], dst_stride: usize, alpha_q3: i32);

/// Alpha-scaled prediction into a 10/12-bit destination.
pub type PredictHbdFn =
    fn(pred_buf_q3: &[i16], dst: &mut [u16], dst_stride: usize, alpha_q3: i32, bd: u8);

/// Subtract-average table entry: a block kernel or an explicit no-op.
#[derive(Clone, Copy)]
pub enum SubtractAverageKernel {
    /// Kernel monomorphized for one block size.
    Block(SubtractAverageFn),
    /// CfL is not defined at this size; calling does nothing.
    NoOp,
}

impl SubtractAverageKernel {
    /// Run the kernel. A no-op entry returns without touching the buffer.
    pub fn call(self, pred_buf_q3: &mut [i16]) {
        if let SubtractAverageKernel::Block(f) = self {
            f(pred_buf_q3);
        }
    }

    /// Whether this entry is the no-op placeholder.
    pub fn is_no_op(self) -> bool {
        matches!(self, SubtractAverageKernel::NoOp)
    }
}

/// Low-bit-depth subsample table entry.
#[derive(Clone, Copy)]
pub enum SubsampleLbdKernel {
    /// Kernel monomorphized for one block size.
    Block(SubsampleLbdFn),
    /// CfL is not defined at this size; calling does nothing.
    NoOp,
}

impl SubsampleLbdKernel {
    /// Run the kernel. A no-op entry returns without touching the buffer.
    pub fn call(self, input: &[u8], input_stride: usize, output_q3: &mut [i16]) {
        if let SubsampleLbdKernel::Block(f) = self {
            f(input, input_stride, output_q3);
        }
    }

    /// Whether this entry is the no-op placeholder.
    pub fn is_no_op(self) -> bool {
        matches!(self, SubsampleLbdKernel::NoOp)
    }
}

/// High-bit-depth subsample table entry.
#[derive(Clone, Copy)]
pub enum SubsampleHbdKernel {
    /// Kernel monomorphized for one block size.
    Block(SubsampleHbdFn),
    /// CfL is not defined at this size; calling does nothing.
    NoOp,
}

impl SubsampleHbdKernel {
    /// Run the kernel. A no-op entry returns without touching the buffer.
    pub fn call(self, input: &[u16], input_stride: usize, output_q3: &mut [i16]) {
        if let SubsampleHbdKernel::Block(f) = self {
            f(input, input_stride, output_q3);
        }
    }

    /// Whether this entry is the no-op placeholder.
    pub fn is_no_op(self) -> bool {
        matches!(self, SubsampleHbdKernel::NoOp)
    }
}

/// Low-bit-depth predict table entry.
#[derive(Clone, Copy)]
pub enum PredictLbdKernel {
    /// Kernel monomorphized for one block size.
    Block(PredictLbdFn),
    /// CfL is not defined at this size; calling does nothing.
    NoOp,
}

impl PredictLbdKernel {
    /// Run the kernel. A no-op entry returns without touching the destination.
    pub fn call(self, pred_buf_q3: &[i16], dst: &mut [u8], dst_stride: usize, alpha_q3: i32) {
        if let PredictLbdKernel::Block(f) = self {
            f(pred_buf_q3, dst, dst_stride, alpha_q3);
        }
    }

    /// Whether this entry is the no-op placeholder.
    pub fn is_no_op(self) -> bool {
        matches!(self, PredictLbdKernel::NoOp)
    }
}

/// High-bit-depth predict table entry.
#[derive(Clone, Copy)]
pub enum PredictHbdKernel {
    /// Kernel monomorphized for one block size.
    Block(PredictHbdFn),
    /// CfL is not defined at this size; calling does nothing.
    NoOp,
}

impl PredictHbdKernel {
    /// Run the kernel. A no-op entry returns without touching the destination.
    pub fn call(
        self,
        pred_buf_q3: &[i16],
        dst: &mut [u16],
        dst_stride: usize,
        alpha_q3: i32,
        bd: u8,
    ) {
        if let PredictHbdKernel::Block(f) = self {
            f(pred_buf_q3, dst, dst_stride, alpha_q3, bd);
        }
    }

    /// Whether this entry is the no-op placeholder.
    pub fn is_no_op(self) -> bool {
        matches!(self, PredictHbdKernel::NoOp)
    }
}

/// A 19-entry kernel table indexed by transform-size discriminant.
///
/// [`get`](KernelTable::get) reduces the index modulo the table length, so an
/// out-of-range index selects a valid entry instead of panicking. Untrusted
/// size indices therefore cannot read past the table.
#[derive(Clone, Copy)]
pub struct KernelTable<K: Copy>([K; TX_SIZES_ALL]);

impl<K: Copy> KernelTable<K> {
    /// Look up an entry by raw index, wrapping out-of-range values.
    pub fn get(&self, index: usize) -> K {
        self.0[index % TX_SIZES_ALL]
    }

    /// Look up the entry for a transform size.
    pub fn for_tx(&self, tx_size: TxSize) -> K {
        self.0[tx_size as usize]
    }
}

/// Build one kernel table: a `Block` entry per CfL-capable size (in catalog
/// order) and `NoOp` at the five sizes with a dimension above 32.
macro_rules! cfl_kernel_table {
    ($kernel:ident, $module:ident, $func:ident) => {
        KernelTable([
            $kernel::Block(crate::kernel::$module::$func::<4, 4>),
            $kernel::Block(crate::kernel::$module::$func::<8, 8>),
            $kernel::Block(crate::kernel::$module::$func::<16, 16>),
            $kernel::Block(crate::kernel::$module::$func::<32, 32>),
            $kernel::NoOp, // 64x64
            $kernel::Block(crate::kernel::$module::$func::<4, 8>),
            $kernel::Block(crate::kernel::$module::$func::<8, 4>),
            $kernel::Block(crate::kernel::$module::$func::<8, 16>),
            $kernel::Block(crate::kernel::$module::$func::<16, 8>),
            $kernel::Block(crate::kernel::$module::$func::<16, 32>),
            $kernel::Block(crate::kernel::$module::$func::<32, 16>),
            $kernel::NoOp, // 32x64
            $kernel::NoOp, // 64x32
            $kernel::Block(crate::kernel::$module::$func::<4, 16>),
            $kernel::Block(crate::kernel::$module::$func::<16, 4>),
            $kernel::Block(crate::kernel::$module::$func::<8, 32>),
            $kernel::Block(crate::kernel::$module::$func::<32, 8>),
            $kernel::NoOp, // 16x64
            $kernel::NoOp, // 64x16
        ])
    };
}

/// A complete set of CfL kernel tables, one per family.
///
/// Subsample tables are further selected by [`ChromaFormat`].
pub struct CflKernels {
    subtract_average: KernelTable<SubtractAverageKernel>,
    subsample_lbd: [KernelTable<SubsampleLbdKernel>; 3],
    subsample_hbd: [KernelTable<SubsampleHbdKernel>; 3],
    predict_lbd: KernelTable<PredictLbdKernel>,
    predict_hbd: KernelTable<PredictHbdKernel>,
}

impl CflKernels {
    /// Subtract-average kernel for a transform size.
    pub fn subtract_average(&self, tx_size: TxSize) -> SubtractAverageKernel {
        self.subtract_average.for_tx(tx_size)
    }

    /// 8-bit subsample kernel for a chroma format and transform size.
    pub fn subsample_lbd(&self, format: ChromaFormat, tx_size: TxSize) -> SubsampleLbdKernel {
        self.subsample_lbd[format.index()].for_tx(tx_size)
    }

    /// 10/12-bit subsample kernel for a chroma format and transform size.
    pub fn subsample_hbd(&self, format: ChromaFormat, tx_size: TxSize) -> SubsampleHbdKernel {
        self.subsample_hbd[format.index()].for_tx(tx_size)
    }

    /// 8-bit predict kernel for a transform size.
    pub fn predict_lbd(&self, tx_size: TxSize) -> PredictLbdKernel {
        self.predict_lbd.for_tx(tx_size)
    }

    /// 10/12-bit predict kernel for a transform size.
    pub fn predict_hbd(&self, tx_size: TxSize) -> PredictHbdKernel {
        self.predict_hbd.for_tx(tx_size)
    }

    /// Subtract-average table, for raw-index lookups.
    pub fn subtract_average_table(&self) -> &KernelTable<SubtractAverageKernel> {
        &self.subtract_average
    }

    /// 8-bit subsample table for a chroma format, for raw-index lookups.
    pub fn subsample_lbd_table(&self, format: ChromaFormat) -> &KernelTable<SubsampleLbdKernel> {
        &self.subsample_lbd[format.index()]
    }

    /// 10/12-bit subsample table for a chroma format, for raw-index lookups.
    pub fn subsample_hbd_table(&self, format: ChromaFormat) -> &KernelTable<SubsampleHbdKernel> {
        &self.subsample_hbd[format.index()]
    }

    /// 8-bit predict table, for raw-index lookups.
    pub fn predict_lbd_table(&self) -> &KernelTable<PredictLbdKernel> {
        &self.predict_lbd
    }

    /// 10/12-bit predict table, for raw-index lookups.
    pub fn predict_hbd_table(&self) -> &KernelTable<PredictHbdKernel> {
        &self.predict_hbd
    }
}

/// Portable reference kernels.
pub static SCALAR: CflKernels = CflKernels {
    subtract_average: cfl_kernel_table!(SubtractAverageKernel, subtract_average, subtract_average),
    subsample_lbd: [
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_420_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_422_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_444_lbd),
    ],
    subsample_hbd: [
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_420_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_422_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_444_hbd),
    ],
    predict_lbd: cfl_kernel_table!(PredictLbdKernel, predict, predict_lbd),
    predict_hbd: cfl_kernel_table!(PredictHbdKernel, predict, predict_hbd),
};

/// SIMD-backed kernels on x86_64.
///
/// Each entry probes for the required CPU features at call time and falls
/// back to the scalar kernel when they are absent, so the tables are safe to
/// use unconditionally.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub static VECTOR: CflKernels = CflKernels {
    subtract_average: cfl_kernel_table!(SubtractAverageKernel, simd_sse, subtract_average),
    subsample_lbd: [
        cfl_kernel_table!(SubsampleLbdKernel, simd_sse, luma_subsampling_420_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, simd_sse, luma_subsampling_422_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, simd_sse, luma_subsampling_444_lbd),
    ],
    subsample_hbd: [
        cfl_kernel_table!(SubsampleHbdKernel, simd_sse, luma_subsampling_420_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, simd_sse, luma_subsampling_422_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, simd_sse, luma_subsampling_444_hbd),
    ],
    predict_lbd: cfl_kernel_table!(PredictLbdKernel, simd_sse, predict_lbd),
    predict_hbd: cfl_kernel_table!(PredictHbdKernel, simd_sse, predict_hbd),
};

/// SIMD-backed kernels on aarch64: NEON subtract-average, scalar otherwise.
#[cfg(all(feature = "simd", target_arch = "aarch64"))]
pub static VECTOR: CflKernels = CflKernels {
    subtract_average: cfl_kernel_table!(SubtractAverageKernel, simd_neon, subtract_average),
    subsample_lbd: [
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_420_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_422_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_444_lbd),
    ],
    subsample_hbd: [
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_420_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_422_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_444_hbd),
    ],
    predict_lbd: cfl_kernel_table!(PredictLbdKernel, predict, predict_lbd),
    predict_hbd: cfl_kernel_table!(PredictHbdKernel, predict, predict_hbd),
};

/// Without SIMD support the vector set is the scalar set.
#[cfg(not(all(
    feature = "simd",
    any(target_arch = "x86_64", target_arch = "aarch64")
)))]
pub static VECTOR: CflKernels = CflKernels {
    subtract_average: cfl_kernel_table!(SubtractAverageKernel, subtract_average, subtract_average),
    subsample_lbd: [
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_420_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_422_lbd),
        cfl_kernel_table!(SubsampleLbdKernel, subsample, luma_subsampling_444_lbd),
    ],
    subsample_hbd: [
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_420_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_422_hbd),
        cfl_kernel_table!(SubsampleHbdKernel, subsample, luma_subsampling_444_hbd),
    ],
    predict_lbd: cfl_kernel_table!(PredictLbdKernel, predict, predict_lbd),
    predict_hbd: cfl_kernel_table!(PredictHbdKernel, predict, predict_hbd),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::CFL_BUF_SQUARE;

    #[test]
    fn no_op_entries_match_cfl_allowed() {
        for tx in TxSize::ALL {
            assert_eq!(
                SCALAR.subtract_average(tx).is_no_op(),
                !tx.is_cfl_allowed(),
                "{tx:?}"
            );
            assert_eq!(SCALAR.predict_lbd(tx).is_no_op(), !tx.is_cfl_allowed());
            assert_eq!(SCALAR.predict_hbd(tx).is_no_op(), !tx.is_cfl_allowed());
            for fmt in [ChromaFormat::I420, ChromaFormat::I422, ChromaFormat::I444] {
                assert_eq!(SCALAR.subsample_lbd(fmt, tx).is_no_op(), !tx.is_cfl_allowed());
                assert_eq!(SCALAR.subsample_hbd(fmt, tx).is_no_op(), !tx.is_cfl_allowed());
            }
        }
    }

    #[test]
    fn no_op_leaves_buffers_untouched() {
        let mut pred_buf = [123i16; CFL_BUF_SQUARE];
        SCALAR.subtract_average(TxSize::Tx64x64).call(&mut pred_buf);
        assert!(pred_buf.iter().all(|&v| v == 123));

        let mut dst = [42u8; 64];
        SCALAR
            .predict_lbd(TxSize::Tx16x64)
            .call(&pred_buf, &mut dst, 8, 7);
        assert!(dst.iter().all(|&v| v == 42));
    }

    #[test]
    fn out_of_range_index_wraps_into_table() {
        let table = SCALAR.subtract_average_table();
        for index in [0usize, 18, 19, 23, 100, usize::MAX] {
            // Must select the same entry as the reduced index, and never panic.
            let wrapped = index % TX_SIZES_ALL;
            assert_eq!(table.get(index).is_no_op(), table.get(wrapped).is_no_op());
        }
        // Index 19 wraps to 0 (4x4): a live kernel, not a no-op.
        assert!(!table.get(19).is_no_op());
        // Index 23 wraps to 4 (64x64): the no-op slot.
        assert!(table.get(23).is_no_op());
    }

    #[test]
    fn dispatched_kernel_runs_correct_size() {
        let mut pred_buf = [0i16; CFL_BUF_SQUARE];
        // Fill an 8x8 block with a constant; rows beyond it stay hot to prove
        // the 8x8 kernel was selected and not a larger one.
        for row in 0..8 {
            for col in 0..8 {
                pred_buf[row * crate::kernel::CFL_BUF_LINE + col] = 80;
            }
        }
        pred_buf[8 * crate::kernel::CFL_BUF_LINE] = 999;

        SCALAR.subtract_average(TxSize::Tx8x8).call(&mut pred_buf);
        for row in 0..8 {
            for col in 0..8 {
                assert_eq!(pred_buf[row * crate::kernel::CFL_BUF_LINE + col], 0);
            }
        }
        assert_eq!(pred_buf[8 * crate::kernel::CFL_BUF_LINE], 999);
    }
}
