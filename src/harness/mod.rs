//! Parity and speed harness comparing the scalar and vector kernel sets.
//!
//! [`run_all`] drives every kernel family over the square transform sizes:
//! it first proves the vector kernel bit-exact against the scalar one on
//! seeded random inputs, then times both and reports the speed ratio. The
//! first mismatch aborts the run with [`HarnessError::ParityMismatch`];
//! timing noise never affects the outcome, only the report text.
//!
//! Requires the `std` feature (timing and report formatting).

mod timing;
mod vectors;

use thiserror::Error;

use crate::dispatch::{SCALAR, VECTOR};
use crate::kernel::{CFL_BUF_LINE, CFL_BUF_SQUARE};
use crate::tx_size::{ChromaFormat, TxSize};
use vectors::SplitMix64;

/// Luma planes handed to the subsample kernels: up to 64x64 samples for a
/// 32x32 chroma block under 4:2:0.
const LUMA_STRIDE: usize = 64;
const LUMA_SQUARE: usize = LUMA_STRIDE * LUMA_STRIDE;

/// Square sizes exercised by the harness; rectangular sizes share the same
/// kernels row-for-row and are covered by the unit tests.
const SQUARE_SIZES: [TxSize; 4] = [
    TxSize::Tx4x4,
    TxSize::Tx8x8,
    TxSize::Tx16x16,
    TxSize::Tx32x32,
];

const FORMATS: [ChromaFormat; 3] = [ChromaFormat::I420, ChromaFormat::I422, ChromaFormat::I444];

/// Harness failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// A vector kernel produced a different sample than the scalar kernel.
    #[error("{kernel}: scalar/vector mismatch at ({row}, {col}): {scalar} != {vector}")]
    ParityMismatch {
        /// Report name of the kernel, e.g. `subsample_lbd_420_8x8`.
        kernel: String,
        /// Row of the first differing sample.
        row: usize,
        /// Column of the first differing sample.
        col: usize,
        /// Sample produced by the scalar kernel.
        scalar: i32,
        /// Sample produced by the vector kernel.
        vector: i32,
    },
}

/// Harness tuning knobs.
pub struct HarnessConfig {
    /// Kernel calls per timing batch.
    pub speed_iters: usize,
    /// Timing batches per kernel; values below 3 are raised to 3.
    pub robust_iters: usize,
    /// Seed for input generation.
    pub seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            speed_iters: 1 << 16,
            robust_iters: 15,
            seed: 42,
        }
    }
}

fn format_name(format: ChromaFormat) -> &'static str {
    match format {
        ChromaFormat::I420 => "420",
        ChromaFormat::I422 => "422",
        ChromaFormat::I444 => "444",
    }
}

fn check_equal<T: Copy + PartialEq + Into<i32>>(
    kernel: &str,
    scalar: &[T],
    vector: &[T],
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(), HarnessError> {
    for row in 0..height {
        for col in 0..width {
            let s = scalar[row * stride + col];
            let v = vector[row * stride + col];
            if s != v {
                return Err(HarnessError::ParityMismatch {
                    kernel: kernel.to_owned(),
                    row,
                    col,
                    scalar: s.into(),
                    vector: v.into(),
                });
            }
        }
    }
    Ok(())
}

fn report_line(
    report: &mut String,
    name: &str,
    scalar: timing::RobustStats,
    vector: timing::RobustStats,
) {
    report.push_str(&format!(
        "{name} {:.1}\u{b1}{:.1}ns {:.1}\u{b1}{:.1}ns ({:.1}x)\n",
        scalar.median,
        scalar.sd,
        vector.median,
        vector.sd,
        scalar.median / vector.median,
    ));
}

fn run_subtract_average(
    tx_size: TxSize,
    rng: &mut SplitMix64,
    config: &HarnessConfig,
    report: &mut String,
) -> Result<(), HarnessError> {
    let (w, h) = (tx_size.width(), tx_size.height());
    let name = format!("subtract_average_{w}x{h}");

    let mut scalar_buf = [0i16; CFL_BUF_SQUARE];
    rng.fill_q3(&mut scalar_buf, w, h, CFL_BUF_LINE);
    let mut vector_buf = scalar_buf;

    let scalar_kernel = SCALAR.subtract_average(tx_size);
    let vector_kernel = VECTOR.subtract_average(tx_size);
    scalar_kernel.call(&mut scalar_buf);
    vector_kernel.call(&mut vector_buf);
    check_equal(&name, &scalar_buf, &vector_buf, w, h, CFL_BUF_LINE)?;

    let s = timing::measure(
        || scalar_kernel.call(&mut scalar_buf),
        config.speed_iters,
        config.robust_iters,
    );
    let v = timing::measure(
        || vector_kernel.call(&mut vector_buf),
        config.speed_iters,
        config.robust_iters,
    );
    report_line(report, &name, s, v);
    Ok(())
}

fn run_subsample_lbd(
    format: ChromaFormat,
    tx_size: TxSize,
    rng: &mut SplitMix64,
    config: &HarnessConfig,
    report: &mut String,
) -> Result<(), HarnessError> {
    let (w, h) = (tx_size.width(), tx_size.height());
    let name = format!("subsample_lbd_{}_{w}x{h}", format_name(format));

    let mut input = [0u8; LUMA_SQUARE];
    rng.fill_lbd(&mut input);
    let mut scalar_out = [0i16; CFL_BUF_SQUARE];
    let mut vector_out = [0i16; CFL_BUF_SQUARE];

    let scalar_kernel = SCALAR.subsample_lbd(format, tx_size);
    let vector_kernel = VECTOR.subsample_lbd(format, tx_size);
    scalar_kernel.call(&input, LUMA_STRIDE, &mut scalar_out);
    vector_kernel.call(&input, LUMA_STRIDE, &mut vector_out);
    check_equal(&name, &scalar_out, &vector_out, w, h, CFL_BUF_LINE)?;

    let s = timing::measure(
        || scalar_kernel.call(&input, LUMA_STRIDE, &mut scalar_out),
        config.speed_iters,
        config.robust_iters,
    );
    let v = timing::measure(
        || vector_kernel.call(&input, LUMA_STRIDE, &mut vector_out),
        config.speed_iters,
        config.robust_iters,
    );
    report_line(report, &name, s, v);
    Ok(())
}

fn run_subsample_hbd(
    format: ChromaFormat,
    tx_size: TxSize,
    rng: &mut SplitMix64,
    config: &HarnessConfig,
    report: &mut String,
) -> Result<(), HarnessError> {
    let (w, h) = (tx_size.width(), tx_size.height());
    let name = format!("subsample_hbd_{}_{w}x{h}", format_name(format));

    let mut input = [0u16; LUMA_SQUARE];
    rng.fill_hbd(&mut input, 12);
    let mut scalar_out = [0i16; CFL_BUF_SQUARE];
    let mut vector_out = [0i16; CFL_BUF_SQUARE];

    let scalar_kernel = SCALAR.subsample_hbd(format, tx_size);
    let vector_kernel = VECTOR.subsample_hbd(format, tx_size);
    scalar_kernel.call(&input, LUMA_STRIDE, &mut scalar_out);
    vector_kernel.call(&input, LUMA_STRIDE, &mut vector_out);
    check_equal(&name, &scalar_out, &vector_out, w, h, CFL_BUF_LINE)?;

    let s = timing::measure(
        || scalar_kernel.call(&input, LUMA_STRIDE, &mut scalar_out),
        config.speed_iters,
        config.robust_iters,
    );
    let v = timing::measure(
        || vector_kernel.call(&input, LUMA_STRIDE, &mut vector_out),
        config.speed_iters,
        config.robust_iters,
    );
    report_line(report, &name, s, v);
    Ok(())
}

fn run_predict_lbd(
    tx_size: TxSize,
    rng: &mut SplitMix64,
    config: &HarnessConfig,
    report: &mut String,
) -> Result<(), HarnessError> {
    let (w, h) = (tx_size.width(), tx_size.height());
    let name = format!("predict_lbd_{w}x{h}");

    // A centered Q3 buffer, as the predict kernels see in practice.
    let mut pred_buf = [0i16; CFL_BUF_SQUARE];
    rng.fill_q3(&mut pred_buf, w, h, CFL_BUF_LINE);
    SCALAR.subtract_average(tx_size).call(&mut pred_buf);

    let mut scalar_dst = [0u8; CFL_BUF_SQUARE];
    rng.fill_lbd(&mut scalar_dst);
    let mut vector_dst = scalar_dst;
    let alpha_q3 = 1;

    let scalar_kernel = SCALAR.predict_lbd(tx_size);
    let vector_kernel = VECTOR.predict_lbd(tx_size);
    scalar_kernel.call(&pred_buf, &mut scalar_dst, CFL_BUF_LINE, alpha_q3);
    vector_kernel.call(&pred_buf, &mut vector_dst, CFL_BUF_LINE, alpha_q3);
    check_equal(&name, &scalar_dst, &vector_dst, w, h, CFL_BUF_LINE)?;

    let s = timing::measure(
        || scalar_kernel.call(&pred_buf, &mut scalar_dst, CFL_BUF_LINE, alpha_q3),
        config.speed_iters,
        config.robust_iters,
    );
    let v = timing::measure(
        || vector_kernel.call(&pred_buf, &mut vector_dst, CFL_BUF_LINE, alpha_q3),
        config.speed_iters,
        config.robust_iters,
    );
    report_line(report, &name, s, v);
    Ok(())
}

fn run_predict_hbd(
    tx_size: TxSize,
    rng: &mut SplitMix64,
    config: &HarnessConfig,
    report: &mut String,
) -> Result<(), HarnessError> {
    let (w, h) = (tx_size.width(), tx_size.height());
    let name = format!("predict_hbd_{w}x{h}");
    let bd = 10;

    let mut pred_buf = [0i16; CFL_BUF_SQUARE];
    rng.fill_q3(&mut pred_buf, w, h, CFL_BUF_LINE);
    SCALAR.subtract_average(tx_size).call(&mut pred_buf);

    let mut scalar_dst = [0u16; CFL_BUF_SQUARE];
    rng.fill_hbd(&mut scalar_dst, bd);
    let mut vector_dst = scalar_dst;
    let alpha_q3 = 1;

    let scalar_kernel = SCALAR.predict_hbd(tx_size);
    let vector_kernel = VECTOR.predict_hbd(tx_size);
    scalar_kernel.call(&pred_buf, &mut scalar_dst, CFL_BUF_LINE, alpha_q3, bd);
    vector_kernel.call(&pred_buf, &mut vector_dst, CFL_BUF_LINE, alpha_q3, bd);
    check_equal(&name, &scalar_dst, &vector_dst, w, h, CFL_BUF_LINE)?;

    let s = timing::measure(
        || scalar_kernel.call(&pred_buf, &mut scalar_dst, CFL_BUF_LINE, alpha_q3, bd),
        config.speed_iters,
        config.robust_iters,
    );
    let v = timing::measure(
        || vector_kernel.call(&pred_buf, &mut vector_dst, CFL_BUF_LINE, alpha_q3, bd),
        config.speed_iters,
        config.robust_iters,
    );
    report_line(report, &name, s, v);
    Ok(())
}

/// Run parity and speed checks over every kernel family.
///
/// Returns the full report on success. The report has one line per kernel:
///
/// ```text
/// subtract_average_8x8 12.3±0.4ns 3.1±0.2ns (4.0x)
/// ```
pub fn run_all(config: &HarnessConfig) -> Result<String, HarnessError> {
    let mut rng = SplitMix64::new(config.seed);
    let mut report = String::new();

    for tx_size in SQUARE_SIZES {
        run_subtract_average(tx_size, &mut rng, config, &mut report)?;
    }
    for format in FORMATS {
        for tx_size in SQUARE_SIZES {
            run_subsample_hbd(format, tx_size, &mut rng, config, &mut report)?;
        }
    }
    for format in FORMATS {
        for tx_size in SQUARE_SIZES {
            run_subsample_lbd(format, tx_size, &mut rng, config, &mut report)?;
        }
    }
    for tx_size in SQUARE_SIZES {
        run_predict_hbd(tx_size, &mut rng, config, &mut report)?;
    }
    for tx_size in SQUARE_SIZES {
        run_predict_lbd(tx_size, &mut rng, config, &mut report)?;
    }
    Ok(report)
}
