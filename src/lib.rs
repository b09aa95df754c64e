//! Chroma-from-Luma (CfL) intra-prediction kernels.
//!
//! CfL predicts chroma pixels from the co-located reconstructed luma signal.
//! This crate implements the three numeric kernel families the technique
//! needs, each in a portable scalar form and (optionally) a SIMD form that is
//! bit-exact with the scalar form:
//!
//! - **subtract-average**: remove the DC component from a Q3 luma prediction
//!   buffer ([`TxSize`]-sized, row stride [`CFL_BUF_LINE`]);
//! - **luma subsampling**: reduce a luma plane region to chroma resolution
//!   for 4:2:0, 4:2:2 and 4:4:4, producing Q3 fixed-point output;
//! - **alpha-scaled prediction**: scale the Q3 buffer by a signed Q3 alpha,
//!   accumulate into the destination chroma plane and clip to the bit depth.
//!
//! Kernels are selected through build-once, immutable lookup tables indexed
//! by transform size; see [`dispatch`]. Transform sizes that AV1 excludes
//! from CfL resolve to an explicit no-op entry, and table lookups reduce the
//! index modulo the table length so an out-of-range value can never index out
//! of bounds.
//!
//! # Features
//!
//! - `std` (default): enables the [`harness`] module — the parity and
//!   benchmark harness that proves the scalar and vector kernel sets agree
//!   and measures their relative speed — plus the `zencfl-check` binary.
//! - `simd`: SIMD kernel backends for x86_64 (SSE via `archmage` tokens)
//!   and aarch64 (NEON). Without it the vector kernel set aliases the scalar
//!   kernels.
//!
//! # no_std Support
//!
//! The kernel library and dispatch tables only require `core`:
//! ```toml
//! [dependencies]
//! zencfl = { version = "...", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use zencfl::{TxSize, CFL_BUF_SQUARE, SCALAR};
//!
//! let mut pred_buf_q3 = [0i16; CFL_BUF_SQUARE];
//! // ... subsample reconstructed luma into pred_buf_q3 ...
//! SCALAR.subtract_average(TxSize::Tx8x8).call(&mut pred_buf_q3);
//!
//! let mut dst = [128u8; 8 * 8];
//! SCALAR
//!     .predict_lbd(TxSize::Tx8x8)
//!     .call(&pred_buf_q3, &mut dst, 8, 3);
//! ```
//!
//! # Safety
//!
//! This crate uses `#![forbid(unsafe_code)]`. With the `simd` feature the
//! vector kernels rely on the [`archmage`] crate for safe SIMD intrinsics;
//! its `#[arcane]` proc macro generates unsafe blocks internally (which
//! bypass the `forbid` lint due to proc-macro span handling). Without the
//! `simd` feature this crate contains no unsafe code whatsoever.
//!
//! [`archmage`]: https://docs.rs/archmage

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod dispatch;
pub mod kernel;
pub mod tx_size;

#[cfg(feature = "std")]
pub mod harness;

pub use dispatch::{
    CflKernels, KernelTable, PredictHbdKernel, PredictLbdKernel, SubsampleHbdKernel,
    SubsampleLbdKernel, SubtractAverageKernel, SCALAR, VECTOR,
};
pub use kernel::{CFL_BUF_LINE, CFL_BUF_SQUARE};
pub use tx_size::{ChromaFormat, TxSize, TX_SIZES_ALL};

#[cfg(feature = "std")]
pub use harness::{run_all, HarnessConfig, HarnessError};
