//! Parity and speed check for the CfL kernels.
//!
//! Prints one report line per kernel and exits nonzero on the first
//! scalar/vector mismatch.

use std::process::ExitCode;

use zencfl::{run_all, HarnessConfig};

fn main() -> ExitCode {
    match run_all(&HarnessConfig::default()) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("parity check failed: {err}");
            ExitCode::FAILURE
        }
    }
}
