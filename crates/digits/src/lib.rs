//! Digit state: the displayed digit sequence and the rules that advance it.
//!
//! # Invariants
//! - Index 0 is the least-significant digit.
//! - The odometer never bounds values; bounding is the clamp pass, run every frame.
//! - Auto-increment is driven by a frame counter, not wall-clock time.

mod auto;
mod sequence;

pub use auto::{AutoIncrement, DEFAULT_AUTO_INTERVAL};
pub use sequence::{DigitSequence, increment_score};

/// Number of digit positions shown when none is configured.
pub const DEFAULT_DIGIT_COUNT: usize = 8;

pub fn crate_info() -> &'static str {
    "glyphometer-digits v0.1.0"
}
