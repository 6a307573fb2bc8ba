#![no_std]
pub mod keycodes;
pub mod mouse;

/// Number of function-layer slots; one bit each in the function-bit accumulator.
pub const FN_SLOTS: usize = 8;
