#![no_std]
pub mod command;
pub mod config;
pub mod host;
pub mod keyboard;
pub mod layer;
pub mod led;
pub mod matrix;
pub mod mousekey;
pub mod report;

#[cfg(any(test, feature = "test-utils"))]
pub mod collab_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod pin_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod time_driver_test_stub;

#[macro_use]
mod macros;

pub use config::Capabilities;
pub use keyboard::Keyboard;
pub use keyproc_common::keycodes::{kc, Keycode};
