use embedded_hal::digital::OutputPin;

use crate::warn;

pub const NUM_LOCK: u8 = 1 << 0;
pub const CAPS_LOCK: u8 = 1 << 1;
pub const SCROLL_LOCK: u8 = 1 << 2;
pub const COMPOSE: u8 = 1 << 3;
pub const KANA: u8 = 1 << 4;

pub trait LedDriver {
    fn set(&mut self, mask: u8);
}

/// For boards without indicator LEDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLeds;

impl LedDriver for NoLeds {
    fn set(&mut self, _mask: u8) {}
}

/// Drives pin `i` high while bit `i` of the LED mask is set.
pub struct PinLeds<P: OutputPin, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> PinLeds<P, N> {
    const PINS_FIT: () = assert!(N <= 8, "the led mask has 8 bits");

    pub fn new(pins: [P; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::PINS_FIT;
        Self { pins }
    }
}

impl<P: OutputPin, const N: usize> LedDriver for PinLeds<P, N> {
    fn set(&mut self, mask: u8) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            let res = if mask & (1 << i) != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            if res.is_err() {
                warn!("failed to drive led {}", i);
            }
        }
    }
}

#[cfg(test)]
#[path = "led_test.rs"]
mod test;
