use embassy_time::Instant;
use keyproc_common::{
    keycodes::{key_range, MouseKey},
    mouse::{MouseConfig, MouseSpeed},
};

use crate::{host::HostTransport, report::MouseReport, trace};

/// Longest gap between flushes counted as motion time, so a stalled loop does not jump the
/// pointer.
const MAX_PERIOD_MS: u64 = 50;

const X: usize = 0;
const Y: usize = 1;
const WHEEL: usize = 2;
const PAN: usize = 3;

/// Keys that emulate a mouse. Codes are decoded while the matrix is walked and the combined
/// result is sent once per cycle by [MouseKeys::flush].
pub trait MouseKeys {
    fn is_mousekey(&self, code: u16) -> bool;
    fn decode(&mut self, code: u16);
    fn flush<H: HostTransport>(&mut self, host: &mut H);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoMouseKeys;

impl MouseKeys for NoMouseKeys {
    fn is_mousekey(&self, _code: u16) -> bool {
        false
    }

    fn decode(&mut self, _code: u16) {}

    fn flush<H: HostTransport>(&mut self, _host: &mut H) {}
}

#[derive(Default, Clone, Copy)]
struct Axis {
    /// Millisecond timestamp of the first cycle the axis was held.
    since: Option<u64>,
    carry: f32,
}

/// Mouse keys with time based acceleration from a [MouseConfig].
#[derive(Default)]
pub struct MouseKeyState {
    config: MouseConfig,
    buttons: u8,
    /// Per axis, bit 0 is the negative direction and bit 1 the positive one.
    directions: [u8; 4],
    axes: [Axis; 4],
    last_flush: u64,
    last_sent: MouseReport,
}

impl MouseKeyState {
    pub fn new(config: MouseConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn set_config(&mut self, config: &MouseConfig) {
        self.config = *config;
    }

    pub fn config(&self) -> &MouseConfig {
        &self.config
    }

    fn speed(&self, axis: usize) -> &MouseSpeed {
        if axis < WHEEL {
            &self.config.movement
        } else {
            &self.config.scroll
        }
    }

    fn direction(&self, axis: usize) -> i8 {
        match self.directions[axis] {
            1 => -1,
            2 => 1,
            _ => 0,
        }
    }

    fn build_report(&mut self, now: u64) -> MouseReport {
        let period = now.saturating_sub(self.last_flush).min(MAX_PERIOD_MS) as f32;
        self.last_flush = now;

        let mut values = [0i8; 4];
        for (axis, value) in values.iter_mut().enumerate() {
            let dir = self.direction(axis);
            if dir == 0 {
                self.axes[axis] = Axis::default();
                continue;
            }

            let speed = *self.speed(axis);
            let state = &mut self.axes[axis];
            let ticks = match state.since {
                None => {
                    state.since = Some(now);
                    1
                }
                Some(since) => speed.ticks(period, (now - since) as u32, &mut state.carry),
            };
            *value = ticks * dir;
        }

        MouseReport {
            buttons: self.buttons,
            x: values[X],
            y: values[Y],
            wheel: values[WHEEL],
            pan: values[PAN],
        }
    }
}

impl MouseKeys for MouseKeyState {
    fn is_mousekey(&self, code: u16) -> bool {
        key_range::is_mousekey(code)
    }

    fn decode(&mut self, code: u16) {
        let Some(key) = MouseKey::from_code(code) else {
            return;
        };
        trace!("mouse key {:?}", key);
        match key {
            MouseKey::Up => self.directions[Y] |= 1,
            MouseKey::Down => self.directions[Y] |= 2,
            MouseKey::Left => self.directions[X] |= 1,
            MouseKey::Right => self.directions[X] |= 2,
            MouseKey::Button(n) => self.buttons |= 1 << n,
            MouseKey::WheelDown => self.directions[WHEEL] |= 1,
            MouseKey::WheelUp => self.directions[WHEEL] |= 2,
            MouseKey::WheelLeft => self.directions[PAN] |= 1,
            MouseKey::WheelRight => self.directions[PAN] |= 2,
        }
    }

    fn flush<H: HostTransport>(&mut self, host: &mut H) {
        let report = self.build_report(Instant::now().as_millis());
        if report != self.last_sent || report.has_motion() {
            host.send_mouse(&report);
            self.last_sent = report;
        }
        self.buttons = 0;
        self.directions = [0; 4];
    }
}

#[cfg(test)]
#[path = "mousekey_test.rs"]
mod test;
