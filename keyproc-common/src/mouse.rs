/// Speed profiles used by mouse keys: one for pointer motion, one for the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseConfig {
    pub movement: MouseSpeed,
    pub scroll: MouseSpeed,
}
impl Default for MouseConfig {
    fn default() -> Self {
        MouseConfig::normal()
    }
}
impl MouseConfig {
    pub const fn slow() -> Self {
        Self {
            movement: MouseSpeed {
                curve: (0.1, 0.5),
                max_time: 1_000.0,
                min_ticks_per_ms: 0.02,
                max_ticks_per_ms: 1.0,
            },
            scroll: MouseSpeed {
                curve: (0.0, 0.0),
                max_time: 5_000.0,
                min_ticks_per_ms: 0.01,
                max_ticks_per_ms: 0.25,
            },
        }
    }

    pub const fn normal() -> Self {
        Self {
            movement: MouseSpeed {
                curve: (0.1, 0.5),
                max_time: 1_000.0,
                min_ticks_per_ms: 0.02,
                max_ticks_per_ms: 3.0,
            },
            scroll: MouseSpeed {
                curve: (0.0, 0.0),
                max_time: 5_000.0,
                min_ticks_per_ms: 0.01,
                max_ticks_per_ms: 0.5,
            },
        }
    }

    pub const fn fast() -> Self {
        Self {
            movement: MouseSpeed {
                curve: (0.1, 0.5),
                max_time: 1_000.0,
                min_ticks_per_ms: 0.02,
                max_ticks_per_ms: 5.0,
            },
            scroll: MouseSpeed {
                curve: (0.0, 0.0),
                max_time: 5_000.0,
                min_ticks_per_ms: 0.01,
                max_ticks_per_ms: 1.0,
            },
        }
    }
}

/// Acceleration of a held mouse key.
///
/// The rate starts at `min_ticks_per_ms` and ramps up to `max_ticks_per_ms` over `max_time`
/// milliseconds of holding. `curve` holds the two inner control points of a cubic Bezier easing
/// the ramp; `(0.0, 0.0)` gives a cubic ease-in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseSpeed {
    pub curve: (f32, f32),
    pub max_time: f32,
    pub min_ticks_per_ms: f32,
    pub max_ticks_per_ms: f32,
}
impl MouseSpeed {
    /// Ticks per millisecond after the key has been held for `held_ms`.
    pub fn rate(&self, held_ms: u32) -> f32 {
        let t = if self.max_time > 0.0 {
            min(held_ms as f32, self.max_time) / self.max_time
        } else {
            1.0
        };
        let (c0, c1) = self.curve;
        self.min_ticks_per_ms + (self.max_ticks_per_ms - self.min_ticks_per_ms) * ease(t, c0, c1)
    }

    /// Whole ticks to move for a report covering `period_ms`. The fractional remainder is kept in
    /// `carry` and added to the next call so slow rates still move.
    pub fn ticks(&self, period_ms: f32, held_ms: u32, carry: &mut f32) -> i8 {
        let r = min(self.rate(held_ms) * period_ms + *carry, 127.0);
        let ticks = r as i8;
        *carry = r - ticks as f32;
        ticks
    }
}

fn ease(t: f32, c0: f32, c1: f32) -> f32 {
    let r = 1.0 - t;
    3.0 * r * r * t * c0 + 3.0 * r * t * t * c1 + t * t * t
}

fn min(a: f32, b: f32) -> f32 {
    if a < b {
        a
    } else {
        b
    }
}

#[cfg(test)]
#[path = "mouse_test.rs"]
mod test;
