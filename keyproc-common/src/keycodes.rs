pub mod key_range {
    pub const PAGE_MASK: u16 = 0xff00;

    pub const KEYBOARD_PAGE: u16 = 0x0700;
    pub const SYSTEM_PAGE: u16 = 0x0100;
    pub const MOUSE_PAGE: u16 = 0x0f00;

    pub const CONSUMER_MASK: u16 = 0xf000;
    pub const CONSUMER_PAGE: u16 = 0xc000;
    pub const CONSUMER_USAGE_MASK: u16 = 0x0fff;

    pub const NO: u16 = KEYBOARD_PAGE;

    pub const BASIC_A: u8 = 0x04;
    pub const BASIC_1: u8 = 0x1e;
    pub const BASIC_0: u8 = 0x27;
    pub const MODIFIER_MIN: u8 = 0xe0;
    pub const MODIFIER_MAX: u8 = 0xe7;
    pub const FN_MIN: u8 = 0xe8;
    pub const FN_MAX: u8 = 0xef;

    pub const MOUSE_MIN: u8 = 0xf0;
    pub const MOUSE_MOVE_MAX: u8 = 0xf3;
    pub const MOUSE_BUTTON_MIN: u8 = 0xf4;
    pub const MOUSE_BUTTON_MAX: u8 = 0xf8;
    pub const MOUSE_WHEEL_MIN: u8 = 0xf9;
    pub const MOUSE_MAX: u8 = 0xfc;

    pub const SYSTEM_POWER_DOWN: u16 = 0x81;
    pub const SYSTEM_SLEEP: u16 = 0x82;
    pub const SYSTEM_WAKE_UP: u16 = 0x83;

    pub const fn page(code: u16) -> u16 {
        code & PAGE_MASK
    }

    pub const fn low(code: u16) -> u8 {
        (code & 0xff) as u8
    }

    pub const fn is_mousekey(code: u16) -> bool {
        page(code) == MOUSE_PAGE && low(code) >= MOUSE_MIN && low(code) <= MOUSE_MAX
    }
}

/// Named keycodes in the 16 bit keymap encoding.
pub mod kc {
    use super::key_range::{CONSUMER_PAGE, KEYBOARD_PAGE, MOUSE_PAGE, SYSTEM_PAGE};

    pub const fn key(usage: u8) -> u16 {
        KEYBOARD_PAGE | usage as u16
    }

    pub const fn consumer(usage: u16) -> u16 {
        CONSUMER_PAGE | (usage & 0x0fff)
    }

    pub const NO: u16 = key(0x00);
    pub const ROLL_OVER: u16 = key(0x01);

    pub const A: u16 = key(0x04);
    pub const B: u16 = key(0x05);
    pub const C: u16 = key(0x06);
    pub const D: u16 = key(0x07);
    pub const E: u16 = key(0x08);
    pub const F: u16 = key(0x09);
    pub const G: u16 = key(0x0a);
    pub const H: u16 = key(0x0b);
    pub const I: u16 = key(0x0c);
    pub const J: u16 = key(0x0d);
    pub const K: u16 = key(0x0e);
    pub const L: u16 = key(0x0f);
    pub const M: u16 = key(0x10);
    pub const N: u16 = key(0x11);
    pub const O: u16 = key(0x12);
    pub const P: u16 = key(0x13);
    pub const Q: u16 = key(0x14);
    pub const R: u16 = key(0x15);
    pub const S: u16 = key(0x16);
    pub const T: u16 = key(0x17);
    pub const U: u16 = key(0x18);
    pub const V: u16 = key(0x19);
    pub const W: u16 = key(0x1a);
    pub const X: u16 = key(0x1b);
    pub const Y: u16 = key(0x1c);
    pub const Z: u16 = key(0x1d);
    pub const N1: u16 = key(0x1e);
    pub const N2: u16 = key(0x1f);
    pub const N3: u16 = key(0x20);
    pub const N4: u16 = key(0x21);
    pub const N5: u16 = key(0x22);
    pub const N6: u16 = key(0x23);
    pub const N7: u16 = key(0x24);
    pub const N8: u16 = key(0x25);
    pub const N9: u16 = key(0x26);
    pub const N0: u16 = key(0x27);
    pub const ENTER: u16 = key(0x28);
    pub const ESCAPE: u16 = key(0x29);
    pub const BSPACE: u16 = key(0x2a);
    pub const TAB: u16 = key(0x2b);
    pub const SPACE: u16 = key(0x2c);
    pub const CAPSLOCK: u16 = key(0x39);
    pub const F1: u16 = key(0x3a);
    pub const F12: u16 = key(0x45);
    pub const RIGHT: u16 = key(0x4f);
    pub const LEFT: u16 = key(0x50);
    pub const DOWN: u16 = key(0x51);
    pub const UP: u16 = key(0x52);
    pub const NUMLOCK: u16 = key(0x53);

    pub const LCTRL: u16 = key(0xe0);
    pub const LSHIFT: u16 = key(0xe1);
    pub const LALT: u16 = key(0xe2);
    pub const LGUI: u16 = key(0xe3);
    pub const RCTRL: u16 = key(0xe4);
    pub const RSHIFT: u16 = key(0xe5);
    pub const RALT: u16 = key(0xe6);
    pub const RGUI: u16 = key(0xe7);

    pub const FN0: u16 = key(0xe8);
    pub const FN1: u16 = key(0xe9);
    pub const FN2: u16 = key(0xea);
    pub const FN3: u16 = key(0xeb);
    pub const FN4: u16 = key(0xec);
    pub const FN5: u16 = key(0xed);
    pub const FN6: u16 = key(0xee);
    pub const FN7: u16 = key(0xef);

    pub const SYSTEM_POWER: u16 = SYSTEM_PAGE | 0x81;
    pub const SYSTEM_SLEEP: u16 = SYSTEM_PAGE | 0x82;
    pub const SYSTEM_WAKE: u16 = SYSTEM_PAGE | 0x83;

    pub const AUDIO_MUTE: u16 = consumer(0x0e2);
    pub const AUDIO_VOL_UP: u16 = consumer(0x0e9);
    pub const AUDIO_VOL_DOWN: u16 = consumer(0x0ea);
    pub const MEDIA_NEXT_TRACK: u16 = consumer(0x0b5);
    pub const MEDIA_PREV_TRACK: u16 = consumer(0x0b6);
    pub const MEDIA_STOP: u16 = consumer(0x0b7);
    pub const MEDIA_PLAY_PAUSE: u16 = consumer(0x0cd);

    pub const MS_UP: u16 = MOUSE_PAGE | 0xf0;
    pub const MS_DOWN: u16 = MOUSE_PAGE | 0xf1;
    pub const MS_LEFT: u16 = MOUSE_PAGE | 0xf2;
    pub const MS_RIGHT: u16 = MOUSE_PAGE | 0xf3;
    pub const MS_BTN1: u16 = MOUSE_PAGE | 0xf4;
    pub const MS_BTN2: u16 = MOUSE_PAGE | 0xf5;
    pub const MS_BTN3: u16 = MOUSE_PAGE | 0xf6;
    pub const MS_BTN4: u16 = MOUSE_PAGE | 0xf7;
    pub const MS_BTN5: u16 = MOUSE_PAGE | 0xf8;
    pub const MS_WH_UP: u16 = MOUSE_PAGE | 0xf9;
    pub const MS_WH_DOWN: u16 = MOUSE_PAGE | 0xfa;
    pub const MS_WH_LEFT: u16 = MOUSE_PAGE | 0xfb;
    pub const MS_WH_RIGHT: u16 = MOUSE_PAGE | 0xfc;
}

use key_range::*;

/// A keymap value sorted into the report it contributes to.
///
/// The category is taken from the page bits alone, so every 16 bit value maps to exactly one
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Keycode {
    NoOp,
    /// Modifier bit for the report's modifier byte.
    Modifier(u8),
    /// Function-layer slot, `0..8`.
    Function(u8),
    /// Keyboard page usage.
    Normal(u8),
    /// Generic desktop system control usage; `0` when the code names no usage.
    System(u16),
    /// Consumer page usage.
    Consumer(u16),
    MouseKey(MouseKey),
    Unrecognized(u16),
}

impl Keycode {
    pub const fn classify(code: u16) -> Self {
        let low = low(code);
        match page(code) {
            KEYBOARD_PAGE => match low {
                0 => Self::NoOp,
                MODIFIER_MIN..=MODIFIER_MAX => Self::Modifier(1 << (low & 7)),
                FN_MIN..=FN_MAX => Self::Function(low - FN_MIN),
                _ => Self::Normal(low),
            },
            SYSTEM_PAGE => Self::System(system_usage(low)),
            _ if code & CONSUMER_MASK == CONSUMER_PAGE => {
                Self::Consumer(code & CONSUMER_USAGE_MASK)
            }
            MOUSE_PAGE => match MouseKey::from_low(low) {
                Some(mk) => Self::MouseKey(mk),
                None => Self::Unrecognized(code),
            },
            _ => Self::Unrecognized(code),
        }
    }

    /// Bit for the function-bit accumulator, or `0` for any other category.
    pub const fn fn_bit(&self) -> u8 {
        match self {
            Self::Function(i) => 1 << *i,
            _ => 0,
        }
    }
}

impl From<u16> for Keycode {
    fn from(code: u16) -> Self {
        Self::classify(code)
    }
}

const fn system_usage(low: u8) -> u16 {
    match low as u16 {
        SYSTEM_POWER_DOWN => SYSTEM_POWER_DOWN,
        SYSTEM_SLEEP => SYSTEM_SLEEP,
        SYSTEM_WAKE_UP => SYSTEM_WAKE_UP,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseKey {
    Up,
    Down,
    Left,
    Right,
    /// Button index, `0..5`.
    Button(u8),
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
}

impl MouseKey {
    pub const fn from_code(code: u16) -> Option<Self> {
        if page(code) == MOUSE_PAGE {
            Self::from_low(low(code))
        } else {
            None
        }
    }

    const fn from_low(low: u8) -> Option<Self> {
        Some(match low {
            0xf0 => Self::Up,
            0xf1 => Self::Down,
            0xf2 => Self::Left,
            0xf3 => Self::Right,
            MOUSE_BUTTON_MIN..=MOUSE_BUTTON_MAX => Self::Button(low - MOUSE_BUTTON_MIN),
            0xf9 => Self::WheelUp,
            0xfa => Self::WheelDown,
            0xfb => Self::WheelLeft,
            0xfc => Self::WheelRight,
            _ => return None,
        })
    }
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
