use heapless::Vec;

pub const KEY_BITS_SIZE: usize = 32;
pub const BOOT_KEYS: usize = 6;
pub const MAX_REPORT_LEN: usize = 2 + KEY_BITS_SIZE;

pub const KEYBOARD_ID: u8 = 1;
pub const MOUSE_ID: u8 = 2;
pub const SYSTEM_ID: u8 = 3;
pub const CONSUMER_ID: u8 = 4;

const ERROR_ROLL_OVER: u8 = 0x01;

/// Keyboard input report. Keys are kept as a bitmap over the whole keyboard usage page so any
/// number of keys can be down at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifiers: u8,
    keys: [u8; KEY_BITS_SIZE],
}

impl Default for KeyboardReport {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardReport {
    pub const fn new() -> Self {
        Self {
            modifiers: 0,
            keys: [0; KEY_BITS_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.modifiers = 0;
        self.keys = [0; KEY_BITS_SIZE];
    }

    pub fn add_modifier(&mut self, bits: u8) {
        self.modifiers |= bits;
    }

    /// Returns false if `usage` was already present.
    pub fn add_key(&mut self, usage: u8) -> bool {
        add_bit(&mut self.keys, usage)
    }

    /// Returns false if `usage` was not present.
    pub fn del_key(&mut self, usage: u8) -> bool {
        del_bit(&mut self.keys, usage)
    }

    pub fn has_key(&self, usage: u8) -> bool {
        self.keys[(usage >> 3) as usize] & (1 << (usage & 7)) != 0
    }

    /// Pressed usages in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|u| self.has_key(*u))
    }

    pub fn key_count(&self) -> usize {
        self.keys.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers == 0 && self.keys.iter().all(|b| *b == 0)
    }

    /// The six key slots of a boot protocol report. More than six keys fills every slot with
    /// `ErrorRollOver`.
    pub fn boot_keys(&self) -> Vec<u8, BOOT_KEYS> {
        let mut slots = Vec::new();
        for usage in self.keys() {
            if slots.push(usage).is_err() {
                slots.clear();
                while slots.push(ERROR_ROLL_OVER).is_ok() {}
                break;
            }
        }
        slots
    }

    /// `[report id, modifiers, key bitmap...]`
    pub fn encode(&self, buf: &mut [u8]) -> usize {
        buf[0] = KEYBOARD_ID;
        buf[1] = self.modifiers;
        buf[2..2 + KEY_BITS_SIZE].copy_from_slice(&self.keys);
        2 + KEY_BITS_SIZE
    }

    /// `[modifiers, reserved, key slots...]` without a report id.
    pub fn encode_boot(&self, buf: &mut [u8]) -> usize {
        buf[..2 + BOOT_KEYS].fill(0);
        buf[0] = self.modifiers;
        for (slot, usage) in buf[2..].iter_mut().zip(self.boot_keys()) {
            *slot = usage;
        }
        2 + BOOT_KEYS
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
    pub pan: i8,
}

impl MouseReport {
    pub fn has_motion(&self) -> bool {
        self.x != 0 || self.y != 0 || self.wheel != 0 || self.pan != 0
    }

    pub fn encode(&self, buf: &mut [u8]) -> usize {
        buf[..6].copy_from_slice(&[
            MOUSE_ID,
            self.buttons,
            self.x as u8,
            self.y as u8,
            self.wheel as u8,
            self.pan as u8,
        ]);
        6
    }
}

/// A report queued for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
    System(u16),
    Consumer(u16),
}

impl Report {
    /// Writes the wire format of the report into `buf` and returns its length.
    pub fn encode(&self, buf: &mut [u8; MAX_REPORT_LEN]) -> usize {
        match self {
            Report::Keyboard(report) => report.encode(buf),
            Report::Mouse(report) => report.encode(buf),
            Report::System(code) => encode_u16(buf, SYSTEM_ID, *code),
            Report::Consumer(code) => encode_u16(buf, CONSUMER_ID, *code),
        }
    }
}

fn encode_u16(buf: &mut [u8], id: u8, code: u16) -> usize {
    buf[0] = id;
    buf[1..3].copy_from_slice(&code.to_le_bytes());
    3
}

fn add_bit(bits: &mut [u8], usage: u8) -> bool {
    let i = (usage >> 3) as usize;
    let bp = 1 << (usage & 7);
    let old = bits[i];
    bits[i] |= bp;
    old & bp == 0
}

fn del_bit(bits: &mut [u8], usage: u8) -> bool {
    let i = (usage >> 3) as usize;
    let bp = 1 << (usage & 7);
    let old = bits[i];
    bits[i] &= !bp;
    old & bp != 0
}

#[cfg(test)]
#[path = "report_test.rs"]
mod test;
