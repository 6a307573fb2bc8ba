extern crate alloc;
extern crate std;

use alloc::{collections::BTreeSet, rc::Rc, vec, vec::Vec};
use core::cell::RefCell;

use keyproc_common::keycodes::{kc, key_range};

use crate::{
    command::CommandProcessor, host::HostTransport, layer::LayerResolver, led::LedDriver,
    matrix::MatrixDriver, mousekey::MouseKeys, report::MouseReport,
};

/// Every collaborator call of interest, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    MatrixInit,
    Scan,
    SwapReport,
    ClearReport,
    AddModifier(u8),
    AddKey(u8),
    SendReport { modifiers: u8, keys: Vec<u8> },
    SendSystem(u16),
    SendConsumer(u16),
    SendMouse(MouseReport),
    RemoteWakeup,
    FunctionBits(u8),
    Command,
    MouseDecode(u16),
    MouseFlush,
    SetLeds(u8),
}

#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);
impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    /// Returns the calls made so far and empties the log.
    pub fn take(&self) -> Vec<Call> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }
}

pub struct FakeMatrix {
    log: CallLog,
    cells: Vec<Vec<bool>>,
    pub modified: bool,
    pub ghost: bool,
}
impl FakeMatrix {
    pub fn new(log: &CallLog, rows: usize, cols: usize) -> Self {
        Self {
            log: log.clone(),
            cells: vec![vec![false; cols]; rows],
            modified: true,
            ghost: false,
        }
    }

    pub fn press(&mut self, row: usize, col: usize) {
        self.cells[row][col] = true;
    }

    pub fn release(&mut self, row: usize, col: usize) {
        self.cells[row][col] = false;
    }
}
impl MatrixDriver for FakeMatrix {
    fn init(&mut self) {
        self.log.push(Call::MatrixInit);
    }

    fn scan(&mut self) {
        self.log.push(Call::Scan);
    }

    fn is_on(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn has_ghost(&self) -> bool {
        self.ghost
    }

    fn rows(&self) -> usize {
        self.cells.len()
    }

    fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }
}

pub struct FakeLayers {
    log: CallLog,
    codes: Vec<Vec<u16>>,
}
impl FakeLayers {
    pub fn new(log: &CallLog, rows: usize, cols: usize) -> Self {
        Self {
            log: log.clone(),
            codes: vec![vec![kc::NO; cols]; rows],
        }
    }

    pub fn set(&mut self, row: usize, col: usize, code: u16) {
        self.codes[row][col] = code;
    }
}
impl LayerResolver for FakeLayers {
    fn resolve(&self, row: usize, col: usize) -> u16 {
        self.codes[row][col]
    }

    fn apply_function_bits(&mut self, bits: u8) {
        self.log.push(Call::FunctionBits(bits));
    }
}

/// Host that keeps one working report and records what is sent.
pub struct RecordingHost {
    log: CallLog,
    modifiers: u8,
    keys: BTreeSet<u8>,
    pub leds: u8,
    pub suspended: bool,
    pub remote_wakeup_enabled: bool,
}
impl RecordingHost {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            modifiers: 0,
            keys: BTreeSet::new(),
            leds: 0,
            suspended: false,
            remote_wakeup_enabled: false,
        }
    }
}
impl HostTransport for RecordingHost {
    fn swap_report(&mut self) {
        self.log.push(Call::SwapReport);
    }

    fn clear_report(&mut self) {
        self.modifiers = 0;
        self.keys.clear();
        self.log.push(Call::ClearReport);
    }

    fn add_modifier(&mut self, bits: u8) {
        self.modifiers |= bits;
        self.log.push(Call::AddModifier(bits));
    }

    fn add_key(&mut self, usage: u8) {
        self.keys.insert(usage);
        self.log.push(Call::AddKey(usage));
    }

    fn send_report(&mut self) {
        self.log.push(Call::SendReport {
            modifiers: self.modifiers,
            keys: self.keys.iter().copied().collect(),
        });
    }

    fn send_system(&mut self, code: u16) {
        self.log.push(Call::SendSystem(code));
    }

    fn send_consumer(&mut self, code: u16) {
        self.log.push(Call::SendConsumer(code));
    }

    fn send_mouse(&mut self, report: &MouseReport) {
        self.log.push(Call::SendMouse(*report));
    }

    fn current_leds(&self) -> u8 {
        self.leds
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn remote_wakeup_enabled(&self) -> bool {
        self.remote_wakeup_enabled
    }

    fn remote_wakeup(&mut self) {
        self.log.push(Call::RemoteWakeup);
    }
}

pub struct FakeCommand {
    log: CallLog,
    pub handle: bool,
}
impl FakeCommand {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            handle: false,
        }
    }
}
impl CommandProcessor for FakeCommand {
    fn try_handle(&mut self) -> bool {
        self.log.push(Call::Command);
        self.handle
    }
}

pub struct FakeMouse {
    log: CallLog,
}
impl FakeMouse {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}
impl MouseKeys for FakeMouse {
    fn is_mousekey(&self, code: u16) -> bool {
        key_range::is_mousekey(code)
    }

    fn decode(&mut self, code: u16) {
        self.log.push(Call::MouseDecode(code));
    }

    fn flush<H: HostTransport>(&mut self, _host: &mut H) {
        self.log.push(Call::MouseFlush);
    }
}

pub struct FakeLeds {
    log: CallLog,
}
impl FakeLeds {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}
impl LedDriver for FakeLeds {
    fn set(&mut self, mask: u8) {
        self.log.push(Call::SetLeds(mask));
    }
}
