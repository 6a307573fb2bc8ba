use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel, signal::Signal};

use crate::{
    report::{KeyboardReport, MouseReport, Report},
    warn,
};

/// The host side of the keyboard loop: owns the report buffers and sends them.
pub trait HostTransport {
    /// Swap the working keyboard report with the previously sent one.
    fn swap_report(&mut self);
    fn clear_report(&mut self);
    fn add_modifier(&mut self, bits: u8);
    fn add_key(&mut self, usage: u8);
    fn send_report(&mut self);
    fn send_system(&mut self, code: u16);
    fn send_consumer(&mut self, code: u16);
    fn send_mouse(&mut self, report: &MouseReport);
    /// LED mask last set by the host.
    fn current_leds(&self) -> u8;

    fn is_suspended(&self) -> bool {
        false
    }

    fn remote_wakeup_enabled(&self) -> bool {
        false
    }

    fn remote_wakeup(&mut self) {}
}

/// State written by the USB side and read by the keyboard loop.
pub struct HostState<M: RawMutex> {
    leds: AtomicU8,
    suspended: AtomicBool,
    remote_wakeup_enabled: AtomicBool,
    wakeup: Signal<M, ()>,
}

impl<M: RawMutex> Default for HostState<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> HostState<M> {
    pub const fn new() -> Self {
        Self {
            leds: AtomicU8::new(0),
            suspended: AtomicBool::new(false),
            remote_wakeup_enabled: AtomicBool::new(false),
            wakeup: Signal::new(),
        }
    }

    pub fn set_leds(&self, leds: u8) {
        self.leds.store(leds, Ordering::Relaxed);
    }

    pub fn leds(&self) -> u8 {
        self.leds.load(Ordering::Relaxed)
    }

    pub fn set_suspended(&self, suspended: bool) {
        self.suspended.store(suspended, Ordering::Relaxed);
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Relaxed)
    }

    pub fn set_remote_wakeup_enabled(&self, enabled: bool) {
        self.remote_wakeup_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn remote_wakeup_enabled(&self) -> bool {
        self.remote_wakeup_enabled.load(Ordering::Relaxed)
    }

    /// Resolves when the keyboard loop asks the host to wake up.
    pub async fn wait_wakeup_request(&self) {
        self.wakeup.wait().await
    }

    pub fn take_wakeup_request(&self) -> bool {
        self.wakeup.try_take().is_some()
    }

    fn request_wakeup(&self) {
        self.wakeup.signal(());
    }
}

pub struct ReportChannel<M: RawMutex, const N: usize>(Channel<M, Report, N>);
impl<M: RawMutex, const N: usize> Default for ReportChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
impl<M: RawMutex, const N: usize> ReportChannel<M, N> {
    pub const fn new() -> Self {
        Self(Channel::new())
    }

    pub async fn receive(&self) -> Report {
        self.0.receive().await
    }

    pub fn try_receive(&self) -> Option<Report> {
        self.0.try_receive().ok()
    }

    fn try_send(&self, report: Report) {
        if self.0.try_send(report).is_err() {
            warn!("report queue full; dropped {:?}", report);
        }
    }
}

/// [HostTransport] that double-buffers the keyboard report and queues every sent report on a
/// [ReportChannel] for the USB task.
pub struct ReportHost<'c, M: RawMutex, const N: usize> {
    channel: &'c ReportChannel<M, N>,
    state: &'c HostState<M>,
    reports: [KeyboardReport; 2],
    current: usize,
    last_system: u16,
    last_consumer: u16,
}

impl<'c, M: RawMutex, const N: usize> ReportHost<'c, M, N> {
    pub fn new(channel: &'c ReportChannel<M, N>, state: &'c HostState<M>) -> Self {
        Self {
            channel,
            state,
            reports: [KeyboardReport::new(); 2],
            current: 0,
            last_system: 0,
            last_consumer: 0,
        }
    }

    /// The report being built this cycle.
    pub fn report(&self) -> &KeyboardReport {
        &self.reports[self.current]
    }

    /// The report built in the cycle before the last swap.
    pub fn previous_report(&self) -> &KeyboardReport {
        &self.reports[self.current ^ 1]
    }

    fn report_mut(&mut self) -> &mut KeyboardReport {
        &mut self.reports[self.current]
    }
}

impl<M: RawMutex, const N: usize> HostTransport for ReportHost<'_, M, N> {
    fn swap_report(&mut self) {
        self.current ^= 1;
    }

    fn clear_report(&mut self) {
        self.report_mut().clear();
    }

    fn add_modifier(&mut self, bits: u8) {
        self.report_mut().add_modifier(bits);
    }

    fn add_key(&mut self, usage: u8) {
        self.report_mut().add_key(usage);
    }

    fn send_report(&mut self) {
        self.channel.try_send(Report::Keyboard(*self.report()));
    }

    fn send_system(&mut self, code: u16) {
        if code == self.last_system {
            return;
        }
        self.last_system = code;
        self.channel.try_send(Report::System(code));
    }

    fn send_consumer(&mut self, code: u16) {
        if code == self.last_consumer {
            return;
        }
        self.last_consumer = code;
        self.channel.try_send(Report::Consumer(code));
    }

    fn send_mouse(&mut self, report: &MouseReport) {
        self.channel.try_send(Report::Mouse(*report));
    }

    fn current_leds(&self) -> u8 {
        self.state.leds()
    }

    fn is_suspended(&self) -> bool {
        self.state.is_suspended()
    }

    fn remote_wakeup_enabled(&self) -> bool {
        self.state.remote_wakeup_enabled()
    }

    fn remote_wakeup(&mut self) {
        self.state.request_wakeup();
    }
}

#[cfg(test)]
#[path = "host_test.rs"]
mod test;
