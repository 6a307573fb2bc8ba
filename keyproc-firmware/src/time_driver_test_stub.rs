extern crate std;

use core::{cell::Cell, task::Waker};
use embassy_time_driver::Driver;

/// Clock for tests. Time only moves when a test sets it; a timer that is waited on jumps the
/// clock straight to its deadline.
struct TestTimeDriver;

impl Driver for TestTimeDriver {
    fn now(&self) -> u64 {
        NOW.with(Cell::get)
    }

    fn schedule_wake(&self, at: u64, waker: &Waker) {
        NOW.with(|now| {
            if at > now.get() {
                now.set(at);
            }
        });
        waker.wake_by_ref();
    }
}

std::thread_local! {
    static NOW: Cell<u64> = const { Cell::new(0) };
}

embassy_time_driver::time_driver_impl!(static TIME_DRIVER: TestTimeDriver = TestTimeDriver);

/// Set the current time in microseconds for this thread.
pub fn set_time(micros: u64) {
    NOW.with(|now| now.set(micros));
}

pub fn set_millis(ms: u64) {
    set_time(ms * 1_000);
}
