/// Hook that may take over a whole scan cycle, e.g. for a magic key combination.
pub trait CommandProcessor {
    /// Returns true when the cycle was fully handled and the report must not be sent.
    fn try_handle(&mut self) -> bool;
}

/// Never intercepts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCommand;

impl CommandProcessor for NoCommand {
    fn try_handle(&mut self) -> bool {
        false
    }
}

impl<F: FnMut() -> bool> CommandProcessor for F {
    fn try_handle(&mut self) -> bool {
        self()
    }
}
