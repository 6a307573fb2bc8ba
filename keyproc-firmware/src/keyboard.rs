use embassy_time::{Duration, Ticker};
use keyproc_common::keycodes::{key_range::SYSTEM_POWER_DOWN, Keycode};

use crate::{
    command::CommandProcessor, config::Capabilities, debug, host::HostTransport, info,
    layer::LayerResolver, led::LedDriver, matrix::MatrixDriver, mousekey::MouseKeys,
};

/// Report state gathered while walking the matrix; reset every cycle.
#[derive(Debug, Default)]
struct CycleState {
    fn_bits: u8,
    system: u16,
    consumer: u16,
}

/// The per-scan keyboard loop. Each call to [Keyboard::run_cycle] turns one matrix scan into
/// reports for the host.
pub struct Keyboard<Mx, L, H, C, Ms, Ld>
where
    Mx: MatrixDriver,
    L: LayerResolver,
    H: HostTransport,
    C: CommandProcessor,
    Ms: MouseKeys,
    Ld: LedDriver,
{
    matrix: Mx,
    layers: L,
    host: H,
    command: C,
    mouse: Ms,
    leds: Ld,
    capabilities: Capabilities,
    last_leds: u8,
}

impl<Mx, L, H, C, Ms, Ld> Keyboard<Mx, L, H, C, Ms, Ld>
where
    Mx: MatrixDriver,
    L: LayerResolver,
    H: HostTransport,
    C: CommandProcessor,
    Ms: MouseKeys,
    Ld: LedDriver,
{
    pub fn new(
        matrix: Mx,
        layers: L,
        host: H,
        command: C,
        mouse: Ms,
        leds: Ld,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            matrix,
            layers,
            host,
            command,
            mouse,
            leds,
            capabilities,
            last_leds: 0,
        }
    }

    pub fn init(&mut self) {
        self.matrix.init();
        info!(
            "keyboard {}x{} matrix, {:?}",
            self.matrix.rows(),
            self.matrix.cols(),
            self.capabilities
        );
    }

    /// Scan cycles forever, one every `period`.
    pub async fn run(&mut self, period: Duration) -> ! {
        self.init();
        let mut ticker = Ticker::every(period);
        loop {
            self.run_cycle();
            ticker.next().await;
        }
    }

    /// Process one matrix scan.
    ///
    /// A ghosted matrix skips the cycle entirely. The keyboard report, along with the system and
    /// consumer codes, is only sent when the scan changed the matrix; mouse keys are flushed every
    /// cycle. A command processor that handles the cycle stops everything after the layer update.
    pub fn run_cycle(&mut self) {
        self.matrix.scan();
        let modified = self.matrix.is_modified();
        if modified && self.capabilities.debug_matrix {
            self.print_matrix();
        }

        if self.matrix.has_ghost() {
            debug!("matrix has ghost");
            return;
        }

        self.host.swap_report();
        self.host.clear_report();

        let mut cycle = CycleState::default();
        for row in 0..self.matrix.rows() {
            for col in 0..self.matrix.cols() {
                if self.matrix.is_on(row, col) {
                    let code = self.layers.resolve(row, col);
                    self.process_code(code, &mut cycle);
                }
            }
        }

        self.layers.apply_function_bits(cycle.fn_bits);

        if self.command.try_handle() {
            return;
        }

        if modified {
            self.host.send_report();
            if self.capabilities.extrakey {
                self.host.send_consumer(cycle.consumer);
                self.host.send_system(cycle.system);
            }
        }

        if self.capabilities.mousekey {
            self.mouse.flush(&mut self.host);
        }

        let leds = self.host.current_leds();
        if leds != self.last_leds {
            self.set_leds(leds);
        }
    }

    fn process_code(&mut self, code: u16, cycle: &mut CycleState) {
        let extrakey = self.capabilities.extrakey;
        match Keycode::classify(code) {
            Keycode::NoOp => {}
            Keycode::Modifier(bit) => self.host.add_modifier(bit),
            key @ Keycode::Function(_) => cycle.fn_bits |= key.fn_bit(),
            Keycode::Normal(usage) => self.host.add_key(usage),
            Keycode::System(usage) if extrakey => {
                if usage == 0 {
                    return;
                }
                if usage == SYSTEM_POWER_DOWN
                    && self.host.is_suspended()
                    && self.host.remote_wakeup_enabled()
                {
                    debug!("remote wakeup");
                    self.host.remote_wakeup();
                }
                cycle.system = usage;
            }
            Keycode::Consumer(usage) if extrakey => cycle.consumer = usage,
            Keycode::MouseKey(_) if self.capabilities.mousekey && self.mouse.is_mousekey(code) => {
                self.mouse.decode(code);
            }
            _ => debug!("ignore keycode {:#x}", code),
        }
    }

    fn print_matrix(&self) {
        for row in 0..self.matrix.rows() {
            let bits = (0..self.matrix.cols().min(64))
                .filter(|&col| self.matrix.is_on(row, col))
                .fold(0u64, |bits, col| bits | (1 << col));
            debug!("matrix row {}: {:#x}", row, bits);
        }
    }

    /// Apply `leds` to the LED driver now and remember it as the current state.
    pub fn set_leds(&mut self, leds: u8) {
        debug!("leds {:#x}", leds);
        self.leds.set(leds);
        self.last_leds = leds;
    }

    pub fn last_leds(&self) -> u8 {
        self.last_leds
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn matrix_mut(&mut self) -> &mut Mx {
        &mut self.matrix
    }

    pub fn layers(&self) -> &L {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut L {
        &mut self.layers
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn command_mut(&mut self) -> &mut C {
        &mut self.command
    }

    pub fn mouse(&self) -> &Ms {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut Ms {
        &mut self.mouse
    }
}

#[cfg(test)]
#[path = "keyboard_test.rs"]
mod test;
