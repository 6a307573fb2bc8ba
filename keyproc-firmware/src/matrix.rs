use embedded_hal::digital::{InputPin, OutputPin};

/// Source of the per-cycle key matrix snapshot.
pub trait MatrixDriver {
    fn init(&mut self) {}
    /// Refresh the snapshot. Everything else reads the result of the last scan.
    fn scan(&mut self);
    fn is_on(&self, row: usize, col: usize) -> bool;
    /// True if the last scan changed any cell.
    fn is_modified(&self) -> bool;
    fn has_ghost(&self) -> bool;
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
}

/// Pressed cells of a matrix; bit `c` of row `r` is cell (r, c).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMatrix<const ROWS: usize, const COLS: usize> {
    rows: [u32; ROWS],
}

impl<const ROWS: usize, const COLS: usize> Default for KeyMatrix<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLS: usize> KeyMatrix<ROWS, COLS> {
    const COLS_FIT: () = assert!(COLS <= 32, "at most 32 columns are supported");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::COLS_FIT;
        Self { rows: [0; ROWS] }
    }

    pub fn is_on(&self, row: usize, col: usize) -> bool {
        col < COLS && self.rows.get(row).is_some_and(|r| r & (1 << col) != 0)
    }

    /// Returns true if the cell changed.
    pub fn set(&mut self, row: usize, col: usize, down: bool) -> bool {
        let Some(bits) = self.rows.get_mut(row) else {
            return false;
        };
        if col >= COLS {
            return false;
        }
        let old = *bits;
        if down {
            *bits |= 1 << col;
        } else {
            *bits &= !(1 << col);
        }
        old != *bits
    }

    pub fn row(&self, row: usize) -> u32 {
        self.rows.get(row).copied().unwrap_or(0)
    }

    pub fn pressed_count(&self) -> usize {
        self.rows.iter().map(|r| r.count_ones() as usize).sum()
    }

    /// Without per-key diodes, three keys on the corners of a rectangle make the fourth corner
    /// read as pressed. Any two rows sharing two or more pressed columns are treated as ghosted.
    pub fn has_ghost(&self) -> bool {
        for (i, a) in self.rows.iter().enumerate() {
            if a & a.wrapping_sub(1) == 0 {
                continue;
            }
            for b in &self.rows[i + 1..] {
                let common = a & b;
                if common & common.wrapping_sub(1) != 0 {
                    return true;
                }
            }
        }
        false
    }
}

/// Matrix scanned by driving one row pin low at a time and reading the column pins; a low column
/// is a pressed key.
///
/// A change is only accepted once the raw scan has been stable for `debounce` further scans.
pub struct PinMatrix<I: InputPin, O: OutputPin, const ROWS: usize, const COLS: usize> {
    row_pins: [O; ROWS],
    col_pins: [I; COLS],
    raw: KeyMatrix<ROWS, COLS>,
    matrix: KeyMatrix<ROWS, COLS>,
    debounce: u8,
    settle: u8,
    modified: bool,
}

impl<I: InputPin, O: OutputPin, const ROWS: usize, const COLS: usize> PinMatrix<I, O, ROWS, COLS> {
    pub fn new(row_pins: [O; ROWS], col_pins: [I; COLS], debounce: u8) -> Self {
        Self {
            row_pins,
            col_pins,
            raw: KeyMatrix::new(),
            matrix: KeyMatrix::new(),
            debounce,
            settle: 0,
            modified: false,
        }
    }

    pub fn matrix(&self) -> &KeyMatrix<ROWS, COLS> {
        &self.matrix
    }

    fn read_raw(&mut self) -> KeyMatrix<ROWS, COLS> {
        let mut raw = KeyMatrix::new();
        for (row, op) in self.row_pins.iter_mut().enumerate() {
            let _ = op.set_low();
            for (col, ip) in self.col_pins.iter_mut().enumerate() {
                if ip.is_low().unwrap_or(false) {
                    raw.set(row, col, true);
                }
            }
            let _ = op.set_high();
        }
        raw
    }
}

impl<I: InputPin, O: OutputPin, const ROWS: usize, const COLS: usize> MatrixDriver
    for PinMatrix<I, O, ROWS, COLS>
{
    fn init(&mut self) {
        for op in self.row_pins.iter_mut() {
            let _ = op.set_high();
        }
        self.raw = KeyMatrix::new();
        self.matrix = KeyMatrix::new();
        self.settle = 0;
        self.modified = false;
    }

    fn scan(&mut self) {
        self.modified = false;

        let raw = self.read_raw();
        if raw != self.raw {
            self.raw = raw;
            self.settle = self.debounce;
        } else if self.settle > 0 {
            self.settle -= 1;
        }

        if self.settle == 0 && self.matrix != self.raw {
            self.matrix = self.raw;
            self.modified = true;
        }
    }

    fn is_on(&self, row: usize, col: usize) -> bool {
        self.matrix.is_on(row, col)
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn has_ghost(&self) -> bool {
        self.matrix.has_ghost()
    }

    fn rows(&self) -> usize {
        ROWS
    }

    fn cols(&self) -> usize {
        COLS
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod test;
