extern crate alloc;
extern crate std;

use alloc::vec;
use core::cell::RefCell;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug)]
pub struct PinError;
impl embedded_hal::digital::Error for PinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug)]
struct Board {
    switches: Vec<Vec<bool>>,
    driven: Vec<bool>,
    broken_cols: Vec<usize>,
    broken_rows: Vec<usize>,
}

/// A simulated switch matrix. Row pins are outputs, column pins read low while their row is
/// driven low and the switch between them is closed.
#[derive(Clone)]
pub struct Switches(Rc<RefCell<Board>>);
impl Switches {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self(Rc::new(RefCell::new(Board {
            switches: vec![vec![false; cols]; rows],
            driven: vec![false; rows],
            broken_cols: Vec::new(),
            broken_rows: Vec::new(),
        })))
    }

    pub fn down(&self, row: usize, col: usize) {
        self.0.borrow_mut().switches[row][col] = true;
    }

    pub fn up(&self, row: usize, col: usize) {
        self.0.borrow_mut().switches[row][col] = false;
    }

    /// Reads of this column fail from now on.
    pub fn break_col(&self, col: usize) {
        self.0.borrow_mut().broken_cols.push(col);
    }

    /// Driving this row fails from now on.
    pub fn break_row(&self, row: usize) {
        self.0.borrow_mut().broken_rows.push(row);
    }

    pub fn is_driven(&self, row: usize) -> bool {
        self.0.borrow().driven[row]
    }

    pub fn row_pins<const N: usize>(&self) -> [RowPin; N] {
        core::array::from_fn(|row| RowPin {
            board: self.clone(),
            row,
        })
    }

    pub fn col_pins<const N: usize>(&self) -> [ColPin; N] {
        core::array::from_fn(|col| ColPin {
            board: self.clone(),
            col,
        })
    }
}

pub struct RowPin {
    board: Switches,
    row: usize,
}
impl ErrorType for RowPin {
    type Error = PinError;
}
impl OutputPin for RowPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut board = self.board.0.borrow_mut();
        if board.broken_rows.contains(&self.row) {
            return Err(PinError);
        }
        board.driven[self.row] = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.board.0.borrow_mut().driven[self.row] = false;
        Ok(())
    }
}

pub struct ColPin {
    board: Switches,
    col: usize,
}
impl ErrorType for ColPin {
    type Error = PinError;
}
impl InputPin for ColPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let board = self.board.0.borrow();
        if board.broken_cols.contains(&self.col) {
            return Err(PinError);
        }
        Ok(board
            .driven
            .iter()
            .zip(board.switches.iter())
            .any(|(driven, row)| *driven && row[self.col]))
    }
}

/// Output pin that remembers its level.
#[derive(Clone, Default)]
pub struct Pin {
    high: Rc<RefCell<bool>>,
    broken: bool,
}
impl Pin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn is_set_high(&self) -> bool {
        *self.high.borrow()
    }
}
impl ErrorType for Pin {
    type Error = PinError;
}
impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}
impl Pin {
    fn set(&mut self, high: bool) -> Result<(), PinError> {
        if self.broken {
            return Err(PinError);
        }
        *self.high.borrow_mut() = high;
        Ok(())
    }
}
