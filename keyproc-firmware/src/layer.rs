use keyproc_common::{keycodes::kc, FN_SLOTS};

use crate::debug;

/// Maps matrix positions to keycodes given the active layer.
pub trait LayerResolver {
    fn resolve(&self, row: usize, col: usize) -> u16;
    /// Update the active layer from this cycle's pressed function keys, one bit per slot.
    fn apply_function_bits(&mut self, bits: u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerError {
    LayerOutOfRange(u8),
    FunctionOutOfRange(u8),
}

/// Fixed keycode tables, one per layer, with function keys selecting the active layer.
///
/// While no function key is held the default layer is active. Otherwise the lowest held function
/// slot picks the layer configured for it with [Keymap::set_fn_layer].
pub struct Keymap<const LAYERS: usize, const ROWS: usize, const COLS: usize> {
    layers: [[[u16; COLS]; ROWS]; LAYERS],
    fn_layers: [u8; FN_SLOTS],
    default_layer: u8,
    current_layer: u8,
}

impl<const LAYERS: usize, const ROWS: usize, const COLS: usize> Keymap<LAYERS, ROWS, COLS> {
    pub const fn new(layers: [[[u16; COLS]; ROWS]; LAYERS]) -> Self {
        Self {
            layers,
            fn_layers: [0; FN_SLOTS],
            default_layer: 0,
            current_layer: 0,
        }
    }

    pub fn current_layer(&self) -> u8 {
        self.current_layer
    }

    pub fn default_layer(&self) -> u8 {
        self.default_layer
    }

    pub fn set_default_layer(&mut self, layer: u8) -> Result<(), LayerError> {
        self.check_layer(layer)?;
        if self.current_layer == self.default_layer {
            self.current_layer = layer;
        }
        self.default_layer = layer;
        Ok(())
    }

    pub fn set_fn_layer(&mut self, slot: u8, layer: u8) -> Result<(), LayerError> {
        self.check_layer(layer)?;
        let entry = self
            .fn_layers
            .get_mut(slot as usize)
            .ok_or(LayerError::FunctionOutOfRange(slot))?;
        *entry = layer;
        Ok(())
    }

    pub fn fn_layer(&self, slot: u8) -> Option<u8> {
        self.fn_layers.get(slot as usize).copied()
    }

    fn check_layer(&self, layer: u8) -> Result<(), LayerError> {
        if (layer as usize) < LAYERS {
            Ok(())
        } else {
            Err(LayerError::LayerOutOfRange(layer))
        }
    }
}

impl<const LAYERS: usize, const ROWS: usize, const COLS: usize> LayerResolver
    for Keymap<LAYERS, ROWS, COLS>
{
    fn resolve(&self, row: usize, col: usize) -> u16 {
        self.layers
            .get(self.current_layer as usize)
            .and_then(|layer| layer.get(row))
            .and_then(|row| row.get(col))
            .copied()
            .unwrap_or(kc::NO)
    }

    fn apply_function_bits(&mut self, bits: u8) {
        let layer = if bits == 0 {
            self.default_layer
        } else {
            self.fn_layers[bits.trailing_zeros() as usize]
        };

        if layer != self.current_layer {
            debug!("layer {} -> {} (fn bits {:#x})", self.current_layer, layer, bits);
            self.current_layer = layer;
        }
    }
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod test;
