/// Optional features of the keyboard cycle, chosen when the keyboard is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// System and consumer control keys.
    pub extrakey: bool,
    pub mousekey: bool,
    /// Log the matrix whenever a scan changes it.
    pub debug_matrix: bool,
}

impl Capabilities {
    pub const FULL: Self = Self {
        extrakey: true,
        mousekey: true,
        debug_matrix: false,
    };

    pub const BASIC: Self = Self {
        extrakey: false,
        mousekey: false,
        debug_matrix: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::FULL
    }
}
