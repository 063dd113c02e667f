//! Key codes and modifier masks delivered to the key-event callback
//!
//! Only a handful of well-known codes are named here; the full platform key
//! table lives with the engine, and the shim treats codes as opaque values.

use bitflags::bitflags;

/// A key symbol as reported by the engine.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(0xFF08);
    pub const TAB: KeyCode = KeyCode(0xFF09);
    pub const RETURN: KeyCode = KeyCode(0xFF0D);
    pub const ESCAPE: KeyCode = KeyCode(0xFF1B);
    pub const DELETE: KeyCode = KeyCode(0xFFFF);
    pub const HOME: KeyCode = KeyCode(0xFF50);
    pub const LEFT: KeyCode = KeyCode(0xFF51);
    pub const UP: KeyCode = KeyCode(0xFF52);
    pub const RIGHT: KeyCode = KeyCode(0xFF53);
    pub const DOWN: KeyCode = KeyCode(0xFF54);
    pub const SPACE: KeyCode = KeyCode(0x020);

    pub fn from_raw(raw: u32) -> Self {
        KeyCode(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

bitflags! {
    /// Modifier key state attached to a key event.
    ///
    /// An empty mask means a plain key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyMask: u32 {
        const SHIFT = 1 << 0;
        const CAPSLOCK = 1 << 1;
        const CONTROL = 1 << 2;
        const ALT = 1 << 3;
        const META = 1 << 4;
        const WIN = 1 << 5;
        const HYPER = 1 << 6;
        const NUMLOCK = 1 << 7;
        const SCROLLOCK = 1 << 8;
        const MOD5 = 1 << 9;
        const RELEASED = 1 << 15;
    }
}
