//! Public vocabulary shared between the shim and the hosting keyboard

pub mod attributes;
pub mod context;
pub mod device;
pub mod keys;

pub use attributes::*;
pub use context::*;
pub use device::*;
pub use keys::*;
