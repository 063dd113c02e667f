//! Platform entry shim for input method keyboards
//!
//! Sits between a keyboard application and the platform's input method
//! engine: the keyboard registers its callbacks, the shim gates every call
//! through the platform's privilege policy, runs the engine's event loop for
//! exactly one session, and marshals engine-native events into the
//! registered callbacks.
//!
//! The Rust surface is [`InputMethod`]; the matching C surface lives in
//! [`ffi`].

pub mod engine;
pub mod error;
pub mod ffi;
mod marshal;
pub mod preedit;
pub mod privilege;
pub mod registry;
pub mod session;
pub mod types;

pub use engine::{EngineCore, EngineListener, Geometry, WindowHandle, WindowSize};
pub use error::{ImeError, Result, IME_ERROR_NONE};
pub use privilege::{
    Authorization, Decision, PolicyRequest, PolicyService, PolicySession, PrivilegeGate,
    IME_PRIVILEGE,
};
pub use registry::EventKind;
pub use session::{ImeCallbacks, InputMethod};
pub use types::*;
