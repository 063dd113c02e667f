//! Error types for the input method shim

use thiserror::Error;

/// Status returned by every shim operation.
///
/// The C surface maps each variant to a stable negative status code via
/// [`ImeError::code`]; success is `0`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImeError {
    #[error("invalid parameter")]
    InvalidParameter,

    #[error("necessary callback function is not set")]
    NoCallbackFunction,

    #[error("IME main loop is not running")]
    NotRunning,

    #[error("operation failed")]
    OperationFailed,

    #[error("permission denied")]
    PermissionDenied,

    /// Reserved: the platform status set includes an allocation failure
    /// code, but no shim path reports it since Rust allocation failures
    /// abort. Kept so the C status values stay stable.
    #[error("out of memory")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, ImeError>;

/// Status code for a successful call on the C surface.
pub const IME_ERROR_NONE: i32 = 0;

impl ImeError {
    /// Stable status code for the C surface.
    pub const fn code(self) -> i32 {
        match self {
            ImeError::InvalidParameter => -1,
            ImeError::NoCallbackFunction => -2,
            ImeError::NotRunning => -3,
            ImeError::OperationFailed => -4,
            ImeError::PermissionDenied => -5,
            ImeError::OutOfMemory => -6,
        }
    }
}
