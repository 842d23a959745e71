use thiserror::Error;

/// Kernel error type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("no such device")]
    NoDevice,

    #[error("invalid argument")]
    InvalidArgument,

    #[error("device or resource busy")]
    Busy,

    #[error("operation not permitted")]
    PermissionDenied,

    #[error("operation not supported")]
    NotSupported,

    #[error("no such entry")]
    NotFound,

    #[error("module already loaded")]
    AlreadyLoaded,

    #[error("I/O error")]
    Io,
}

impl KernelError {
    /// Negative Linux errno for this error.
    pub const fn errno(self) -> i32 {
        match self {
            KernelError::PermissionDenied => -1,
            KernelError::NotFound => -2,
            KernelError::Io => -5,
            KernelError::Busy => -16,
            KernelError::AlreadyLoaded => -17,
            KernelError::NoDevice => -19,
            KernelError::InvalidArgument => -22,
            KernelError::NotSupported => -524,
        }
    }
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
