use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActuationError {
    /// The drive system refused or failed to execute a command.
    #[error("drive failure: {0}")]
    Driver(String),

    #[error("actuator state lock poisoned")]
    Poisoned,

    #[error("actuator I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ActuationResult<T> = Result<T, ActuationError>;
