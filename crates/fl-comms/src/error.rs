use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// A peer message that does not decode as `id,x,y,vx,vy`.
    #[error("malformed peer message: {0}")]
    Malformed(String),

    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Another endpoint panicked while holding the shared bus lock.
    #[error("shared bus lock poisoned")]
    Poisoned,
}

pub type ChannelResult<T> = Result<T, ChannelError>;
