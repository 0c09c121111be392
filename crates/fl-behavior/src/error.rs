use fl_core::FlockError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    /// Weight/vector bookkeeping went wrong while combining rules.
    #[error(transparent)]
    Vector(#[from] FlockError),

    #[error("rule `{rule}` produced a non-finite steering vector")]
    NonFinite { rule: &'static str },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
