use fl_behavior::BehaviorError;
use fl_core::Tick;
use fl_mobility::ActuationError;
use thiserror::Error;

/// Why a single tick failed.  Any of these ends the agent's run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("behavior evaluation failed: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("actuation failed: {0}")]
    Actuation(#[from] ActuationError),

    #[error("non-finite {what} at {tick}")]
    NonFinite { what: &'static str, tick: Tick },
}

pub type AgentResult<T> = Result<T, AgentError>;
