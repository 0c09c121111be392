use fl_comms::ChannelError;
use fl_core::{AgentId, FlockError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration; fatal before any agent starts.
    #[error(transparent)]
    Config(#[from] FlockError),

    #[error("agent {0} appears more than once")]
    DuplicateAgent(AgentId),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("could not start thread for {agent}: {source}")]
    Spawn {
        agent:  AgentId,
        #[source]
        source: std::io::Error,
    },

    /// The agent thread died outside the guarded tick, observer and stop
    /// paths, e.g. in a readiness check.
    #[error("agent {0} thread panicked")]
    AgentPanicked(AgentId),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

pub type SimResult<T> = Result<T, SimError>;
