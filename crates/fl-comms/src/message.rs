//! Peer broadcasts and their text wire form.
//!
//! On the wire a broadcast is one line of five comma-separated fields:
//!
//! ```text
//! 3,1.25,0.8,0.3,-0.02
//! ```
//!
//! id (bare integer), x, y, vx, vy.  Decoding is strict: any other field
//! count, an unparsable field, or a non-finite number rejects the message.

use fl_core::{AgentId, Vec2};

use crate::{ChannelError, ChannelResult};

const FIELD_COUNT: usize = 5;

/// One robot's self-reported state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PeerState {
    pub id:       AgentId,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl PeerState {
    #[inline]
    pub fn new(id: AgentId, position: Vec2, velocity: Vec2) -> Self {
        Self { id, position, velocity }
    }
}

/// Render `state` in wire form.
pub fn encode(state: &PeerState) -> String {
    format!(
        "{},{},{},{},{}",
        state.id.0, state.position.x, state.position.y, state.velocity.x, state.velocity.y
    )
}

/// Parse one wire-form message.
///
/// # Errors
///
/// [`ChannelError::Malformed`] for anything that is not exactly five valid
/// fields.
pub fn decode(line: &str) -> ChannelResult<PeerState> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ChannelError::Malformed(format!(
            "expected {FIELD_COUNT} fields, got {}",
            fields.len()
        )));
    }

    let id = fields[0]
        .parse::<AgentId>()
        .map_err(|e| ChannelError::Malformed(format!("id `{}`: {e}", fields[0].trim())))?;

    let mut numbers = [0.0f64; FIELD_COUNT - 1];
    for (slot, field) in numbers.iter_mut().zip(&fields[1..]) {
        let value = field
            .trim()
            .parse::<f64>()
            .map_err(|e| ChannelError::Malformed(format!("field `{}`: {e}", field.trim())))?;
        if !value.is_finite() {
            return Err(ChannelError::Malformed(format!("non-finite field `{}`", field.trim())));
        }
        *slot = value;
    }

    let [x, y, vx, vy] = numbers;
    Ok(PeerState::new(id, Vec2::new(x, y), Vec2::new(vx, vy)))
}
