use fl_core::{AgentId, Vec2};

/// "Where am I?" for one robot.
pub trait PositionSource: Send {
    /// Current position in arena metres, or `None` when no usable fix is
    /// available this tick.  The agent then keeps its previous position.
    fn get_position(&mut self, agent: AgentId) -> Option<Vec2>;

    /// `true` once the source can deliver positions.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<T: PositionSource + ?Sized> PositionSource for Box<T> {
    fn get_position(&mut self, agent: AgentId) -> Option<Vec2> {
        (**self).get_position(agent)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Always reports the same position.  Useful for stationary beacons and
/// tests.
#[derive(Copy, Clone, Debug)]
pub struct FixedPosition(pub Vec2);

impl PositionSource for FixedPosition {
    fn get_position(&mut self, _agent: AgentId) -> Option<Vec2> {
        Some(self.0)
    }
}
