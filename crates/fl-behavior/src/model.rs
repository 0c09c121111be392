//! The `SteeringRule` trait: the extension point for new behaviors.

use crate::{RuleContext, RuleOutput};

/// One flocking behavior.
///
/// Implementations look at a [`RuleContext`] and return a bounded steering
/// vector plus the number of contributors.  A rule with nothing to react to
/// returns [`RuleOutput::NONE`] rather than an error; the agent then simply
/// gets no push from that rule this tick.
///
/// # Thread safety
///
/// Each agent thread owns its own [`BehaviorSet`][crate::BehaviorSet], but
/// rules are `Send + Sync` so a set can be cloned from a shared template.
///
/// # Example
///
/// ```rust,ignore
/// /// Drift toward the arena's +x edge.
/// struct Drift;
///
/// impl SteeringRule for Drift {
///     fn name(&self) -> &'static str { "drift" }
///     fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutput {
///         RuleOutput::new(ctx.clamp(Vec2::new(1.0, 0.0)), 0)
///     }
/// }
/// ```
pub trait SteeringRule: Send + Sync + 'static {
    /// Short stable name used in logs and output columns.
    fn name(&self) -> &'static str;

    /// Evaluate the rule for one agent.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutput;
}
