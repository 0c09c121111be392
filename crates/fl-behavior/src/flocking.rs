//! The three neighbor-driven flocking rules.
//!
//! All three follow the same template: select neighbors strictly closer
//! than the rule's range, average one of their quantities, turn the average
//! into a steering vector, clamp it to the speed band.

use fl_core::{Vec2, distance};

use crate::{NeighborEntry, RuleContext, RuleOutput, SteeringRule};

/// Mean of `pick(n)` over neighbors strictly within `range` of `origin`,
/// together with the number of neighbors that contributed.
fn mean_within<F>(origin: Vec2, neighbors: &[NeighborEntry], range: f64, pick: F) -> Option<(Vec2, usize)>
where
    F: Fn(&NeighborEntry) -> Vec2,
{
    let (sum, count) = neighbors
        .iter()
        .filter(|n| distance(origin, n.position) < range)
        .fold((Vec2::ZERO, 0usize), |(sum, count), n| (sum + pick(n), count + 1));

    (count > 0).then(|| (sum / count as f64, count))
}

// ── Alignment ─────────────────────────────────────────────────────────────────

/// Steer toward the average heading of nearby neighbors.
#[derive(Copy, Clone, Debug)]
pub struct Alignment {
    pub range: f64,
}

impl SteeringRule for Alignment {
    fn name(&self) -> &'static str {
        "alignment"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutput {
        match mean_within(ctx.own.position, ctx.neighbors, self.range, |n| n.velocity) {
            Some((mean_velocity, count)) => {
                RuleOutput::new(ctx.clamp(mean_velocity - ctx.own.velocity), count)
            }
            None => RuleOutput::NONE,
        }
    }
}

// ── Cohesion ──────────────────────────────────────────────────────────────────

/// Steer toward the centre of mass of nearby neighbors.
#[derive(Copy, Clone, Debug)]
pub struct Cohesion {
    pub range: f64,
}

impl SteeringRule for Cohesion {
    fn name(&self) -> &'static str {
        "cohesion"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutput {
        match mean_within(ctx.own.position, ctx.neighbors, self.range, |n| n.position) {
            Some((centre, count)) => RuleOutput::new(ctx.clamp(centre - ctx.own.position), count),
            None => RuleOutput::NONE,
        }
    }
}

// ── Separation ────────────────────────────────────────────────────────────────

/// Steer away from the centre of mass of neighbors that are too close.
#[derive(Copy, Clone, Debug)]
pub struct Separation {
    pub range: f64,
}

impl SteeringRule for Separation {
    fn name(&self) -> &'static str {
        "separation"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutput {
        match mean_within(ctx.own.position, ctx.neighbors, self.range, |n| n.position) {
            Some((centre, count)) => RuleOutput::new(ctx.clamp(ctx.own.position - centre), count),
            None => RuleOutput::NONE,
        }
    }
}
