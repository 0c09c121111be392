//! `BehaviorSet`: the weighted rule list an agent evaluates each tick.

use std::sync::Arc;

use fl_core::{FlockConfig, weighted_sum};

use crate::{
    Alignment, BehaviorError, BehaviorResult, Cohesion, ObstacleAvoidance, RuleContext,
    RuleOutcome, Separation, Steering, SteeringRule, WallAvoidance,
};

/// An ordered list of `(rule, weight)` pairs.
///
/// Cloning is cheap; rules are shared behind `Arc`.
#[derive(Clone, Default)]
pub struct BehaviorSet {
    rules: Vec<(Arc<dyn SteeringRule>, f64)>,
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard flocking set: alignment, cohesion, separation and wall
    /// avoidance, plus obstacle avoidance when obstacles are configured.
    pub fn from_config(config: &FlockConfig) -> Self {
        let mut set = Self::new()
            .with(Alignment { range: config.alignment_range }, config.alignment_weight)
            .with(Cohesion { range: config.cohesion_range }, config.cohesion_weight)
            .with(Separation { range: config.separation_range }, config.separation_weight)
            .with(WallAvoidance::from_config(config), config.wall_avoidance_weight);

        if !config.obstacles.is_empty() {
            set.push(ObstacleAvoidance::from_config(config), config.obstacle_avoidance_weight);
        }
        set
    }

    /// Append a rule.
    pub fn push<R: SteeringRule>(&mut self, rule: R, weight: f64) {
        self.rules.push((Arc::new(rule), weight));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with<R: SteeringRule>(mut self, rule: R, weight: f64) -> Self {
        self.push(rule, weight);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(rule, _)| rule.name())
    }

    /// Evaluate every rule and combine the results as `Σ weight · force`.
    ///
    /// # Errors
    ///
    /// [`BehaviorError::NonFinite`] if any rule's force, or the combined
    /// force, is NaN or infinite.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> BehaviorResult<Steering> {
        let mut outcomes = Vec::with_capacity(self.rules.len());
        let mut forces = Vec::with_capacity(self.rules.len());
        let mut weights = Vec::with_capacity(self.rules.len());

        for (rule, weight) in &self.rules {
            let output = rule.evaluate(ctx);
            if !output.force.is_finite() {
                return Err(BehaviorError::NonFinite { rule: rule.name() });
            }
            forces.push(output.force);
            weights.push(*weight);
            outcomes.push(RuleOutcome { rule: rule.name(), weight: *weight, output });
        }

        let force = weighted_sum(&forces, &weights)?;
        if !force.is_finite() {
            return Err(BehaviorError::NonFinite { rule: "combined" });
        }
        Ok(Steering { force, outcomes })
    }
}

impl std::fmt::Debug for BehaviorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|(rule, weight)| (rule.name(), *weight)))
            .finish()
    }
}
