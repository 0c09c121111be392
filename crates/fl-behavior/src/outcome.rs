//! Rule results: what each rule hands back and what the combined set reports.

use fl_core::Vec2;

/// The result of evaluating one rule for one agent on one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RuleOutput {
    /// Bounded steering vector.  Zero when nothing contributed.
    pub force: Vec2,

    /// Number of neighbors (or, for boundary rules, walls/obstacles) that
    /// contributed to `force`.
    pub contributors: usize,
}

impl RuleOutput {
    /// The "no contribution this tick" result.
    pub const NONE: RuleOutput = RuleOutput { force: Vec2::ZERO, contributors: 0 };

    #[inline]
    pub fn new(force: Vec2, contributors: usize) -> Self {
        Self { force, contributors }
    }
}

/// One rule's output tagged with its name and weight, for diagnostics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RuleOutcome {
    pub rule:   &'static str,
    pub weight: f64,
    pub output: RuleOutput,
}

/// The combined steering produced by a [`BehaviorSet`][crate::BehaviorSet].
#[derive(Clone, Debug, PartialEq)]
pub struct Steering {
    /// `Σ weight · rule.force`, rounded.
    pub force: Vec2,

    /// Per-rule results, in the order the rules were registered.
    pub outcomes: Vec<RuleOutcome>,
}

impl Steering {
    /// Look up a rule's outcome by name.
    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }
}
