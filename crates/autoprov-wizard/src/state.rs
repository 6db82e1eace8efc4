//! Navigation state as an explicit transition table.

use autoprov_core::Step;
use tracing::debug;

/// The current step and the violations displayed for it.
///
/// Transitions are pure: each returns the next state and leaves `self`
/// untouched. Validation is supplied by the caller so the table stays
/// independent of any draft type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState<S: Step> {
    step: S,
    violations: Vec<String>,
}

impl<S: Step> Default for WizardState<S> {
    fn default() -> Self {
        Self {
            step: S::first(),
            violations: Vec::new(),
        }
    }
}

impl<S: Step> WizardState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> S {
        self.step
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Move forward if the current step's `violations` are empty.
    ///
    /// With violations the step stays put and they become the displayed list.
    /// On the last step a clean advance is a no-op.
    pub fn advance(&self, violations: Vec<String>) -> Self {
        if !violations.is_empty() {
            debug!(step = ?self.step, count = violations.len(), "advance blocked");
            return Self {
                step: self.step,
                violations,
            };
        }
        let step = self.step.next().unwrap_or(self.step);
        debug!(from = ?self.step, to = ?step, "advance");
        Self {
            step,
            violations: Vec::new(),
        }
    }

    /// Step back. Always clears the displayed violations.
    pub fn retreat(&self) -> Self {
        Self {
            step: self.step.prev().unwrap_or(self.step),
            violations: Vec::new(),
        }
    }

    /// Go straight to `step` without validating anything in between.
    pub fn jump(&self, step: S) -> Self {
        debug!(from = ?self.step, to = ?step, "jump");
        Self {
            step,
            violations: Vec::new(),
        }
    }

    /// Show `violations` without moving.
    pub fn blocked(&self, violations: Vec<String>) -> Self {
        Self {
            step: self.step,
            violations,
        }
    }

    pub fn reset() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoprov_core::DistanceSaleStep;

    type State = WizardState<DistanceSaleStep>;

    #[test]
    fn starts_on_first_step() {
        let s = State::new();
        assert_eq!(s.step(), DistanceSaleStep::Dealer);
        assert!(s.violations().is_empty());
    }

    #[test]
    fn blocked_advance_keeps_step() {
        let s = State::new().advance(vec!["Email is required".into()]);
        assert_eq!(s.step(), DistanceSaleStep::Dealer);
        assert_eq!(s.violations(), ["Email is required"]);
    }

    #[test]
    fn clean_advance_moves_and_clears() {
        let s = State::new()
            .advance(vec!["x".into()])
            .advance(Vec::new());
        assert_eq!(s.step(), DistanceSaleStep::Vehicle);
        assert!(s.violations().is_empty());
    }

    #[test]
    fn advance_clamps_at_last_step() {
        let s = State::new().jump(DistanceSaleStep::RefundPolicy).advance(Vec::new());
        assert_eq!(s.step(), DistanceSaleStep::RefundPolicy);
    }

    #[test]
    fn retreat_clears_violations() {
        let s = State::new()
            .jump(DistanceSaleStep::Terms)
            .advance(vec!["CRA terms must be confirmed as presented to the customer".into()])
            .retreat();
        assert_eq!(s.step(), DistanceSaleStep::PreSale);
        assert!(s.violations().is_empty());
    }

    #[test]
    fn retreat_from_first_step_stays() {
        let s = State::new().retreat();
        assert_eq!(s.step(), DistanceSaleStep::Dealer);
    }

    #[test]
    fn jump_skips_validation_and_clears() {
        let s = State::new()
            .advance(vec!["x".into()])
            .jump(DistanceSaleStep::Delivery);
        assert_eq!(s.step(), DistanceSaleStep::Delivery);
        assert!(s.violations().is_empty());
    }

    #[test]
    fn transitions_do_not_mutate() {
        let s = State::new();
        let _ = s.advance(Vec::new());
        assert_eq!(s, State::new());
    }
}
