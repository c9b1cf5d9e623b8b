use rand::Rng;

use courier_types::models::Contact;

/// Outcome of a pending connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// Decides how a pending contact request resolves.
pub trait AcceptancePolicy: Send + Sync {
    fn decide(&self, contact: &Contact) -> Decision;
}

/// Accepts with a fixed probability. Unseeded; outcomes are not reproducible.
#[derive(Debug, Clone, Copy)]
pub struct RandomAcceptance {
    probability: f64,
}

impl RandomAcceptance {
    pub const DEFAULT_PROBABILITY: f64 = 0.8;

    /// `probability` is clamped into `0.0..=1.0`; NaN is treated as zero.
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for RandomAcceptance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBABILITY)
    }
}

impl AcceptancePolicy for RandomAcceptance {
    fn decide(&self, _contact: &Contact) -> Decision {
        if rand::rng().random_bool(self.probability) {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }
}

/// Always returns the same decision.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub Decision);

impl AcceptancePolicy for FixedDecision {
    fn decide(&self, _contact: &Contact) -> Decision {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_types::models::ContactStatus;

    fn contact() -> Contact {
        Contact {
            name: "Bea".into(),
            phone: "222".into(),
            avatar_color: "bg-blue-500".into(),
            status: ContactStatus::Pending,
        }
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(RandomAcceptance::new(1.7).probability(), 1.0);
        assert_eq!(RandomAcceptance::new(-0.2).probability(), 0.0);
        assert_eq!(RandomAcceptance::new(f64::NAN).probability(), 0.0);
    }

    #[test]
    fn extreme_probabilities_are_deterministic() {
        let always = RandomAcceptance::new(1.0);
        let never = RandomAcceptance::new(0.0);
        for _ in 0..50 {
            assert_eq!(always.decide(&contact()), Decision::Accept);
            assert_eq!(never.decide(&contact()), Decision::Reject);
        }
    }

    #[test]
    fn fixed_decision_ignores_contact() {
        assert_eq!(FixedDecision(Decision::Reject).decide(&contact()), Decision::Reject);
    }
}
