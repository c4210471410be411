//! Discrete probability distributions: validation and weighted sampling.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::{PlanError, Result};
use crate::random::RandomSource;

/// Allowed slack when checking that probabilities sum to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Mapping from outcome to probability.
///
/// Iteration follows insertion order, which makes sampling deterministic for a
/// given sequence of draws. Equality ignores order.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<K: Hash + Eq> {
    weights: IndexMap<K, f64>,
}

impl<K: Hash + Eq> Default for Distribution<K> {
    fn default() -> Self {
        Self {
            weights: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> FromIterator<(K, f64)> for Distribution<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

impl<K: Hash + Eq + fmt::Debug> Distribution<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probability of `outcome`, returning the previous value.
    pub fn insert(&mut self, outcome: K, probability: f64) -> Option<f64> {
        self.weights.insert(outcome, probability)
    }

    pub fn probability(&self, outcome: &K) -> Option<f64> {
        self.weights.get(outcome).copied()
    }

    pub fn contains(&self, outcome: &K) -> bool {
        self.weights.contains_key(outcome)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.weights.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.weights.iter().map(|(k, p)| (k, *p))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all probabilities.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Check range and sum, using the distribution's own keys as the domain.
    pub fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(PlanError::InvalidDistribution(
                "distribution has no outcomes".into(),
            ));
        }
        for (outcome, p) in &self.weights {
            if !p.is_finite() || !(0.0..=1.0).contains(p) {
                return Err(PlanError::InvalidDistribution(format!(
                    "probability {p} for {outcome:?} is outside [0, 1]"
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(PlanError::InvalidDistribution(format!(
                "probabilities sum to {total}, expected 1"
            )));
        }
        Ok(())
    }

    /// Check that the keys are exactly `domain`, then range and sum.
    pub fn validate_over<'a, I>(&self, domain: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let domain: HashSet<&K> = domain.into_iter().collect();
        if let Some(member) = domain.iter().find(|m| !self.weights.contains_key(**m)) {
            return Err(PlanError::InvalidDistribution(format!(
                "outcome {member:?} is missing from the distribution"
            )));
        }
        if domain.len() != self.weights.len() {
            return Err(PlanError::InvalidDistribution(format!(
                "distribution has {} outcomes but the domain has {}",
                self.weights.len(),
                domain.len()
            )));
        }
        self.validate()
    }

    /// Draw one outcome.
    ///
    /// Entries are walked in insertion order until the cumulative mass reaches
    /// the draw. Zero-mass entries are never returned.
    pub fn sample(&self, source: &mut dyn RandomSource) -> Result<&K> {
        let draw = source.next_unit();
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (outcome, p) in &self.weights {
            if *p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_positive = Some(outcome);
            if cumulative >= draw {
                return Ok(outcome);
            }
        }
        // Rounding can leave the cumulative mass a hair under the draw.
        match last_positive {
            Some(outcome) if (cumulative - 1.0).abs() <= PROBABILITY_TOLERANCE => Ok(outcome),
            _ => Err(PlanError::InvalidDistribution(format!(
                "no outcome selected for draw {draw}; mass sums to {cumulative}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedDraws, SeededSource};
    use proptest::prelude::*;

    fn abc(a: f64, b: f64, c: f64) -> Distribution<char> {
        [('a', a), ('b', b), ('c', c)].into_iter().collect()
    }

    #[test]
    fn accepts_proper_distribution() {
        assert!(abc(0.2, 0.3, 0.5).validate().is_ok());
        assert!(abc(0.2, 0.3, 0.5).validate_over(&['c', 'b', 'a']).is_ok());
    }

    #[test]
    fn rejects_missing_and_foreign_outcomes() {
        let dist = abc(0.2, 0.3, 0.5);
        let err = dist.validate_over(&['a', 'b', 'd']).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDistribution(_)));

        let err = dist.validate_over(&['a', 'b']).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDistribution(_)));
    }

    #[test]
    fn repeated_domain_members_do_not_hide_foreign_outcomes() {
        let dist: Distribution<char> = [('a', 0.5), ('b', 0.5)].into_iter().collect();
        let err = dist.validate_over(&['a', 'a']).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDistribution(_)));
        assert!(dist.validate_over(&['b', 'a', 'b']).is_ok());
    }

    #[test]
    fn rejects_out_of_range_probabilities() {
        assert!(abc(-0.1, 0.6, 0.5).validate().is_err());
        assert!(abc(f64::NAN, 0.5, 0.5).validate().is_err());
        assert!(abc(1.5, -0.25, -0.25).validate().is_err());
    }

    #[test]
    fn rejects_empty_distribution() {
        assert!(Distribution::<char>::new().validate().is_err());
    }

    #[test]
    fn tolerates_rounding_error() {
        let third = 1.0 / 3.0;
        assert!(abc(third, third, third).validate().is_ok());
    }

    #[test]
    fn sampling_follows_insertion_order() {
        let dist = abc(0.2, 0.3, 0.5);
        let mut draws = FixedDraws::new(vec![0.0, 0.19, 0.21, 0.5, 0.51, 0.99]);
        let picks: Vec<char> = (0..6).map(|_| *dist.sample(&mut draws).unwrap()).collect();
        assert_eq!(picks, vec!['a', 'a', 'b', 'b', 'c', 'c']);
    }

    #[test]
    fn sampling_skips_zero_mass() {
        let dist = abc(0.0, 1.0, 0.0);
        let mut draws = FixedDraws::constant(0.0);
        assert_eq!(*dist.sample(&mut draws).unwrap(), 'b');
    }

    #[test]
    fn sampling_fails_when_mass_is_short() {
        let dist = abc(0.1, 0.1, 0.1);
        let mut draws = FixedDraws::constant(0.9);
        let err = dist.sample(&mut draws).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDistribution(_)));
    }

    #[test]
    fn sampling_frequencies_track_weights() {
        let dist = abc(0.2, 0.3, 0.5);
        let mut source = SeededSource::from_seed(11);
        let n = 20_000;
        let hits = (0..n)
            .filter(|_| *dist.sample(&mut source).unwrap() == 'c')
            .count();
        let freq = hits as f64 / n as f64;
        assert!((freq - 0.5).abs() < 0.02, "frequency was {freq}");
    }

    #[test]
    fn equality_ignores_order() {
        let a = abc(0.2, 0.3, 0.5);
        let b: Distribution<char> = [('c', 0.5), ('a', 0.2), ('b', 0.3)].into_iter().collect();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn off_by_more_than_tolerance_is_rejected(
            a in 0.0f64..0.5,
            b in 0.0f64..0.5,
            offset in prop_oneof![-0.5f64..-1e-5, 1e-5f64..0.5],
        ) {
            let c = 1.0 - a - b + offset;
            prop_assume!((0.0..=1.0).contains(&c));
            prop_assert!(abc(a, b, c).validate().is_err());
        }

        #[test]
        fn normalized_weights_validate_and_sample(
            weights in prop::collection::vec(0.01f64..10.0, 1..12),
            draw in 0.0f64..1.0,
        ) {
            let total: f64 = weights.iter().sum();
            let dist: Distribution<usize> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (i, w / total))
                .collect();
            prop_assert!(dist.validate().is_ok());
            let mut draws = FixedDraws::constant(draw);
            prop_assert!(dist.sample(&mut draws).is_ok());
        }
    }
}
