/*!
# Tolerant Comparisons

Capacities and flows are floating point numbers. All flow algorithms compare them through a
[`ToleranceComparator`], so residual capacities below `epsilon` count as saturated.
*/

use std::cmp::Ordering;

use crate::edge::Weight;

/// Tolerance used by flow algorithms unless configured otherwise
pub const DEFAULT_EPSILON: Weight = 1e-9;

/// Compares capacities and flows up to an absolute tolerance.
///
/// Two values are considered equal if they differ by less than `epsilon`. Every capacity/flow
/// comparison of the flow algorithms goes through this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceComparator {
    epsilon: Weight,
}

impl Default for ToleranceComparator {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl ToleranceComparator {
    /// ** Panics if `epsilon` is not a positive finite number **
    pub fn new(epsilon: Weight) -> Self {
        assert!(
            epsilon.is_finite() && epsilon > 0.0,
            "tolerance must be positive, got {epsilon}"
        );
        Self { epsilon }
    }

    pub fn epsilon(&self) -> Weight {
        self.epsilon
    }

    /// Three-way comparison where values closer than `epsilon` are `Equal`
    pub fn compare(&self, a: Weight, b: Weight) -> Ordering {
        if (a - b).abs() < self.epsilon {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    pub fn eq(&self, a: Weight, b: Weight) -> bool {
        self.compare(a, b).is_eq()
    }

    pub fn lt(&self, a: Weight, b: Weight) -> bool {
        self.compare(a, b).is_lt()
    }

    pub fn gt(&self, a: Weight, b: Weight) -> bool {
        self.compare(a, b).is_gt()
    }

    pub fn is_zero(&self, a: Weight) -> bool {
        self.eq(a, 0.0)
    }

    /// Returns *true* if `a` is at least `epsilon`
    pub fn is_positive(&self, a: Weight) -> bool {
        self.gt(a, 0.0)
    }

    /// Returns the smaller of both values; ties favor `a`
    pub fn min(&self, a: Weight, b: Weight) -> Weight {
        if self.gt(a, b) { b } else { a }
    }
}
