use rand::Rng;
use rand_distr::{Distribution, Geometric, StandardGeometric};

use crate::utils::Probability;

/// A geometric distribution.
/// As the case for `p = 1/2` can be siginificantly sped up by using `StandardGeometric` instead of
/// `Geometric`, we abstract over both using an enum.
#[derive(Debug, Copy, Clone)]
pub enum GeometricDistribution {
    /// General geometric distribution
    General(Geometric),
    /// Geometric distribution for `p = 1/2`
    OneHalf(StandardGeometric),
    /// Degenerate distribution for `p = 0`: there is never a success
    Never,
}

impl Distribution<u64> for GeometricDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self {
            GeometricDistribution::General(distr) => distr.sample(rng),
            GeometricDistribution::OneHalf(distr) => distr.sample(rng),
            GeometricDistribution::Never => u64::MAX,
        }
    }
}

impl GeometricDistribution {
    /// Given a probability, returns a geometric distribution and *true* if the distribution is inversed:
    /// For `p > 0.5`, it is beneficial to invert (`1.0 - p`) the distribution and iterate over the
    /// non-successes in order to minimize draws from the distribution itself.
    /// ** Panics if `prob` is not a valid probability **
    pub fn from_prob_with_inv(prob: f64) -> (Self, bool) {
        assert!(prob.is_valid_probability());

        let (q, inv) = if prob > 0.5 {
            (1.0 - prob, true)
        } else {
            (prob, false)
        };

        let distr = if q == 0.5 {
            Self::OneHalf(StandardGeometric)
        } else {
            match Geometric::new(q) {
                Ok(distr) if q > 0.0 => Self::General(distr),
                _ => Self::Never,
            }
        };

        (distr, inv)
    }
}

/// A geometric jumper starts at `0` and a step size from a geometric distribution.
/// It keeps doing that until an optional stop value is reached.
///
/// Every value is thus reported independently with probability `p`, which is exactly what a
/// `G(n,p)` generator needs when all node pairs are encoded as integers.
#[derive(Debug, Copy, Clone)]
pub struct GeometricJumper {
    /// Probability of the geometric distribution
    prob: f64,
    /// Stop if this value is reached
    stop: Option<u64>,
}

impl GeometricJumper {
    /// Creates a new geometric jumper from a probability with no stop value
    /// ** Panics if `prob` is not a valid probability **
    pub fn new(prob: f64) -> Self {
        assert!(prob.is_valid_probability());

        Self { prob, stop: None }
    }

    /// Only values strictly below `stop` are reported
    pub fn stop_at(mut self, stop: u64) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Creates an iterator of geometric jumps starting at `0`
    pub fn iter<R: Rng>(self, rng: &mut R) -> GeometricJumperIter<'_, R> {
        let (distr, inv) = GeometricDistribution::from_prob_with_inv(self.prob);

        GeometricJumperIter {
            geom_distr: distr,
            rng,
            stop: self.stop.unwrap_or(u64::MAX),
            inv,
            cur: 0,
            next_inv: 0,
            skip_pending: false,
        }
    }
}

/// An iterator over geometric jumps starting at `0` with an optional stop value
#[derive(Debug)]
pub struct GeometricJumperIter<'a, R>
where
    R: Rng,
{
    geom_distr: GeometricDistribution,
    rng: &'a mut R,
    stop: u64,
    cur: u64,
    inv: bool,
    /// in inverted mode, all values in `cur..next_inv` are successes
    next_inv: u64,
    /// in inverted mode, the value `next_inv` is a failure and must be skipped
    skip_pending: bool,
}

impl<R> GeometricJumperIter<'_, R>
where
    R: Rng,
{
    /// Performs a geometric jump
    pub fn jump(&mut self) -> Option<u64> {
        loop {
            if self.cur >= self.stop {
                return None;
            }

            if self.cur < self.next_inv {
                self.cur += 1;
                return Some(self.cur - 1);
            }

            if self.skip_pending {
                self.skip_pending = false;
                self.cur = self.cur.saturating_add(1);
                continue;
            }

            let skip = self.rng.sample(self.geom_distr);

            if self.inv {
                // the next `skip` values are successes, the one after is not
                self.next_inv = self.cur.saturating_add(skip);
                self.skip_pending = true;
                continue;
            }

            self.cur = self.cur.saturating_add(skip);
            if self.cur >= self.stop {
                return None;
            }
            self.cur += 1;
            return Some(self.cur - 1);
        }
    }
}

impl<R> Iterator for GeometricJumperIter<'_, R>
where
    R: Rng,
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        self.jump()
    }
}
