use crate::Error;

/// Where on the rank domain the error budget is spent.
///
/// The summary tolerates a rank error of `f(r, n)` for an entry of rank `r`
/// after `n` observations. The three variants differ only in `f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde_support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Bias {
    /// `f(r, n) = 2εr` — the absolute error tightens toward rank 0, making
    /// low quantiles the accurate ones.
    Low,
    /// `f(r, n) = 2ε(n - r)` — the absolute error tightens toward rank `n`,
    /// making high quantiles the accurate ones.
    High,
    /// `f(r, n) = 2εn` — a constant budget over the whole rank domain.
    Uniform,
}

/// The rank-error invariant of a summary: a bias variant, the error
/// tolerance ε and the derived compression period `floor(1/(2ε))`.
///
/// Immutable once constructed; insert, compress and query all consult the
/// same invariant for the lifetime of the summary.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde_support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Invariant {
    bias: Bias,
    error: f64,
    period: usize,
}

impl Invariant {
    /// Derive an invariant from a bias variant and an error tolerance.
    ///
    /// `error` must lie in `(0.0, 0.5)`, which guarantees a compression
    /// period of at least one insertion. Everything outside that interval,
    /// NaN included, is rejected here rather than surfacing later as a
    /// modulo-by-zero at insert time.
    pub fn new(bias: Bias, error: f64) -> Result<Invariant, Error> {
        if !(error > 0.0 && error < 0.5) {
            return Err(Error::InvalidEpsilon(error));
        }
        let period = (1.0 / (2.0 * error)).floor() as usize;
        debug_assert!(period >= 1);
        Ok(Invariant {
            bias,
            error,
            period,
        })
    }

    /// The allowed rank error `f(r, n)` at rank `r` with `n` observations.
    pub fn bound(&self, r: f64, n: usize) -> f64 {
        match self.bias {
            Bias::Low => 2.0 * self.error * r,
            Bias::High => 2.0 * self.error * ((n as f64) - r),
            Bias::Uniform => 2.0 * self.error * (n as f64),
        }
    }

    /// Whether a compression pass is due after the `n`-th insertion.
    ///
    /// All bias variants share the same cadence: once every `period`
    /// insertions.
    pub fn should_compress(&self, n: usize) -> bool {
        n % self.period == 0
    }

    pub fn bias(&self) -> Bias {
        self.bias
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    #[cfg(test)]
    pub fn period(&self) -> usize {
        self.period
    }
}
