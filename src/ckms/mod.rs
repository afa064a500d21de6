//! This is an implementation of the algorithm presented in Cormode, Korn,
//! Muthukrishnan, Srivastava's paper "Effective Computation of Biased
//! Quantiles over Data Streams". The ambition here is to approximate
//! quantiles on a stream of data without having a boatload of information
//! kept in memory.
//!
//! The summary is an ordered sequence of `(v, g, delta)` tuples whose `g`
//! prefix sums bracket the true rank of each retained value, periodically
//! compressed so that storage stays well below the stream length. Where the
//! error budget lands is chosen at construction through [`Bias`]: the
//! low-biased invariant `2εr` keeps low quantiles sharp, the high-biased
//! invariant `2ε(n - r)` keeps high quantiles sharp, and the uniform
//! invariant `2εn` spreads the budget evenly.

use std::fmt::Debug;

mod bias;
mod entry;
mod store;

pub use self::bias::Bias;
use self::bias::Invariant;
use self::store::Store;
use crate::Error;

/// A structure to provide approximate quantile queries in bounded memory
/// and with bounded, bias-directed error.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde_support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CKMS<T>
where
    T: PartialEq,
{
    invariant: Invariant,

    // This is the S(n) of the above paper. Entries are stored here and
    // occasionally merged.
    samples: Store<T>,

    last_in: Option<T>,
}

impl<T> CKMS<T>
where
    T: Copy + PartialOrd + Default + Debug,
{
    /// Create a new CKMS with an explicit bias variant.
    ///
    /// A CKMS is meant to answer quantile queries with a known error bound.
    /// If the error passed here is ε then after `n` insertions a query for
    /// the quantile Φ deviates from the true quantile by no more than the
    /// chosen variant's rank budget: εΦn for [`Bias::Low`], ε(1 - Φ)n for
    /// [`Bias::High`], εn for [`Bias::Uniform`].
    ///
    /// # Errors
    ///
    /// `error` must lie in `(0.0, 0.5)`, exclusive of both ends; anything
    /// else cannot produce a positive compression period and is rejected
    /// with [`Error::InvalidEpsilon`] here, never at insert or query time.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::{Bias, CKMS};
    ///
    /// let mut ckms = CKMS::<u32>::new(Bias::Uniform, 0.001).unwrap();
    /// for i in 1..101 {
    ///     ckms.insert(i as u32);
    /// }
    /// assert_eq!(ckms.quantile(0.0), 1);
    /// assert_eq!(ckms.quantile(0.5), 50);
    /// assert_eq!(ckms.quantile(1.0), 100);
    ///
    /// assert!(CKMS::<u32>::new(Bias::Uniform, 0.5).is_err());
    /// ```
    pub fn new(bias: Bias, error: f64) -> Result<CKMS<T>, Error> {
        let invariant = Invariant::new(bias, error)?;
        Ok(CKMS {
            invariant,
            samples: Store::new(invariant),
            last_in: None,
        })
    }

    /// Create a CKMS that is accurate for low quantiles.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::CKMS;
    ///
    /// let mut ckms = CKMS::low_biased(0.1).unwrap();
    /// for v in [5.0, 1.0, 9.0, 3.0] {
    ///     ckms.insert(v);
    /// }
    /// // The minimum is anchored exactly under the low-biased invariant.
    /// assert_eq!(ckms.quantile(0.0), 1.0);
    /// ```
    pub fn low_biased(error: f64) -> Result<CKMS<T>, Error> {
        CKMS::new(Bias::Low, error)
    }

    /// Create a CKMS that is accurate for high quantiles.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::CKMS;
    ///
    /// let mut ckms = CKMS::high_biased(0.001).unwrap();
    /// for i in 1..101 {
    ///     ckms.insert(i as u64);
    /// }
    /// assert_eq!(ckms.quantile(1.0), 100);
    /// ```
    pub fn high_biased(error: f64) -> Result<CKMS<T>, Error> {
        CKMS::new(Bias::High, error)
    }

    /// Create a CKMS with the same error budget at every quantile.
    pub fn uniform(error: f64) -> Result<CKMS<T>, Error> {
        CKMS::new(Bias::Uniform, error)
    }

    /// Insert a T into the CKMS
    ///
    /// Insertion gradually shifts the approximate quantiles. Each insert
    /// grows the retained sequence by one entry and, once every
    /// `floor(1/(2ε))` insertions, triggers a compression pass that merges
    /// entries the rank invariant no longer needs. Storage grows gradually
    /// but remains bounded; any orderable value is acceptable, duplicates
    /// included.
    pub fn insert(&mut self, v: T) {
        self.last_in = Some(v);
        self.samples.insert(v);
        if self.invariant.should_compress(self.samples.count()) {
            self.samples.compress();
        }
    }

    /// Query the CKMS for the ε-approximate Φ-quantile.
    ///
    /// Argument `phi` is valid for `0.0 <= phi <= 1.0`. An empty summary
    /// answers with `T::default()`, since querying before any data arrives
    /// is not an error.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::CKMS;
    ///
    /// let mut ckms = CKMS::uniform(0.001).unwrap();
    /// assert_eq!(ckms.quantile(0.5), 0.0);
    ///
    /// for i in 1..101 {
    ///     ckms.insert(i as f64);
    /// }
    /// assert_eq!(ckms.quantile(0.25), 25.0);
    /// assert_eq!(ckms.quantile(0.75), 75.0);
    /// ```
    pub fn quantile(&self, phi: f64) -> T {
        match self.samples.query(phi) {
            Some((_, v)) => v,
            None => T::default(),
        }
    }

    /// Query the CKMS for the ε-approximate Φ-quantile and its rank lower
    /// bound, or `None` if nothing has been inserted.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::CKMS;
    ///
    /// let mut ckms = CKMS::uniform(0.01).unwrap();
    /// assert_eq!(ckms.query(0.5), None);
    ///
    /// ckms.insert(7_u32);
    /// assert_eq!(ckms.query(0.5), Some((1, 7)));
    /// ```
    pub fn query(&self, phi: f64) -> Option<(usize, T)> {
        self.samples.query(phi)
    }

    /// Query the CKMS for the count of its points
    ///
    /// This function returns the total number of points seen over the
    /// lifetime of the datastructure, _not_ the number of points currently
    /// stored in the structure.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::{Bias, CKMS};
    ///
    /// let mut ckms = CKMS::<u32>::new(Bias::Uniform, 0.001).unwrap();
    /// for i in 0..1000 {
    ///     ckms.insert(i as u32);
    /// }
    /// assert_eq!(ckms.count(), 1000);
    /// ```
    pub fn count(&self) -> usize {
        self.samples.count()
    }

    /// The number of entries currently retained, the resource compression
    /// keeps sub-linear in [`Self::count`].
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True until the first insertion.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Return the last element added to the CKMS
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::CKMS;
    ///
    /// let mut ckms = CKMS::low_biased(0.1).unwrap();
    /// ckms.insert(1.0);
    /// ckms.insert(2.0);
    /// ckms.insert(3.0);
    /// assert_eq!(Some(3.0), ckms.last());
    /// ```
    pub fn last(&self) -> Option<T> {
        self.last_in
    }

    /// Return the guaranteed error bound of this CKMS
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::CKMS;
    ///
    /// let ckms: CKMS<f64> = CKMS::high_biased(0.1).unwrap();
    /// assert_eq!(0.1, ckms.error_bound());
    /// ```
    pub fn error_bound(&self) -> f64 {
        self.invariant.error()
    }

    /// The bias variant chosen at construction.
    pub fn bias(&self) -> Bias {
        self.invariant.bias()
    }

    /// Retrieve a representative vector of points
    ///
    /// This function returns a representative sample of points from the
    /// CKMS. Doing so consumes the CKMS.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::CKMS;
    ///
    /// let mut ckms = CKMS::<u32>::uniform(0.001).unwrap();
    /// for i in 0..10 {
    ///     ckms.insert(i as u32);
    /// }
    ///
    /// assert_eq!(ckms.into_vec(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// ```
    pub fn into_vec(self) -> Vec<T> {
        self.samples.into_vec()
    }
}
