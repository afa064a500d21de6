use std::cmp;

/// The `(v, g, delta)` tuple of the summary.
///
/// `g` is the minimum rank distance to the preceding entry: the sum of `g`
/// up to and including an entry is a lower bound on the rank of `v` in the
/// stream seen so far. `delta` is the additional rank uncertainty carried by
/// the entry, so that the same prefix sum plus `delta` is an upper bound.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde_support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Entry<T>
where
    T: PartialEq,
{
    pub v: T,
    pub g: u32,
    pub delta: u32,
}

// The derivation of PartialEq for Entry is not appropriate. The sole ordering
// value in an Entry is 'v'.
impl<T> PartialEq for Entry<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Entry<T>) -> bool {
        self.v == other.v
    }
}

impl<T> PartialOrd for Entry<T>
where
    T: PartialEq + PartialOrd,
{
    fn partial_cmp(&self, other: &Entry<T>) -> Option<cmp::Ordering> {
        self.v.partial_cmp(&other.v)
    }
}
