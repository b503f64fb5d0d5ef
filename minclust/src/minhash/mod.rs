mod hashers;
mod min_hasher;

pub use self::hashers::{HashFamily, SaltedFnvHasher};
pub use self::min_hasher::{par_bulk_signatures, StreamingMinHasher};

use std::collections::HashSet;
use std::hash::Hash;

/// Exact Jaccard similarity of two token iterators, for comparing against
/// the MinHash estimate.
pub fn compute_jaccard_similarity<T, U>(iter_1: T, iter_2: T) -> f64
where
    T: Iterator<Item = U>,
    U: Hash + Eq,
{
    let set_1 = HashSet::<U>::from_iter(iter_1);
    let set_2 = HashSet::<U>::from_iter(iter_2);
    let intersection_len = set_1.intersection(&set_2).count();
    intersection_len as f64 / (set_1.len() + set_2.len() - intersection_len) as f64
}

/// Fraction of positions on which two signatures agree. This is the
/// MinHash estimator of Jaccard similarity.
pub fn compute_minhash_similarity(signature_1: &[u64], signature_2: &[u64]) -> f64 {
    assert_eq!(signature_1.len(), signature_2.len());
    let matches: u64 = signature_1
        .iter()
        .zip(signature_2.iter())
        .map(|(value_1, value_2)| (value_1 == value_2) as u64)
        .sum();
    matches as f64 / signature_1.len() as f64
}
