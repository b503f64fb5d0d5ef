use crate::minhash::hashers::HashFamily;
use rayon::prelude::*;

/// Streaming MinHash over a fixed number of permutations.
///
/// The signature is a vector of running minima. Position `i` applies the
/// permutation `h1(x) + i * h2(x)` (wrapping), so the whole family is
/// derived from the two seeded hash functions. Pushing the same token set
/// in any order, in one session or across several via
/// [`StreamingMinHasher::from_signature`], yields the same signature.
///
/// ```
/// use minclust::minhash::StreamingMinHasher;
///
/// let mut min_hash = StreamingMinHasher::new(1, 128);
/// min_hash.push(b"cat");
/// min_hash.push(b"dog");
/// let signature = min_hash.into_signature();
///
/// // resume from the stored signature and add nothing new
/// let mut resumed = StreamingMinHasher::from_signature(1, signature.clone());
/// resumed.push(b"cat");
/// assert_eq!(resumed.signature(), signature.as_slice());
/// ```
#[derive(Clone, Debug)]
pub struct StreamingMinHasher {
    family: HashFamily,
    signature: Vec<u64>,
}

impl StreamingMinHasher {
    /// An empty signature: every position starts at `u64::MAX`.
    pub fn new(seed: u64, num_hashes: usize) -> Self {
        StreamingMinHasher {
            family: HashFamily::from_seed(seed),
            signature: vec![u64::MAX; num_hashes],
        }
    }

    /// Resume hashing from a previously stored signature. The number of
    /// permutations is taken from the signature length.
    pub fn from_signature(seed: u64, signature: Vec<u64>) -> Self {
        StreamingMinHasher {
            family: HashFamily::from_seed(seed),
            signature,
        }
    }

    pub fn num_hashes(&self) -> usize {
        self.signature.len()
    }

    /// Fold one token into the signature.
    #[inline]
    pub fn push(&mut self, token: &[u8]) {
        let hash_1 = self.family.h1.hash(token);
        let hash_2 = self.family.h2.hash(token);
        for (index, minimum) in self.signature.iter_mut().enumerate() {
            let permuted = hash_1.wrapping_add((index as u64).wrapping_mul(hash_2));
            if permuted < *minimum {
                *minimum = permuted;
            }
        }
    }

    pub fn signature(&self) -> &[u64] {
        &self.signature
    }

    pub fn into_signature(self) -> Vec<u64> {
        self.signature
    }
}

/// Build signatures for a batch of token sets in parallel. The cluster
/// coordinator itself is single-threaded; this is for callers preparing
/// large ingests up front.
pub fn par_bulk_signatures<T>(seed: u64, num_hashes: usize, batch: &[Vec<T>]) -> Vec<Vec<u64>>
where
    T: AsRef<[u8]> + Sync,
{
    batch
        .par_iter()
        .map(|tokens| {
            let mut min_hash = StreamingMinHasher::new(seed, num_hashes);
            for token in tokens {
                min_hash.push(token.as_ref());
            }
            min_hash.into_signature()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::StreamingMinHasher;
    use crate::minhash::{compute_jaccard_similarity, compute_minhash_similarity};

    fn signature_of(seed: u64, num_hashes: usize, tokens: &[&str]) -> Vec<u64> {
        let mut min_hash = StreamingMinHasher::new(seed, num_hashes);
        for token in tokens {
            min_hash.push(token.as_bytes());
        }
        min_hash.into_signature()
    }

    #[test]
    fn test_order_insensitivity() {
        let forward = signature_of(1, 64, &["airplane", "banana", "cat"]);
        let reversed = signature_of(1, 64, &["cat", "banana", "airplane"]);
        let shuffled = signature_of(1, 64, &["banana", "airplane", "cat"]);
        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_push_is_idempotent() {
        let mut min_hash = StreamingMinHasher::new(1, 64);
        min_hash.push(b"airplane");
        min_hash.push(b"banana");
        let before = min_hash.signature().to_vec();
        min_hash.push(b"airplane");
        min_hash.push(b"banana");
        assert_eq!(before, min_hash.signature());
    }

    #[test]
    fn test_push_never_raises_a_minimum() {
        let mut min_hash = StreamingMinHasher::new(1, 64);
        min_hash.push(b"airplane");
        let before = min_hash.signature().to_vec();
        min_hash.push(b"banana");
        min_hash.push(b"cat");
        for (old, new) in before.iter().zip(min_hash.signature()) {
            assert!(new <= old);
        }
    }

    #[test]
    fn test_streaming_across_sessions_matches_single_session() {
        let whole = signature_of(1, 128, &["a", "b", "c", "d"]);

        let first_half = signature_of(1, 128, &["a", "b"]);
        let mut resumed = StreamingMinHasher::from_signature(1, first_half);
        resumed.push(b"c");
        resumed.push(b"d");
        assert_eq!(whole, resumed.into_signature());
    }

    #[test]
    fn test_fresh_signature_is_saturated() {
        let min_hash = StreamingMinHasher::new(1, 16);
        assert_eq!(min_hash.num_hashes(), 16);
        assert!(min_hash.signature().iter().all(|value| *value == u64::MAX));
    }

    #[test]
    fn test_par_bulk_matches_serial() {
        let batch: Vec<Vec<&str>> = vec![
            vec!["airplane", "banana"],
            vec!["cat"],
            vec!["dog", "elephant", "fruit"],
        ];
        let bulk = super::par_bulk_signatures(1, 64, &batch);
        for (tokens, signature) in batch.iter().zip(bulk.iter()) {
            assert_eq!(signature, &signature_of(1, 64, tokens));
        }
    }

    #[test]
    fn test_estimate_tracks_jaccard() {
        let tokens_1: Vec<String> = (0..100).map(|n| format!("token{}", n)).collect();
        let tokens_2: Vec<String> = (50..150).map(|n| format!("token{}", n)).collect();

        let mut min_hash_1 = StreamingMinHasher::new(1, 256);
        let mut min_hash_2 = StreamingMinHasher::new(1, 256);
        for token in &tokens_1 {
            min_hash_1.push(token.as_bytes());
        }
        for token in &tokens_2 {
            min_hash_2.push(token.as_bytes());
        }

        let estimated = compute_minhash_similarity(min_hash_1.signature(), min_hash_2.signature());
        let actual = compute_jaccard_similarity(tokens_1.iter(), tokens_2.iter());
        assert!((estimated - actual).abs() < 0.15);
    }
}
