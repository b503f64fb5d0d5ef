use fnv::FnvHasher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hash::Hasher;

/// FNV-1a over `salt || input`. Stateless between calls, so a single
/// instance may be shared and invoked concurrently.
#[derive(Clone, Debug)]
pub struct SaltedFnvHasher {
    salt: [u8; 8],
}

impl SaltedFnvHasher {
    pub fn with_salt(salt: u64) -> Self {
        SaltedFnvHasher {
            salt: salt.to_be_bytes(),
        }
    }

    #[inline]
    pub fn hash(&self, bytes: &[u8]) -> u64 {
        let mut hasher = FnvHasher::default();
        hasher.write(&self.salt);
        hasher.write(bytes);
        hasher.finish()
    }
}

/// A pair of independent 64-bit hash functions derived from one seed.
///
/// The salts come from consecutive draws of a seeded [`StdRng`], so the
/// family is identical across process restarts given the same seed.
#[derive(Clone, Debug)]
pub struct HashFamily {
    pub h1: SaltedFnvHasher,
    pub h2: SaltedFnvHasher,
}

impl HashFamily {
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        HashFamily {
            h1: SaltedFnvHasher::with_salt(rng.gen()),
            h2: SaltedFnvHasher::with_salt(rng.gen()),
        }
    }
}
