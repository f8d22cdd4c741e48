//! Arbitrary values for tests.

use arbitrary::{Arbitrary, Unstructured};
use rand_core::{OsRng, TryCryptoRng};

/// Default size of the entropy buffer.
const ARB_GEN_LEN: usize = 1024;

/// Produces arbitrary values from a reusable random buffer.
#[derive(Debug)]
pub struct ArbitraryGenerator {
    buf: Vec<u8>,
}

impl Default for ArbitraryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbitraryGenerator {
    /// Creates a generator with the default buffer size.
    pub fn new() -> Self {
        Self::new_with_size(ARB_GEN_LEN)
    }

    /// Creates a generator whose buffer holds `size` bytes.
    pub fn new_with_size(size: usize) -> Self {
        Self {
            buf: vec![0u8; size],
        }
    }

    /// Generates an arbitrary `T` from OS randomness.
    pub fn generate<'a, T>(&'a mut self) -> T
    where
        T: Arbitrary<'a> + Clone,
    {
        self.generate_with_rng::<T, OsRng>(&mut OsRng)
    }

    /// Generates an arbitrary `T` from `rng`.
    pub fn generate_with_rng<'a, T, R>(&'a mut self, rng: &mut R) -> T
    where
        T: Arbitrary<'a> + Clone,
        R: TryCryptoRng,
    {
        rng.try_fill_bytes(&mut self.buf)
            .expect("must be able to generate random bytes");
        let mut u = Unstructured::new(&self.buf);
        T::arbitrary(&mut u).expect("buffer is large enough for any fixture type")
    }
}
