//! Coefficient generation for encoding and recoding
//!
//! Generators fill packed coding-vector buffers with field elements. The
//! decoding logic never cares where weights come from; encoders want fresh
//! uniform draws, relays want draws restricted to the slots they hold, and
//! deterministic per-block vectors (`fill`) let a sender and receiver agree
//! on a coding vector from a block id alone instead of shipping it.

use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::galois::FiniteField;
use crate::storage::SymbolStorage;

/// Mixing constant for deriving per-block seeds (splitmix64 increment).
const BLOCK_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Supplies coding-vector weights to encoders and recoders.
pub trait CoefficientGenerator<F: FiniteField> {
    /// Write the deterministic coding vector for `block_id` over `symbols`
    /// positions. The same generator seed and block id always produce the
    /// same vector.
    fn fill(&mut self, block_id: u32, symbols: usize, buffer: &mut [u8]);

    /// Draw a fresh coding vector over all `symbols` positions.
    fn generate(&mut self, symbols: usize, buffer: &mut [u8]);

    /// Draw a fresh coding vector with nonzero weight only on occupied
    /// slots of `storage`.
    fn generate_partial(&mut self, storage: &SymbolStorage<F>, buffer: &mut [u8]);
}

/// Uniformly random coefficient generator with a deterministic seed.
pub struct UniformGenerator<F: FiniteField> {
    rng: StdRng,
    seed: u64,
    _field: PhantomData<F>,
}

impl<F: FiniteField> UniformGenerator<F> {
    pub fn new(seed: u64) -> Self {
        UniformGenerator {
            rng: StdRng::seed_from_u64(seed),
            seed,
            _field: PhantomData,
        }
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn random_element(rng: &mut StdRng) -> u8 {
        rng.random::<u8>() & F::MAX_VALUE
    }
}

impl<F: FiniteField> CoefficientGenerator<F> for UniformGenerator<F> {
    fn fill(&mut self, block_id: u32, symbols: usize, buffer: &mut [u8]) {
        debug_assert!(buffer.len() >= F::coefficients_size(symbols));

        // Independent stream per block id, reproducible across instances
        // sharing a seed.
        let block_seed = self.seed ^ (u64::from(block_id).wrapping_mul(BLOCK_SEED_MIX));
        let mut rng = StdRng::seed_from_u64(block_seed);

        buffer[..F::coefficients_size(symbols)].fill(0);
        for i in 0..symbols {
            F::set(buffer, i, Self::random_element(&mut rng));
        }
    }

    fn generate(&mut self, symbols: usize, buffer: &mut [u8]) {
        debug_assert!(buffer.len() >= F::coefficients_size(symbols));

        buffer[..F::coefficients_size(symbols)].fill(0);
        for i in 0..symbols {
            F::set(buffer, i, Self::random_element(&mut self.rng));
        }
    }

    fn generate_partial(&mut self, storage: &SymbolStorage<F>, buffer: &mut [u8]) {
        debug_assert!(buffer.len() >= storage.coefficients_size());

        let occupied: SmallVec<[usize; 32]> = (0..storage.symbols())
            .filter(|&i| storage.is_occupied(i))
            .collect();

        buffer[..storage.coefficients_size()].fill(0);
        for &i in &occupied {
            F::set(buffer, i, Self::random_element(&mut self.rng));
        }
    }
}

/// Caches `fill` results per block id.
///
/// Deterministic per-block vectors are requested repeatedly for the same
/// block on hot paths, so memoizing them trades a small map for repeated
/// regeneration.
pub struct CachedGenerator<F: FiniteField, G: CoefficientGenerator<F>> {
    inner: G,
    cache: FxHashMap<u32, Vec<u8>>,
    _field: PhantomData<F>,
}

impl<F: FiniteField, G: CoefficientGenerator<F>> CachedGenerator<F, G> {
    pub fn new(inner: G) -> Self {
        CachedGenerator {
            inner,
            cache: FxHashMap::default(),
            _field: PhantomData,
        }
    }

    /// Number of cached block vectors.
    pub fn cached_blocks(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached vectors, e.g. when the block size changes.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl<F: FiniteField, G: CoefficientGenerator<F>> CoefficientGenerator<F>
    for CachedGenerator<F, G>
{
    fn fill(&mut self, block_id: u32, symbols: usize, buffer: &mut [u8]) {
        let size = F::coefficients_size(symbols);
        let inner = &mut self.inner;
        let cached = self.cache.entry(block_id).or_insert_with(|| {
            let mut vector = vec![0; size];
            inner.fill(block_id, symbols, &mut vector);
            vector
        });
        buffer[..size].copy_from_slice(&cached[..size]);
    }

    fn generate(&mut self, symbols: usize, buffer: &mut [u8]) {
        self.inner.generate(symbols, buffer);
    }

    fn generate_partial(&mut self, storage: &SymbolStorage<F>, buffer: &mut [u8]) {
        self.inner.generate_partial(storage, buffer);
    }
}
