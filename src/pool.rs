//! Decoder instance reuse across blocks
//!
//! Decoding many blocks back to back should not reallocate per block. The
//! pool pre-allocates an arena of decoder instances at fixed maxima and
//! hands them out behind an RAII guard: acquiring takes a free instance and
//! calls `initialize` with the block's dimensions, dropping the guard
//! returns it. The pool serializes acquire/release internally; the decoding
//! logic itself assumes exclusive access once acquired.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

use log::debug;

use crate::decoder::BlockDecoder;
use crate::error::PoolError;
use crate::galois::FiniteField;

/// Bounded pool of pre-allocated [`BlockDecoder`] instances.
pub struct DecoderPool<F: FiniteField> {
    capacity: usize,
    free: Mutex<Vec<Box<BlockDecoder<F>>>>,
}

impl<F: FiniteField> DecoderPool<F> {
    /// Pre-allocate `capacity` decoders, each constructed for
    /// `max_symbols` / `max_symbol_size`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or either maximum is zero.
    pub fn new(capacity: usize, max_symbols: usize, max_symbol_size: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be nonzero");

        let free = (0..capacity)
            .map(|_| Box::new(BlockDecoder::new(max_symbols, max_symbol_size)))
            .collect();

        DecoderPool {
            capacity,
            free: Mutex::new(free),
        }
    }

    /// Take a free decoder and initialize it for a block of
    /// `symbols` / `symbol_size`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions are zero or exceed the pool's maxima.
    pub fn acquire(
        &self,
        symbols: usize,
        symbol_size: usize,
    ) -> Result<PooledDecoder<'_, F>, PoolError> {
        let mut decoder = {
            let mut free = self.lock_free();
            free.pop().ok_or(PoolError::Exhausted {
                capacity: self.capacity,
            })?
        };

        decoder.initialize(symbols, symbol_size);
        debug!(
            "acquired decoder for {}x{} block, {} free",
            symbols,
            symbol_size,
            self.available()
        );

        Ok(PooledDecoder {
            decoder: Some(decoder),
            pool: self,
        })
    }

    /// Number of instances currently available.
    pub fn available(&self) -> usize {
        self.lock_free().len()
    }

    /// Total number of instances in the arena.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self, decoder: Box<BlockDecoder<F>>) {
        self.lock_free().push(decoder);
        debug!("released decoder, {} free", self.available());
    }

    fn lock_free(&self) -> std::sync::MutexGuard<'_, Vec<Box<BlockDecoder<F>>>> {
        // A panic while holding the lock leaves the free list intact, so the
        // poisoned state carries no torn data.
        self.free.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// RAII handle to a pooled decoder; returns the instance on drop.
pub struct PooledDecoder<'p, F: FiniteField> {
    decoder: Option<Box<BlockDecoder<F>>>,
    pool: &'p DecoderPool<F>,
}

impl<F: FiniteField> Deref for PooledDecoder<'_, F> {
    type Target = BlockDecoder<F>;

    fn deref(&self) -> &Self::Target {
        self.decoder.as_ref().expect("pooled decoder already released")
    }
}

impl<F: FiniteField> DerefMut for PooledDecoder<'_, F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.decoder.as_mut().expect("pooled decoder already released")
    }
}

impl<F: FiniteField> Drop for PooledDecoder<'_, F> {
    fn drop(&mut self) {
        if let Some(decoder) = self.decoder.take() {
            self.pool.release(decoder);
        }
    }
}
