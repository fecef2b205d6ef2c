//! Recoding: emitting fresh linear combinations from partial knowledge
//!
//! A relay node does not need to fully decode a block before forwarding
//! useful symbols. The recoder draws local weights over the currently
//! occupied slots only and combines their stored rows and payloads into a
//! new (coding vector, payload) pair. Unseen slots carry structurally zero
//! weight, so recoded output never encodes information the relay does not
//! hold.

use std::marker::PhantomData;

use log::{debug, warn};

use crate::galois::FiniteField;
use crate::generator::CoefficientGenerator;
use crate::storage::SymbolStorage;

/// Produces recoded symbols from a decoder's slot storage.
///
/// Owns its scratch weight buffer at maximum capacity; no recode call
/// allocates.
pub struct Recoder<F: FiniteField> {
    /// Local weights over slots, chosen by the last `write_recoded_id`.
    weights: Vec<u8>,
    /// Active length of `weights` in bytes.
    active_size: usize,
    _field: PhantomData<F>,
}

impl<F: FiniteField> Recoder<F> {
    /// Allocate scratch for coding vectors of up to
    /// `max_coefficients_size` bytes.
    pub fn new(max_coefficients_size: usize) -> Self {
        Recoder {
            weights: vec![0; max_coefficients_size],
            active_size: 0,
            _field: PhantomData,
        }
    }

    /// Reset for a new block.
    pub fn initialize(&mut self) {
        self.weights.fill(0);
        self.active_size = 0;
    }

    /// Write a recoded coding vector into `id_out` and return the number of
    /// bytes written. The local weights used are kept for the paired
    /// [`write_recoded_data`](Recoder::write_recoded_data) call and exposed
    /// via [`weights`](Recoder::weights).
    ///
    /// With no occupied slots the zero vector is emitted. With partial rank
    /// the generator is asked for weights restricted to occupied slots; a
    /// weight it nevertheless places on an unseen slot is zeroed here rather
    /// than combined.
    ///
    /// # Panics
    ///
    /// Panics if `id_out` is shorter than the active coding-vector size.
    pub fn write_recoded_id<G: CoefficientGenerator<F>>(
        &mut self,
        storage: &SymbolStorage<F>,
        generator: &mut G,
        id_out: &mut [u8],
    ) -> usize {
        let id_size = storage.coefficients_size();
        assert!(id_size > 0, "recode before initialize");
        assert!(id_out.len() >= id_size, "coding vector buffer too short");

        id_out[..id_size].fill(0);
        self.weights[..id_size].fill(0);
        self.active_size = id_size;

        let occupied = storage.occupied_count();
        if occupied == 0 {
            // Nothing we can combine; emit the zero vector.
            debug!("recode on empty block, emitting zero vector");
            return id_size;
        }

        if occupied < storage.symbols() {
            generator.generate_partial(storage, &mut self.weights[..id_size]);
        } else {
            generator.generate(storage.symbols(), &mut self.weights[..id_size]);
        }

        for i in 0..storage.symbols() {
            let c = F::get(&self.weights, i);
            if c == 0 {
                continue;
            }
            if !storage.is_occupied(i) {
                // Generator contract violation; refuse to reference a slot
                // we do not hold.
                warn!("generator weighted unseen slot {}, dropping it", i);
                F::set(&mut self.weights, i, 0);
                continue;
            }

            if F::IS_BINARY || c == 1 {
                F::add_assign(&mut id_out[..id_size], storage.coefficients(i));
            } else {
                F::multiply_add(&mut id_out[..id_size], storage.coefficients(i), c);
            }
        }

        id_size
    }

    /// Combine stored payloads under the weights chosen by the most recent
    /// [`write_recoded_id`](Recoder::write_recoded_id) call.
    ///
    /// # Panics
    ///
    /// Panics if `data_out` is shorter than the active symbol size.
    pub fn write_recoded_data(&self, storage: &SymbolStorage<F>, data_out: &mut [u8]) {
        let symbol_size = storage.symbol_size();
        assert!(data_out.len() >= symbol_size, "symbol buffer too short");

        data_out[..symbol_size].fill(0);

        for i in 0..storage.symbols() {
            let c = F::get(&self.weights, i);
            if c == 0 {
                continue;
            }
            debug_assert!(storage.is_occupied(i));

            if F::IS_BINARY || c == 1 {
                F::add_assign(&mut data_out[..symbol_size], storage.symbol(i));
            } else {
                F::multiply_add(&mut data_out[..symbol_size], storage.symbol(i), c);
            }
        }
    }

    /// The local weights chosen by the most recent
    /// [`write_recoded_id`](Recoder::write_recoded_id) call.
    pub fn weights(&self) -> &[u8] {
        &self.weights[..self.active_size]
    }
}
