//! Online Gaussian-elimination block decoder
//!
//! The decoder consumes coded or systematic symbols one at a time and keeps
//! its slot storage in full reduced form after every insertion: forward
//! reduction against existing pivot rows, discard of linearly dependent
//! contributions, normalization of the new pivot, then eager
//! back-substitution into every stored row. Because reduction is eager, the
//! moment rank reaches the block's symbol count every slot holds a unit
//! vector and the exact original payload, with no separate resolution pass.

use log::{debug, trace};

use crate::galois::{is_zero, FiniteField};
use crate::generator::CoefficientGenerator;
use crate::rank::RankObserver;
use crate::recoder::Recoder;
use crate::storage::{SlotStatus, SymbolStorage};

/// Incremental decoder for one coding block.
///
/// Constructed once at maximum capacity, reinitialized per block. Not safe
/// for concurrent mutation; distinct instances are independent.
pub struct BlockDecoder<F: FiniteField> {
    storage: SymbolStorage<F>,
    observer: RankObserver,
    recoder: Recoder<F>,

    /// Scratch row for the incoming coding vector, sized to the maxima.
    coefficients: Vec<u8>,
    /// Scratch buffer for the incoming payload, sized to the maxima.
    data: Vec<u8>,
}

impl<F: FiniteField> BlockDecoder<F> {
    /// Allocate a decoder for blocks of up to `max_symbols` symbols of up to
    /// `max_symbol_size` bytes each.
    ///
    /// # Panics
    ///
    /// Panics if either maximum is zero.
    pub fn new(max_symbols: usize, max_symbol_size: usize) -> Self {
        let storage = SymbolStorage::new(max_symbols, max_symbol_size);
        let max_coefficients_size = storage.max_coefficients_size();

        BlockDecoder {
            storage,
            observer: RankObserver::new(),
            recoder: Recoder::new(max_coefficients_size),
            coefficients: vec![0; max_coefficients_size],
            data: vec![0; max_symbol_size],
        }
    }

    /// Reconfigure for a new block: resets slot statuses, rank, and any
    /// registered rank-changed handler. Never reallocates.
    ///
    /// # Panics
    ///
    /// Panics if either argument is zero or exceeds the construction maxima.
    pub fn initialize(&mut self, symbols: usize, symbol_size: usize) {
        self.storage.initialize(symbols, symbol_size);
        self.observer.reset();
        self.recoder.initialize();
    }

    /// Consume an explicit linear combination of the block's symbols.
    ///
    /// A linearly dependent contribution is absorbed silently: rank is
    /// unchanged and no callback fires.
    ///
    /// # Panics
    ///
    /// Panics if `data` or `coefficients` do not match the active symbol
    /// size and coding-vector size.
    pub fn decode_coded(&mut self, data: &[u8], coefficients: &[u8]) {
        assert_eq!(
            data.len(),
            self.storage.symbol_size(),
            "symbol buffer length mismatch"
        );
        assert_eq!(
            coefficients.len(),
            self.storage.coefficients_size(),
            "coding vector length mismatch"
        );

        let rank_before = self.rank();

        let coefficients_size = coefficients.len();
        let symbol_size = data.len();
        self.coefficients[..coefficients_size].copy_from_slice(coefficients);
        // Sub-byte fields may carry garbage in the padding bits of the last
        // byte; clear it so dependence checks see a clean packed vector.
        F::mask_padding(
            &mut self.coefficients[..coefficients_size],
            self.storage.symbols(),
        );
        self.data[..symbol_size].copy_from_slice(data);

        self.insert();
        self.observer.notify(rank_before, self.rank());
    }

    /// Consume a systematic (uncoded) symbol: equivalent to a coding vector
    /// that is the unit vector at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `data` does not match the active symbol size or `index` is
    /// out of range.
    pub fn decode_systematic(&mut self, data: &[u8], index: usize) {
        assert_eq!(
            data.len(),
            self.storage.symbol_size(),
            "symbol buffer length mismatch"
        );
        assert!(index < self.storage.symbols(), "symbol index out of range");

        let rank_before = self.rank();

        let coefficients_size = self.storage.coefficients_size();
        let symbol_size = data.len();
        self.coefficients[..coefficients_size].fill(0);
        F::set(&mut self.coefficients, index, 1);
        self.data[..symbol_size].copy_from_slice(data);

        self.insert();
        self.observer.notify(rank_before, self.rank());
    }

    /// Produce a recoded (coding vector, payload) pair from the currently
    /// occupied slots. Returns the number of coding-vector bytes written.
    ///
    /// # Panics
    ///
    /// Panics if the output buffers are shorter than the active
    /// coding-vector size and symbol size.
    pub fn recode<G: CoefficientGenerator<F>>(
        &mut self,
        generator: &mut G,
        id_out: &mut [u8],
        data_out: &mut [u8],
    ) -> usize {
        let written = self
            .recoder
            .write_recoded_id(&self.storage, generator, id_out);
        self.recoder.write_recoded_data(&self.storage, data_out);
        written
    }

    /// Register a handler fired with the new rank after each rank increase.
    /// Replaces any previous handler; cleared on [`initialize`].
    ///
    /// [`initialize`]: BlockDecoder::initialize
    pub fn set_rank_changed_callback(&mut self, callback: impl FnMut(u32) + 'static) {
        self.observer.set(callback);
    }

    /// Clear the rank-changed handler.
    pub fn reset_rank_changed_callback(&mut self) {
        self.observer.reset();
    }

    /// Number of linearly independent combinations captured so far.
    pub fn rank(&self) -> u32 {
        self.storage.occupied_count() as u32
    }

    /// True once every original symbol is recoverable.
    pub fn is_complete(&self) -> bool {
        self.storage.occupied_count() == self.storage.symbols()
    }

    /// The stored payload for slot `index`, if occupied.
    ///
    /// When the slot is [`SlotStatus::Uncoded`] this is the original symbol;
    /// once the decoder [is complete](BlockDecoder::is_complete) that holds
    /// for every slot.
    pub fn symbol(&self, index: usize) -> Option<&[u8]> {
        self.storage
            .is_occupied(index)
            .then(|| self.storage.symbol(index))
    }

    /// The stored coding vector for slot `index`, if occupied.
    pub fn coefficients(&self, index: usize) -> Option<&[u8]> {
        self.storage
            .is_occupied(index)
            .then(|| self.storage.coefficients(index))
    }

    /// Read access to the underlying slot storage.
    pub fn storage(&self) -> &SymbolStorage<F> {
        &self.storage
    }

    /// Render the current decoding matrix for debugging.
    pub fn decoding_matrix(&self) -> crate::inspect::DecodingMatrix<'_, F> {
        crate::inspect::DecodingMatrix::new(&self.storage)
    }

    /// The local recoding weights chosen by the most recent
    /// [`recode`](BlockDecoder::recode) call.
    pub fn recoding_weights(&self) -> &[u8] {
        self.recoder.weights()
    }

    /// Integrate the contribution staged in the scratch buffers.
    fn insert(&mut self) {
        let symbols = self.storage.symbols();
        let coefficients_size = self.storage.coefficients_size();
        let symbol_size = self.storage.symbol_size();

        // Forward reduction: eliminate every occupied pivot position from
        // the incoming vector. The lowest-index nonzero position left
        // without a pivot row becomes the new pivot; the full sweep keeps
        // the stored row clear of every other pivot, so storage stays in
        // full reduced form.
        let mut pivot = None;
        for i in 0..symbols {
            let c = F::get(&self.coefficients, i);
            if c == 0 {
                continue;
            }
            if !self.storage.is_occupied(i) {
                if pivot.is_none() {
                    pivot = Some((i, c));
                }
                continue;
            }

            trace!("eliminating position {} (weight {})", i, c);
            if F::IS_BINARY || c == 1 {
                F::add_assign(
                    &mut self.coefficients[..coefficients_size],
                    self.storage.coefficients(i),
                );
                F::add_assign(&mut self.data[..symbol_size], self.storage.symbol(i));
            } else {
                F::multiply_add(
                    &mut self.coefficients[..coefficients_size],
                    self.storage.coefficients(i),
                    c,
                );
                F::multiply_add(&mut self.data[..symbol_size], self.storage.symbol(i), c);
            }
        }

        let Some((pivot, leading)) = pivot else {
            debug_assert!(is_zero(&self.coefficients[..coefficients_size]));
            debug!(
                "linearly dependent symbol absorbed, rank stays {}",
                self.storage.occupied_count()
            );
            return;
        };

        // Normalize the new row so its pivot entry is the identity. In the
        // binary field the only nonzero value already is.
        if !F::IS_BINARY && leading != 1 {
            let inverse = F::invert(leading);
            F::multiply_assign(&mut self.coefficients[..coefficients_size], inverse);
            F::multiply_assign(&mut self.data[..symbol_size], inverse);
        }

        // Eager back-substitution: clear the pivot position out of every
        // stored row so storage stays in full reduced form.
        for j in 0..symbols {
            if j == pivot || !self.storage.is_occupied(j) {
                continue;
            }
            let c = F::get(self.storage.coefficients(j), pivot);
            if c == 0 {
                continue;
            }

            trace!("back-substituting pivot {} into row {}", pivot, j);
            if F::IS_BINARY || c == 1 {
                F::add_assign(
                    self.storage.coefficients_mut(j),
                    &self.coefficients[..coefficients_size],
                );
                F::add_assign(self.storage.symbol_mut(j), &self.data[..symbol_size]);
            } else {
                F::multiply_add(
                    self.storage.coefficients_mut(j),
                    &self.coefficients[..coefficients_size],
                    c,
                );
                F::multiply_add(self.storage.symbol_mut(j), &self.data[..symbol_size], c);
            }

            // Elimination may have reduced the row to a unit vector, which
            // means its payload is now an original symbol.
            if self.storage.status(j) == SlotStatus::Coded
                && is_unit_row::<F>(self.storage.coefficients(j), j, symbols)
            {
                self.storage.set_status(j, SlotStatus::Uncoded);
            }
        }

        let status = if is_unit_row::<F>(&self.coefficients[..coefficients_size], pivot, symbols) {
            SlotStatus::Uncoded
        } else {
            SlotStatus::Coded
        };

        debug!(
            "stored pivot {} as {:?}, rank now {}",
            pivot,
            status,
            self.storage.occupied_count() + 1
        );

        let (coefficients, data) = (
            &self.coefficients[..coefficients_size],
            &self.data[..symbol_size],
        );
        self.storage.store(pivot, coefficients, data, status);
    }
}

/// True when `row` is exactly the unit vector for `pivot`.
fn is_unit_row<F: FiniteField>(row: &[u8], pivot: usize, symbols: usize) -> bool {
    for i in 0..symbols {
        let expected = u8::from(i == pivot);
        if F::get(row, i) != expected {
            return false;
        }
    }
    true
}
