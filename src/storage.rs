//! Symbol and coefficient storage for one coding block
//!
//! Storage is allocated once at maximum capacity and reconfigured per block
//! via [`SymbolStorage::initialize`], so a pooled decoder never reallocates.
//! Each slot holds one reduced pivot row (a packed coding vector) and the
//! partially decoded payload that goes with it.

use std::marker::PhantomData;

use crate::galois::FiniteField;

/// Decoding state of one pivot slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// No contribution stored for this pivot position yet.
    Unseen,
    /// The stored vector is exactly the unit vector for this position; the
    /// stored payload is the original symbol.
    Uncoded,
    /// The stored vector is a reduced pivot row with nonzero entries besides
    /// the pivot position.
    Coded,
}

/// Fixed-capacity slot storage for coefficient rows and symbol payloads.
///
/// Rows are laid out in flat arenas with a stride derived from the maxima,
/// so the active block dimensions can shrink and grow across `initialize`
/// calls without moving any data.
pub struct SymbolStorage<F: FiniteField> {
    max_symbols: usize,
    max_symbol_size: usize,
    /// Arena row stride for coefficient vectors, fixed at construction.
    max_coefficients_size: usize,

    symbols: usize,
    symbol_size: usize,
    /// Active coding-vector length in bytes.
    coefficients_size: usize,
    /// Active symbol length in field elements (per the field's packing rule).
    symbol_length: usize,

    status: Vec<SlotStatus>,
    coefficients: Vec<u8>,
    data: Vec<u8>,
    occupied: usize,

    _field: PhantomData<F>,
}

impl<F: FiniteField> SymbolStorage<F> {
    /// Allocate storage sized to the given maxima. Called once per instance.
    ///
    /// # Panics
    ///
    /// Panics if either maximum is zero.
    pub fn new(max_symbols: usize, max_symbol_size: usize) -> Self {
        assert!(max_symbols > 0, "max_symbols must be nonzero");
        assert!(max_symbol_size > 0, "max_symbol_size must be nonzero");

        let max_coefficients_size = F::coefficients_size(max_symbols);

        SymbolStorage {
            max_symbols,
            max_symbol_size,
            max_coefficients_size,
            symbols: 0,
            symbol_size: 0,
            coefficients_size: 0,
            symbol_length: 0,
            status: vec![SlotStatus::Unseen; max_symbols],
            coefficients: vec![0; max_symbols * max_coefficients_size],
            data: vec![0; max_symbols * max_symbol_size],
            occupied: 0,
            _field: PhantomData,
        }
    }

    /// Configure the active block dimensions and reset every slot to
    /// [`SlotStatus::Unseen`]. Does not reallocate.
    ///
    /// # Panics
    ///
    /// Panics if either argument is zero or exceeds the configured maxima.
    pub fn initialize(&mut self, symbols: usize, symbol_size: usize) {
        assert!(symbols > 0, "symbols must be nonzero");
        assert!(symbol_size > 0, "symbol_size must be nonzero");
        assert!(
            symbols <= self.max_symbols,
            "symbols {} exceeds maximum {}",
            symbols,
            self.max_symbols
        );
        assert!(
            symbol_size <= self.max_symbol_size,
            "symbol_size {} exceeds maximum {}",
            symbol_size,
            self.max_symbol_size
        );

        self.symbols = symbols;
        self.symbol_size = symbol_size;
        self.coefficients_size = F::coefficients_size(symbols);
        self.symbol_length = F::elements_needed(symbol_size);

        self.status.fill(SlotStatus::Unseen);
        self.occupied = 0;
    }

    /// Store a reduced row and payload at slot `index`, which must be Unseen.
    pub(crate) fn store(
        &mut self,
        index: usize,
        coefficients: &[u8],
        data: &[u8],
        status: SlotStatus,
    ) {
        debug_assert_eq!(self.status[index], SlotStatus::Unseen);
        debug_assert_ne!(status, SlotStatus::Unseen);

        self.coefficients_mut(index).copy_from_slice(coefficients);
        self.symbol_mut(index).copy_from_slice(data);
        self.status[index] = status;
        self.occupied += 1;
    }

    pub(crate) fn set_status(&mut self, index: usize, status: SlotStatus) {
        self.status[index] = status;
    }

    /// Status of slot `index`.
    pub fn status(&self, index: usize) -> SlotStatus {
        self.status[index]
    }

    /// True when slot `index` holds a contribution.
    pub fn is_occupied(&self, index: usize) -> bool {
        self.status[index] != SlotStatus::Unseen
    }

    /// Number of occupied slots; this is the decoder's rank.
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// The stored coding vector for slot `index`.
    ///
    /// Only meaningful while the slot is occupied.
    pub fn coefficients(&self, index: usize) -> &[u8] {
        let start = index * self.max_coefficients_size;
        &self.coefficients[start..start + self.coefficients_size]
    }

    pub(crate) fn coefficients_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.max_coefficients_size;
        &mut self.coefficients[start..start + self.coefficients_size]
    }

    /// The stored payload for slot `index`.
    ///
    /// Only meaningful while the slot is occupied.
    pub fn symbol(&self, index: usize) -> &[u8] {
        let start = index * self.max_symbol_size;
        &self.data[start..start + self.symbol_size]
    }

    pub(crate) fn symbol_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.max_symbol_size;
        &mut self.data[start..start + self.symbol_size]
    }

    /// Active number of symbols in the block.
    pub fn symbols(&self) -> usize {
        self.symbols
    }

    /// Active symbol size in bytes.
    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    /// Active coding-vector length in bytes.
    pub fn coefficients_size(&self) -> usize {
        self.coefficients_size
    }

    /// Active symbol length in field elements.
    pub fn symbol_length(&self) -> usize {
        self.symbol_length
    }

    /// Active block size in bytes.
    pub fn block_size(&self) -> usize {
        self.symbols * self.symbol_size
    }

    /// Maximum number of symbols this storage was constructed for.
    pub fn max_symbols(&self) -> usize {
        self.max_symbols
    }

    /// Maximum symbol size this storage was constructed for.
    pub fn max_symbol_size(&self) -> usize {
        self.max_symbol_size
    }

    /// Coding-vector length in bytes at maximum capacity.
    pub fn max_coefficients_size(&self) -> usize {
        self.max_coefficients_size
    }
}
