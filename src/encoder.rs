//! Block encoder: the source side of the coding session
//!
//! Holds the original symbols for one block and emits either systematic
//! copies or coded linear combinations under generated coding vectors.
//! Follows the same construct-once / initialize-per-block lifecycle as the
//! decoder so encoders can be pooled the same way.

use std::marker::PhantomData;

use crate::galois::FiniteField;
use crate::generator::CoefficientGenerator;

/// Encoder for one coding block.
pub struct BlockEncoder<F: FiniteField> {
    max_symbols: usize,
    max_symbol_size: usize,

    symbols: usize,
    symbol_size: usize,
    coefficients_size: usize,

    /// Original symbol payloads, flat arena with `max_symbol_size` stride.
    data: Vec<u8>,
    /// Scratch coding vector for `encode`.
    coefficients: Vec<u8>,

    _field: PhantomData<F>,
}

impl<F: FiniteField> BlockEncoder<F> {
    /// Allocate an encoder for blocks of up to `max_symbols` symbols of up
    /// to `max_symbol_size` bytes each.
    ///
    /// # Panics
    ///
    /// Panics if either maximum is zero.
    pub fn new(max_symbols: usize, max_symbol_size: usize) -> Self {
        assert!(max_symbols > 0, "max_symbols must be nonzero");
        assert!(max_symbol_size > 0, "max_symbol_size must be nonzero");

        BlockEncoder {
            max_symbols,
            max_symbol_size,
            symbols: 0,
            symbol_size: 0,
            coefficients_size: 0,
            data: vec![0; max_symbols * max_symbol_size],
            coefficients: vec![0; F::coefficients_size(max_symbols)],
            _field: PhantomData,
        }
    }

    /// Configure the active block dimensions. Symbol payloads default to
    /// zero until set. Never reallocates.
    ///
    /// # Panics
    ///
    /// Panics if either argument is zero or exceeds the construction maxima.
    pub fn initialize(&mut self, symbols: usize, symbol_size: usize) {
        assert!(symbols > 0, "symbols must be nonzero");
        assert!(symbol_size > 0, "symbol_size must be nonzero");
        assert!(symbols <= self.max_symbols, "symbols exceeds maximum");
        assert!(
            symbol_size <= self.max_symbol_size,
            "symbol_size exceeds maximum"
        );

        self.symbols = symbols;
        self.symbol_size = symbol_size;
        self.coefficients_size = F::coefficients_size(symbols);
        self.data[..symbols * self.max_symbol_size].fill(0);
    }

    /// Set one original symbol.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or `data` does not match the
    /// active symbol size.
    pub fn set_symbol(&mut self, index: usize, data: &[u8]) {
        assert!(index < self.symbols, "symbol index out of range");
        assert_eq!(data.len(), self.symbol_size, "symbol buffer length mismatch");

        let start = index * self.max_symbol_size;
        self.data[start..start + self.symbol_size].copy_from_slice(data);
    }

    /// Set the whole block from contiguous symbol payloads.
    ///
    /// # Panics
    ///
    /// Panics if `block` does not hold exactly `symbols * symbol_size` bytes.
    pub fn set_symbols(&mut self, block: &[u8]) {
        assert_eq!(
            block.len(),
            self.symbols * self.symbol_size,
            "block buffer length mismatch"
        );
        for (index, symbol) in block.chunks_exact(self.symbol_size).enumerate() {
            self.set_symbol(index, symbol);
        }
    }

    /// Copy the original symbol at `index` into `data_out` (systematic
    /// transmission).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or `data_out` is too short.
    pub fn encode_systematic(&self, index: usize, data_out: &mut [u8]) {
        assert!(index < self.symbols, "symbol index out of range");
        assert!(
            data_out.len() >= self.symbol_size,
            "symbol buffer too short"
        );

        data_out[..self.symbol_size].copy_from_slice(self.symbol(index));
    }

    /// Draw a fresh coding vector from `generator`, write it to `id_out`,
    /// and write the corresponding combination of the block's symbols to
    /// `data_out`. Returns the number of coding-vector bytes written.
    ///
    /// # Panics
    ///
    /// Panics if the output buffers are too short.
    pub fn encode<G: CoefficientGenerator<F>>(
        &mut self,
        generator: &mut G,
        id_out: &mut [u8],
        data_out: &mut [u8],
    ) -> usize {
        let id_size = self.coefficients_size;
        assert!(id_size > 0, "encode before initialize");
        assert!(id_out.len() >= id_size, "coding vector buffer too short");

        generator.generate(self.symbols, &mut self.coefficients[..id_size]);
        id_out[..id_size].copy_from_slice(&self.coefficients[..id_size]);
        self.encode_with_id(id_out, data_out);
        id_size
    }

    /// Combine the block's symbols under an externally supplied coding
    /// vector, e.g. one agreed through
    /// [`CoefficientGenerator::fill`](crate::generator::CoefficientGenerator::fill).
    ///
    /// # Panics
    ///
    /// Panics if the buffers do not match the active sizes.
    pub fn encode_with_id(&self, coefficients: &[u8], data_out: &mut [u8]) {
        assert!(
            coefficients.len() >= self.coefficients_size,
            "coding vector buffer too short"
        );
        assert!(
            data_out.len() >= self.symbol_size,
            "symbol buffer too short"
        );

        data_out[..self.symbol_size].fill(0);
        for i in 0..self.symbols {
            let c = F::get(coefficients, i);
            if c == 0 {
                continue;
            }
            if F::IS_BINARY || c == 1 {
                F::add_assign(&mut data_out[..self.symbol_size], self.symbol(i));
            } else {
                F::multiply_add(&mut data_out[..self.symbol_size], self.symbol(i), c);
            }
        }
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

    fn symbol(&self, index: usize) -> &[u8] {
        let start = index * self.max_symbol_size;
        &self.data[start..start + self.symbol_size]
    }
}
