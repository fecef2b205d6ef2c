//! Decoder state inspection
//!
//! Renders the decoding matrix for debugging, one slot per line with a
//! status marker: `U` for uncoded, `C` for coded, `?` for unseen.

use std::fmt;

use crate::galois::FiniteField;
use crate::storage::{SlotStatus, SymbolStorage};

/// Display adapter over a decoder's slot storage.
///
/// ```
/// use rlncrs::{Binary8, BlockDecoder};
///
/// let mut decoder = BlockDecoder::<Binary8>::new(3, 4);
/// decoder.initialize(3, 4);
/// decoder.decode_systematic(&[1, 2, 3, 4], 0);
/// println!("{}", decoder.decoding_matrix());
/// ```
pub struct DecodingMatrix<'a, F: FiniteField> {
    storage: &'a SymbolStorage<F>,
}

impl<'a, F: FiniteField> DecodingMatrix<'a, F> {
    pub fn new(storage: &'a SymbolStorage<F>) -> Self {
        DecodingMatrix { storage }
    }
}

impl<F: FiniteField> fmt::Display for DecodingMatrix<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = self.storage.symbols();
        for i in 0..symbols {
            let marker = match self.storage.status(i) {
                SlotStatus::Uncoded => 'U',
                SlotStatus::Coded => 'C',
                SlotStatus::Unseen => '?',
            };
            write!(f, "{} {}:\t", i, marker)?;

            if self.storage.is_occupied(i) {
                let row = self.storage.coefficients(i);
                for j in 0..symbols {
                    write!(f, "{} ", F::get(row, j))?;
                }
            } else {
                for _ in 0..symbols {
                    write!(f, "- ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::BlockDecoder;
    use crate::galois::Binary8;

    #[test]
    fn test_matrix_rendering() {
        let mut decoder = BlockDecoder::<Binary8>::new(3, 2);
        decoder.initialize(3, 2);
        decoder.decode_systematic(&[1, 2], 1);
        decoder.decode_coded(&[3, 4], &[0, 0, 5]);

        let rendered = format!("{}", DecodingMatrix::new(decoder.storage()));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0 ?:\t- - - ");
        assert_eq!(lines[1], "1 U:\t0 1 0 ");
        assert_eq!(lines[2], "2 U:\t0 0 1 ");
    }
}
