//! Finite field arithmetic for network coding operations
//!
//! All coding vectors and symbol payloads are stored as byte buffers; the
//! [`FiniteField`] trait defines how field elements are packed into those
//! buffers and how slice-level combination operations behave.
//!
//! Two fields are provided:
//!
//! - [`Binary`]: GF(2), one element per bit. The only nonzero element is the
//!   multiplicative identity, so every combination degenerates to XOR.
//! - [`Binary8`]: GF(2^8) with generator polynomial 0x11D
//!   (x⁸ + x⁴ + x³ + x² + 1), using log/antilog tables for multiplication.

use std::sync::OnceLock;

/// GF(2^8) generator polynomial: 0x11D (x⁸ + x⁴ + x³ + x² + 1)
const GF8_GENERATOR: u32 = 0x11D;

/// Arithmetic and packing rules for one finite field.
///
/// Element values are carried in `u8`; fields narrower than a byte only use
/// the low bits. Slice operations treat whole buffers as packed element
/// sequences, which makes them equally valid for coding vectors and for
/// symbol payloads.
pub trait FiniteField {
    /// Bits per field element.
    const BITS: usize;

    /// True for GF(2), where multiply-add degenerates to XOR.
    const IS_BINARY: bool;

    /// Maximum element value, used to mask random draws.
    const MAX_VALUE: u8;

    /// Bytes needed to store a coding vector of `elements` field elements.
    fn coefficients_size(elements: usize) -> usize;

    /// Number of field elements packed into `bytes` bytes.
    fn elements_needed(bytes: usize) -> usize;

    /// Read the element at `index` from a packed buffer.
    fn get(buffer: &[u8], index: usize) -> u8;

    /// Write the element at `index` into a packed buffer.
    fn set(buffer: &mut [u8], index: usize, value: u8);

    /// Multiplicative inverse of a nonzero element.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero.
    fn invert(value: u8) -> u8;

    /// Zero any packing padding beyond `elements` in `buffer`. A no-op for
    /// byte-aligned fields.
    fn mask_padding(buffer: &mut [u8], elements: usize) {
        let _ = (buffer, elements);
    }

    /// `dst += src`, element-wise. Addition in GF(2^n) is XOR.
    fn add_assign(dst: &mut [u8], src: &[u8]) {
        debug_assert_eq!(dst.len(), src.len());
        for (d, s) in dst.iter_mut().zip(src) {
            *d ^= s;
        }
    }

    /// `dst += coefficient * src`, element-wise.
    fn multiply_add(dst: &mut [u8], src: &[u8], coefficient: u8);

    /// `dst *= coefficient`, element-wise.
    fn multiply_assign(dst: &mut [u8], coefficient: u8);
}

/// The binary field GF(2), elements packed eight per byte.
pub struct Binary;

impl FiniteField for Binary {
    const BITS: usize = 1;
    const IS_BINARY: bool = true;
    const MAX_VALUE: u8 = 1;

    fn coefficients_size(elements: usize) -> usize {
        elements.div_ceil(8)
    }

    fn elements_needed(bytes: usize) -> usize {
        bytes * 8
    }

    #[inline]
    fn get(buffer: &[u8], index: usize) -> u8 {
        (buffer[index / 8] >> (index % 8)) & 1
    }

    #[inline]
    fn set(buffer: &mut [u8], index: usize, value: u8) {
        debug_assert!(value <= 1);
        let mask = 1u8 << (index % 8);
        if value == 0 {
            buffer[index / 8] &= !mask;
        } else {
            buffer[index / 8] |= mask;
        }
    }

    #[inline]
    fn invert(value: u8) -> u8 {
        assert_eq!(value, 1, "cannot invert zero in GF(2)");
        1
    }

    fn mask_padding(buffer: &mut [u8], elements: usize) {
        let full_bytes = elements / 8;
        let used_bits = elements % 8;
        if used_bits != 0 {
            buffer[full_bytes] &= (1u8 << used_bits) - 1;
        }
        let tail = full_bytes + usize::from(used_bits != 0);
        buffer[tail..].fill(0);
    }

    fn multiply_add(dst: &mut [u8], src: &[u8], coefficient: u8) {
        debug_assert!(coefficient <= 1);
        if coefficient == 0 {
            return;
        }
        Self::add_assign(dst, src);
    }

    fn multiply_assign(dst: &mut [u8], coefficient: u8) {
        debug_assert!(coefficient <= 1);
        if coefficient == 0 {
            dst.fill(0);
        }
    }
}

/// Log/antilog lookup tables for GF(2^8).
struct Gf8Table {
    log: [u8; 256],
    antilog: [u8; 256],
}

impl Gf8Table {
    fn new() -> Self {
        let mut table = Gf8Table {
            log: [0; 256],
            antilog: [0; 256],
        };

        let mut b = 1u32;
        for l in 0..255 {
            table.log[b as usize] = l as u8;
            table.antilog[l] = b as u8;

            b <<= 1;
            if b & 0x100 != 0 {
                b ^= GF8_GENERATOR;
            }
        }
        table.log[0] = 255;
        table.antilog[255] = 0;

        table
    }

    fn get() -> &'static Gf8Table {
        static TABLE: OnceLock<Gf8Table> = OnceLock::new();
        TABLE.get_or_init(Gf8Table::new)
    }
}

/// The byte field GF(2^8), one element per byte.
pub struct Binary8;

impl Binary8 {
    /// Multiply two elements using the log tables.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let table = Gf8Table::get();
        let log_sum = (table.log[a as usize] as usize + table.log[b as usize] as usize) % 255;
        table.antilog[log_sum]
    }
}

impl FiniteField for Binary8 {
    const BITS: usize = 8;
    const IS_BINARY: bool = false;
    const MAX_VALUE: u8 = 255;

    fn coefficients_size(elements: usize) -> usize {
        elements
    }

    fn elements_needed(bytes: usize) -> usize {
        bytes
    }

    #[inline]
    fn get(buffer: &[u8], index: usize) -> u8 {
        buffer[index]
    }

    #[inline]
    fn set(buffer: &mut [u8], index: usize, value: u8) {
        buffer[index] = value;
    }

    #[inline]
    fn invert(value: u8) -> u8 {
        assert_ne!(value, 0, "cannot invert zero in GF(2^8)");
        let table = Gf8Table::get();
        let log = table.log[value as usize] as usize;
        table.antilog[(255 - log) % 255]
    }

    fn multiply_add(dst: &mut [u8], src: &[u8], coefficient: u8) {
        debug_assert_eq!(dst.len(), src.len());
        match coefficient {
            0 => {}
            1 => Self::add_assign(dst, src),
            c => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d ^= Self::multiply(c, *s);
                }
            }
        }
    }

    fn multiply_assign(dst: &mut [u8], coefficient: u8) {
        match coefficient {
            0 => dst.fill(0),
            1 => {}
            c => {
                for d in dst.iter_mut() {
                    *d = Self::multiply(c, *d);
                }
            }
        }
    }
}

/// True when every element in the packed buffer is zero.
pub fn is_zero(buffer: &[u8]) -> bool {
    buffer.iter().all(|&b| b == 0)
}
