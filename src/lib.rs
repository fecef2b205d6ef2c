//! Online random linear network coding over a block of symbols.
//!
//! A [`BlockEncoder`] emits linear combinations of a block's original
//! symbols; a [`BlockDecoder`] absorbs combinations one at a time with
//! incremental Gaussian elimination and can re-emit fresh valid
//! combinations ("recoding") before the block is fully recovered. Rank
//! transitions can drive a registered callback, and a [`DecoderPool`]
//! reuses instances across blocks without reallocation.
//!
//! Arithmetic runs over a pluggable finite field: [`Binary`] (GF(2), pure
//! XOR) or [`Binary8`] (GF(2^8)).
//!
//! ```
//! use rlncrs::{Binary8, BlockDecoder, BlockEncoder, UniformGenerator};
//!
//! let mut encoder = BlockEncoder::<Binary8>::new(4, 8);
//! let mut decoder = BlockDecoder::<Binary8>::new(4, 8);
//! let mut generator = UniformGenerator::<Binary8>::new(42);
//!
//! encoder.initialize(4, 8);
//! decoder.initialize(4, 8);
//! encoder.set_symbols(&[7u8; 32]);
//!
//! let mut id = [0u8; 4];
//! let mut payload = [0u8; 8];
//! while !decoder.is_complete() {
//!     encoder.encode(&mut generator, &mut id, &mut payload);
//!     decoder.decode_coded(&payload, &id);
//! }
//! assert_eq!(decoder.symbol(0).unwrap(), &[7u8; 8]);
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod galois;
pub mod generator;
pub mod inspect;
pub mod pool;
pub mod rank;
pub mod recoder;
pub mod storage;

pub use decoder::BlockDecoder;
pub use encoder::BlockEncoder;
pub use error::PoolError;
pub use galois::{Binary, Binary8, FiniteField};
pub use generator::{CachedGenerator, CoefficientGenerator, UniformGenerator};
pub use inspect::DecodingMatrix;
pub use pool::{DecoderPool, PooledDecoder};
pub use rank::RankObserver;
pub use recoder::Recoder;
pub use storage::{SlotStatus, SymbolStorage};
