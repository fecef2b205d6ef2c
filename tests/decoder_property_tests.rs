//! Property-based tests for the block decoder
//!
//! These tests use proptest to validate the decoding invariants with
//! randomly generated symbol streams: rank never decreases, never exceeds
//! the block size, redundant input is idempotent, and full rank always
//! recovers the original block exactly.

use proptest::collection::vec;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rlncrs::{Binary, Binary8, BlockDecoder, BlockEncoder, UniformGenerator};

/// A raw incoming symbol: arbitrary coding-vector bytes plus payload bytes.
fn raw_symbols(
    coefficients_size: usize,
    symbol_size: usize,
) -> impl Strategy<Value = Vec<(Vec<u8>, Vec<u8>)>> {
    vec(
        (
            vec(any::<u8>(), coefficients_size),
            vec(any::<u8>(), symbol_size),
        ),
        1..24,
    )
}

proptest! {
    /// Property: rank is monotone non-decreasing and bounded by the block
    /// size for any GF(2^8) decode sequence.
    #[test]
    fn prop_rank_monotone_gf256(
        stream in raw_symbols(6, 4),
    ) {
        let mut decoder = BlockDecoder::<Binary8>::new(6, 4);
        decoder.initialize(6, 4);

        let mut previous = 0;
        for (id, payload) in &stream {
            decoder.decode_coded(payload, id);
            let rank = decoder.rank();
            prop_assert!(rank >= previous);
            prop_assert!(rank <= 6);
            previous = rank;
        }
    }

    /// Property: the same holds over GF(2), including coding vectors with
    /// arbitrary padding bits.
    #[test]
    fn prop_rank_monotone_binary(
        stream in raw_symbols(2, 3),
    ) {
        let mut decoder = BlockDecoder::<Binary>::new(10, 3);
        decoder.initialize(10, 3);

        let mut previous = 0;
        for (id, payload) in &stream {
            decoder.decode_coded(payload, id);
            let rank = decoder.rank();
            prop_assert!(rank >= previous);
            prop_assert!(rank <= 10);
            previous = rank;
        }
    }

    /// Property: decoding an identical (vector, payload) pair twice raises
    /// rank at most once.
    #[test]
    fn prop_redundancy_idempotent(
        id in vec(any::<u8>(), 5),
        payload in vec(any::<u8>(), 4),
    ) {
        let mut decoder = BlockDecoder::<Binary8>::new(5, 4);
        decoder.initialize(5, 4);

        decoder.decode_coded(&payload, &id);
        let after_first = decoder.rank();
        decoder.decode_coded(&payload, &id);

        prop_assert_eq!(decoder.rank(), after_first);
        prop_assert!(after_first <= 1);
    }

    /// Property: enough independent coded symbols always recover the
    /// original block exactly.
    #[test]
    fn prop_full_rank_recovers_block(
        seed in any::<u64>(),
        symbols in 1usize..=8,
        symbol_size in 1usize..=16,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut block = vec![0u8; symbols * symbol_size];
        rng.fill(&mut block[..]);

        let mut encoder = BlockEncoder::<Binary8>::new(8, 16);
        encoder.initialize(symbols, symbol_size);
        encoder.set_symbols(&block);

        let mut decoder = BlockDecoder::<Binary8>::new(8, 16);
        decoder.initialize(symbols, symbol_size);

        let mut generator = UniformGenerator::<Binary8>::new(seed ^ 1);
        let mut id = vec![0u8; symbols];
        let mut payload = vec![0u8; symbol_size];

        let mut attempts = 0;
        while !decoder.is_complete() {
            encoder.encode(&mut generator, &mut id, &mut payload);
            decoder.decode_coded(&payload, &id);
            attempts += 1;
            prop_assert!(attempts < 200, "failed to reach full rank");
        }

        for i in 0..symbols {
            prop_assert_eq!(
                decoder.symbol(i).unwrap(),
                &block[i * symbol_size..(i + 1) * symbol_size]
            );
        }
    }

    /// Property: recoded output never raises a fresh decoder's rank above
    /// the source decoder's rank.
    #[test]
    fn prop_recoding_reveals_nothing_beyond_source(
        stream in raw_symbols(5, 3),
        recodes in 1usize..16,
    ) {
        let mut source = BlockDecoder::<Binary8>::new(5, 3);
        source.initialize(5, 3);
        for (id, payload) in &stream {
            source.decode_coded(payload, id);
        }

        let mut sink = BlockDecoder::<Binary8>::new(5, 3);
        sink.initialize(5, 3);

        let mut generator = UniformGenerator::<Binary8>::new(0x5EC0DE);
        let mut id = vec![0u8; 5];
        let mut payload = vec![0u8; 3];
        for _ in 0..recodes {
            source.recode(&mut generator, &mut id, &mut payload);
            sink.decode_coded(&payload, &id);
        }

        prop_assert!(sink.rank() <= source.rank());
    }
}
