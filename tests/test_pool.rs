//! Decoder pool lifecycle: acquire, release, exhaustion

use rlncrs::{Binary8, DecoderPool, PoolError};

#[test]
fn test_acquire_initializes_instance() {
    let pool = DecoderPool::<Binary8>::new(2, 8, 16);

    let mut decoder = pool.acquire(4, 10).unwrap();
    assert_eq!(decoder.rank(), 0);

    decoder.decode_systematic(&[1u8; 10], 0);
    assert_eq!(decoder.rank(), 1);
}

#[test]
fn test_release_on_drop() {
    let pool = DecoderPool::<Binary8>::new(1, 4, 4);
    assert_eq!(pool.available(), 1);

    {
        let _decoder = pool.acquire(4, 4).unwrap();
        assert_eq!(pool.available(), 0);
    }
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_exhaustion_is_an_error() {
    let pool = DecoderPool::<Binary8>::new(2, 4, 4);

    let _a = pool.acquire(4, 4).unwrap();
    let _b = pool.acquire(4, 4).unwrap();

    match pool.acquire(4, 4) {
        Err(PoolError::Exhausted { capacity }) => assert_eq!(capacity, 2),
        other => panic!("expected exhaustion, got {:?}", other.map(|_| ())),
    };
}

#[test]
fn test_reused_instance_starts_clean() {
    let pool = DecoderPool::<Binary8>::new(1, 4, 4);

    {
        let mut decoder = pool.acquire(4, 4).unwrap();
        decoder.decode_systematic(&[1, 2, 3, 4], 0);
        assert_eq!(decoder.rank(), 1);
        // Left registered on purpose; re-acquiring must clear it
        decoder.set_rank_changed_callback(|_| panic!("stale callback fired"));
    }

    // The same storage comes back with fresh state, and a block of
    // different dimensions is fine within the maxima.
    let mut decoder = pool.acquire(2, 3).unwrap();
    assert_eq!(decoder.rank(), 0);
    assert!(decoder.symbol(0).is_none());
    decoder.decode_systematic(&[9, 9, 9], 1);
    assert_eq!(decoder.symbol(1).unwrap(), &[9, 9, 9]);
}

#[test]
fn test_capacity_reporting() {
    let pool = DecoderPool::<Binary8>::new(3, 4, 4);
    assert_eq!(pool.capacity(), 3);
    assert_eq!(pool.available(), 3);

    let _a = pool.acquire(4, 4).unwrap();
    assert_eq!(pool.capacity(), 3);
    assert_eq!(pool.available(), 2);
}
