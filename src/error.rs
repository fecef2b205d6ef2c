//! Error types for pooled decoder management

use thiserror::Error;

/// Errors from the decoder reuse pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Every pre-allocated instance is currently handed out.
    #[error("decoder pool exhausted: all {capacity} instances are in use")]
    Exhausted { capacity: usize },
}
