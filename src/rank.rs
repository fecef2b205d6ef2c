//! Rank change notification
//!
//! Wraps each decode call: rank is sampled before and after, and a single
//! registered handler fires synchronously when it increased. A dependent
//! (absorbed) symbol never fires. The handler is cleared on every block
//! `initialize` so a stale handler from a previous block can never run.

/// Handler invoked with the new rank after it increased.
pub type RankChangedCallback = Box<dyn FnMut(u32)>;

/// Holds at most one rank-changed handler.
#[derive(Default)]
pub struct RankObserver {
    callback: Option<RankChangedCallback>,
}

impl RankObserver {
    pub fn new() -> Self {
        RankObserver { callback: None }
    }

    /// Register a handler, replacing any previous one.
    pub fn set(&mut self, callback: impl FnMut(u32) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Clear the registered handler.
    pub fn reset(&mut self) {
        self.callback = None;
    }

    /// True when a handler is registered.
    pub fn is_set(&self) -> bool {
        self.callback.is_some()
    }

    /// Fire the handler when rank increased across a decode call.
    pub fn notify(&mut self, rank_before: u32, rank_after: u32) {
        if rank_after > rank_before {
            if let Some(callback) = &mut self.callback {
                callback(rank_after);
            }
        }
    }
}

impl std::fmt::Debug for RankObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankObserver")
            .field("registered", &self.callback.is_some())
            .finish()
    }
}
