use std::sync::Arc;

use groupcast_channels::ChatSession;

/// Shared facade state: the one live session handle, injected at
/// construction. Concurrent requests share it without local locking; the
/// transport is expected to tolerate interleaved calls.
#[derive(Clone)]
pub struct FacadeState {
    pub session: Arc<dyn ChatSession>,
}
