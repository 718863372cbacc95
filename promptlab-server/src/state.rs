use promptlab_engine::engine::PlaygroundEngine;
use std::sync::Arc;

/// Shared handle to the one engine constructed at startup. Cloning is cheap;
/// there is no mutable state behind it.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PlaygroundEngine>,
}

impl AppState {
    pub fn new(engine: PlaygroundEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
