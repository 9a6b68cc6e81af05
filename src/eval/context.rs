use tracing::trace;

/// State threaded through one synchronous walk.
///
/// The visit counter grows by one for every node entered. The root is always
/// the first node entered, so a counter of 1 identifies it.
#[derive(Debug, Default)]
pub struct SyncContext {
    visits: usize,
}

impl SyncContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit(&mut self) -> usize {
        self.visits += 1;
        trace!(visits = self.visits, "node visited");
        self.visits
    }

    pub fn visits(&self) -> usize {
        self.visits
    }

    pub fn is_root_visit(&self) -> bool {
        self.visits == 1
    }
}
