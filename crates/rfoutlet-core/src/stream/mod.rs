// ── Snapshot subscriptions ──
//
// Handed out by SnapshotStore::subscribe. Each replacement of the
// group list wakes every subscriber once.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::Group;

/// Follows the store's group list.
///
/// `current` is the list this subscriber last saw; `changed` moves it
/// forward to the next replacement.
pub struct SnapshotStream {
    seen: Arc<Vec<Group>>,
    rx: watch::Receiver<Arc<Vec<Group>>>,
}

impl SnapshotStream {
    pub(crate) fn new(mut rx: watch::Receiver<Arc<Vec<Group>>>) -> Self {
        let seen = rx.borrow_and_update().clone();
        Self { seen, rx }
    }

    pub fn current(&self) -> &Arc<Vec<Group>> {
        &self.seen
    }

    /// Resolve with the next replacement, or `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Group>>> {
        self.rx.changed().await.ok()?;
        self.seen = self.rx.borrow_and_update().clone();
        Some(Arc::clone(&self.seen))
    }
}
