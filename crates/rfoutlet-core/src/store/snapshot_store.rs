// ── Reactive snapshot store ──
//
// Holds the most recent group list pushed by the server. Every inbound
// snapshot replaces the whole list; nothing is merged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{Group, Interval, Outlet};
use crate::stream::SnapshotStream;

/// Latest-snapshot holder with change notification.
pub struct SnapshotStore {
    groups: watch::Sender<Arc<Vec<Group>>>,
    version: watch::Sender<u64>,
    last_update: watch::Sender<Option<DateTime<Utc>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (groups, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0);
        let (last_update, _) = watch::channel(None);

        Self {
            groups,
            version,
            last_update,
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Replace the held list wholesale and notify subscribers.
    pub fn replace(&self, groups: Vec<Group>) {
        // send_replace updates even when nobody is subscribed.
        self.groups.send_replace(Arc::new(groups));
        self.version.send_modify(|v| *v += 1);
        self.last_update.send_replace(Some(Utc::now()));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Vec<Group>> {
        self.groups.borrow().clone()
    }

    /// Number of replacements so far. Zero until the first snapshot.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// `false` until a snapshot has been received. Distinguishes "no
    /// data yet" from "server has no groups".
    pub fn has_snapshot(&self) -> bool {
        self.version() > 0
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.borrow()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.groups.subscribe())
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn group(&self, id: &str) -> Option<Group> {
        self.groups.borrow().iter().find(|g| g.id == id).cloned()
    }

    pub fn outlet(&self, id: &str) -> Option<Outlet> {
        self.groups
            .borrow()
            .iter()
            .find_map(|g| g.outlet(id))
            .cloned()
    }

    /// Find an interval by id together with the id of its owning outlet.
    pub fn interval(&self, id: &str) -> Option<(String, Interval)> {
        self.groups
            .borrow()
            .iter()
            .flat_map(|g| &g.outlets)
            .find_map(|o| o.interval(id).map(|i| (o.id.clone(), i.clone())))
    }

    /// Every outlet across all groups, in group then outlet order.
    pub fn outlets(&self) -> Vec<Outlet> {
        self.groups
            .borrow()
            .iter()
            .flat_map(|g| g.outlets.iter().cloned())
            .collect()
    }

    /// Every interval across all outlets, in snapshot order.
    pub fn intervals(&self) -> Vec<Interval> {
        self.groups
            .borrow()
            .iter()
            .flat_map(|g| &g.outlets)
            .flat_map(|o| o.schedule.iter().cloned())
            .collect()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
