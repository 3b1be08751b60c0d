// ── Snapshot storage ──

mod snapshot_store;

pub use snapshot_store::SnapshotStore;
