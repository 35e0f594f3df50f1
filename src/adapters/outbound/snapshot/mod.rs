/// Snapshot adapter serving manifests, builds and channel configuration from one JSON file
mod snapshot_store;

pub use snapshot_store::{ManifestRecord, PackageSourceRecord, Snapshot, SnapshotStore};
