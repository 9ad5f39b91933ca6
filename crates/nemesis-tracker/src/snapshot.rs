//! Inventory snapshot documents.

use std::fs;
use std::path::Path;

use nemesis_common::{SnapshotError, SnapshotResult};
use nemesis_core::InventorySnapshot;
use tracing::debug;

/// Reads an inventory snapshot from a JSON document.
///
/// `loose` defaults to empty. A missing or null `committed` means the
/// crafting panel was hidden when the snapshot was taken.
pub fn load_snapshot(path: &Path) -> SnapshotResult<InventorySnapshot> {
    let content = fs::read_to_string(path)?;
    let snapshot: InventorySnapshot =
        serde_json::from_str(&content).map_err(|source| SnapshotError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Snapshot {:?}: {} loose, {} committed, panel visible: {}",
        path,
        snapshot.loose.len(),
        snapshot.committed().len(),
        snapshot.panel_visible()
    );
    Ok(snapshot)
}
