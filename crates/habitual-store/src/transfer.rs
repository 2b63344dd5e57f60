//! JSON export files

use chrono::{DateTime, Local};
use habitual_api::DataExport;
use std::path::Path;
use tracing::info;

use crate::{ImportSummary, Store, StoreResult};

/// Snapshot the store and write it as pretty-printed JSON.
///
/// Missing parent directories are created.
pub fn write_export(
    store: &dyn Store,
    path: &Path,
    exported_at: DateTime<Local>,
) -> StoreResult<DataExport> {
    let data = store.export_data(exported_at)?;
    let json = data.to_json_pretty()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;

    info!(path = %path.display(), "Export written");
    Ok(data)
}

/// Read an export document. Nothing is validated beyond the JSON shape.
pub fn read_export(path: &Path) -> StoreResult<DataExport> {
    let content = std::fs::read_to_string(path)?;
    Ok(DataExport::from_json(&content)?)
}

/// Read an export file and replace the store's contents with it
pub fn import_file(store: &dyn Store, path: &Path) -> StoreResult<ImportSummary> {
    let data = read_export(path)?;
    let summary = store.import_data(&data)?;
    info!(path = %path.display(), "Import file applied");
    Ok(summary)
}
