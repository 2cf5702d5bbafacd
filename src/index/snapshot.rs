//! On-disk snapshot of a [`VectorIndex`].
//!
//! A store is a directory holding a single `index.json`. Saves rewrite the
//! whole file through a temp file in the same directory that is renamed
//! over the old snapshot, so readers see either the old or the new store.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::VectorIndex;
use crate::errors::Error;

/// File name of the snapshot inside the store directory.
pub const INDEX_FILE: &str = "index.json";

/// Path of the snapshot file for a store directory.
pub fn index_path(store_dir: &Path) -> PathBuf {
    store_dir.join(INDEX_FILE)
}

/// Load the snapshot stored under `store_dir`.
///
/// Returns `Ok(None)` when no snapshot has been written yet.
///
/// # Errors
///
/// - `Error::Io` if the file exists but cannot be read
/// - `Error::CorruptStore` if the contents are not a valid snapshot
/// - `Error::UnsupportedVersion` for snapshots from another format version
pub fn load(store_dir: &Path) -> Result<Option<VectorIndex>, Error> {
    let path = index_path(store_dir);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };

    let index: VectorIndex =
        serde_json::from_slice(&bytes).map_err(|e| Error::CorruptStore {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    if index.version != VectorIndex::VERSION {
        return Err(Error::UnsupportedVersion {
            found: index.version,
            expected: VectorIndex::VERSION,
        });
    }

    index.check_consistency().map_err(|reason| Error::CorruptStore {
        path: path.clone(),
        reason,
    })?;

    tracing::debug!(path = %path.display(), entries = index.len(), "loaded store");
    Ok(Some(index))
}

/// Persist `index` under `store_dir`, replacing any previous snapshot.
///
/// Creates the store directory if needed. The previous snapshot stays in
/// place unless the new one has been fully written and synced.
pub fn save(store_dir: &Path, index: &VectorIndex) -> Result<(), Error> {
    save_with(store_dir, index, |writer, index| {
        serde_json::to_writer(writer, index)?;
        Ok(())
    })
}

/// Write a snapshot using `encode` for the file contents.
///
/// The temp file is removed on every error path, including a failed rename.
fn save_with<F>(store_dir: &Path, index: &VectorIndex, encode: F) -> Result<(), Error>
where
    F: FnOnce(&mut dyn Write, &VectorIndex) -> Result<(), Error>,
{
    fs::create_dir_all(store_dir)?;

    let tmp = NamedTempFile::new_in(store_dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        encode(&mut writer, index)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    let path = index_path(store_dir);
    tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(path = %path.display(), entries = index.len(), "persisted store");
    Ok(())
}
