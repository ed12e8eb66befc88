//! # Association sidecar cache
//!
//! The association of a dataset is computed once and stored next to the ground truth file as a
//! JSON object:
//!
//! ```text
//! { "0": [0, 0.0021], "1": [1, 0.0018], ... }                       // compact entries
//! { "0": [0, 0.0021, 1305031102.1753, 1305031102.1732], ... }        // entries with timestamps
//! ```
//!
//! Keys are the decimal primary index, values the entry tuple (see
//! [`AssociationEntry`](crate::association::AssociationEntry)). Files are written with keys in
//! ascending numeric order.
//!
//! ## Reuse policy
//! -----------------
//! If the sidecar exists it is loaded as-is and the association is **not** recomputed, even if
//! the source data changed since. Delete the sidecar to force a rebuild. A sidecar that exists but
//! cannot be parsed is a hard error ([`GroundTruthError::CacheCorrupted`]).
//!
//! ## Writes
//! -----------------
//! The map is serialized to a uniquely named temporary file in the sidecar's directory which is
//! then renamed over the sidecar path, so a reader never sees a half-written file.
use std::{collections::BTreeMap, io::BufWriter, io::Write};

use camino::Utf8Path;
use tempfile::NamedTempFile;
use tracing::info;

use super::{AssociationEntry, AssociationMap};
use crate::groundtruth_errors::GroundTruthError;

/// Load the association map stored at `path`.
///
/// Errors
/// ----------
/// * [`GroundTruthError::NotFound`] if `path` does not exist.
/// * [`GroundTruthError::CacheCorrupted`] if the content is not a valid association object
///   (bad JSON, non-integer keys, malformed tuples).
pub fn load(path: &Utf8Path) -> Result<AssociationMap, GroundTruthError> {
    if !path.is_file() {
        return Err(GroundTruthError::NotFound(path.to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let entries: BTreeMap<usize, AssociationEntry> =
        serde_json::from_str(&content).map_err(|e| GroundTruthError::CacheCorrupted {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    Ok(entries.into_iter().collect())
}

/// Write `map` to `path`, replacing any previous file atomically.
///
/// The content goes to a uniquely named temporary file in the same directory, which is then
/// persisted over `path`. Concurrent writers each use their own temporary file; the last rename
/// wins. The temporary file is removed if serialization fails.
pub fn save(path: &Utf8Path, map: &AssociationMap) -> Result<(), GroundTruthError> {
    let ordered: BTreeMap<usize, &AssociationEntry> = map.iter().collect();

    let dir = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut writer, &ordered)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Load the sidecar at `path` if it exists, otherwise run `build` and persist its result.
///
/// Arguments
/// -----------------
/// * `path` – Sidecar location.
/// * `build` – Computes the association; only called when no sidecar exists.
///
/// Return
/// ----------
/// * The cached or freshly computed map.
pub fn load_or_build<F>(path: &Utf8Path, build: F) -> Result<AssociationMap, GroundTruthError>
where
    F: FnOnce() -> Result<AssociationMap, GroundTruthError>,
{
    if path.is_file() {
        info!(sidecar = %path, "loading cached associations");
        return load(path);
    }

    info!(sidecar = %path, "computing groundtruth associations (one-time operation)");
    let map = build()?;
    save(path, &map)?;
    Ok(map)
}
