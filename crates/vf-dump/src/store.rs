//! Dump file layout and access.
//!
//! Two write paths with different lifetimes: the rolling `restart` slot is
//! overwritten at every persistence point (and on early termination), the
//! `intermediate/snapshot-<t>` archives accumulate and are never touched
//! again. Every write lands via a sibling temp file plus rename, so a slot
//! is always either the previous complete dump or the new one.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::{CHECKPOINT_VERSION, Checkpoint, CheckpointHeader};
use crate::{DumpError, DumpResult};

/// Rolling slot name. A restore looks here and nowhere else.
pub const RESTART_FILE: &str = "restart";
/// Directory holding the permanent archives.
pub const ARCHIVE_DIR: &str = "intermediate";
const ARCHIVE_PREFIX: &str = "snapshot-";

#[derive(Clone)]
pub struct DumpStore {
    base_dir: PathBuf,
}

impl DumpStore {
    /// Open a store rooted at `base_dir`, creating the archive directory
    /// if it is not there yet.
    pub fn open(base_dir: impl Into<PathBuf>) -> DumpResult<Self> {
        let base_dir = base_dir.into();
        let archive_dir = base_dir.join(ARCHIVE_DIR);
        if !archive_dir.exists() {
            fs::create_dir_all(&archive_dir)?;
        }
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn restart_path(&self) -> PathBuf {
        self.base_dir.join(RESTART_FILE)
    }

    /// Archive tag for a simulation time: four decimals, `0.3` -> `0.3000`.
    pub fn archive_tag(time: f64) -> String {
        format!("{time:.4}")
    }

    pub fn archive_path(&self, time: f64) -> PathBuf {
        self.base_dir
            .join(ARCHIVE_DIR)
            .join(format!("{ARCHIVE_PREFIX}{}", Self::archive_tag(time)))
    }

    pub fn has_restart(&self) -> bool {
        self.restart_path().exists()
    }

    /// Overwrite the rolling restart slot.
    pub fn write_restart<T: Serialize>(&self, checkpoint: &Checkpoint<T>) -> DumpResult<()> {
        write_checkpoint(&self.restart_path(), checkpoint)
    }

    /// Write the permanent archive tagged with the checkpoint's time.
    pub fn write_archive<T: Serialize>(&self, checkpoint: &Checkpoint<T>) -> DumpResult<PathBuf> {
        let path = self.archive_path(checkpoint.time);
        write_checkpoint(&path, checkpoint)?;
        Ok(path)
    }

    pub fn read_restart<T: DeserializeOwned>(&self) -> DumpResult<Checkpoint<T>> {
        let path = self.restart_path();
        if !path.exists() {
            return Err(DumpError::MissingRestart {
                path: path.display().to_string(),
            });
        }
        read_checkpoint(&path)
    }

    pub fn read_archive<T: DeserializeOwned>(&self, time: f64) -> DumpResult<Checkpoint<T>> {
        read_checkpoint(&self.archive_path(time))
    }

    /// Archive tags present on disk, sorted ascending.
    pub fn list_archives(&self) -> DumpResult<Vec<String>> {
        let archive_dir = self.base_dir.join(ARCHIVE_DIR);
        let mut tags = Vec::new();
        if !archive_dir.exists() {
            return Ok(tags);
        }
        for entry in fs::read_dir(&archive_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(tag) = name.strip_prefix(ARCHIVE_PREFIX)
                && !tag.ends_with(".tmp")
            {
                tags.push(tag.to_string());
            }
        }
        tags.sort_by(|a, b| {
            let ta = a.parse::<f64>().unwrap_or(f64::MAX);
            let tb = b.parse::<f64>().unwrap_or(f64::MAX);
            ta.total_cmp(&tb)
        });
        Ok(tags)
    }
}

/// Read envelope metadata without deserializing the solver payload.
pub fn read_header(path: &Path) -> DumpResult<CheckpointHeader> {
    let content = fs::read_to_string(path)?;
    let header: CheckpointHeader = serde_json::from_str(&content)?;
    check_version(header.version)?;
    Ok(header)
}

fn write_checkpoint<T: Serialize>(path: &Path, checkpoint: &Checkpoint<T>) -> DumpResult<()> {
    let json = serde_json::to_string(checkpoint)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_checkpoint<T: DeserializeOwned>(path: &Path) -> DumpResult<Checkpoint<T>> {
    let content = fs::read_to_string(path)?;
    let checkpoint: Checkpoint<T> = serde_json::from_str(&content)?;
    check_version(checkpoint.version)?;
    Ok(checkpoint)
}

fn check_version(found: u32) -> DumpResult<()> {
    if found > CHECKPOINT_VERSION {
        return Err(DumpError::Version {
            found,
            supported: CHECKPOINT_VERSION,
        });
    }
    Ok(())
}

// Append `.tmp` to the whole file name; with_extension would clobber the
// decimals in an archive tag.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
