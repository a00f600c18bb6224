//! Persistent set of processed keys, stored as a JSON object mapping each key to `true`
//!
//! Used for both downloaded item ids and separated file hashes.

use std::{
    collections::{BTreeMap, BTreeSet},
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, error};
use serde::Serialize;
use serde_json::Value;

use crate::storage::error::TrackerError;

/// Keys marked `true`.
///
/// Entries with any other value are not part of the set, but are kept as
/// they were and written back on save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerSet {
    processed: BTreeSet<String>,
    other: BTreeMap<String, Value>,
}

impl TrackerSet {
    pub fn contains(&self, key: &str) -> bool {
        self.processed.contains(key)
    }

    /// returns false if the key was already present
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        self.other.remove(&key);
        self.processed.insert(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.processed.remove(key)
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.processed.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TrackerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            processed: iter.into_iter().map(Into::into).collect(),
            other: BTreeMap::new(),
        }
    }
}

/// Handle to a tracker file.
///
/// Every operation goes to disk, nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Tracker {
    path: PathBuf,
}

impl Tracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the tracker file. A missing file is an empty set.
    pub fn try_load(&self) -> Result<TrackerSet, TrackerError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TrackerSet::default()),
            Err(source) => {
                return Err(TrackerError::Fs {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let corrupt = |reason: String| TrackerError::Corrupt {
            path: self.path.clone(),
            reason,
        };

        let contents = String::from_utf8(bytes).map_err(|e| corrupt(e.to_string()))?;

        let entries = match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(entries)) => entries,
            Ok(_) => return Err(corrupt("expected a JSON object".to_string())),
            Err(e) => return Err(corrupt(e.to_string())),
        };

        let mut set = TrackerSet::default();
        for (key, value) in entries {
            if value == Value::Bool(true) {
                set.processed.insert(key);
            } else {
                debug!(
                    "tracker entry {key} with value {value} is not marked processed in {}",
                    self.path.display()
                );
                set.other.insert(key, value);
            }
        }
        Ok(set)
    }

    /// Like [`Tracker::try_load`], but never fails: unreadable storage is logged and treated as empty
    pub fn load(&self) -> TrackerSet {
        match self.try_load() {
            Ok(set) => set,
            Err(e) => {
                error!("{e}; starting from an empty tracker");
                TrackerSet::default()
            }
        }
    }

    /// Reads the set ahead of a rewrite.
    ///
    /// Corrupt content is logged and treated as empty. A file that cannot be
    /// read is an error, so recorded keys are never overwritten.
    pub fn load_for_update(&self) -> Result<TrackerSet, TrackerError> {
        match self.try_load() {
            Err(e @ TrackerError::Corrupt { .. }) => {
                error!("{e}; starting from an empty tracker");
                Ok(TrackerSet::default())
            }
            result => result,
        }
    }

    /// Rewrites the whole file. Writes a sibling temp file first, then renames it over the target.
    pub fn save(&self, set: &TrackerSet) -> Result<(), TrackerError> {
        let marked = Value::Bool(true);
        let entries = set
            .other
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .chain(set.iter().map(|key| (key, &marked)))
            .collect::<BTreeMap<_, _>>();

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        entries.serialize(&mut ser)?;
        buf.push(b'\n');

        let fs_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| TrackerError::Fs { path, source }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(fs_err(parent))?;
        }

        let tmp = self.tmp_path();
        std::fs::write(&tmp, &buf).map_err(fs_err(&tmp))?;
        std::fs::rename(&tmp, &self.path).map_err(fs_err(&self.path))?;
        Ok(())
    }

    /// Inserts the key and persists. Returns false, without writing, if it was already present.
    pub fn mark_processed(&self, key: &str) -> Result<bool, TrackerError> {
        let mut set = self.load_for_update()?;
        if !set.insert(key) {
            return Ok(false);
        }
        self.save(&set)?;
        Ok(true)
    }

    /// Removes the key and persists. Returns false, without writing, if it was absent.
    pub fn forget(&self, key: &str) -> Result<bool, TrackerError> {
        let mut set = self.load_for_update()?;
        if !set.remove(key) {
            return Ok(false);
        }
        self.save(&set)?;
        Ok(true)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.load().contains(key)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}
