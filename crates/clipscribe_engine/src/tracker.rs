use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use engine_logging::{engine_error, engine_info, engine_warn};
use serde::{Deserialize, Serialize};

use crate::persist::{AtomicFileWriter, PersistError};

pub const DEFAULT_TRACKER_FILE: &str = ".processed_urls.json";

#[derive(Debug, Serialize, Deserialize)]
struct TrackerRecord {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    count: usize,
    #[serde(alias = "identifiers")]
    urls: Vec<String>,
}

/// Durable set of inputs that already produced an artifact.
///
/// The in-memory set is authoritative during a run; `save` rewrites the whole
/// record. A tracker dropped with unsaved additions flushes once on drop.
#[derive(Debug)]
pub struct CompletionTracker {
    path: PathBuf,
    order: Vec<String>,
    processed: HashSet<String>,
    dirty: bool,
}

impl CompletionTracker {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            order: Vec::new(),
            processed: HashSet::new(),
            dirty: false,
        }
    }

    /// Load a previous record. Missing or unreadable records start empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut tracker = Self::empty(path);
        let content = match fs::read_to_string(&tracker.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                engine_info!("No previous records found, starting fresh");
                return tracker;
            }
            Err(err) => {
                engine_warn!(
                    "Failed to read tracker {:?}, starting fresh: {}",
                    tracker.path,
                    err
                );
                return tracker;
            }
        };

        let record: TrackerRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(err) => {
                engine_warn!(
                    "Failed to parse tracker {:?}, starting fresh: {}",
                    tracker.path,
                    err
                );
                return tracker;
            }
        };

        for url in record.urls {
            tracker.add(&url);
        }
        tracker.dirty = false;
        engine_info!(
            "Loaded {} previously processed inputs from {:?}",
            tracker.len(),
            tracker.path
        );
        tracker
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has(&self, id: &str) -> bool {
        self.processed.contains(id)
    }

    /// Insert without persisting. Returns `false` when already present.
    pub fn add(&mut self, id: &str) -> bool {
        if !self.processed.insert(id.to_string()) {
            return false;
        }
        self.order.push(id.to_string());
        self.dirty = true;
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in the order they were first recorded.
    pub fn identifiers(&self) -> &[String] {
        &self.order
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Rewrite the record. Errors are logged here; callers may carry on.
    pub fn save(&mut self) -> Result<(), PersistError> {
        match self.write_record() {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                engine_error!("Failed to save tracker {:?}: {}", self.path, err);
                Err(err)
            }
        }
    }

    fn write_record(&self) -> Result<(), PersistError> {
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                PersistError::OutputDir(format!("invalid tracker path {:?}", self.path))
            })?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let record = TrackerRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            count: self.order.len(),
            urls: self.order.clone(),
        };
        let content = serde_json::to_string_pretty(&record)?;
        AtomicFileWriter::new(dir).write(filename, &content)?;
        Ok(())
    }
}

impl Drop for CompletionTracker {
    fn drop(&mut self) {
        if self.dirty {
            engine_warn!("Flushing unsaved tracker state to {:?}", self.path);
            let _ = self.save();
        }
    }
}
