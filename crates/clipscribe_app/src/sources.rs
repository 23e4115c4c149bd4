//! Turns CLI arguments and the environment into the ordered list of input files.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::engine_warn;

pub const SOURCES_ENV: &str = "CLIPSCRIBE_SOURCES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Dir,
    Missing,
}

pub trait FilesystemProbe {
    fn kind(&self, path: &Path) -> PathKind;
    /// `*.json` files directly inside `dir`, in any order.
    fn json_files(&self, dir: &Path) -> Vec<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdFilesystem;

impl FilesystemProbe for StdFilesystem {
    fn kind(&self, path: &Path) -> PathKind {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => PathKind::Dir,
            Ok(_) => PathKind::File,
            Err(_) => PathKind::Missing,
        }
    }

    fn json_files(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                engine_warn!("Cannot list {:?}: {}", dir, err);
                return Vec::new();
            }
        };
        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect()
    }
}

/// Explicit arguments win, then the `CLIPSCRIBE_SOURCES` path list, then `.`.
///
/// Directories expand to their JSON files sorted by name; hidden files such as
/// the tracker record are left out of that expansion. Missing paths are
/// reported and dropped. The first occurrence of a path wins.
pub fn resolve_sources(
    args: &[PathBuf],
    env: Option<&OsStr>,
    probe: &dyn FilesystemProbe,
) -> Vec<PathBuf> {
    let candidates: Vec<PathBuf> = if !args.is_empty() {
        args.to_vec()
    } else if let Some(value) = env.filter(|v| !v.is_empty()) {
        std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect()
    } else {
        vec![PathBuf::from(".")]
    };

    let mut seen = HashSet::new();
    let mut resolved = Vec::new();
    for candidate in candidates {
        let expanded = match probe.kind(&candidate) {
            PathKind::File => vec![candidate],
            PathKind::Dir => {
                let mut files: Vec<PathBuf> = probe
                    .json_files(&candidate)
                    .into_iter()
                    .filter(|p| !is_hidden(p))
                    .collect();
                files.sort();
                if files.is_empty() {
                    engine_warn!("No JSON sources found in {:?}", candidate);
                }
                files
            }
            PathKind::Missing => {
                engine_warn!("Source {:?} does not exist, skipping", candidate);
                Vec::new()
            }
        };
        for path in expanded {
            if seen.insert(path.clone()) {
                resolved.push(path);
            }
        }
    }
    resolved
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
