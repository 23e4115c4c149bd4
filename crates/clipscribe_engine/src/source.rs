use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_info, engine_warn};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path:?} is not a JSON array of strings")]
    NotAnArray { path: PathBuf },
}

/// One file's worth of inputs, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub path: PathBuf,
    pub inputs: Vec<String>,
}

impl InputSource {
    pub fn new(path: impl Into<PathBuf>, inputs: Vec<String>) -> Self {
        Self {
            path: path.into(),
            inputs,
        }
    }
}

pub fn read_source(path: &Path) -> Result<InputSource, SourceError> {
    engine_info!("Reading inputs from {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let inputs = parse_inputs(path, &content)?;
    Ok(InputSource::new(path, inputs))
}

/// Parse a JSON array of identifier strings. Blank entries are dropped.
pub fn parse_inputs(path: &Path, content: &str) -> Result<Vec<String>, SourceError> {
    let value: Value = serde_json::from_str(content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Array(items) = value else {
        return Err(SourceError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    let mut inputs = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(id) if id.trim().is_empty() => {
                engine_warn!("Ignoring blank entry in {:?}", path);
            }
            Value::String(id) => inputs.push(id),
            _ => {
                return Err(SourceError::NotAnArray {
                    path: path.to_path_buf(),
                })
            }
        }
    }
    Ok(inputs)
}
