//! Clipscribe core: pure outcome types, run bookkeeping and artifact naming.
mod state;
mod summary;
mod title;

pub use state::{FailurePolicy, InputState, Outcome, RunState};
pub use summary::RunSummary;
pub use title::{
    bounded_filename, derive_filename, extract_title, fallback_stem, sanitize_filename,
    suffixed_filename, ARTIFACT_EXTENSION, MAX_FILENAME_CHARS, TRUNCATED_STEM_CHARS,
};
