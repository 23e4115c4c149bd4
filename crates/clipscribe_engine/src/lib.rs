//! Clipscribe engine: generation, credential failover, persistence and the batch driver.
mod batch;
mod filename;
mod generate;
mod persist;
mod pool;
mod source;
mod tracker;
mod types;

pub use batch::{BatchEngine, BatchSettings};
pub use filename::available_filename;
pub use generate::{
    strip_code_fence, ContentGenerator, GeminiGenerator, GeminiSettings, DEFAULT_API_BASE,
    DEFAULT_MODEL, DEFAULT_PROMPT,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pool::{ConfigError, CredentialPool, ALL_EXHAUSTED_REASON, EMPTY_CONTENT_REASON};
pub use source::{parse_inputs, read_source, InputSource, SourceError};
pub use tracker::{CompletionTracker, DEFAULT_TRACKER_FILE};
pub use types::{
    BatchEvent, Credential, FailureKind, GenerateError, NoopProgressSink, ProgressSink,
};
