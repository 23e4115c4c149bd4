use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clipscribe_core::{
    derive_filename, extract_title, FailurePolicy, InputState, Outcome, RunState, RunSummary,
};
use engine_logging::{engine_error, engine_info, engine_warn};

use crate::filename::available_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::source::{read_source, InputSource};
use crate::{
    BatchEvent, CompletionTracker, ContentGenerator, CredentialPool, NoopProgressSink,
    ProgressSink,
};

#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Delay after every input that reached the generator.
    pub pacing: Duration,
    pub failure_policy: FailurePolicy,
    /// Write artifacts here instead of next to each source file.
    pub output_dir: Option<PathBuf>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(5),
            failure_policy: FailurePolicy::default(),
            output_dir: None,
        }
    }
}

/// Where the current input sits in the run.
struct Progress<'a> {
    position: usize,
    total: usize,
    input: &'a str,
}

/// Sequential driver: tracker check, pool-guarded generation, artifact write,
/// tracker update, pacing. One input at a time, in source order.
pub struct BatchEngine {
    settings: BatchSettings,
    pool: CredentialPool,
    tracker: CompletionTracker,
    generator: Arc<dyn ContentGenerator>,
    sink: Arc<dyn ProgressSink>,
}

impl BatchEngine {
    pub fn new(
        settings: BatchSettings,
        pool: CredentialPool,
        tracker: CompletionTracker,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            settings,
            pool,
            tracker,
            generator,
            sink: Arc::new(NoopProgressSink),
        }
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// Read every source up front, then dispatch. Unreadable sources are
    /// reported in the summary and skipped.
    pub async fn run(&mut self, paths: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary::new();
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            match read_source(path) {
                Ok(source) => sources.push(source),
                Err(err) => {
                    engine_error!("Skipping source: {}", err);
                    summary.unreadable_sources.push(path.clone());
                }
            }
        }
        self.dispatch(sources, summary).await
    }

    pub async fn run_sources(&mut self, sources: Vec<InputSource>) -> RunSummary {
        self.dispatch(sources, RunSummary::new()).await
    }

    async fn dispatch(&mut self, sources: Vec<InputSource>, mut summary: RunSummary) -> RunSummary {
        summary.state = RunState::Running;
        let total: usize = sources.iter().map(|source| source.inputs.len()).sum();
        engine_info!(
            "Starting run: {} inputs from {} sources, {} credentials, policy {}, record {}",
            total,
            sources.len(),
            self.pool.len(),
            self.settings.failure_policy,
            self.tracker.path().display()
        );

        let mut position = 0;
        'sources: for source in &sources {
            let output_dir = self.output_dir_for(&source.path);
            self.sink.emit(BatchEvent::SourceStarted {
                source: source.path.clone(),
                inputs: source.inputs.len(),
            });

            for input in &source.inputs {
                if self.pool.all_exhausted() {
                    let remaining = total - position;
                    engine_error!(
                        "All credentials exhausted; halting with {} inputs left",
                        remaining
                    );
                    summary.record_not_attempted(remaining);
                    summary.state = RunState::Halted;
                    self.sink.emit(BatchEvent::Halted { remaining });
                    break 'sources;
                }

                position += 1;
                let progress = Progress {
                    position,
                    total,
                    input: input.as_str(),
                };
                self.notify(&progress, InputState::Pending);
                let state = self
                    .process_input(&progress, &output_dir, &mut summary)
                    .await;
                self.notify(&progress, state);

                let dispatched = state != InputState::Skipped;
                if dispatched && position < total && !self.pool.all_exhausted() {
                    self.pace().await;
                }
            }
        }

        if summary.state == RunState::Running {
            summary.state = RunState::Completed;
        }
        for line in summary.report_lines(self.settings.failure_policy) {
            engine_info!("{}", line);
        }
        summary
    }

    async fn process_input(
        &mut self,
        progress: &Progress<'_>,
        output_dir: &Path,
        summary: &mut RunSummary,
    ) -> InputState {
        let input = progress.input;
        if self.tracker.has(input) {
            engine_info!("Skipping already processed: {}", input);
            summary.record_skip();
            return InputState::Skipped;
        }

        engine_info!("Processing: {}", input);
        self.notify(progress, InputState::Generating);
        let outcome = self.pool.attempt(input, self.generator.as_ref()).await;
        match outcome {
            Outcome::Success(text) => match self.write_artifact(input, &text, output_dir) {
                Ok(path) => {
                    engine_info!("Saved: {}", path.display());
                    self.tracker.add(input);
                    // Logged inside; the in-memory set stays authoritative.
                    let _ = self.tracker.save();
                    summary.record_success(path);
                    InputState::Succeeded
                }
                Err(err) => {
                    engine_error!("Failed to write artifact for {}: {}", input, err);
                    self.record_failure(input, summary, false);
                    InputState::Failed
                }
            },
            Outcome::Failure(reason) => {
                engine_error!("Generation failed for {}: {}", input, reason);
                // Quota exhaustion says nothing about the input itself.
                let markable = !self.pool.all_exhausted();
                self.record_failure(input, summary, markable);
                InputState::Failed
            }
            Outcome::Skipped => {
                summary.record_skip();
                InputState::Skipped
            }
        }
    }

    fn notify(&self, progress: &Progress<'_>, state: InputState) {
        self.sink.emit(BatchEvent::InputChanged {
            position: progress.position,
            total: progress.total,
            input: progress.input.to_string(),
            state,
        });
    }

    fn record_failure(&mut self, input: &str, summary: &mut RunSummary, markable: bool) {
        summary.record_failure(input);
        if markable && self.settings.failure_policy == FailurePolicy::MarkAttempted {
            self.tracker.add(input);
            let _ = self.tracker.save();
        }
    }

    fn write_artifact(
        &self,
        input: &str,
        text: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, PersistError> {
        let derived = derive_filename(Some(text), input);
        if extract_title(Some(text)).is_none() {
            engine_warn!(
                "Could not extract a title for {}, using fallback filename {}",
                input,
                derived
            );
        }
        let filename = available_filename(output_dir, &derived, input);
        if filename != derived {
            engine_warn!("{} already exists, writing {} instead", derived, filename);
        }
        AtomicFileWriter::new(output_dir.to_path_buf()).write(&filename, text)
    }

    fn output_dir_for(&self, source: &Path) -> PathBuf {
        if let Some(dir) = &self.settings.output_dir {
            return dir.clone();
        }
        match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    async fn pace(&self) {
        if self.settings.pacing.is_zero() {
            return;
        }
        engine_info!(
            "Waiting {:.1}s before next request",
            self.settings.pacing.as_secs_f64()
        );
        tokio::time::sleep(self.settings.pacing).await;
    }
}
