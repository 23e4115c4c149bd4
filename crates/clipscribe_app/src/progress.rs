use clipscribe_core::InputState;
use clipscribe_engine::{BatchEvent, ProgressSink};
use engine_logging::{engine_debug, engine_info, engine_warn};

/// Reports batch progress through the log facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn emit(&self, event: BatchEvent) {
        match event {
            BatchEvent::SourceStarted { source, inputs } => {
                engine_info!("Source {:?}: {} inputs", source, inputs);
            }
            BatchEvent::InputChanged {
                position,
                total,
                input,
                state,
            } => match state {
                InputState::Pending => engine_info!("[{}/{}] {}", position, total, input),
                InputState::Failed => engine_warn!("[{}/{}] failed: {}", position, total, input),
                other => engine_debug!("[{}/{}] {:?}: {}", position, total, other, input),
            },
            BatchEvent::Halted { remaining } => {
                engine_warn!("Stopping early, {} inputs left for the next run", remaining);
            }
        }
    }
}
