// Refinement - the bounded reporter/editor turn-taking loop
//
// The generator writes a seed draft from the topic; the reviewer then polishes
// each draft and either signs off with the termination marker or hands its
// rewrite back to the generator, up to `max_iterations` times.

pub mod loop_runner;
pub mod retry;
pub mod signal;
pub mod transcript;
pub mod types;

pub use loop_runner::RefinementLoop;
pub use retry::{with_retry, Interrupted, RetryPolicy};
pub use signal::{is_termination_signal, MarkerSignal, TerminationSignal};
pub use transcript::{ConsoleTranscript, RecordingTranscript, Transcript, TranscriptEvent};
pub use types::{IterationState, Phase, RefinementConfig, RefinementOutcome, Termination};
