// Refinement loop runner - seed draft + bounded review/regenerate rounds

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::retry::{with_retry, Interrupted};
use super::signal::TerminationSignal;
use super::transcript::Transcript;
use super::types::{IterationState, RefinementConfig, RefinementOutcome};
use crate::errors::{RefineError, Stage};
use crate::roles::Role;

/// The reporter/editor refinement loop.
///
/// Calls the generator once on the topic, then alternates reviewer and
/// generator until one of the following conditions is met:
/// - The reviewer output satisfies the termination signal
/// - `max_iterations` review rounds have run
/// - A completion call fails (after any configured retries)
/// - The cancellation token fires
///
/// Completion calls are strictly sequential; each one's input is the
/// previous one's output.
pub struct RefinementLoop {
    generator: Arc<dyn Role>,
    reviewer: Arc<dyn Role>,
    signal: Arc<dyn TerminationSignal>,
    config: RefinementConfig,
}

impl RefinementLoop {
    pub fn new(
        generator: Arc<dyn Role>,
        reviewer: Arc<dyn Role>,
        signal: Arc<dyn TerminationSignal>,
        config: RefinementConfig,
    ) -> Self {
        Self {
            generator,
            reviewer,
            signal,
            config,
        }
    }

    /// Run the full loop for `topic`.
    ///
    /// A run that exhausts `max_iterations` without the marker still succeeds;
    /// the outcome's `termination` tells the two endings apart.
    pub async fn run(
        &self,
        topic: &str,
        transcript: &mut dyn Transcript,
        cancel: &CancellationToken,
    ) -> Result<RefinementOutcome, RefineError> {
        info!(
            generator = self.generator.name(),
            reviewer = self.reviewer.name(),
            max_iterations = self.config.max_iterations,
            "Starting refinement run"
        );

        // ── Seed ────────────────────────────────────────────────────────────
        let seed = self
            .invoke(self.generator.as_ref(), topic, Stage::Seed, None, cancel)
            .await?;
        transcript.seed(&seed);

        let mut state = IterationState::seeded(seed, self.config.max_iterations);

        while !state.is_terminated() {
            let iteration = state.iteration_index() + 1;

            // ── Review ──────────────────────────────────────────────────────
            let review = self
                .invoke(
                    self.reviewer.as_ref(),
                    state.current_draft(),
                    Stage::Review { iteration },
                    Some(state.current_draft()),
                    cancel,
                )
                .await?;
            transcript.review(iteration, &review);

            // Termination takes priority over another generator round
            if self.signal.is_terminal(&review) {
                info!(iteration, "Termination marker detected");
                transcript.marker_detected(iteration);
                state = state.terminate_with(review);
                break;
            }

            // ── Regenerate from the review ──────────────────────────────────
            state = state.begin_generating();
            let draft = self
                .invoke(
                    self.generator.as_ref(),
                    &review,
                    Stage::Regenerate { iteration },
                    Some(state.current_draft()),
                    cancel,
                )
                .await?;
            transcript.regenerated(iteration, &draft);

            state = state.advance(draft, self.config.max_iterations);
            debug!(iteration, phase = ?state.phase(), "Iteration complete");
        }

        let outcome = state.into_outcome(topic);
        info!(
            termination = ?outcome.termination,
            iterations = outcome.iterations,
            "Refinement run finished"
        );
        transcript.finished(&outcome);
        Ok(outcome)
    }

    /// One role call under the retry policy, mapped to a stage-tagged error.
    async fn invoke(
        &self,
        role: &dyn Role,
        input: &str,
        stage: Stage,
        last_draft: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, RefineError> {
        debug!(role = role.name(), %stage, "Calling role");

        match with_retry(&self.config.retry, cancel, || role.run(input)).await {
            Ok(text) => Ok(text),
            Err(Interrupted::Failed(source)) => {
                error!(role = role.name(), %stage, "Completion failed: {}", source);
                Err(RefineError::Completion {
                    stage,
                    source,
                    last_draft: last_draft.map(str::to_string),
                })
            }
            Err(Interrupted::Cancelled) => {
                info!(%stage, "Run cancelled");
                Err(RefineError::Cancelled {
                    stage,
                    last_draft: last_draft.map(str::to_string),
                })
            }
        }
    }
}
