// Refinement loop types - RefinementConfig, Phase, IterationState, Termination, RefinementOutcome

use serde::Serialize;

use super::retry::RetryPolicy;
use crate::config::constants::DEFAULT_MAX_ITERATIONS;
use crate::config::Config;

/// Configuration for the refinement loop
#[derive(Debug, Clone)]
pub struct RefinementConfig {
    /// Reviewer/generator rounds after the seed draft
    pub max_iterations: usize,
    /// Retry applied to every individual role call
    pub retry: RetryPolicy,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            retry: RetryPolicy::fail_fast(),
        }
    }
}

impl RefinementConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_iterations: config.refinement.max_iterations,
            retry: RetryPolicy::from_settings(&config.retry),
        }
    }
}

/// Where a run currently is.
///
/// `Seeding` is the only entry state; both `TerminatedBy*` states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Seeding,
    Reviewing,
    Generating,
    TerminatedByMarker,
    TerminatedByBound,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::TerminatedByMarker | Phase::TerminatedByBound)
    }
}

/// The draft threaded through the loop plus the loop position.
///
/// Owned by the controller and moved through each transition, so there is
/// exactly one live draft at any time.
#[derive(Debug, Clone)]
pub struct IterationState {
    current_draft: String,
    iteration_index: usize,
    phase: Phase,
}

impl IterationState {
    /// State right after the seed generator call.
    ///
    /// With `max_iterations == 0` the bound is already reached.
    pub fn seeded(seed: String, max_iterations: usize) -> Self {
        Self {
            current_draft: seed,
            iteration_index: 0,
            phase: if max_iterations == 0 {
                Phase::TerminatedByBound
            } else {
                Phase::Reviewing
            },
        }
    }

    pub fn current_draft(&self) -> &str {
        &self.current_draft
    }

    /// Zero-based index of the iteration in progress (or completed iterations once bound-terminated)
    pub fn iteration_index(&self) -> usize {
        self.iteration_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The reviewer signalled completion: its output becomes the final draft.
    pub fn terminate_with(self, review: String) -> Self {
        debug_assert_eq!(self.phase, Phase::Reviewing);
        Self {
            current_draft: review,
            phase: Phase::TerminatedByMarker,
            ..self
        }
    }

    /// No marker: the generator runs next. The current draft stays the last good one.
    pub fn begin_generating(self) -> Self {
        debug_assert_eq!(self.phase, Phase::Reviewing);
        Self {
            phase: Phase::Generating,
            ..self
        }
    }

    /// The generator produced a new draft; close out this iteration.
    pub fn advance(self, draft: String, max_iterations: usize) -> Self {
        debug_assert_eq!(self.phase, Phase::Generating);
        let iteration_index = self.iteration_index + 1;
        Self {
            current_draft: draft,
            iteration_index,
            phase: if iteration_index >= max_iterations {
                Phase::TerminatedByBound
            } else {
                Phase::Reviewing
            },
        }
    }

    /// Consume the state, keeping only the final draft and how the run ended.
    pub fn into_outcome(self, topic: &str) -> RefinementOutcome {
        debug_assert!(self.is_terminated());
        let (termination, iterations) = match self.phase {
            Phase::TerminatedByMarker => (
                Termination::Marker {
                    iteration: self.iteration_index + 1,
                },
                self.iteration_index + 1,
            ),
            _ => (
                Termination::Bound {
                    iterations: self.iteration_index,
                },
                self.iteration_index,
            ),
        };
        RefinementOutcome {
            topic: topic.to_string(),
            final_draft: self.current_draft,
            termination,
            iterations,
        }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// The reviewer emitted the marker on this 1-based iteration
    Marker { iteration: usize },
    /// The iteration bound ran out without a marker
    Bound { iterations: usize },
}

/// Result returned from `RefinementLoop::run()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefinementOutcome {
    pub topic: String,
    pub final_draft: String,
    pub termination: Termination,
    /// Reviewer calls made
    pub iterations: usize,
}
