// Run transcript - the ordered, human-readable record of a refinement run
//
// Order: seed draft, then per iteration the review and (if the loop goes on)
// the regenerated draft, then the final draft once more.

use crossterm::style::Stylize;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, IsTerminal, Write};

use super::types::{RefinementOutcome, Termination};
use crate::errors::RefineError;

const RULE: &str = "==================";

/// Observer for run progress. Called by the controller in transcript order.
pub trait Transcript: Send {
    fn seed(&mut self, draft: &str);

    /// `iteration` is 1-based
    fn review(&mut self, iteration: usize, review: &str);

    fn regenerated(&mut self, iteration: usize, draft: &str);

    fn marker_detected(&mut self, _iteration: usize) {}

    fn finished(&mut self, outcome: &RefinementOutcome);
}

/// Writes the transcript to a terminal (or any writer)
pub struct ConsoleTranscript<W: Write + Send> {
    out: W,
    styled: bool,
}

impl ConsoleTranscript<io::Stdout> {
    /// Stdout, styled only when it is a terminal
    pub fn stdout() -> Self {
        let styled = io::stdout().is_terminal();
        Self::new(io::stdout(), styled)
    }
}

impl<W: Write + Send> ConsoleTranscript<W> {
    pub fn new(out: W, styled: bool) -> Self {
        Self { out, styled }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&self, text: &str) -> String {
        if self.styled {
            text.to_string().bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, text: String) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write transcript: {}", e);
        }
    }
}

impl<W: Write + Send> Transcript for ConsoleTranscript<W> {
    fn seed(&mut self, draft: &str) {
        let heading = self.heading("Initial draft:");
        self.emit(format!("\n{heading}\n{draft}"));
    }

    fn review(&mut self, iteration: usize, review: &str) {
        let heading = self.heading(&format!("Reviewed article (iteration {iteration}):"));
        self.emit(format!("{RULE}\n\n{heading}\n{review}\n{RULE}"));
    }

    fn regenerated(&mut self, iteration: usize, draft: &str) {
        let heading = self.heading(&format!("Refined draft (iteration {iteration}):"));
        self.emit(format!("\n{heading}\n{draft}\n{RULE}"));
    }

    fn marker_detected(&mut self, iteration: usize) {
        let line = format!("Termination marker detected on iteration {iteration}. Ending iterations.");
        let line = if self.styled {
            format!("{} {}", "✓".green().bold(), line)
        } else {
            line
        };
        self.emit(line);
    }

    fn finished(&mut self, outcome: &RefinementOutcome) {
        let banner = self.heading("========FINAL==========");
        let summary = match outcome.termination {
            Termination::Marker { iteration } => {
                format!("Task completed: reviewer signed off on iteration {iteration}.")
            }
            Termination::Bound { iterations } => {
                format!("Task completed: iteration limit reached after {iterations} iteration(s) without sign-off.")
            }
        };
        self.emit(format!(
            "{banner}\n\nFinalized article:\n{}\n\n{summary}",
            outcome.final_draft
        ));
    }
}

/// One transcript entry, in the order it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TranscriptEvent {
    Seed { draft: String },
    Review { iteration: usize, text: String },
    Regenerated { iteration: usize, draft: String },
    MarkerDetected { iteration: usize },
    Finished { final_draft: String, termination: Termination },
}

/// Keeps every event in memory (used for `--json` output and in tests)
#[derive(Debug, Default)]
pub struct RecordingTranscript {
    events: Vec<TranscriptEvent>,
}

impl RecordingTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TranscriptEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TranscriptEvent> {
        self.events
    }

    /// JSON report of a finished run, successful or not.
    ///
    /// A failed run still carries every event recorded before the failure,
    /// including a review whose regeneration never completed.
    pub fn into_report(self, result: &Result<RefinementOutcome, RefineError>) -> Value {
        match result {
            Ok(outcome) => json!({
                "outcome": outcome,
                "transcript": self.events,
            }),
            Err(err) => json!({
                "error": err.chain_message(),
                "stage": err.stage().to_string(),
                "last_draft": err.last_draft(),
                "transcript": self.events,
            }),
        }
    }
}

impl Transcript for RecordingTranscript {
    fn seed(&mut self, draft: &str) {
        self.events.push(TranscriptEvent::Seed {
            draft: draft.to_string(),
        });
    }

    fn review(&mut self, iteration: usize, review: &str) {
        self.events.push(TranscriptEvent::Review {
            iteration,
            text: review.to_string(),
        });
    }

    fn regenerated(&mut self, iteration: usize, draft: &str) {
        self.events.push(TranscriptEvent::Regenerated {
            iteration,
            draft: draft.to_string(),
        });
    }

    fn marker_detected(&mut self, iteration: usize) {
        self.events.push(TranscriptEvent::MarkerDetected { iteration });
    }

    fn finished(&mut self, outcome: &RefinementOutcome) {
        self.events.push(TranscriptEvent::Finished {
            final_draft: outcome.final_draft.clone(),
            termination: outcome.termination,
        });
    }
}
