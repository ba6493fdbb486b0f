// Termination signal detection
//
// The reviewer's stop signal is a literal token somewhere in free-form text.
// Matching is an unanchored, case-sensitive substring test with no
// normalization, so a reviewer that merely quotes the token also ends the run.

/// Decides whether a reviewer output ends the run.
pub trait TerminationSignal: Send + Sync {
    fn is_terminal(&self, review: &str) -> bool;
}

/// True when `text` contains `marker` verbatim.
pub fn is_termination_signal(text: &str, marker: &str) -> bool {
    text.contains(marker)
}

/// Literal-marker signal, e.g. `TERMINATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSignal {
    marker: String,
}

impl MarkerSignal {
    /// `marker` must be non-empty; config validation enforces this.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl TerminationSignal for MarkerSignal {
    fn is_terminal(&self, review: &str) -> bool {
        is_termination_signal(review, &self.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_at_end() {
        assert!(is_termination_signal("Polished article.\n\nTERMINATE", "TERMINATE"));
    }

    #[test]
    fn test_lowercase_does_not_match() {
        assert!(!is_termination_signal("Polished article... terminate", "TERMINATE"));
    }

    #[test]
    fn test_quoted_marker_still_matches() {
        assert!(is_termination_signal(
            "I will add 'TERMINATE' once the article is ready.",
            "TERMINATE"
        ));
    }

    #[test]
    fn test_embedded_in_word_matches() {
        assert!(is_termination_signal("PRETERMINATED", "TERMINATE"));
    }

    #[test]
    fn test_no_trimming_of_marker() {
        let signal = MarkerSignal::new(" DONE");
        assert!(!signal.is_terminal("DONE"));
        assert!(signal.is_terminal("ALL DONE"));
    }

    #[test]
    fn test_marker_signal_custom_token() {
        let signal = MarkerSignal::new("APPROVED");
        assert_eq!(signal.marker(), "APPROVED");
        assert!(signal.is_terminal("Looks good. APPROVED"));
        assert!(!signal.is_terminal("Looks good. TERMINATE"));
    }
}
