//! Completion accounting for one batch of tile requests.

/// How a single tile request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOutcome {
    /// The response was merged.
    Succeeded,
    /// The request or its decoding failed.
    Failed,
}

/// Progress of a batch.
///
/// Successes and failures both count toward completion, in whatever order
/// they arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    queued: usize,
    succeeded: usize,
    failed: usize,
}

impl BatchProgress {
    /// Start a batch of `queued` requests.
    pub fn new(queued: usize) -> Self {
        Self {
            queued,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Record one outcome.
    ///
    /// Returns true exactly once, for the outcome that completes the batch.
    /// Outcomes recorded after completion are ignored.
    pub fn record(&mut self, outcome: TileOutcome) -> bool {
        if self.is_finished() {
            return false;
        }
        match outcome {
            TileOutcome::Succeeded => self.succeeded += 1,
            TileOutcome::Failed => self.failed += 1,
        }
        self.is_finished()
    }

    /// True once every queued request has an outcome.
    pub fn is_finished(&self) -> bool {
        self.completed() >= self.queued
    }

    /// Requests in the batch.
    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Successful requests so far.
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Failed requests so far.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Requests with an outcome so far.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Requests still outstanding.
    pub fn pending(&self) -> usize {
        self.queued.saturating_sub(self.completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_finishes_on_last_outcome() {
        let mut progress = BatchProgress::new(3);
        assert!(!progress.record(TileOutcome::Succeeded));
        assert!(!progress.record(TileOutcome::Failed));
        assert_eq!(progress.pending(), 1);
        assert!(progress.record(TileOutcome::Succeeded));

        assert_eq!(progress.succeeded(), 2);
        assert_eq!(progress.failed(), 1);
        assert!(progress.is_finished());
    }

    #[test]
    fn test_all_failures_still_finish() {
        let mut progress = BatchProgress::new(2);
        progress.record(TileOutcome::Failed);
        assert!(progress.record(TileOutcome::Failed));
    }

    #[test]
    fn test_outcomes_after_finish_are_ignored() {
        let mut progress = BatchProgress::new(1);
        assert!(progress.record(TileOutcome::Succeeded));
        assert!(!progress.record(TileOutcome::Succeeded));
        assert_eq!(progress.completed(), 1);
    }

    #[test]
    fn test_empty_batch_is_finished() {
        assert!(BatchProgress::new(0).is_finished());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_finishes_exactly_once_in_any_order(
                outcomes in prop::collection::vec(any::<bool>(), 1..40),
            ) {
                let mut progress = BatchProgress::new(outcomes.len());
                let mut finishes = 0;
                for (i, ok) in outcomes.iter().enumerate() {
                    let outcome = if *ok { TileOutcome::Succeeded } else { TileOutcome::Failed };
                    if progress.record(outcome) {
                        finishes += 1;
                        prop_assert_eq!(i, outcomes.len() - 1);
                    }
                }
                prop_assert_eq!(finishes, 1);
                prop_assert_eq!(progress.succeeded(), outcomes.iter().filter(|ok| **ok).count());
            }
        }
    }
}
