//! Batch lifecycle notifications.

use std::fmt;

use tracing::{debug, info, warn};

use crate::overpass::FetchError;
use crate::tiling::TileBounds;

/// Why a refresh ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The layer is not attached, or detached while the batch was in flight.
    Detached,
    /// The map is zoomed out beyond the layer's minimum zoom.
    BelowMinZoom,
    /// The viewport has non-finite coordinates.
    InvalidViewport,
    /// The viewport spans more request tiles than one batch may issue.
    ViewportTooLarge,
    /// Every tile of the viewport was requested before.
    AlreadyRequested,
    /// A batch was issued and every request has an outcome.
    Completed,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BatchStatus::Detached => "detached",
            BatchStatus::BelowMinZoom => "below minimum zoom",
            BatchStatus::InvalidViewport => "invalid viewport",
            BatchStatus::ViewportTooLarge => "viewport too large",
            BatchStatus::AlreadyRequested => "already requested",
            BatchStatus::Completed => "completed",
        };
        f.write_str(text)
    }
}

/// Outcome of one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// How the refresh ended
    pub status: BatchStatus,
    /// Requests issued
    pub queued: usize,
    /// Viewport tiles skipped because they were requested before
    pub skipped: usize,
    /// Requests whose response was merged
    pub succeeded: usize,
    /// Requests that failed
    pub failed: usize,
    /// Elements drawn for the first time
    pub merged: usize,
}

impl BatchReport {
    /// A report for a refresh that issued no requests.
    pub fn idle(status: BatchStatus) -> Self {
        Self {
            status,
            queued: 0,
            skipped: 0,
            succeeded: 0,
            failed: 0,
            merged: 0,
        }
    }

    /// True when a batch was issued.
    pub fn issued(&self) -> bool {
        self.queued > 0
    }
}

/// Receives batch lifecycle events.
///
/// `batch_started` and `batch_finished` are delivered exactly once per issued
/// batch, in that order. Refreshes that issue nothing deliver no events.
pub trait BatchObserver: Send + Sync {
    /// A batch of `queued` requests is about to be sent.
    fn batch_started(&self, queued: usize);

    /// A request failed. `tile` is `None` for a query without a bbox.
    fn tile_failed(&self, tile: Option<&TileBounds>, error: &FetchError);

    /// Every request of the batch has an outcome.
    fn batch_finished(&self, report: &BatchReport);
}

/// Observer that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver {
    verbose: bool,
}

impl LoggingObserver {
    /// Create an observer. Verbose observers log batch boundaries at info.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl BatchObserver for LoggingObserver {
    fn batch_started(&self, queued: usize) {
        if self.verbose {
            info!(queued, "Loading data");
        } else {
            debug!(queued, "Loading data");
        }
    }

    fn tile_failed(&self, tile: Option<&TileBounds>, error: &FetchError) {
        match tile {
            Some(tile) => warn!(tile = %tile, error = %error, "Overpass request failed"),
            None => warn!(error = %error, "Overpass request failed"),
        }
    }

    fn batch_finished(&self, report: &BatchReport) {
        if self.verbose {
            info!(
                succeeded = report.succeeded,
                failed = report.failed,
                merged = report.merged,
                "Loading finished"
            );
        } else {
            debug!(
                succeeded = report.succeeded,
                failed = report.failed,
                merged = report.merged,
                "Loading finished"
            );
        }
    }
}
