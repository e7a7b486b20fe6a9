//! Request batches in flight.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::overpass::{FetchError, OverpassResponse};
use crate::tiling::TileBounds;

use super::observer::BatchReport;

static NEXT_BATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one issued batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

impl BatchId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BATCH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// Outcome of one request, waiting to be merged by its layer.
pub struct TileResponse {
    pub(crate) batch: BatchId,
    pub(crate) tile: Option<TileBounds>,
    pub(crate) result: Result<OverpassResponse, FetchError>,
}

impl TileResponse {
    /// Batch this response belongs to.
    pub fn batch(&self) -> BatchId {
        self.batch
    }

    /// Requested tile, `None` for a query without a bbox.
    pub fn tile(&self) -> Option<&TileBounds> {
        self.tile.as_ref()
    }

    /// True when the request produced a decoded response.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// The requests of one refresh.
///
/// A batch owns its request futures and borrows neither the layer nor the
/// host, so it can be polled on another task while the layer keeps planning.
/// Every response it yields goes back through
/// [`OverpassLayer::merge_response`](super::OverpassLayer::merge_response).
#[must_use = "a batch does nothing until its responses are polled"]
pub struct TileBatch {
    id: BatchId,
    queued: usize,
    pending: FuturesUnordered<BoxFuture<'static, TileResponse>>,
}

impl TileBatch {
    pub(crate) fn new(id: BatchId, requests: Vec<BoxFuture<'static, TileResponse>>) -> Self {
        Self {
            id,
            queued: requests.len(),
            pending: requests.into_iter().collect(),
        }
    }

    /// Identity of this batch.
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Requests issued by this batch.
    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Requests without a response yet.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Next response in completion order, `None` once all are out.
    pub async fn next_response(&mut self) -> Option<TileResponse> {
        self.pending.next().await
    }
}

impl fmt::Debug for TileBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileBatch")
            .field("id", &self.id)
            .field("queued", &self.queued)
            .field("remaining", &self.pending.len())
            .finish()
    }
}

/// Result of planning a refresh.
#[derive(Debug)]
pub enum Refresh {
    /// Nothing to request.
    Idle(BatchReport),
    /// Requests were planned and the ledger updated.
    Issued(TileBatch),
}

impl Refresh {
    /// The batch, if one was issued.
    pub fn into_batch(self) -> Option<TileBatch> {
        match self {
            Refresh::Idle(_) => None,
            Refresh::Issued(batch) => Some(batch),
        }
    }
}
