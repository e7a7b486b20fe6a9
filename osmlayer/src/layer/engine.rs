//! The Overpass viewport layer.
//!
//! A layer attached to a map view loads Overpass data for whatever the view
//! shows. Each refresh splits the viewport into request tiles, skips tiles it
//! already requested, fetches the rest concurrently and draws every element
//! that has not been drawn before.
//!
//! Planning and fetching are separate steps. [`OverpassLayer::begin_refresh`]
//! marks the planned tiles as requested and hands back a [`TileBatch`] that
//! owns the requests; the host polls it wherever it likes and passes each
//! response to [`OverpassLayer::merge_response`]. A refresh planned while an
//! earlier batch is still in flight skips that batch's tiles. Responses are
//! merged in completion order even when the viewport has moved on since their
//! batch started. Nothing is cancelled.
//!
//! `attach`, `on_viewport_settle` and `refresh` do both steps and return once
//! the batch has finished.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::coord::CoordError;
use crate::overpass::{fetch, AsyncHttpClient, FetchError};
use crate::tiling::{decompose, BatchProgress, TileBounds, TileOutcome};
use crate::tiling::{RequestLedger, ResultSet};

use super::batch::{BatchId, Refresh, TileBatch, TileResponse};
use super::config::LayerConfig;
use super::host::MapHost;
use super::observer::{BatchObserver, BatchReport, BatchStatus, LoggingObserver};
use super::reducer::{DrawNewElements, ResponseReducer};
use super::registry::{IndicatorState, LayerId};

/// One request of a batch. `tile` is `None` for a query without a bbox.
struct PlannedRequest {
    tile: Option<TileBounds>,
    url: Result<String, FetchError>,
}

/// Progress of a batch whose responses are still arriving.
struct ActiveBatch {
    progress: BatchProgress,
    skipped: usize,
    merged: usize,
}

impl ActiveBatch {
    fn report(&self, status: BatchStatus) -> BatchReport {
        BatchReport {
            status,
            queued: self.progress.queued(),
            skipped: self.skipped,
            succeeded: self.progress.succeeded(),
            failed: self.progress.failed(),
            merged: self.merged,
        }
    }
}

/// Overpass data layer for one map view.
pub struct OverpassLayer<C: AsyncHttpClient> {
    id: LayerId,
    config: LayerConfig,
    client: Arc<C>,
    observer: Arc<dyn BatchObserver>,
    reducer: Box<dyn ResponseReducer>,
    ledger: RequestLedger,
    results: ResultSet,
    active: HashMap<BatchId, ActiveBatch>,
    attached: bool,
    static_requested: bool,
}

impl<C: AsyncHttpClient + 'static> OverpassLayer<C> {
    /// Create a detached layer.
    pub fn new(config: LayerConfig, client: C) -> Self {
        let observer = LoggingObserver::new(config.debug);
        Self {
            id: LayerId::next(),
            config,
            client: Arc::new(client),
            observer: Arc::new(observer),
            reducer: Box::new(DrawNewElements),
            ledger: RequestLedger::new(),
            results: ResultSet::new(),
            active: HashMap::new(),
            attached: false,
            static_requested: false,
        }
    }

    /// Replace the batch observer.
    pub fn with_observer(mut self, observer: impl BatchObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Replace the response reducer.
    pub fn with_reducer(mut self, reducer: impl ResponseReducer + 'static) -> Self {
        self.reducer = Box::new(reducer);
        self
    }

    /// Identity of this layer in the host's registry.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Layer configuration.
    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// HTTP client used for requests.
    pub fn client(&self) -> &C {
        self.client.as_ref()
    }

    /// True while attached to a map.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of tiles requested since attaching.
    pub fn requested_tiles(&self) -> usize {
        self.ledger.len()
    }

    /// Number of elements drawn since attaching.
    pub fn merged_elements(&self) -> usize {
        self.results.len()
    }

    /// Number of batches with responses still outstanding.
    pub fn active_batches(&self) -> usize {
        self.active.len()
    }

    /// Attach to `host`, register the minimum zoom and load the viewport.
    pub async fn attach<H: MapHost>(&mut self, host: &mut H) -> BatchReport {
        let refresh = self.begin_attach(host);
        self.drive(refresh, host).await
    }

    /// Attach to `host` and plan the first batch without waiting for it.
    pub fn begin_attach<H: MapHost + ?Sized>(&mut self, host: &mut H) -> Refresh {
        host.min_zoom_registry().register(self.id, self.config.min_zoom);
        self.attached = true;
        info!(layer = %self.id, min_zoom = self.config.min_zoom, "Layer attached");
        self.begin_refresh(host)
    }

    /// React to the host finishing a pan or zoom.
    ///
    /// A query without a bbox placeholder loads once, on the first refresh at
    /// or above the minimum zoom, and ignores viewport changes after that.
    pub async fn on_viewport_settle<H: MapHost>(&mut self, host: &mut H) -> BatchReport {
        let refresh = self.begin_viewport_settle(host);
        self.drive(refresh, host).await
    }

    /// Plan the batch for a settled viewport without waiting for it.
    pub fn begin_viewport_settle<H: MapHost + ?Sized>(&mut self, host: &H) -> Refresh {
        if !self.attached {
            return Refresh::Idle(BatchReport::idle(BatchStatus::Detached));
        }
        debug!(layer = %self.id, zoom = host.zoom(), "Viewport settled");
        self.begin_refresh(host)
    }

    /// Load whatever the current viewport needs and has not been requested.
    pub async fn refresh<H: MapHost>(&mut self, host: &mut H) -> BatchReport {
        let refresh = self.begin_refresh(host);
        self.drive(refresh, host).await
    }

    /// Plan requests for the current viewport.
    ///
    /// Planned tiles are in the ledger when this returns, so later plans skip
    /// them while they are still in flight. `batch_started` fires here for an
    /// issued batch.
    pub fn begin_refresh<H: MapHost + ?Sized>(&mut self, host: &H) -> Refresh {
        if !self.attached {
            return Refresh::Idle(BatchReport::idle(BatchStatus::Detached));
        }

        let zoom = host.zoom();
        if zoom < self.config.min_zoom {
            debug!(layer = %self.id, zoom, min_zoom = self.config.min_zoom, "Below minimum zoom");
            return Refresh::Idle(BatchReport::idle(BatchStatus::BelowMinZoom));
        }

        if !self.config.query.has_bbox_placeholder() {
            if self.static_requested {
                return Refresh::Idle(BatchReport::idle(BatchStatus::AlreadyRequested));
            }
            self.static_requested = true;
            let request = PlannedRequest {
                tile: None,
                url: self.config.query.request_url(&self.config.endpoint, None),
            };
            return self.issue(vec![request], 0);
        }

        let viewport = host.viewport_bounds();
        let tiles = match decompose(&viewport) {
            Ok(tiles) => tiles,
            Err(e) => {
                warn!(
                    layer = %self.id,
                    viewport = %viewport,
                    error = %e,
                    "Cannot tile viewport"
                );
                let status = match e {
                    CoordError::TooManyTiles { .. } => BatchStatus::ViewportTooLarge,
                    _ => BatchStatus::InvalidViewport,
                };
                return Refresh::Idle(BatchReport::idle(status));
            }
        };

        let planned = self.ledger.plan_requests(&tiles);
        let skipped = tiles.len() - planned.len();
        if planned.is_empty() {
            debug!(layer = %self.id, tiles = tiles.len(), "All tiles already requested");
            return Refresh::Idle(BatchReport {
                skipped,
                ..BatchReport::idle(BatchStatus::AlreadyRequested)
            });
        }

        let requests = planned
            .into_iter()
            .map(|tile| PlannedRequest {
                url: self
                    .config
                    .query
                    .request_url(&self.config.endpoint, Some(&tile.bounds)),
                tile: Some(tile),
            })
            .collect();
        self.issue(requests, skipped)
    }

    /// Merge one response of a batch planned by this layer.
    ///
    /// Returns the batch report once every request of the batch has an
    /// outcome. Responses of batches planned before the last detach are
    /// dropped.
    pub fn merge_response<H: MapHost>(
        &mut self,
        host: &mut H,
        response: TileResponse,
    ) -> Option<BatchReport> {
        let Some(active) = self.active.get_mut(&response.batch) else {
            debug!(
                layer = %self.id,
                batch = %response.batch,
                "Dropping response of a closed batch"
            );
            return None;
        };

        let outcome = match response.result {
            Ok(body) => {
                let merge = self.reducer.reduce(&body, &mut self.results, &mut *host);
                active.merged += merge.merged;
                TileOutcome::Succeeded
            }
            Err(e) => {
                self.observer.tile_failed(response.tile.as_ref(), &e);
                TileOutcome::Failed
            }
        };
        if !active.progress.record(outcome) {
            return None;
        }

        let report = active.report(BatchStatus::Completed);
        self.active.remove(&response.batch);
        self.observer.batch_finished(&report);
        Some(report)
    }

    /// Detach from `host` and forget everything requested or drawn.
    ///
    /// Batches still in flight are closed with a `Detached` report and their
    /// remaining responses are dropped.
    pub fn detach<H: MapHost + ?Sized>(&mut self, host: &mut H) {
        host.min_zoom_registry().unregister(self.id);
        for (_, active) in self.active.drain() {
            self.observer.batch_finished(&active.report(BatchStatus::Detached));
        }
        self.ledger.clear();
        self.results.clear();
        self.static_requested = false;
        self.attached = false;
        info!(layer = %self.id, "Layer detached");
    }

    /// Minimum zoom indicator for `host` using this layer's texts.
    pub fn indicator<H: MapHost + ?Sized>(&self, host: &mut H) -> IndicatorState {
        let zoom = host.zoom();
        host.min_zoom_registry()
            .indicator(zoom, &self.config.indicator_messages)
    }

    fn issue(&mut self, requests: Vec<PlannedRequest>, skipped: usize) -> Refresh {
        let id = BatchId::next();
        let futures: Vec<BoxFuture<'static, TileResponse>> = requests
            .into_iter()
            .map(|request| {
                let client = Arc::clone(&self.client);
                async move {
                    let result = match request.url {
                        Ok(url) => {
                            debug!(url = %url, "Requesting");
                            fetch(client.as_ref(), &url).await
                        }
                        Err(e) => Err(e),
                    };
                    TileResponse {
                        batch: id,
                        tile: request.tile,
                        result,
                    }
                }
                .boxed()
            })
            .collect();

        let batch = TileBatch::new(id, futures);
        self.active.insert(
            id,
            ActiveBatch {
                progress: BatchProgress::new(batch.queued()),
                skipped,
                merged: 0,
            },
        );
        debug!(layer = %self.id, batch = %id, queued = batch.queued(), "Batch planned");
        self.observer.batch_started(batch.queued());
        Refresh::Issued(batch)
    }

    async fn drive<H: MapHost>(&mut self, refresh: Refresh, host: &mut H) -> BatchReport {
        let mut batch = match refresh {
            Refresh::Idle(report) => return report,
            Refresh::Issued(batch) => batch,
        };
        while let Some(response) = batch.next_response().await {
            if let Some(report) = self.merge_response(host, response) {
                return report;
            }
        }
        BatchReport::idle(BatchStatus::Detached)
    }
}
