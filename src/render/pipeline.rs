use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    time::{Duration, Instant},
};

use crate::{
    annotation::{
        cache::RecordCache, fetch::AnnotationFetcher, filter::filter_record,
        store::AnnotationStore,
    },
    foundation::{
        core::{Canvas, CanvasConfig, GenomicWindow, TrackSpec},
        error::{BoardError, BoardResult},
    },
    render::{
        composite::blend_layer,
        surface::{CpuSurface, TrackLayer},
        track::{DEFAULT_SEQUENCE_ZOOM_THRESHOLD, TrackRenderOpts, render_track},
    },
    transform::linear::LinearScale,
};

/// Execution options for [`Compositor`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorOpts {
    /// Render tracks concurrently on a dedicated pool. The output is identical either way.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Budget for fetching and rendering all tracks of one request.
    #[serde(with = "crate::foundation::core::opt_secs")]
    pub timeout: Option<Duration>,
    /// Window width below which sequence bases are drawn.
    pub sequence_zoom_threshold: f64,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            timeout: Some(Duration::from_secs(30)),
            sequence_zoom_threshold: DEFAULT_SEQUENCE_ZOOM_THRESHOLD,
        }
    }
}

/// Everything one compositing run needs.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeRequest {
    /// Genomic window shared by every track.
    pub window: GenomicWindow,
    /// Output canvas.
    pub canvas: CanvasConfig,
    /// Tracks, composited bottom to top in this order.
    pub tracks: Vec<TrackSpec>,
}

/// A track that could not be drawn.
#[derive(Debug)]
pub struct TrackFailure {
    /// Position of the track in the request.
    pub index: usize,
    /// Track name.
    pub track: String,
    /// Why it failed.
    pub error: BoardError,
}

/// Counters for one compositing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Tracks requested.
    pub tracks_total: u64,
    /// Tracks blended onto the canvas.
    pub tracks_rendered: u64,
    /// Tracks reported as failures.
    pub tracks_failed: u64,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// Result of [`Compositor::composite`]: the canvas plus per-track failures.
#[derive(Debug)]
pub struct CompositeOutput {
    /// Composed image.
    pub canvas: Canvas,
    /// Failed tracks in request order.
    pub failures: Vec<TrackFailure>,
    /// Run counters.
    pub stats: CompositeStats,
}

/// Shared state handed to a [`Compositor`]: the store, the optional record cache and options.
#[derive(Clone)]
pub struct BoardContext {
    /// Annotation source.
    pub store: Arc<dyn AnnotationStore>,
    /// Process-wide record cache, `None` to always read the store.
    pub cache: Option<Arc<RecordCache>>,
    /// Execution options.
    pub opts: CompositorOpts,
}

impl BoardContext {
    /// Bundle a store with a cache and options.
    pub fn new(
        store: Arc<dyn AnnotationStore>,
        cache: Option<Arc<RecordCache>>,
        opts: CompositorOpts,
    ) -> Self {
        Self { store, cache, opts }
    }

    /// Fetcher over this context's store and cache.
    pub fn fetcher(&self) -> AnnotationFetcher {
        AnnotationFetcher::new(Arc::clone(&self.store), self.cache.clone())
    }
}

impl std::fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardContext")
            .field("cache", &self.cache.as_ref().map(|c| c.stats()))
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

/// Fans one request out to per-track work and composes the results.
///
/// Every request that runs off the calling thread gets its own worker pool. Work still running
/// when a request hits its deadline is detached with that pool and never holds up a later
/// request.
pub struct Compositor {
    fetcher: AnnotationFetcher,
    opts: CompositorOpts,
}

impl Compositor {
    /// Build a compositor after checking its options.
    pub fn new(ctx: &BoardContext) -> BoardResult<Self> {
        if !ctx.opts.sequence_zoom_threshold.is_finite() {
            return Err(BoardError::validation(
                "sequence_zoom_threshold must be finite",
            ));
        }
        if ctx.opts.threads == Some(0) {
            return Err(BoardError::validation(
                "compositor 'threads' must be >= 1 when set",
            ));
        }
        Ok(Self {
            fetcher: ctx.fetcher(),
            opts: ctx.opts.clone(),
        })
    }

    /// Options in effect.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Fetcher used for every track.
    pub fn fetcher(&self) -> &AnnotationFetcher {
        &self.fetcher
    }

    /// Draw every track of `req` onto one canvas.
    ///
    /// An invalid canvas, window or track spec rejects the whole request before any fetch.
    /// Otherwise each track is fetched, filtered and rendered into its own layer; layers that
    /// finish within the timeout are blended in request order and the rest are reported in
    /// [`CompositeOutput::failures`].
    ///
    /// Sequential mode with a timeout runs the tracks in order on a single worker, so the call
    /// returns at the deadline even when one track never finishes.
    #[tracing::instrument(skip(self, req), fields(tracks = req.tracks.len()))]
    pub fn composite(&self, req: &CompositeRequest) -> BoardResult<CompositeOutput> {
        let started = Instant::now();
        req.canvas.validate()?;
        req.window.validate_renderable()?;
        for track in &req.tracks {
            track.validate()?;
        }

        let unit = TrackUnit {
            window: req.window,
            scale: LinearScale::for_window(req.canvas.width, req.window)?,
            width: req.canvas.width,
            height: req.canvas.height,
            render: TrackRenderOpts {
                sequence_zoom_threshold: self.opts.sequence_zoom_threshold,
            },
            deadline: self.opts.timeout.map(|t| started + t),
        };

        let results = match (self.opts.parallel, unit.deadline) {
            (true, _) => {
                let pool = build_thread_pool(self.opts.threads)?;
                self.run_pooled(&pool, &req.tracks, unit)
            }
            (false, Some(_)) => {
                let pool = build_thread_pool(Some(1))?;
                self.run_pooled(&pool, &req.tracks, unit)
            }
            (false, None) => self.run_sequential(&req.tracks, unit),
        };

        let mut canvas = Canvas::filled(req.canvas.width, req.canvas.height, req.canvas.bg_color);
        let mut failures = Vec::new();
        let mut stats = CompositeStats {
            tracks_total: req.tracks.len() as u64,
            ..CompositeStats::default()
        };
        for (index, (track, result)) in req.tracks.iter().zip(results).enumerate() {
            match result.and_then(|layer| blend_layer(&mut canvas, &layer)) {
                Ok(()) => stats.tracks_rendered += 1,
                Err(error) => {
                    tracing::warn!(
                        track = %track.name,
                        code = error.code(),
                        %error,
                        "track failed"
                    );
                    stats.tracks_failed += 1;
                    failures.push(TrackFailure {
                        index,
                        track: track.name.clone(),
                        error,
                    });
                }
            }
        }
        stats.elapsed = started.elapsed();
        tracing::debug!(
            rendered = stats.tracks_rendered,
            failed = stats.tracks_failed,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "board composited"
        );

        Ok(CompositeOutput {
            canvas,
            failures,
            stats,
        })
    }

    fn run_sequential(
        &self,
        tracks: &[TrackSpec],
        unit: TrackUnit,
    ) -> Vec<BoardResult<TrackLayer>> {
        tracks
            .iter()
            .map(|track| unit.run(&self.fetcher, track))
            .collect()
    }

    // Jobs spawned from outside the pool are queued FIFO, so a one-thread pool keeps request
    // order.
    fn run_pooled(
        &self,
        pool: &rayon::ThreadPool,
        tracks: &[TrackSpec],
        unit: TrackUnit,
    ) -> Vec<BoardResult<TrackLayer>> {
        let (tx, rx) = mpsc::channel::<(usize, BoardResult<TrackLayer>)>();
        for (idx, track) in tracks.iter().enumerate() {
            let tx = tx.clone();
            let fetcher = self.fetcher.clone();
            let track = track.clone();
            pool.spawn(move || {
                let result = unit.run(&fetcher, &track);
                // The receiver is gone once the deadline passed; late layers are dropped.
                let _ = tx.send((idx, result));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<BoardResult<TrackLayer>>> =
            std::iter::repeat_with(|| None).take(tracks.len()).collect();
        let mut pending = tracks.len();
        let mut timed_out = false;
        while pending > 0 {
            let received = match unit.deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        Err(RecvTimeoutError::Timeout)
                    } else {
                        rx.recv_timeout(deadline - now)
                    }
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((idx, result)) => {
                    if let Some(slot) = slots.get_mut(idx)
                        && slot.is_none()
                    {
                        *slot = Some(result);
                        pending -= 1;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    timed_out = true;
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        slots
            .into_iter()
            .zip(tracks)
            .map(|(slot, track)| match slot {
                Some(result) => result,
                None if timed_out => Err(unit.timeout_error(track)),
                None => Err(BoardError::render(format!(
                    "worker for track '{}' exited without a result",
                    track.name
                ))),
            })
            .collect()
    }
}

// Per-request inputs every track shares; small enough to copy into each worker.
#[derive(Clone, Copy, Debug)]
struct TrackUnit {
    window: GenomicWindow,
    scale: LinearScale,
    width: u32,
    height: u32,
    render: TrackRenderOpts,
    deadline: Option<Instant>,
}

impl TrackUnit {
    #[tracing::instrument(skip_all, fields(track = %track.name))]
    fn run(&self, fetcher: &AnnotationFetcher, track: &TrackSpec) -> BoardResult<TrackLayer> {
        if self.expired() {
            return Err(self.timeout_error(track));
        }
        let record = fetcher.fetch(&track.name)?;
        if self.expired() {
            return Err(self.timeout_error(track));
        }
        let filtered = filter_record(&record, &self.window);
        let mut surface = CpuSurface::new(self.width, self.height)?;
        render_track(
            &filtered,
            track,
            &self.scale,
            &self.window,
            &mut surface,
            &self.render,
        )?;
        Ok(surface.finish())
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn timeout_error(&self, track: &TrackSpec) -> BoardError {
        BoardError::timeout(format!(
            "track '{}' did not finish before the request deadline",
            track.name
        ))
    }
}

/// Build the worker pool. `Some(0)` threads is rejected.
pub fn build_thread_pool(threads: Option<usize>) -> BoardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BoardError::validation(
            "compositor 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("trackboard-{i}"))
        .panic_handler(|payload| {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::error!(panic = %msg, "track worker panicked");
        });
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BoardError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
