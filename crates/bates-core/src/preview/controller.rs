use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::bates::{self, AllocationEntry};
use crate::config::{LabelConfig, PreviewSettings};
use crate::frame::RasterFrame;
use crate::intake::OrderedFileList;
use crate::overlay::{self, LabelFont};
use crate::raster::RasterBackend;

use super::cache::FrameCache;
use super::messages::{WorkerCommand, WorkerResult};
use super::state::{Phase, PreviewState};
use super::worker::spawn_worker;

/// Owns the preview state machine and drives the render worker.
///
/// Every mutation happens on the thread that owns the controller: commands
/// go out over a channel, results come back and are applied in [`poll`].
/// Results computed for a superseded intake or selection are dropped on
/// arrival.
///
/// [`poll`]: PreviewController::poll
pub struct PreviewController {
    cmd_tx: mpsc::Sender<WorkerCommand>,
    result_rx: mpsc::Receiver<WorkerResult>,
    state: PreviewState,
    phase: Phase,
    label: LabelConfig,
    font: LabelFont,
    cache: FrameCache,
    /// Bumped on every intake.
    generation: u64,
    /// Bumped on every file or page selection.
    selection_token: u64,
    pending_discovery: usize,
    composite_dirty: bool,
    composited: Option<RasterFrame>,
}

impl PreviewController {
    /// Start a controller with its own worker thread.
    pub fn spawn(backend: Arc<dyn RasterBackend>, settings: &PreviewSettings) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = spawn_worker(result_tx, backend, settings.render_scale);
        Self::from_channels(cmd_tx, result_rx, settings)
    }

    /// Build a controller over caller-provided channels, with no worker.
    /// Whoever holds the other ends plays the worker's role.
    pub fn from_channels(
        cmd_tx: mpsc::Sender<WorkerCommand>,
        result_rx: mpsc::Receiver<WorkerResult>,
        settings: &PreviewSettings,
    ) -> Self {
        Self {
            cmd_tx,
            result_rx,
            state: PreviewState::default(),
            phase: Phase::Empty,
            label: settings.label.clone().validated(),
            font: LabelFont::resolve(settings.font_path.as_deref()),
            cache: FrameCache::new(settings.frame_cache_capacity),
            generation: 0,
            selection_token: 0,
            pending_discovery: 0,
            composite_dirty: true,
            composited: None,
        }
    }

    /// Replace the stamp font.
    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = font;
        self.composite_dirty = true;
        self
    }

    // -- Intake ------------------------------------------------------------

    /// Replace the file list. Selects the first file and starts page-count
    /// discovery for the rest.
    pub fn load(&mut self, files: OrderedFileList) {
        self.generation += 1;
        self.selection_token += 1;
        self.cache.clear();
        self.composited = None;
        self.composite_dirty = true;
        self.pending_discovery = 0;
        self.state = PreviewState::new(files);

        if self.state.files.is_empty() {
            self.phase = Phase::Empty;
            return;
        }

        debug!(
            generation = self.generation,
            files = self.state.files.len(),
            "Loading file list"
        );
        self.phase = Phase::Loading;
        self.request_current_page();

        let unknown: Vec<_> = self
            .state
            .files
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, f)| f.page_count.is_none())
            .map(|(i, f)| (i, f.clone()))
            .collect();
        if !unknown.is_empty() {
            self.pending_discovery = unknown.len();
            self.send(WorkerCommand::DiscoverPageCounts {
                generation: self.generation,
                files: unknown,
            });
        }
    }

    // -- Navigation ----------------------------------------------------------

    /// Select a file by index and show its first page. Out-of-range indices
    /// are ignored.
    pub fn select_file(&mut self, index: usize) {
        let Some(file) = self.state.files.get(index) else {
            return;
        };
        self.selection_token += 1;
        self.state.current_file_index = index;
        self.state.current_page = 1;
        self.state.total_pages = file.page_count;
        self.show_current_page();
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.state.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        if self.state.current_page > 1 {
            self.go_to_page(self.state.current_page - 1);
        }
    }

    /// Show one-based `page` of the current file. Pages outside
    /// `1..=total_pages`, or any page while the count is unknown, are ignored.
    pub fn go_to_page(&mut self, page: usize) {
        let Some(total) = self.state.total_pages else {
            return;
        };
        if self.state.files.is_empty() || page == 0 || page > total {
            return;
        }
        if page == self.state.current_page && self.phase == Phase::Ready {
            return;
        }
        self.selection_token += 1;
        self.state.current_page = page;
        self.show_current_page();
    }

    fn show_current_page(&mut self) {
        let file_index = self.state.current_file_index;
        let page = self.state.current_page;
        self.composite_dirty = true;
        self.composited = None;

        if self.state.total_pages.is_some() {
            if let Some(frame) = self.cache.get(file_index, page) {
                self.state.rendered_frame = Some(frame);
                self.set_phase(Phase::Ready);
                return;
            }
        }
        self.state.rendered_frame = None;
        self.set_phase(Phase::Loading);
        self.request_current_page();
    }

    fn request_current_page(&mut self) {
        let Some(file) = self.state.current_file().cloned() else {
            return;
        };
        self.send(WorkerCommand::RenderPage {
            generation: self.generation,
            token: self.selection_token,
            file_index: self.state.current_file_index,
            file,
            page: self.state.current_page,
        });
    }

    // -- Labeling ------------------------------------------------------------

    /// Swap in a new label config. Only recompositing is scheduled; nothing
    /// is re-rasterized.
    pub fn set_label_config(&mut self, config: LabelConfig) {
        let config = config.validated();
        if config != self.label {
            self.label = config;
            self.composite_dirty = true;
        }
    }

    pub fn label_config(&self) -> &LabelConfig {
        &self.label
    }

    // -- Worker results ----------------------------------------------------------

    /// Apply every result that has already arrived. Never blocks.
    /// Returns the number of results consumed.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.result_rx.try_recv() {
                Ok(result) => {
                    self.apply(result);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.on_worker_lost();
                    break;
                }
            }
        }
        applied
    }

    /// Wait up to `timeout` for the preview to settle (no page loading and no
    /// page counts outstanding). Returns whether it settled.
    pub fn poll_blocking(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();
        while !self.is_settled() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.result_rx.recv_timeout(remaining) {
                Ok(result) => self.apply(result),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    self.on_worker_lost();
                    return self.is_settled();
                }
            }
        }
        true
    }

    fn apply(&mut self, result: WorkerResult) {
        if result.generation() != self.generation {
            debug!(
                generation = result.generation(),
                current = self.generation,
                "Dropping result from a replaced file list"
            );
            return;
        }

        match result {
            WorkerResult::PageRendered {
                token,
                file_index,
                page,
                page_count,
                frame,
                ..
            } => {
                self.record_page_count(file_index, page_count);
                self.cache.put(file_index, page, frame.clone());
                if token != self.selection_token {
                    debug!(file_index, page, "Dropping stale page");
                    return;
                }
                self.state.total_pages = Some(page_count);
                self.state.rendered_frame = Some(frame);
                self.composite_dirty = true;
                self.set_phase(Phase::Ready);
            }
            WorkerResult::RenderFailed {
                token,
                file_index,
                page,
                error,
                ..
            } => {
                if token != self.selection_token {
                    debug!(file_index, page, "Dropping stale failure");
                    return;
                }
                warn!(file_index, page, error = %error, "Preview failed");
                self.state.rendered_frame = None;
                self.composited = None;
                self.set_phase(Phase::Error(error.to_string()));
            }
            WorkerResult::PageCount {
                file_index, count, ..
            } => {
                self.pending_discovery = self.pending_discovery.saturating_sub(1);
                self.record_page_count(file_index, count);
                if file_index == self.state.current_file_index && self.state.total_pages.is_none() {
                    self.state.total_pages = Some(count);
                }
                // Counts of earlier files shift the current label.
                self.composite_dirty = true;
            }
            WorkerResult::DiscoveryFailed {
                file_index, error, ..
            } => {
                self.pending_discovery = self.pending_discovery.saturating_sub(1);
                warn!(file_index, error = %error, "Page count unavailable, numbering as one page");
            }
        }
    }

    /// Page counts are set once per intake; later reports are ignored.
    fn record_page_count(&mut self, file_index: usize, count: usize) {
        if let Some(file) = self.state.files.get_mut(file_index) {
            if file.page_count.is_none() {
                file.page_count = Some(count);
            }
        }
    }

    fn on_worker_lost(&mut self) {
        if !self.state.files.is_empty() && self.phase == Phase::Loading {
            self.set_phase(Phase::Error("preview worker stopped".to_string()));
        }
        self.pending_discovery = 0;
    }

    fn send(&mut self, cmd: WorkerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.on_worker_lost();
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "Preview phase");
            self.phase = phase;
        }
    }

    // -- Compositing -----------------------------------------------------------

    /// Host signal that layout has settled at `viewport_width` pixels.
    ///
    /// Composites the stamp if anything changed since the last call and the
    /// current page is ready. A zero width means the host has not laid out
    /// yet and nothing is drawn.
    pub fn layout_ready(&mut self, viewport_width: u32) -> Option<&RasterFrame> {
        if viewport_width == 0 || self.phase != Phase::Ready {
            return None;
        }
        if self.composite_dirty || self.composited.is_none() {
            let frame = self.state.rendered_frame.clone()?;
            let label = self.current_label()?;
            match overlay::composite(&frame, &self.label, &label, &self.font) {
                Ok(composited) => {
                    debug!(label = %label, "Composited stamp");
                    self.composited = Some(composited);
                    self.composite_dirty = false;
                }
                Err(e) => {
                    self.composited = None;
                    self.set_phase(Phase::Error(e.to_string()));
                    return None;
                }
            }
        }
        self.composited.as_ref()
    }

    /// Last composited frame. Stale until the next [`layout_ready`] when
    /// [`needs_layout`] is true.
    ///
    /// [`layout_ready`]: PreviewController::layout_ready
    /// [`needs_layout`]: PreviewController::needs_layout
    pub fn composited_frame(&self) -> Option<&RasterFrame> {
        self.composited.as_ref()
    }

    pub fn needs_layout(&self) -> bool {
        self.phase == Phase::Ready && (self.composite_dirty || self.composited.is_none())
    }

    // -- Accessors -------------------------------------------------------------

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase != Phase::Loading && self.pending_discovery == 0
    }

    pub fn cached_frames(&self) -> usize {
        self.cache.frame_count()
    }

    /// Label ranges for the current file list, computed fresh on every call.
    pub fn allocation(&self) -> Vec<AllocationEntry> {
        bates::allocate(&self.state.files, &self.label)
    }

    /// Label stamped on the page currently shown.
    pub fn current_label(&self) -> Option<String> {
        if self.state.files.is_empty() {
            return None;
        }
        let entries = self.allocation();
        let entry = entries.get(self.state.current_file_index)?;
        let number = entry
            .first_number
            .saturating_add(self.state.current_page as u64 - 1);
        Some(bates::format_label(
            &self.label.prefix,
            number,
            self.label.digit_width,
        ))
    }

    /// Caption for the page currently shown.
    pub fn describe(&self) -> Option<String> {
        let file = self.state.current_file()?;
        let total = self.state.total_pages?;
        let label = self.current_label()?;
        Some(overlay::describe_placement(
            &self.label,
            &label,
            self.state.current_page,
            total,
            &file.name,
        ))
    }
}
