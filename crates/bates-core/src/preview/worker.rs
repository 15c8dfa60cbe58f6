use std::num::NonZeroUsize;
use std::sync::mpsc;
use std::sync::Arc;

use lru::LruCache;
use tracing::debug;

use crate::error::PreviewError;
use crate::intake::InputFile;
use crate::progress::NoOpReporter;
use crate::raster::{self, OpenedFile, RasterBackend};

use super::messages::{WorkerCommand, WorkerResult};

/// Opened documents kept on the worker, keyed by file index.
const OPEN_DOCUMENT_CAPACITY: usize = 4;

/// Document handles living on the worker thread for one intake generation.
struct DocumentCache {
    generation: u64,
    open: LruCache<usize, OpenedFile>,
}

impl DocumentCache {
    fn new() -> Self {
        Self {
            generation: 0,
            open: LruCache::new(
                NonZeroUsize::new(OPEN_DOCUMENT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    /// Drop every handle when a newer intake replaced the file list.
    fn sync_generation(&mut self, generation: u64) {
        if generation != self.generation {
            self.open.clear();
            self.generation = generation;
        }
    }
}

/// Spawn the render worker. Results arrive on `result_tx`; dropping the
/// returned sender stops the thread.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    backend: Arc<dyn RasterBackend>,
    render_scale: f32,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("bates-preview-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, backend, render_scale);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    backend: Arc<dyn RasterBackend>,
    render_scale: f32,
) {
    let mut cache = DocumentCache::new();

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::RenderPage {
                generation,
                token,
                file_index,
                file,
                page,
            } => {
                cache.sync_generation(generation);
                let result = handle_render(
                    &mut cache,
                    backend.as_ref(),
                    render_scale,
                    generation,
                    token,
                    file_index,
                    &file,
                    page,
                );
                let _ = tx.send(result);
            }
            WorkerCommand::DiscoverPageCounts { generation, files } => {
                // Off the render thread, so page requests are answered meanwhile.
                let backend = Arc::clone(&backend);
                let tx = tx.clone();
                rayon::spawn(move || {
                    handle_discovery(backend.as_ref(), generation, files, &tx);
                });
            }
        }
    }
    debug!("Preview worker stopped");
}

#[allow(clippy::too_many_arguments)]
fn handle_render(
    cache: &mut DocumentCache,
    backend: &dyn RasterBackend,
    render_scale: f32,
    generation: u64,
    token: u64,
    file_index: usize,
    file: &InputFile,
    page: usize,
) -> WorkerResult {
    if !cache.open.contains(&file_index) {
        match raster::open(file, backend) {
            Ok(opened) => {
                cache.open.put(file_index, opened);
            }
            Err(error) => {
                return WorkerResult::RenderFailed {
                    generation,
                    token,
                    file_index,
                    page,
                    error,
                };
            }
        }
    }

    let Some(opened) = cache.open.get_mut(&file_index) else {
        return WorkerResult::RenderFailed {
            generation,
            token,
            file_index,
            page,
            error: PreviewError::RenderFailure {
                page,
                message: "document handle evicted".to_string(),
            },
        };
    };

    let page_count = opened.page_count();
    match opened.render(page, render_scale) {
        Ok(frame) => {
            debug!(file_index, page, width = frame.width(), height = frame.height(), "Rendered page");
            WorkerResult::PageRendered {
                generation,
                token,
                file_index,
                page,
                page_count,
                frame,
            }
        }
        Err(error) => WorkerResult::RenderFailed {
            generation,
            token,
            file_index,
            page,
            error,
        },
    }
}

fn handle_discovery(
    backend: &dyn RasterBackend,
    generation: u64,
    files: Vec<(usize, InputFile)>,
    tx: &mpsc::Sender<WorkerResult>,
) {
    let (indices, files): (Vec<usize>, Vec<InputFile>) = files.into_iter().unzip();
    let counts = raster::discover_page_counts(&files, backend, &NoOpReporter);
    for (file_index, count) in indices.into_iter().zip(counts) {
        let result = match count {
            Ok(count) => WorkerResult::PageCount {
                generation,
                file_index,
                count,
            },
            Err(error) => WorkerResult::DiscoveryFailed {
                generation,
                file_index,
                error,
            },
        };
        let _ = tx.send(result);
    }
}
