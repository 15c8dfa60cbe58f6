#[allow(dead_code)]
mod common;

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{Rgba, RgbaImage};

use bates_core::config::{LabelConfig, PreviewSettings};
use bates_core::error::{PreviewError, Result as PreviewResult};
use bates_core::frame::RasterFrame;
use bates_core::intake::{self, FileKind, InputFile, NamedPayload, Selection};
use bates_core::overlay::LabelFont;
use bates_core::preview::worker::spawn_worker;
use bates_core::preview::{Phase, PreviewController, WorkerCommand, WorkerResult};
use bates_core::raster::{DocumentHandle, LopdfBackend, RasterBackend};

use common::{build_letter_pdf, build_zip, document};

struct Harness {
    controller: PreviewController,
    commands: Receiver<WorkerCommand>,
    results: Sender<WorkerResult>,
}

/// A controller with no worker; the test answers its commands.
fn harness() -> Harness {
    let (cmd_tx, commands) = mpsc::channel();
    let (results, result_rx) = mpsc::channel();
    let controller =
        PreviewController::from_channels(cmd_tx, result_rx, &PreviewSettings::default())
            .with_font(LabelFont::Builtin);
    Harness {
        controller,
        commands,
        results,
    }
}

/// (generation, token, file_index, page) of the next command, which must be a render.
fn next_render(commands: &Receiver<WorkerCommand>) -> (u64, u64, usize, usize) {
    match commands.try_recv() {
        Ok(WorkerCommand::RenderPage {
            generation,
            token,
            file_index,
            page,
            ..
        }) => (generation, token, file_index, page),
        Ok(WorkerCommand::DiscoverPageCounts { .. }) => panic!("expected a render, got discovery"),
        Err(e) => panic!("expected a render, got {e:?}"),
    }
}

fn white_frame(width: u32, height: u32) -> RasterFrame {
    RasterFrame::new(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
}

fn rendered(generation: u64, token: u64, file_index: usize, page: usize, count: usize) -> WorkerResult {
    WorkerResult::PageRendered {
        generation,
        token,
        file_index,
        page,
        page_count: count,
        frame: white_frame(612, 792),
    }
}

/// Answer the pending render request for the current page.
fn answer(h: &mut Harness, count: usize) {
    let (generation, token, file_index, page) = next_render(&h.commands);
    h.results
        .send(rendered(generation, token, file_index, page, count))
        .expect("send result");
    h.controller.poll();
}

fn no_command(commands: &Receiver<WorkerCommand>) -> bool {
    matches!(commands.try_recv(), Err(TryRecvError::Empty))
}

#[test]
fn test_load_requests_first_page() {
    let mut h = harness();
    assert_eq!(h.controller.phase(), &Phase::Empty);

    h.controller
        .load(vec![document("a.pdf", Some(3)), document("b.pdf", Some(1))]);
    assert_eq!(h.controller.phase(), &Phase::Loading);
    let (_, _, file_index, page) = next_render(&h.commands);
    assert_eq!((file_index, page), (0, 1));
    // Every count is known, so nothing is discovered.
    assert!(no_command(&h.commands));
}

#[test]
fn test_empty_list_is_empty_phase() {
    let mut h = harness();
    h.controller.load(Vec::new());
    assert_eq!(h.controller.phase(), &Phase::Empty);
    assert!(no_command(&h.commands));
    assert!(h.controller.current_label().is_none());
}

#[test]
fn test_stale_page_is_cached_but_not_shown() {
    let mut h = harness();
    h.controller
        .load(vec![document("a.pdf", None), document("b.pdf", Some(2))]);
    let (generation, first_token, _, _) = next_render(&h.commands);

    h.controller.select_file(1);
    let (_, second_token, file_index, _) = next_render(&h.commands);
    assert_eq!(file_index, 1);

    h.results
        .send(rendered(generation, first_token, 0, 1, 3))
        .expect("send");
    assert_eq!(h.controller.poll(), 1);
    assert_eq!(h.controller.phase(), &Phase::Loading);
    assert!(h.controller.state().rendered_frame.is_none());
    assert_eq!(h.controller.cached_frames(), 1);
    assert_eq!(h.controller.state().files[0].page_count, Some(3));

    h.results
        .send(rendered(generation, second_token, 1, 1, 2))
        .expect("send");
    h.controller.poll();
    assert_eq!(h.controller.phase(), &Phase::Ready);
    assert_eq!(h.controller.state().current_file_index, 1);
    assert_eq!(h.controller.state().total_pages, Some(2));
    assert_eq!(h.controller.current_label().as_deref(), Some("J.DOE 00000004"));
}

#[test]
fn test_results_for_replaced_list_are_dropped() {
    let mut h = harness();
    h.controller.load(vec![document("old.pdf", Some(1))]);
    let (old_generation, old_token, _, _) = next_render(&h.commands);

    h.controller.load(vec![document("new.pdf", Some(1))]);
    let _ = next_render(&h.commands);

    h.results
        .send(rendered(old_generation, old_token, 0, 1, 1))
        .expect("send");
    h.controller.poll();
    assert_eq!(h.controller.phase(), &Phase::Loading);
    assert!(h.controller.state().rendered_frame.is_none());
    assert_eq!(h.controller.cached_frames(), 0);
    assert_eq!(h.controller.state().files[0].name, "new.pdf");
}

#[test]
fn test_label_change_recomposites_without_rendering() {
    let mut h = harness();
    h.controller.load(vec![document("a.pdf", Some(1))]);
    answer(&mut h, 1);
    assert_eq!(h.controller.phase(), &Phase::Ready);

    let first = h.controller.layout_ready(612).expect("composited").clone();
    assert!(!h.controller.needs_layout());

    h.controller.set_label_config(LabelConfig {
        prefix: "ACME".to_string(),
        ..LabelConfig::default()
    });
    assert!(no_command(&h.commands));
    assert!(h.controller.needs_layout());
    assert_eq!(h.controller.current_label().as_deref(), Some("ACME 00000001"));

    let second = h.controller.layout_ready(612).expect("recomposited").clone();
    assert!(!first.same_pixels(&second));

    // Re-applying the same config changes nothing.
    h.controller.set_label_config(h.controller.label_config().clone());
    assert!(!h.controller.needs_layout());
    assert!(no_command(&h.commands));
}

#[test]
fn test_nothing_drawn_before_layout() {
    let mut h = harness();
    h.controller.load(vec![document("a.pdf", Some(1))]);
    assert!(h.controller.layout_ready(612).is_none());

    answer(&mut h, 1);
    assert!(h.controller.layout_ready(0).is_none());
    assert!(h.controller.composited_frame().is_none());
    assert!(h.controller.layout_ready(400).is_some());
}

#[test]
fn test_render_failure_keeps_file_list() {
    let mut h = harness();
    h.controller
        .load(vec![document("bad.pdf", Some(2)), document("good.pdf", Some(1))]);
    let (generation, token, file_index, page) = next_render(&h.commands);
    h.results
        .send(WorkerResult::RenderFailed {
            generation,
            token,
            file_index,
            page,
            error: PreviewError::DecodeFailure("pdf: broken xref".to_string()),
        })
        .expect("send");
    h.controller.poll();

    match h.controller.phase() {
        Phase::Error(message) => assert!(message.contains("broken xref")),
        other => panic!("expected error phase, got {other:?}"),
    }
    assert_eq!(h.controller.state().files.len(), 2);
    assert!(h.controller.layout_ready(612).is_none());

    h.controller.select_file(1);
    assert_eq!(h.controller.phase(), &Phase::Loading);
    answer(&mut h, 1);
    assert_eq!(h.controller.phase(), &Phase::Ready);
}

#[test]
fn test_revisited_page_comes_from_cache() {
    let mut h = harness();
    h.controller.load(vec![document("a.pdf", Some(3))]);
    answer(&mut h, 3);

    h.controller.go_to_page(2);
    assert_eq!(h.controller.phase(), &Phase::Loading);
    answer(&mut h, 3);
    assert_eq!(h.controller.state().current_page, 2);

    h.controller.go_to_page(1);
    assert_eq!(h.controller.phase(), &Phase::Ready);
    assert!(no_command(&h.commands));
    assert_eq!(h.controller.cached_frames(), 2);
}

#[test]
fn test_navigation_bounds() {
    let mut h = harness();
    h.controller.load(vec![document("a.pdf", None)]);
    // Page count unknown until the first render arrives.
    h.controller.go_to_page(2);
    h.controller.next_page();
    let _ = next_render(&h.commands);
    assert!(no_command(&h.commands));

    h.results.send(rendered(1, 1, 0, 1, 3)).expect("send");
    h.controller.poll();
    assert_eq!(h.controller.state().total_pages, Some(3));

    h.controller.go_to_page(0);
    h.controller.go_to_page(4);
    h.controller.previous_page();
    h.controller.select_file(9);
    h.controller.go_to_page(1);
    assert!(no_command(&h.commands));
    assert_eq!(h.controller.state().current_page, 1);

    h.controller.next_page();
    let (_, _, _, page) = next_render(&h.commands);
    assert_eq!(page, 2);
}

#[test]
fn test_discovered_counts_shift_labels() {
    let mut h = harness();
    h.controller
        .load(vec![document("a.pdf", None), document("b.pdf", None)]);
    let (generation, token, _, _) = next_render(&h.commands);
    match h.commands.try_recv() {
        Ok(WorkerCommand::DiscoverPageCounts { files, .. }) => {
            let indices: Vec<usize> = files.iter().map(|(i, _)| *i).collect();
            assert_eq!(indices, vec![1]);
        }
        _ => panic!("expected page-count discovery"),
    }

    h.results.send(rendered(generation, token, 0, 1, 3)).expect("send");
    h.controller.poll();
    assert_eq!(h.controller.phase(), &Phase::Ready);
    assert!(!h.controller.is_settled());

    h.results
        .send(WorkerResult::PageCount {
            generation,
            file_index: 1,
            count: 4,
        })
        .expect("send");
    h.controller.poll();
    assert!(h.controller.is_settled());

    let ranges: Vec<String> = h
        .controller
        .allocation()
        .into_iter()
        .map(|e| e.range_text)
        .collect();
    assert_eq!(
        ranges,
        vec![
            "J.DOE 00000001 - J.DOE 00000003",
            "J.DOE 00000004 - J.DOE 00000007",
        ]
    );

    h.controller.select_file(1);
    assert_eq!(h.controller.state().total_pages, Some(4));
    answer(&mut h, 4);
    h.controller.go_to_page(4);
    answer(&mut h, 4);
    assert_eq!(h.controller.current_label().as_deref(), Some("J.DOE 00000007"));
}

#[test]
fn test_lost_worker_is_an_error() {
    let mut h = harness();
    h.controller.load(vec![document("a.pdf", Some(1))]);
    drop(h.results);
    h.controller.poll();
    assert!(matches!(h.controller.phase(), Phase::Error(_)));
}

#[test]
fn test_worker_renders_bundle() {
    let bundle = build_zip(&[
        ("prod/a.pdf", &build_letter_pdf(2)),
        ("prod/b.pdf", &build_letter_pdf(3)),
    ]);
    let files = intake::resolve(Selection::Single(NamedPayload::new("prod.zip", bundle)))
        .expect("resolve");

    let mut controller =
        PreviewController::spawn(Arc::new(LopdfBackend), &PreviewSettings::default())
            .with_font(LabelFont::Builtin);
    controller.load(files);
    assert!(controller.poll_blocking(Duration::from_secs(10)));
    assert_eq!(controller.phase(), &Phase::Ready);
    assert_eq!(controller.state().total_pages, Some(2));

    let base = controller
        .state()
        .rendered_frame
        .clone()
        .expect("base frame");
    assert_eq!((base.width(), base.height()), (918, 1188));

    let ranges: Vec<String> = controller
        .allocation()
        .into_iter()
        .map(|e| e.range_text)
        .collect();
    assert_eq!(
        ranges,
        vec![
            "J.DOE 00000001 - J.DOE 00000002",
            "J.DOE 00000003 - J.DOE 00000005",
        ]
    );

    controller.select_file(1);
    assert!(controller.poll_blocking(Duration::from_secs(10)));
    assert_eq!(controller.current_label().as_deref(), Some("J.DOE 00000003"));
    let caption = controller.describe().expect("caption");
    assert!(caption.contains("Page 1 of 3"));
    assert!(caption.ends_with("b.pdf"));

    let stamped = controller.layout_ready(918).expect("stamped").clone();
    assert_eq!((stamped.width(), stamped.height()), (918, 1188));
    assert!(!stamped.same_pixels(&base));
}

#[test]
fn test_worker_reports_broken_document() {
    let files = intake::resolve(Selection::Single(NamedPayload::new(
        "broken.pdf",
        b"%PDF-1.5 nothing else".to_vec(),
    )))
    .expect("resolve");

    let mut controller =
        PreviewController::spawn(Arc::new(LopdfBackend), &PreviewSettings::default());
    controller.load(files);
    assert!(controller.poll_blocking(Duration::from_secs(10)));
    assert!(matches!(controller.phase(), Phase::Error(_)));
    assert_eq!(controller.state().files.len(), 1);
}

/// Backend whose `slow` payloads block until the test opens the gate.
struct GatedBackend {
    gate: Mutex<Receiver<()>>,
}

struct FixedDocument;

impl DocumentHandle for FixedDocument {
    fn page_count(&self) -> usize {
        2
    }

    fn render_page(&mut self, _index: usize, _scale: f32) -> PreviewResult<RasterFrame> {
        Ok(white_frame(10, 10))
    }
}

impl RasterBackend for GatedBackend {
    fn open_document(&self, bytes: &[u8]) -> PreviewResult<Box<dyn DocumentHandle>> {
        if bytes == b"slow" {
            let gate = self.gate.lock().expect("gate lock");
            let _ = gate.recv_timeout(Duration::from_secs(10));
        }
        Ok(Box::new(FixedDocument))
    }
}

#[test]
fn test_render_answered_while_discovery_runs() {
    let (open_gate, gate) = mpsc::channel();
    let backend = Arc::new(GatedBackend {
        gate: Mutex::new(gate),
    });
    let (result_tx, results) = mpsc::channel();
    let commands = spawn_worker(result_tx, backend, 1.0);

    commands
        .send(WorkerCommand::DiscoverPageCounts {
            generation: 1,
            files: vec![(1, InputFile::new("b.pdf", b"slow".to_vec(), FileKind::Document))],
        })
        .expect("send discovery");
    commands
        .send(WorkerCommand::RenderPage {
            generation: 1,
            token: 7,
            file_index: 0,
            file: InputFile::new("a.pdf", b"fast".to_vec(), FileKind::Document),
            page: 1,
        })
        .expect("send render");

    match results.recv_timeout(Duration::from_secs(5)) {
        Ok(WorkerResult::PageRendered { token, page_count, .. }) => {
            assert_eq!((token, page_count), (7, 2));
        }
        other => panic!("expected the render first, got {other:?}"),
    }

    open_gate.send(()).expect("open gate");
    match results.recv_timeout(Duration::from_secs(5)) {
        Ok(WorkerResult::PageCount {
            file_index, count, ..
        }) => assert_eq!((file_index, count), (1, 2)),
        other => panic!("expected a page count, got {other:?}"),
    }
}
