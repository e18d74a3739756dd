use std::cell::RefCell;
use std::rc::Rc;

use daub::element::{rectangle, translate, Element};
use daub::error::DrawError;
use daub::node::ElementNode;
use daub::platform::{ResizeObserver, ResizeSignal};
use daub::registry::{RendererEntry, RendererRegistry};
use daub::surface::{DrawingSurface, PixmapSurface, RecordingSurface, SurfaceCall};
use daub::surface_manager::{CanvasConfig, CanvasSurface, ChangeFlags, CommitOutcome, Dimensions};
use daub::traversal::SurfaceContext;

#[derive(Default)]
struct TestObserver {
    signal: Option<ResizeSignal>,
    disconnects: usize,
}

impl TestObserver {
    fn resize(&self) {
        if let Some(signal) = &self.signal {
            signal.notify();
        }
    }
}

impl ResizeObserver for TestObserver {
    fn observe(&mut self, signal: ResizeSignal) {
        self.signal = Some(signal);
    }

    fn disconnect(&mut self) {
        self.signal = None;
        self.disconnects += 1;
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene() -> Vec<Element> {
    vec![rectangle(0.0, 0.0, 10.0, 10.0).fill("red").into()]
}

#[test]
fn commit_without_surface_is_deferred() {
    init_logger();
    let mut canvas: CanvasSurface<RecordingSurface> = CanvasSurface::new(CanvasConfig::new());
    canvas.set_children(scene());
    assert_eq!(canvas.commit(), Ok(CommitOutcome::Deferred));
    assert!(canvas.needs_commit());
    assert!(canvas.changes().contains(ChangeFlags::CHILDREN));
}

#[test]
fn backing_store_is_logical_size_times_ratio() {
    init_logger();
    let reported = Rc::new(RefCell::new(Vec::new()));
    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(
        CanvasConfig::new().width(500.0).height(300.0).pixel_ratio(2.0),
    );
    let sink = reported.clone();
    canvas.on_resize(move |dims| sink.borrow_mut().push(dims));
    canvas.attach(RecordingSurface::new(0, 0), &mut observer);
    canvas.set_children(scene());

    assert!(matches!(canvas.commit(), Ok(CommitOutcome::Drawn(_))));
    let surface = canvas.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (1000, 600));
    assert_eq!(*reported.borrow(), [Dimensions::new(500.0, 300.0)]);
}

#[test]
fn commit_order_is_resize_background_scale_then_tree() {
    init_logger();
    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(
        CanvasConfig::new()
            .width(100.0)
            .height(50.0)
            .pixel_ratio(2.0)
            .background_color("white"),
    );
    canvas.attach(RecordingSurface::new(0, 0), &mut observer);
    canvas.set_children(scene());
    canvas.commit().unwrap();

    let calls: Vec<_> = canvas.surface().unwrap().calls().cloned().collect();
    assert_eq!(
        calls,
        [
            SurfaceCall::Resize { width: 200, height: 100 },
            SurfaceCall::SetFillStyle("white".into()),
            SurfaceCall::FillRect { x: 0.0, y: 0.0, width: 200.0, height: 100.0 },
            SurfaceCall::Scale { x: 2.0, y: 2.0 },
            SurfaceCall::SetFillStyle("red".into()),
            SurfaceCall::FillRect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 },
        ]
    );
}

#[test]
fn client_size_used_without_explicit_size() {
    init_logger();
    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(CanvasConfig::new().pixel_ratio(2.0));
    canvas.attach(RecordingSurface::new(0, 0).with_client_size(320.0, 180.0), &mut observer);
    canvas.commit().unwrap();
    assert_eq!(canvas.backing_dimensions(), Dimensions::new(640.0, 360.0));
    assert_eq!(canvas.logical_dimensions(), Dimensions::new(320.0, 180.0));
}

#[test]
fn resize_is_reported_only_on_change() {
    init_logger();
    let reported = Rc::new(RefCell::new(Vec::new()));
    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(CanvasConfig::new());
    let sink = reported.clone();
    canvas.on_resize(move |dims| sink.borrow_mut().push(dims));
    canvas.attach(RecordingSurface::new(0, 0).with_client_size(100.0, 100.0), &mut observer);
    canvas.commit().unwrap();
    canvas.commit().unwrap();
    assert_eq!(reported.borrow().len(), 1);

    canvas
        .surface_mut()
        .unwrap()
        .set_client_size(Some((200.0, 100.0)));
    observer.resize();
    assert!(canvas.changes().contains(ChangeFlags::RESIZED));
    canvas.commit().unwrap();
    assert_eq!(
        *reported.borrow(),
        [Dimensions::new(100.0, 100.0), Dimensions::new(200.0, 100.0)]
    );
    assert!(!canvas.needs_commit());
}

#[test]
fn setters_record_changes() {
    init_logger();
    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(CanvasConfig::new().width(10.0).height(10.0));
    canvas.attach(RecordingSurface::new(0, 0), &mut observer);
    canvas.commit().unwrap();
    assert_eq!(canvas.changes(), ChangeFlags::empty());

    canvas.set_pixel_ratio(1.0);
    canvas.set_size(Some(10.0), Some(10.0));
    assert!(!canvas.needs_commit());

    canvas.set_pixel_ratio(2.0);
    canvas.set_size(Some(20.0), None);
    canvas.set_background_color(Some("black".into()));
    canvas.notify_resize();
    assert_eq!(
        canvas.changes(),
        ChangeFlags::PIXEL_RATIO | ChangeFlags::SIZE | ChangeFlags::BACKGROUND | ChangeFlags::RESIZED
    );
}

#[test]
fn failed_resize_keeps_changes_pending() {
    init_logger();
    let mut observer = TestObserver::default();
    // Too wide for any backing store: the resize is refused.
    let mut canvas = CanvasSurface::new(CanvasConfig::new().width(3.0e9).height(1.0));
    canvas.attach(PixmapSurface::new(0, 0).unwrap(), &mut observer);
    canvas.set_children(scene());

    assert!(matches!(canvas.commit(), Err(DrawError::Surface(_))));
    assert!(canvas.needs_commit());
    assert!(canvas
        .changes()
        .contains(ChangeFlags::SIZE | ChangeFlags::CHILDREN));

    canvas.set_size(Some(10.0), Some(10.0));
    assert!(matches!(canvas.commit(), Ok(CommitOutcome::Drawn(_))));
    assert!(!canvas.needs_commit());
}

#[test]
fn detach_disconnects_and_drops_tree() {
    init_logger();
    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(CanvasConfig::new().width(10.0).height(10.0));
    canvas.attach(RecordingSurface::new(0, 0), &mut observer);
    canvas.set_children(scene());
    canvas.commit().unwrap();
    assert_eq!(canvas.root().container_info().rendered.len(), 1);

    let surface = canvas.detach(&mut observer).unwrap();
    let calls_before = surface.calls().count();
    assert_eq!(observer.disconnects, 1);
    assert!(observer.signal.is_none());
    assert!(canvas.root().container_info().rendered.is_empty());
    assert!(!canvas.is_attached());
    assert_eq!(canvas.commit(), Ok(CommitOutcome::Deferred));
    // No final frame was drawn on detach.
    assert_eq!(surface.calls().count(), calls_before);
}

fn explode(_: &mut SurfaceContext<'_>, _: &ElementNode) -> Result<(), DrawError> {
    Err(DrawError::renderer("Canvas.Explode", "boom"))
}

#[test]
fn failed_frame_does_not_poison_the_next() {
    init_logger();
    let mut registry = RendererRegistry::with_builtins();
    registry.register("Canvas.Explode", RendererEntry::before(explode));

    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(CanvasConfig::new().width(10.0).height(10.0))
        .with_registry(registry);
    canvas.attach(RecordingSurface::new(0, 0), &mut observer);

    canvas.set_children(vec![translate(1.0, 1.0)
        .restore(true)
        .child(Element::custom("Canvas.Explode"))
        .into()]);
    assert!(canvas.commit().is_err());
    assert_eq!(canvas.surface().unwrap().state_depth(), 0);

    canvas.set_children(scene());
    assert!(matches!(canvas.commit(), Ok(CommitOutcome::Drawn(_))));
}

#[test]
fn pixmap_commit_paints_background_and_scene() {
    init_logger();
    let mut observer = TestObserver::default();
    let mut canvas = CanvasSurface::new(
        CanvasConfig::new()
            .width(20.0)
            .height(20.0)
            .pixel_ratio(2.0)
            .background_color("#0000ff"),
    );
    canvas.attach(PixmapSurface::new(0, 0).unwrap(), &mut observer);
    canvas.set_children(scene());
    canvas.commit().unwrap();

    let surface = canvas.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (40, 40));
    // The 10x10 logical rectangle covers 20x20 device pixels.
    assert_eq!(surface.pixel(5, 5), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(19, 19), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(25, 25), Some([0, 0, 255, 255]));
}
