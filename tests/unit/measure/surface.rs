use std::sync::mpsc;

use super::*;

#[test]
fn reporter_sends_measured_height_once() {
    let (tx, rx) = mpsc::channel();
    let reporter = RenderReporter::new(RenderId(3), tx);
    assert_eq!(reporter.id(), RenderId(3));
    reporter.finished(42.0);
    assert_eq!(
        rx.try_recv().unwrap(),
        SurfaceEvent {
            id: RenderId(3),
            outcome: RenderOutcome::Measured(42.0),
        }
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn dropped_reporter_reports_abandoned() {
    let (tx, rx) = mpsc::channel();
    drop(RenderReporter::new(RenderId(1), tx));
    assert_eq!(rx.try_recv().unwrap().outcome, RenderOutcome::Abandoned);
}

#[test]
fn no_height_is_distinct_from_zero() {
    let (tx, rx) = mpsc::channel();
    RenderReporter::new(RenderId(1), tx.clone()).no_measurable_height();
    RenderReporter::new(RenderId(2), tx).finished(0.0);
    assert_eq!(rx.try_recv().unwrap().outcome, RenderOutcome::NoHeight);
    assert_eq!(rx.try_recv().unwrap().outcome, RenderOutcome::Measured(0.0));
}

#[test]
fn null_surface_refuses_to_render() {
    let (tx, rx) = mpsc::channel();
    let mut surface = NullSurface;
    let req = RenderRequest {
        id: RenderId(9),
        fragment: "<p>x</p>".to_string(),
        width: 100.0,
    };
    assert!(surface.render(req, RenderReporter::new(RenderId(9), tx)).is_err());
    assert_eq!(rx.try_recv().unwrap().outcome, RenderOutcome::Abandoned);
}
