use std::sync::mpsc::Sender;

use crate::foundation::error::{CellError, CellResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
/// Identifier of one render issued by a queue. Monotonic per queue.
pub struct RenderId(pub u64);

#[derive(Clone, Debug, PartialEq)]
/// Content to lay out at a fixed width.
pub struct RenderRequest {
    /// Render identifier; echoed back through the [`RenderReporter`].
    pub id: RenderId,
    /// Markup fragment to render.
    pub fragment: String,
    /// Layout width in pixels.
    pub width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// How a render ended.
pub enum RenderOutcome {
    /// The content was laid out and has this height.
    Measured(f64),
    /// The render finished without a measurable height.
    NoHeight,
    /// The surface dropped the render without reporting.
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Completion message sent from a surface to its queue.
pub struct SurfaceEvent {
    /// Render this event completes.
    pub id: RenderId,
    /// Result of the render.
    pub outcome: RenderOutcome,
}

/// One-shot completion handle passed to [`MeasurementSurface::render`].
///
/// Reporting consumes the handle. Dropping it unreported sends [`RenderOutcome::Abandoned`], so a
/// surface that loses a render cannot stall its queue.
#[derive(Debug)]
pub struct RenderReporter {
    id: RenderId,
    tx: Option<Sender<SurfaceEvent>>,
}

impl RenderReporter {
    pub(crate) fn new(id: RenderId, tx: Sender<SurfaceEvent>) -> Self {
        Self { id, tx: Some(tx) }
    }

    /// Render this handle completes.
    pub fn id(&self) -> RenderId {
        self.id
    }

    /// Report the rendered content height.
    pub fn finished(mut self, height: f64) {
        self.send(RenderOutcome::Measured(height));
    }

    /// Report that the render produced nothing measurable.
    pub fn no_measurable_height(mut self) {
        self.send(RenderOutcome::NoHeight);
    }

    fn send(&mut self, outcome: RenderOutcome) {
        if let Some(tx) = self.tx.take() {
            // The queue may already be gone; nothing is waiting then.
            let _ = tx.send(SurfaceEvent {
                id: self.id,
                outcome,
            });
        }
    }
}

impl Drop for RenderReporter {
    fn drop(&mut self) {
        self.send(RenderOutcome::Abandoned);
    }
}

/// Off-screen surface that lays out one fragment at a time and reports its height.
///
/// A surface is not reentrant. Its owning queue never issues a second render before the first one
/// has been reported, timed out, or abandoned; a render issued after a timeout supersedes the
/// stale one.
pub trait MeasurementSurface {
    /// Start laying out `request.fragment` at `request.width`.
    ///
    /// The surface reports through `reporter`, either before returning or later from the host's
    /// event loop. Returning an error means the render never started.
    fn render(&mut self, request: RenderRequest, reporter: RenderReporter) -> CellResult<()>;
}

impl<S: MeasurementSurface + ?Sized> MeasurementSurface for Box<S> {
    fn render(&mut self, request: RenderRequest, reporter: RenderReporter) -> CellResult<()> {
        (**self).render(request, reporter)
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Surface for calculators whose rules never render (images, announcements).
pub struct NullSurface;

impl MeasurementSurface for NullSurface {
    fn render(&mut self, _request: RenderRequest, _reporter: RenderReporter) -> CellResult<()> {
        Err(CellError::surface("no measurement surface attached"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/surface.rs"]
mod tests;
