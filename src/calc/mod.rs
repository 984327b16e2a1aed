//! Per-family calculators.
//!
//! Every family has the same shape: a [`HeightRules`](crate::HeightRules) implementation with the
//! family's arithmetic, wrapped in a [`Calculator`] that owns one [`JobQueue`] and one surface.

pub(crate) mod announcement;
pub(crate) mod artist_invite;
pub(crate) mod feed;
pub(crate) mod header;
pub(crate) mod image;
pub(crate) mod notification;
pub(crate) mod text;

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crate::item::context::LayoutContext;
use crate::item::model::SizeableItem;
use crate::measure::surface::MeasurementSurface;
use crate::queue::job::{HeightMismatch, JobId, JobOutput};
use crate::queue::rules::{Fragment, HeightRules};
use crate::queue::runner::JobQueue;

/// Sizes batches of one content family.
pub struct Calculator<R, S> {
    queue: JobQueue<R, S>,
}

impl<R, S> std::fmt::Debug for Calculator<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("queue", &self.queue)
            .finish()
    }
}

impl<R: HeightRules, S: MeasurementSurface> Calculator<R, S> {
    /// Build a calculator owning `surface` exclusively.
    pub fn new(rules: R, surface: S, render_timeout: Option<Duration>) -> Self {
        Self {
            queue: JobQueue::new(rules, surface, render_timeout),
        }
    }

    /// Queue `items` for measurement in `ctx`; `completion` receives them back with heights.
    ///
    /// Never fails: unmeasurable items are resolved with a zero fallback.
    pub fn process_cells(
        &mut self,
        items: Vec<SizeableItem>,
        ctx: LayoutContext,
        completion: impl FnOnce(JobOutput) + 'static,
    ) -> JobId {
        self.queue.submit(items, ctx, completion)
    }

    /// See [`JobQueue::pump`].
    pub fn pump(&mut self) {
        self.queue.pump();
    }

    /// See [`JobQueue::pump_at`].
    pub fn pump_at(&mut self, now: Instant) {
        self.queue.pump_at(now);
    }

    /// See [`JobQueue::abandon_render`].
    pub fn abandon_render(&mut self) -> bool {
        self.queue.abandon_render()
    }

    /// See [`JobQueue::cancel`].
    pub fn cancel(&mut self, id: JobId) -> Option<Vec<SizeableItem>> {
        self.queue.cancel(id)
    }

    /// See [`JobQueue::subscribe_mismatches`].
    pub fn subscribe_mismatches(&mut self) -> Receiver<HeightMismatch> {
        self.queue.subscribe_mismatches()
    }

    /// Return `true` when nothing is queued or running.
    pub fn is_idle(&self) -> bool {
        self.queue.is_idle()
    }

    /// Underlying queue.
    pub fn queue(&self) -> &JobQueue<R, S> {
        &self.queue
    }

    /// Underlying queue, mutably.
    pub fn queue_mut(&mut self) -> &mut JobQueue<R, S> {
        &mut self.queue
    }
}

/// Fragments for the one-column and multi-column widths, sharing one render when they coincide.
pub(crate) fn column_fragments(markup: &str, one_width: f64, multi_width: f64) -> Vec<Fragment> {
    let mut out = vec![Fragment {
        markup: crate::measure::markup::wrap_fragment(markup, one_width),
        width: one_width,
    }];
    if multi_width != one_width {
        out.push(Fragment {
            markup: crate::measure::markup::wrap_fragment(markup, multi_width),
            width: multi_width,
        });
    }
    out
}

/// Split measurements made by [`column_fragments`] back into `(one_column, multi_column)`.
pub(crate) fn column_measurements(measured: &[f64]) -> (f64, f64) {
    let one = measured.first().copied().unwrap_or(0.0);
    let multi = measured.get(1).copied().unwrap_or(one);
    (one, multi)
}

#[cfg(test)]
#[path = "../../tests/unit/calc/mod.rs"]
mod tests;
