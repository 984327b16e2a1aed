use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::item::context::LayoutContext;
use crate::item::model::{CellHeights, SizeableItem};
use crate::measure::surface::{
    MeasurementSurface, RenderId, RenderOutcome, RenderReporter, RenderRequest, SurfaceEvent,
};
use crate::queue::job::{
    Completion, DefaultReason, HeightMismatch, ItemReport, JobId, JobOutput, Resolution,
};
use crate::queue::rules::{Fragment, HeightRules, MeasurePlan};

/// Resolved items whose timed-out renders may still report.
const LATE_RENDER_CAPACITY: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Measurement {
    Measured(f64),
    Defaulted(DefaultReason),
}

impl Measurement {
    fn from_outcome(outcome: RenderOutcome) -> Self {
        match outcome {
            RenderOutcome::Measured(h) if h.is_finite() && h >= 0.0 => Self::Measured(h),
            RenderOutcome::Measured(_) | RenderOutcome::NoHeight => {
                Self::Defaulted(DefaultReason::NoMeasurableHeight)
            }
            RenderOutcome::Abandoned => Self::Defaulted(DefaultReason::RenderFailed),
        }
    }

    fn value(self) -> f64 {
        match self {
            Self::Measured(h) => h,
            Self::Defaulted(_) => 0.0,
        }
    }
}

#[derive(Debug)]
struct InFlight {
    id: RenderId,
    issued_at: Instant,
}

/// Render state of the item at the head of the active job.
#[derive(Debug)]
struct InProgress {
    fragments: Vec<Fragment>,
    measured: Vec<Measurement>,
    in_flight: Option<InFlight>,
    /// Renders that timed out for this item, by fragment index.
    timed_out: Vec<(RenderId, usize)>,
}

struct Job {
    id: JobId,
    ctx: LayoutContext,
    items: VecDeque<SizeableItem>,
    done: Vec<SizeableItem>,
    reports: Vec<ItemReport>,
    completion: Option<Completion>,
    started: bool,
    current: Option<InProgress>,
}

impl Job {
    fn awaiting_render(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| c.in_flight.is_some())
    }
}

/// A resolved item whose fallbacks may still be corrected by late renders.
struct LateRender {
    /// Timed-out renders still expected, with the fragment index each one measures.
    renders: Vec<(RenderId, usize)>,
    item: SizeableItem,
    ctx: LayoutContext,
    /// Fragment measurements, corrected in place as late renders report.
    values: Vec<f64>,
    /// Heights the layout was last told about.
    heights: CellHeights,
}

/// FIFO queue of measurement jobs sharing one exclusively owned surface.
///
/// Jobs run strictly in submission order, and items inside a job strictly front to back: the
/// surface never sees a second render while one is outstanding. All bookkeeping happens inside a
/// single `drain` loop, entered from [`JobQueue::submit`] and from the host's event loop through
/// [`JobQueue::pump`].
pub struct JobQueue<R, S> {
    rules: R,
    surface: S,
    jobs: VecDeque<Job>,
    next_job: u64,
    next_render: u64,
    tx: Sender<SurfaceEvent>,
    rx: Receiver<SurfaceEvent>,
    render_timeout: Option<Duration>,
    late: VecDeque<LateRender>,
    subscribers: Vec<Sender<HeightMismatch>>,
}

impl<R, S> std::fmt::Debug for JobQueue<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue")
            .field("jobs", &self.jobs.len())
            .field("next_render", &self.next_render)
            .field("render_timeout", &self.render_timeout)
            .finish_non_exhaustive()
    }
}

impl<R: HeightRules, S: MeasurementSurface> JobQueue<R, S> {
    /// Build an idle queue around `rules` and an owned `surface`.
    pub fn new(rules: R, surface: S, render_timeout: Option<Duration>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rules,
            surface,
            jobs: VecDeque::new(),
            next_job: 0,
            next_render: 0,
            tx,
            rx,
            render_timeout,
            late: VecDeque::new(),
            subscribers: Vec::new(),
        }
    }

    /// Append a job. It starts immediately when the queue is idle, otherwise it waits its turn.
    ///
    /// `completion` fires exactly once, after every item has been resolved (immediately for an
    /// empty batch when nothing is ahead of it).
    #[tracing::instrument(skip(self, items, completion), fields(family = self.rules.family(), items = items.len()))]
    pub fn submit(
        &mut self,
        items: Vec<SizeableItem>,
        ctx: LayoutContext,
        completion: impl FnOnce(JobOutput) + 'static,
    ) -> JobId {
        let id = JobId(self.next_job);
        self.next_job += 1;
        let len = items.len();
        self.jobs.push_back(Job {
            id,
            ctx,
            items: items.into(),
            done: Vec::with_capacity(len),
            reports: Vec::with_capacity(len),
            completion: Some(Box::new(completion)),
            started: false,
            current: None,
        });
        self.drain(Instant::now());
        id
    }

    /// Process surface reports and expired renders. Call from the host's event loop.
    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    /// [`JobQueue::pump`] with an explicit clock reading.
    pub fn pump_at(&mut self, now: Instant) {
        self.drain(now);
    }

    /// Give up on the outstanding render: its measurement becomes `0` and the queue moves on.
    ///
    /// Returns `false` when no render was outstanding.
    pub fn abandon_render(&mut self) -> bool {
        let abandoned = match self.jobs.front_mut() {
            Some(job) => Self::time_out(job),
            None => false,
        };
        if abandoned {
            self.drain(Instant::now());
        }
        abandoned
    }

    /// Remove a job that has not started yet and hand its items back unmeasured.
    ///
    /// The active job cannot be cancelled; its completion always fires.
    pub fn cancel(&mut self, id: JobId) -> Option<Vec<SizeableItem>> {
        let pos = self.jobs.iter().position(|j| j.id == id && !j.started)?;
        let job = self.jobs.remove(pos)?;
        tracing::debug!(job = id.0, "cancelled queued job");
        Some(job.items.into())
    }

    /// Receive a [`HeightMismatch`] for every cell whose heights changed after being laid out.
    pub fn subscribe_mismatches(&mut self) -> Receiver<HeightMismatch> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Jobs submitted and not yet completed, including the active one.
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Return `true` when no job is queued or running.
    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Return `true` while the active job waits for its surface.
    pub fn is_awaiting_render(&self) -> bool {
        self.jobs.front().is_some_and(Job::awaiting_render)
    }

    /// Family rules.
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Owned surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Owned surface, mutably (hosts driving an asynchronous surface need this).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn drain(&mut self, now: Instant) {
        loop {
            self.absorb_events();
            self.expire(now);

            let Some(job) = self.jobs.front_mut() else {
                return;
            };
            if !job.started {
                job.started = true;
                tracing::debug!(
                    family = self.rules.family(),
                    job = job.id.0,
                    items = job.items.len(),
                    "job started"
                );
            }
            if job.awaiting_render() {
                return;
            }

            let Some(item) = job.items.front() else {
                self.complete_front();
                continue;
            };

            if job.current.is_none() {
                match self.rules.plan(item, &job.ctx) {
                    MeasurePlan::Ready(heights) => {
                        Self::resolve(job, Resolution::Resolved(heights), &mut self.subscribers);
                        continue;
                    }
                    MeasurePlan::Malformed => {
                        tracing::warn!(
                            family = self.rules.family(),
                            key = %item.key,
                            tag = ?item.tag,
                            "malformed item sized as zero"
                        );
                        let resolution = Resolution::ResolvedWithDefault {
                            heights: CellHeights::zero(),
                            reason: DefaultReason::MalformedItem,
                        };
                        Self::resolve(job, resolution, &mut self.subscribers);
                        continue;
                    }
                    MeasurePlan::Render(fragments) => {
                        job.current = Some(InProgress {
                            measured: Vec::with_capacity(fragments.len()),
                            fragments,
                            in_flight: None,
                            timed_out: Vec::new(),
                        });
                    }
                }
            }

            let Some(cur) = job.current.as_mut() else {
                continue;
            };

            if let Some(fragment) = cur.fragments.get(cur.measured.len()) {
                let id = RenderId(self.next_render);
                self.next_render += 1;
                let request = RenderRequest {
                    id,
                    fragment: fragment.markup.clone(),
                    width: fragment.width,
                };
                cur.in_flight = Some(InFlight { id, issued_at: now });
                let reporter = RenderReporter::new(id, self.tx.clone());
                if let Err(err) = self.surface.render(request, reporter) {
                    tracing::warn!(
                        family = self.rules.family(),
                        key = %item.key,
                        render = id.0,
                        error = %err,
                        "render failed to start; using zero height"
                    );
                    cur.in_flight = None;
                    cur.measured
                        .push(Measurement::Defaulted(DefaultReason::RenderFailed));
                }
                continue;
            }

            // Every fragment is accounted for.
            let values: Vec<f64> = cur.measured.iter().map(|m| m.value()).collect();
            let reason = cur.measured.iter().find_map(|m| match m {
                Measurement::Defaulted(r) => Some(*r),
                Measurement::Measured(_) => None,
            });
            let heights = self.rules.finish(item, &job.ctx, &values).sanitized();

            if !cur.timed_out.is_empty() {
                if self.late.len() == LATE_RENDER_CAPACITY {
                    self.late.pop_front();
                }
                self.late.push_back(LateRender {
                    renders: std::mem::take(&mut cur.timed_out),
                    item: item.clone(),
                    ctx: job.ctx,
                    values,
                    heights,
                });
            }

            let resolution = match reason {
                None => Resolution::Resolved(heights),
                Some(reason) => Resolution::ResolvedWithDefault { heights, reason },
            };
            Self::resolve(job, resolution, &mut self.subscribers);
        }
    }

    /// Write the resolution into the head item and move it to the done list.
    fn resolve(
        job: &mut Job,
        resolution: Resolution,
        subscribers: &mut Vec<Sender<HeightMismatch>>,
    ) {
        job.current = None;
        let Some(mut item) = job.items.pop_front() else {
            return;
        };
        let heights = resolution.heights().sanitized();
        if let Some(previous) = item.heights
            && !previous.same_totals(&heights)
        {
            publish(
                subscribers,
                HeightMismatch {
                    key: item.key.clone(),
                    previous,
                    current: heights,
                },
            );
        }
        if let Some(reason) = resolution.default_reason() {
            tracing::warn!(key = %item.key, ?reason, "item resolved with fallback height");
        }
        item.heights = Some(heights);
        job.reports.push(ItemReport {
            key: item.key.clone(),
            resolution,
        });
        job.done.push(item);
    }

    fn complete_front(&mut self) {
        let Some(mut job) = self.jobs.pop_front() else {
            return;
        };
        tracing::debug!(
            family = self.rules.family(),
            job = job.id.0,
            items = job.done.len(),
            "job finished"
        );
        if let Some(completion) = job.completion.take() {
            completion(JobOutput {
                id: job.id,
                items: job.done,
                reports: job.reports,
            });
        }
    }

    fn absorb_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.accept(event);
        }
    }

    fn accept(&mut self, event: SurfaceEvent) {
        if let Some(cur) = self.jobs.front_mut().and_then(|j| j.current.as_mut()) {
            if cur.in_flight.as_ref().is_some_and(|f| f.id == event.id) {
                cur.in_flight = None;
                cur.measured.push(Measurement::from_outcome(event.outcome));
                return;
            }
            if let Some(pos) = cur.timed_out.iter().position(|(r, _)| *r == event.id) {
                let (_, index) = cur.timed_out.remove(pos);
                if let Measurement::Measured(h) = Measurement::from_outcome(event.outcome) {
                    cur.measured[index] = Measurement::Measured(h);
                }
                return;
            }
        }

        let found = self.late.iter().enumerate().find_map(|(pos, l)| {
            l.renders
                .iter()
                .position(|(r, _)| *r == event.id)
                .map(|slot| (pos, slot))
        });
        if let Some((pos, slot)) = found {
            let Some(late) = self.late.get_mut(pos) else {
                return;
            };
            let (_, index) = late.renders.remove(slot);
            if let Measurement::Measured(h) = Measurement::from_outcome(event.outcome) {
                late.values[index] = h;
                let current = self
                    .rules
                    .finish(&late.item, &late.ctx, &late.values)
                    .sanitized();
                if !current.same_totals(&late.heights) {
                    tracing::debug!(key = %late.item.key, "late render changed cell height");
                    publish(
                        &mut self.subscribers,
                        HeightMismatch {
                            key: late.item.key.clone(),
                            previous: late.heights,
                            current,
                        },
                    );
                }
                late.heights = current;
            }
            if late.renders.is_empty() {
                self.late.remove(pos);
            }
            return;
        }

        tracing::trace!(render = event.id.0, "ignoring report for unknown render");
    }

    fn expire(&mut self, now: Instant) {
        let Some(timeout) = self.render_timeout else {
            return;
        };
        let Some(job) = self.jobs.front_mut() else {
            return;
        };
        let expired = job
            .current
            .as_ref()
            .and_then(|c| c.in_flight.as_ref())
            .is_some_and(|f| now.saturating_duration_since(f.issued_at) >= timeout);
        if expired {
            Self::time_out(job);
        }
    }

    fn time_out(job: &mut Job) -> bool {
        let Some(cur) = job.current.as_mut() else {
            return false;
        };
        let Some(flight) = cur.in_flight.take() else {
            return false;
        };
        tracing::warn!(render = flight.id.0, "render timed out; using zero height");
        cur.timed_out.push((flight.id, cur.measured.len()));
        cur.measured
            .push(Measurement::Defaulted(DefaultReason::RenderTimedOut));
        true
    }
}

fn publish(subscribers: &mut Vec<Sender<HeightMismatch>>, mismatch: HeightMismatch) {
    subscribers.retain(|tx| tx.send(mismatch.clone()).is_ok());
}

#[cfg(test)]
#[path = "../../tests/unit/queue/runner.rs"]
mod tests;
