use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use crate::calc::announcement::AnnouncementCalculator;
use crate::calc::artist_invite::ArtistInviteCalculator;
use crate::calc::header::HeaderCalculator;
use crate::calc::image::ImageCalculator;
use crate::calc::notification::NotificationCalculator;
use crate::calc::text::TextCalculator;
use crate::calc::Calculator;
use crate::config::metrics::SizingConfig;
use crate::item::context::LayoutContext;
use crate::item::model::{SizeableItem, TypeTag};
use crate::measure::surface::MeasurementSurface;
use crate::measure::text::TextMeasurer;
use crate::queue::job::{Completion, ItemReport, JobId, JobOutput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    Text,
    Notification,
    Image,
    Header,
    ArtistInvite,
    Announcement,
}

impl Family {
    fn of(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Text | TypeTag::Comment => Self::Text,
            TypeTag::Notification => Self::Notification,
            TypeTag::Image | TypeTag::Embed => Self::Image,
            TypeTag::CategoryHeader | TypeTag::PromotionalHeader => Self::Header,
            TypeTag::ArtistInvite => Self::ArtistInvite,
            TypeTag::Announcement => Self::Announcement,
        }
    }
}

/// A mixed batch waiting for its family jobs.
struct FeedJob {
    id: JobId,
    slots: Vec<Option<(SizeableItem, ItemReport)>>,
    outstanding: usize,
    completion: Option<Completion>,
}

#[derive(Default)]
struct FeedState {
    jobs: VecDeque<FeedJob>,
}

impl FeedState {
    /// Record one family's results and pop every finished job at the head.
    fn settle(&mut self, id: JobId, positions: &[usize], output: JobOutput) -> Vec<FeedJob> {
        if let Some(job) = self.jobs.iter_mut().find(|j| j.id == id) {
            for ((&pos, item), report) in positions.iter().zip(output.items).zip(output.reports) {
                if let Some(slot) = job.slots.get_mut(pos) {
                    *slot = Some((item, report));
                }
            }
            job.outstanding = job.outstanding.saturating_sub(1);
        }
        self.take_finished()
    }

    fn take_finished(&mut self) -> Vec<FeedJob> {
        let mut finished = Vec::new();
        while self.jobs.front().is_some_and(|j| j.outstanding == 0) {
            finished.extend(self.jobs.pop_front());
        }
        finished
    }
}

fn deliver(finished: Vec<FeedJob>) {
    for mut job in finished {
        let (items, reports) = job.slots.into_iter().flatten().unzip();
        tracing::debug!(job = job.id.0, "feed job finished");
        if let Some(completion) = job.completion.take() {
            completion(JobOutput {
                id: job.id,
                items,
                reports,
            });
        }
    }
}

/// Sizes mixed feed batches by routing each item to its family calculator.
///
/// Items come back in submission order and batches complete in submission order, even when a
/// later batch only contains families that never render.
pub struct FeedSizer<S> {
    text: TextCalculator<S>,
    notification: NotificationCalculator<S>,
    image: ImageCalculator,
    header: HeaderCalculator<S>,
    artist_invite: ArtistInviteCalculator<S>,
    announcement: AnnouncementCalculator,
    state: Rc<RefCell<FeedState>>,
    next_job: u64,
}

impl<S> std::fmt::Debug for FeedSizer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSizer")
            .field("pending_jobs", &self.state.borrow().jobs.len())
            .field("next_job", &self.next_job)
            .finish_non_exhaustive()
    }
}

impl<S: MeasurementSurface> FeedSizer<S> {
    /// Build one calculator per family. Every rendering family gets its own surface from
    /// `surfaces`; styled-text families get their own measurer from `measurers`.
    pub fn new(
        config: &SizingConfig,
        mut surfaces: impl FnMut() -> S,
        mut measurers: impl FnMut() -> Box<dyn TextMeasurer>,
    ) -> Self {
        Self {
            text: Calculator::text(config, surfaces()),
            notification: Calculator::notification(config, surfaces()),
            image: Calculator::image(config),
            header: Calculator::header(config, measurers(), surfaces()),
            artist_invite: Calculator::artist_invite(config, measurers(), surfaces()),
            announcement: Calculator::announcement(config, measurers()),
            state: Rc::default(),
            next_job: 0,
        }
    }

    /// Queue a mixed batch; `completion` receives every item back in its original position.
    #[tracing::instrument(skip(self, items, completion), fields(items = items.len()))]
    pub fn process_cells(
        &mut self,
        items: Vec<SizeableItem>,
        ctx: LayoutContext,
        completion: impl FnOnce(JobOutput) + 'static,
    ) -> JobId {
        let id = JobId(self.next_job);
        self.next_job += 1;

        let mut groups: Vec<(Family, Vec<usize>, Vec<SizeableItem>)> = Vec::new();
        let len = items.len();
        for (pos, item) in items.into_iter().enumerate() {
            let family = Family::of(item.tag);
            match groups.iter_mut().find(|(f, _, _)| *f == family) {
                Some((_, positions, batch)) => {
                    positions.push(pos);
                    batch.push(item);
                }
                None => groups.push((family, vec![pos], vec![item])),
            }
        }
        self.state.borrow_mut().jobs.push_back(FeedJob {
            id,
            slots: (0..len).map(|_| None).collect(),
            outstanding: groups.len(),
            completion: Some(Box::new(completion)),
        });

        for (family, positions, batch) in groups {
            let state = Rc::clone(&self.state);
            let done = move |output: JobOutput| {
                let finished = state.borrow_mut().settle(id, &positions, output);
                deliver(finished);
            };
            match family {
                Family::Text => self.text.process_cells(batch, ctx, done),
                Family::Notification => self.notification.process_cells(batch, ctx, done),
                Family::Image => self.image.process_cells(batch, ctx, done),
                Family::Header => self.header.process_cells(batch, ctx, done),
                Family::ArtistInvite => self.artist_invite.process_cells(batch, ctx, done),
                Family::Announcement => self.announcement.process_cells(batch, ctx, done),
            };
        }

        // Empty batches have no family job to finish them.
        let finished = self.state.borrow_mut().take_finished();
        deliver(finished);
        id
    }

    /// Pump every family queue.
    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    /// [`FeedSizer::pump`] with an explicit clock reading.
    pub fn pump_at(&mut self, now: Instant) {
        self.text.pump_at(now);
        self.notification.pump_at(now);
        self.image.pump_at(now);
        self.header.pump_at(now);
        self.artist_invite.pump_at(now);
        self.announcement.pump_at(now);
    }

    /// Batches submitted and not yet delivered.
    pub fn pending_jobs(&self) -> usize {
        self.state.borrow().jobs.len()
    }

    /// Return `true` when every submitted batch has been delivered.
    pub fn is_idle(&self) -> bool {
        self.pending_jobs() == 0
    }

    /// Text family calculator.
    pub fn text_mut(&mut self) -> &mut TextCalculator<S> {
        &mut self.text
    }

    /// Notification family calculator.
    pub fn notification_mut(&mut self) -> &mut NotificationCalculator<S> {
        &mut self.notification
    }

    /// Header family calculator.
    pub fn header_mut(&mut self) -> &mut HeaderCalculator<S> {
        &mut self.header
    }

    /// Artist-invite family calculator.
    pub fn artist_invite_mut(&mut self) -> &mut ArtistInviteCalculator<S> {
        &mut self.artist_invite
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calc/feed.rs"]
mod tests;
