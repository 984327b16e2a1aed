use std::collections::HashSet;

use crate::item::model::{
    AnnouncementContent, ImageContent, NotificationContent, Payload, SizeableItem, TypeTag,
};
use crate::load::token::{GenerationGuard, Ticket};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What a notification is about.
pub enum NotificationKind {
    /// Someone commented on the viewer's post.
    Comment,
    /// Someone mentioned the viewer.
    Mention,
    /// Someone loved the viewer's post.
    Love,
    /// Someone reposted the viewer's post.
    Repost,
    /// Someone followed the viewer.
    Relationship,
    /// Anything else.
    #[default]
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Notifications tab selected by the viewer.
pub enum NotificationFilter {
    /// Every notification.
    #[default]
    All,
    /// Comments only.
    Comments,
    /// Mentions only.
    Mentions,
    /// Loves only.
    Loves,
    /// Reposts only.
    Reposts,
    /// New followers only.
    Relationships,
}

impl NotificationFilter {
    /// Return `true` when notifications of `kind` are shown under this filter.
    pub fn matches(self, kind: NotificationKind) -> bool {
        match self {
            Self::All => true,
            Self::Comments => kind == NotificationKind::Comment,
            Self::Mentions => kind == NotificationKind::Mention,
            Self::Loves => kind == NotificationKind::Love,
            Self::Reposts => kind == NotificationKind::Repost,
            Self::Relationships => kind == NotificationKind::Relationship,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Notification as delivered by the notifications fetch.
pub struct Notification {
    /// Notification identifier.
    pub id: String,
    /// What the notification is about.
    #[serde(default)]
    pub kind: NotificationKind,
    /// HTML summary.
    pub html: String,
    /// Inline image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageContent>,
    /// Whether the viewer may reply.
    #[serde(default)]
    pub can_reply: bool,
    /// Whether the viewer may follow back.
    #[serde(default)]
    pub can_follow_back: bool,
}

impl Notification {
    fn into_item(self) -> SizeableItem {
        SizeableItem::new(
            format!("notification-{}", self.id),
            TypeTag::Notification,
            Payload::Notification(NotificationContent {
                html: self.html,
                image: self.image,
                can_reply: self.can_reply,
                can_follow_back: self.can_follow_back,
            }),
        )
    }
}

fn announcement_item(announcement: &AnnouncementContent) -> SizeableItem {
    SizeableItem::new(
        format!("announcement-{}", announcement.id),
        TypeTag::Announcement,
        Payload::Announcement(announcement.clone()),
    )
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Progress of the current load generation.
pub enum LoadStage {
    /// No load started yet.
    #[default]
    Idle,
    /// Waiting for one or both fetches.
    Loading {
        /// Generation being loaded.
        ticket: Ticket,
        /// Announcements fetch has reported.
        announcements: bool,
        /// Notifications fetch has reported.
        notifications: bool,
    },
    /// Both fetches reported and the items were classified.
    Loaded(Ticket),
    /// A fetch of the current generation failed.
    Failed {
        /// Generation that failed.
        ticket: Ticket,
        /// Failure description.
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
/// Effect of a fetch completion on the pipeline.
pub enum LoadOutcome {
    /// Accepted; the other fetch of this generation is still outstanding.
    Pending,
    /// Both fetches are in; classified items, announcements first.
    Completed(Vec<SizeableItem>),
    /// Accepted failure of the current generation.
    Failed(String),
    /// Result belongs to a superseded generation and was dropped without touching state.
    Discarded,
}

#[derive(Debug, Default)]
/// Two-stage notifications load (announcements, then the notification page) guarded against
/// out-of-order completion of overlapping loads.
pub struct NotificationsPipeline {
    guard: GenerationGuard,
    filter: NotificationFilter,
    stage: LoadStage,
    announcements: Vec<AnnouncementContent>,
    notifications: Option<Vec<Notification>>,
    dismissed: HashSet<String>,
    items: Vec<SizeableItem>,
}

impl NotificationsPipeline {
    /// Idle pipeline with its own generation counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline sharing `guard` with other load sites.
    pub fn with_guard(guard: GenerationGuard) -> Self {
        Self {
            guard,
            ..Self::default()
        }
    }

    /// Start a new logical load generation under the current filter and return its ticket.
    ///
    /// Results still in flight for earlier tickets are discarded, and the load waits for both
    /// fetches of the new generation.
    pub fn reset_initial_page_loading_token(&mut self) -> Ticket {
        let ticket = self.guard.advance();
        self.notifications = None;
        self.stage = LoadStage::Loading {
            ticket,
            announcements: false,
            notifications: false,
        };
        ticket
    }

    /// Return `true` when `ticket` belongs to the newest load generation.
    pub fn is_valid_initial_page_loading_token(&self, ticket: Ticket) -> bool {
        self.guard.is_current(ticket)
    }

    /// Begin loading under `filter`. Fetches started for this load must carry the returned ticket.
    #[tracing::instrument(skip(self))]
    pub fn begin_load(&mut self, filter: NotificationFilter) -> Ticket {
        self.filter = filter;
        let ticket = self.reset_initial_page_loading_token();
        tracing::debug!(ticket = ticket.0, "notifications load started");
        ticket
    }

    /// Announcements fetch finished.
    #[tracing::instrument(skip(self, announcements), fields(count = announcements.len()))]
    pub fn receive_announcements(
        &mut self,
        ticket: Ticket,
        announcements: Vec<AnnouncementContent>,
    ) -> LoadOutcome {
        if !self.accepts(ticket, "announcements") {
            return LoadOutcome::Discarded;
        }
        self.announcements = announcements
            .into_iter()
            .filter(|a| !self.dismissed.contains(&a.id))
            .collect();
        if let LoadStage::Loading { announcements, .. } = &mut self.stage {
            *announcements = true;
        }
        self.try_complete()
    }

    /// Notifications fetch finished.
    #[tracing::instrument(skip(self, notifications), fields(count = notifications.len()))]
    pub fn receive_notifications(
        &mut self,
        ticket: Ticket,
        notifications: Vec<Notification>,
    ) -> LoadOutcome {
        if !self.accepts(ticket, "notifications") {
            return LoadOutcome::Discarded;
        }
        self.notifications = Some(notifications);
        if let LoadStage::Loading { notifications, .. } = &mut self.stage {
            *notifications = true;
        }
        self.try_complete()
    }

    /// A fetch of generation `ticket` failed.
    #[tracing::instrument(skip(self))]
    pub fn receive_failure(&mut self, ticket: Ticket, message: &str) -> LoadOutcome {
        if !self.accepts(ticket, "failure") {
            return LoadOutcome::Discarded;
        }
        tracing::warn!(ticket = ticket.0, error = message, "notifications load failed");
        self.notifications = None;
        self.stage = LoadStage::Failed {
            ticket,
            message: message.to_string(),
        };
        LoadOutcome::Failed(message.to_string())
    }

    /// Hide an announcement for the rest of the session. Returns `false` for unknown ids.
    pub fn dismiss_announcement(&mut self, id: &str) -> bool {
        self.dismissed.insert(id.to_string());
        let before = self.announcements.len();
        self.announcements.retain(|a| a.id != id);
        let key = format!("announcement-{id}");
        self.items.retain(|item| item.key.as_str() != key);
        self.announcements.len() != before
    }

    /// Progress of the current generation.
    pub fn stage(&self) -> &LoadStage {
        &self.stage
    }

    /// Active filter.
    pub fn filter(&self) -> NotificationFilter {
        self.filter
    }

    /// Announcements accepted from the newest generation, minus dismissed ones.
    pub fn announcements(&self) -> &[AnnouncementContent] {
        &self.announcements
    }

    /// Items classified by the last completed load.
    pub fn items(&self) -> &[SizeableItem] {
        &self.items
    }

    fn accepts(&self, ticket: Ticket, what: &str) -> bool {
        if self.is_valid_initial_page_loading_token(ticket) {
            return true;
        }
        tracing::warn!(
            ticket = ticket.0,
            current = self.guard.current().0,
            what,
            "discarding stale load result"
        );
        false
    }

    fn try_complete(&mut self) -> LoadOutcome {
        let LoadStage::Loading {
            ticket,
            announcements: true,
            notifications: true,
        } = self.stage
        else {
            return LoadOutcome::Pending;
        };
        let filter = self.filter;
        let notifications = self.notifications.take().unwrap_or_default();
        self.items = self
            .announcements
            .iter()
            .map(announcement_item)
            .chain(
                notifications
                    .into_iter()
                    .filter(|n| filter.matches(n.kind))
                    .map(Notification::into_item),
            )
            .collect();
        self.stage = LoadStage::Loaded(ticket);
        tracing::debug!(ticket = ticket.0, items = self.items.len(), "notifications classified");
        LoadOutcome::Completed(self.items.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/load/notifications.rs"]
mod tests;
