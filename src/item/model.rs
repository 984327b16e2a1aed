use crate::foundation::core::{ItemKey, Size, non_negative};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Discriminator selecting the height rules and render template for an item.
pub enum TypeTag {
    /// Post body text.
    Text,
    /// Comment body text.
    Comment,
    /// Notification row.
    Notification,
    /// Image region.
    Image,
    /// Third-party embed (video, audio).
    Embed,
    /// Category header.
    CategoryHeader,
    /// Promotional header.
    PromotionalHeader,
    /// Artist-invite card.
    ArtistInvite,
    /// Announcement row.
    Announcement,
}

impl TypeTag {
    /// Return `true` when `payload` is the content family this tag expects.
    pub fn accepts(self, payload: &Payload) -> bool {
        matches!(
            (self, payload),
            (Self::Text | Self::Comment, Payload::Text(_))
                | (Self::Notification, Payload::Notification(_))
                | (Self::Image, Payload::Image(_))
                | (Self::Embed, Payload::Embed(_))
                | (
                    Self::CategoryHeader | Self::PromotionalHeader,
                    Payload::Header(_)
                )
                | (Self::ArtistInvite, Payload::ArtistInvite(_))
                | (Self::Announcement, Payload::Announcement(_))
        )
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Content carried by a feed row.
pub enum Payload {
    /// Rich text body of a post or comment.
    Text(TextContent),
    /// Notification body with optional inline image.
    Notification(NotificationContent),
    /// Image region.
    Image(ImageContent),
    /// Third-party embed.
    Embed(EmbedContent),
    /// Category or promotional header.
    Header(HeaderContent),
    /// Artist-invite card.
    ArtistInvite(ArtistInviteContent),
    /// Announcement.
    Announcement(AnnouncementContent),
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Rich text body.
pub struct TextContent {
    /// HTML fragment of the body.
    pub html: String,
    /// Whether the body is truncated and can be expanded with a "show more" control.
    #[serde(default)]
    pub collapsible: bool,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Notification body.
pub struct NotificationContent {
    /// HTML fragment of the notification text.
    pub html: String,
    /// Inline image shown next to the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageContent>,
    /// Whether the viewer may reply from the row.
    #[serde(default)]
    pub can_reply: bool,
    /// Whether the viewer may follow back from the row.
    #[serde(default)]
    pub can_follow_back: bool,
}

impl NotificationContent {
    /// Return `true` when the row shows a reply or follow-back control.
    pub fn has_controls(&self) -> bool {
        self.can_reply || self.can_follow_back
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Image region.
pub struct ImageContent {
    /// Pixel dimensions of the attached asset, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Third-party embed.
pub struct EmbedContent {
    /// Provider name, e.g. `youtube`.
    pub service: String,
    /// Whether the embed is an audio player.
    #[serde(default)]
    pub is_audio: bool,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Category or promotional header.
pub struct HeaderContent {
    /// Title text.
    pub title: String,
    /// Body text or HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether `body` is HTML that must be rendered to be measured.
    #[serde(default)]
    pub rich_body: bool,
    /// Call-to-action label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    /// "Posted by" attribution label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Artist-invite card.
pub struct ArtistInviteContent {
    /// Invite title.
    pub title: String,
    /// Invite type label, e.g. `Art Exhibition`.
    #[serde(default)]
    pub invite_type: String,
    /// Status label, e.g. `Open For Submissions`.
    #[serde(default)]
    pub status: String,
    /// Human-readable date range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    /// HTML description rendered below the info block.
    #[serde(default)]
    pub description_html: String,
}

impl ArtistInviteContent {
    /// Lines shown in the info block, skipping empty ones.
    pub fn info_lines(&self) -> Vec<&str> {
        [
            Some(self.invite_type.as_str()),
            Some(self.status.as_str()),
            self.dates.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Announcement row.
pub struct AnnouncementContent {
    /// Announcement identifier.
    pub id: String,
    /// Title text.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub body: String,
    /// Call-to-action label.
    #[serde(default)]
    pub call_to_action: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Heights written by a calculator.
pub struct CellHeights {
    /// Total cell height in one-column mode.
    pub one_column: f64,
    /// Total cell height in multi-column mode.
    pub multi_column: f64,
    /// Raw rendered content height, excluding chrome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_content: Option<f64>,
}

impl CellHeights {
    /// Heights for a cell that is the same in both layout modes.
    pub fn uniform(height: f64) -> Self {
        Self {
            one_column: height,
            multi_column: height,
            measured_content: None,
        }
    }

    /// All-zero heights, used for unmeasurable or malformed items.
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// Attach the raw content height.
    pub fn with_measured(mut self, measured: f64) -> Self {
        self.measured_content = Some(measured);
        self
    }

    /// Return `true` when both totals are non-negative and the content height fits in both.
    pub fn is_consistent(&self) -> bool {
        let totals_ok = self.one_column.is_finite()
            && self.multi_column.is_finite()
            && self.one_column >= 0.0
            && self.multi_column >= 0.0;
        let content_ok = match self.measured_content {
            Some(m) => m.is_finite() && m >= 0.0 && m <= self.one_column && m <= self.multi_column,
            None => true,
        };
        totals_ok && content_ok
    }

    /// Force the consistency invariant: totals non-negative, content within both totals.
    pub(crate) fn sanitized(self) -> Self {
        let one_column = non_negative(self.one_column);
        let multi_column = non_negative(self.multi_column);
        Self {
            one_column,
            multi_column,
            measured_content: self
                .measured_content
                .map(|m| non_negative(m).min(one_column).min(multi_column)),
        }
    }

    /// Compare the two totals, ignoring the raw content height.
    pub(crate) fn same_totals(&self, other: &Self) -> bool {
        self.one_column == other.one_column && self.multi_column == other.multi_column
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Expansion state of rows with expandable content.
///
/// Transitions are driven by the UI layer; calculators only read the state.
pub enum ExpandState {
    /// Content is truncated.
    #[default]
    Collapsed,
    /// Content is fully shown.
    Expanded,
    /// More content has been requested and is on its way.
    Loading,
}

impl ExpandState {
    /// State after the user asks for more content.
    pub fn request_more(self) -> Self {
        match self {
            Self::Collapsed => Self::Loading,
            other => other,
        }
    }

    /// State after a load started by [`ExpandState::request_more`] settles.
    pub fn settle(self, loaded: bool) -> Self {
        match (self, loaded) {
            (Self::Loading, true) => Self::Expanded,
            (Self::Loading, false) => Self::Collapsed,
            (other, _) => other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One feed row awaiting (or carrying) computed heights.
pub struct SizeableItem {
    /// Stable row identifier.
    pub key: ItemKey,
    /// Content family discriminator.
    pub tag: TypeTag,
    /// Row content.
    pub payload: Payload,
    /// Heights from the most recent resolution, or a placeholder supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heights: Option<CellHeights>,
    /// Expansion state, for families that have one.
    #[serde(default)]
    pub state: ExpandState,
}

impl SizeableItem {
    /// Build an unmeasured item.
    pub fn new(key: impl Into<String>, tag: TypeTag, payload: Payload) -> Self {
        Self {
            key: ItemKey::new(key),
            tag,
            payload,
            heights: None,
            state: ExpandState::default(),
        }
    }

    /// Attach placeholder heights.
    pub fn with_heights(mut self, heights: CellHeights) -> Self {
        self.heights = Some(heights);
        self
    }

    /// Set the expansion state.
    pub fn with_state(mut self, state: ExpandState) -> Self {
        self.state = state;
        self
    }

    /// Return `true` when the payload matches the type tag.
    pub fn is_well_formed(&self) -> bool {
        self.tag.accepts(&self.payload)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/item/model.rs"]
mod tests;
