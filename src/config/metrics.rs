use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::error::{CellError, CellResult};
use crate::measure::text::TextStyle;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// All fixed geometry consulted by the calculators.
///
/// Every field has a production default, so a configuration file only needs to name the values it
/// overrides:
///
/// ```json
/// { "column_spacing": 8, "image": { "bottom_margin": 4 } }
/// ```
pub struct SizingConfig {
    /// Horizontal gap between columns in multi-column mode.
    pub column_spacing: f64,
    /// Longest time a measurement render may stay outstanding before it is defaulted to `0`.
    ///
    /// `None` disables the timeout; a silent surface then stalls its queue until
    /// [`crate::JobQueue::abandon_render`] is called.
    pub render_timeout_ms: Option<u64>,
    /// Text posts and comments.
    pub text: TextMetrics,
    /// Notification rows.
    pub notification: NotificationMetrics,
    /// Image regions and embeds.
    pub image: ImageMetrics,
    /// Category and promotional headers.
    pub header: HeaderMetrics,
    /// Artist-invite cards.
    pub artist_invite: ArtistInviteMetrics,
    /// Announcement rows.
    pub announcement: AnnouncementMetrics,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            column_spacing: 12.0,
            render_timeout_ms: Some(2_000),
            text: TextMetrics::default(),
            notification: NotificationMetrics::default(),
            image: ImageMetrics::default(),
            header: HeaderMetrics::default(),
            artist_invite: ArtistInviteMetrics::default(),
            announcement: AnnouncementMetrics::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry of text post and comment cells.
pub struct TextMetrics {
    /// Vertical margin applied above and below the cell.
    pub side_margin: f64,
    /// Height of the created-at row.
    pub created_at_height: f64,
    /// Extra space added below comments.
    pub comment_margin: f64,
    /// Horizontal inset on each side of the rendered body.
    pub side_inset: f64,
    /// Height of the "show more" row shown under collapsed, collapsible content.
    pub show_more_height: f64,
    /// Height of the spinner row shown while more content is loading.
    pub loading_height: f64,
    /// Style the body is rendered with.
    pub body_style: TextStyle,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            side_margin: 15.0,
            created_at_height: 12.0,
            comment_margin: 10.0,
            side_inset: 15.0,
            show_more_height: 44.0,
            loading_height: 44.0,
            body_style: TextStyle::new(14.0, 1.4),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry of notification cells.
pub struct NotificationMetrics {
    /// Vertical margin applied above and below the row content.
    pub side_margin: f64,
    /// Horizontal margin applied on both sides of the row.
    pub horizontal_margin: f64,
    /// Fixed height of the "created at" row.
    pub created_at_height: f64,
    /// Height of the reply / follow-back control row.
    pub controls_height: f64,
    /// Width of the avatar column.
    pub avatar_width: f64,
    /// Gap between avatar, text and image columns.
    pub inner_margin: f64,
    /// Width of the inline image column.
    pub image_width: f64,
}

impl Default for NotificationMetrics {
    fn default() -> Self {
        Self {
            side_margin: 15.0,
            horizontal_margin: 15.0,
            created_at_height: 12.0,
            controls_height: 36.0,
            avatar_width: 30.0,
            inner_margin: 10.0,
            image_width: 87.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry of image regions and embeds.
pub struct ImageMetrics {
    /// Space below every image or embed.
    pub bottom_margin: f64,
    /// `width / height` used when an image has no known dimensions.
    pub default_image_ratio: f64,
    /// `width / height` used for embeds that are neither audio nor a square service.
    pub default_embed_ratio: f64,
    /// Embed services rendered in a square frame (compared case-insensitively).
    pub square_services: Vec<String>,
}

impl Default for ImageMetrics {
    fn default() -> Self {
        Self {
            bottom_margin: 10.0,
            default_image_ratio: 4.0 / 3.0,
            default_embed_ratio: 16.0 / 9.0,
            square_services: vec!["ustream".to_string()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry of category and promotional headers.
pub struct HeaderMetrics {
    /// Space above the title.
    pub top_margin: f64,
    /// Space below the call-to-action / "posted by" block.
    pub bottom_margin: f64,
    /// Horizontal margin on each side.
    pub side_margin: f64,
    /// Gap between title, body and action blocks.
    pub block_spacing: f64,
    /// Gap between call-to-action and "posted by", horizontally or vertically.
    pub action_spacing: f64,
    /// Banner ratio (`width / height`) that bounds the header height from below.
    pub min_aspect_ratio: f64,
    /// Title style.
    pub title_style: TextStyle,
    /// Body style, used when the body is not rendered as rich content.
    pub body_style: TextStyle,
    /// Call-to-action and "posted by" style.
    pub action_style: TextStyle,
}

impl Default for HeaderMetrics {
    fn default() -> Self {
        Self {
            top_margin: 25.0,
            bottom_margin: 25.0,
            side_margin: 15.0,
            block_spacing: 15.0,
            action_spacing: 15.0,
            min_aspect_ratio: 1.5,
            title_style: TextStyle::new(32.0, 1.2),
            body_style: TextStyle::new(14.0, 1.4),
            action_style: TextStyle::new(12.0, 1.3),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry of artist-invite cards.
pub struct ArtistInviteMetrics {
    /// `width / height` of the header image.
    pub header_image_ratio: f64,
    /// Horizontal margin on each side of the text blocks.
    pub side_margin: f64,
    /// Space above the title block.
    pub title_top_margin: f64,
    /// Space above the info block.
    pub info_top_margin: f64,
    /// Space above the rendered description.
    pub content_top_margin: f64,
    /// Space below the rendered description, applied only when it is non-empty.
    pub content_bottom_margin: f64,
    /// Title style.
    pub title_style: TextStyle,
    /// Info block style (invite type, status, dates).
    pub info_style: TextStyle,
}

impl Default for ArtistInviteMetrics {
    fn default() -> Self {
        Self {
            header_image_ratio: 1.875,
            side_margin: 15.0,
            title_top_margin: 20.0,
            info_top_margin: 10.0,
            content_top_margin: 20.0,
            content_bottom_margin: 30.0,
            title_style: TextStyle::new(24.0, 1.2),
            info_style: TextStyle::new(12.0, 1.5),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry of announcement rows.
pub struct AnnouncementMetrics {
    /// Space above the title.
    pub top_margin: f64,
    /// Space below the call-to-action.
    pub bottom_margin: f64,
    /// Horizontal margin on each side.
    pub side_margin: f64,
    /// Width of the announcement image column.
    pub image_width: f64,
    /// Gap between image column and text column.
    pub inner_margin: f64,
    /// Title style.
    pub title_style: TextStyle,
    /// Body style.
    pub body_style: TextStyle,
    /// Call-to-action style.
    pub action_style: TextStyle,
}

impl Default for AnnouncementMetrics {
    fn default() -> Self {
        Self {
            top_margin: 15.0,
            bottom_margin: 15.0,
            side_margin: 15.0,
            image_width: 40.0,
            inner_margin: 15.0,
            title_style: TextStyle::new(14.0, 1.3),
            body_style: TextStyle::new(14.0, 1.4),
            action_style: TextStyle::new(12.0, 1.3),
        }
    }
}

impl SizingConfig {
    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> CellResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CellError::serde(format!("parse sizing config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(s: &str) -> CellResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a configuration from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> CellResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CellError::validation(format!("open sizing config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Render timeout as a [`Duration`], if enabled.
    pub fn render_timeout(&self) -> Option<Duration> {
        self.render_timeout_ms.map(Duration::from_millis)
    }

    /// Check that every length is finite and non-negative and every ratio is finite and positive.
    pub fn validate(&self) -> CellResult<()> {
        length("column_spacing", self.column_spacing)?;
        if self.render_timeout_ms == Some(0) {
            return Err(CellError::validation(
                "render_timeout_ms must be > 0 when set",
            ));
        }

        let t = &self.text;
        length("text.side_margin", t.side_margin)?;
        length("text.created_at_height", t.created_at_height)?;
        length("text.comment_margin", t.comment_margin)?;
        length("text.side_inset", t.side_inset)?;
        length("text.show_more_height", t.show_more_height)?;
        length("text.loading_height", t.loading_height)?;
        t.body_style.validate("text.body_style")?;

        let n = &self.notification;
        length("notification.side_margin", n.side_margin)?;
        length("notification.horizontal_margin", n.horizontal_margin)?;
        length("notification.created_at_height", n.created_at_height)?;
        length("notification.controls_height", n.controls_height)?;
        length("notification.avatar_width", n.avatar_width)?;
        length("notification.inner_margin", n.inner_margin)?;
        length("notification.image_width", n.image_width)?;

        let i = &self.image;
        length("image.bottom_margin", i.bottom_margin)?;
        ratio("image.default_image_ratio", i.default_image_ratio)?;
        ratio("image.default_embed_ratio", i.default_embed_ratio)?;

        let h = &self.header;
        length("header.top_margin", h.top_margin)?;
        length("header.bottom_margin", h.bottom_margin)?;
        length("header.side_margin", h.side_margin)?;
        length("header.block_spacing", h.block_spacing)?;
        length("header.action_spacing", h.action_spacing)?;
        ratio("header.min_aspect_ratio", h.min_aspect_ratio)?;
        h.title_style.validate("header.title_style")?;
        h.body_style.validate("header.body_style")?;
        h.action_style.validate("header.action_style")?;

        let a = &self.artist_invite;
        ratio("artist_invite.header_image_ratio", a.header_image_ratio)?;
        length("artist_invite.side_margin", a.side_margin)?;
        length("artist_invite.title_top_margin", a.title_top_margin)?;
        length("artist_invite.info_top_margin", a.info_top_margin)?;
        length("artist_invite.content_top_margin", a.content_top_margin)?;
        length("artist_invite.content_bottom_margin", a.content_bottom_margin)?;
        a.title_style.validate("artist_invite.title_style")?;
        a.info_style.validate("artist_invite.info_style")?;

        let an = &self.announcement;
        length("announcement.top_margin", an.top_margin)?;
        length("announcement.bottom_margin", an.bottom_margin)?;
        length("announcement.side_margin", an.side_margin)?;
        length("announcement.image_width", an.image_width)?;
        length("announcement.inner_margin", an.inner_margin)?;
        an.title_style.validate("announcement.title_style")?;
        an.body_style.validate("announcement.body_style")?;
        an.action_style.validate("announcement.action_style")?;

        Ok(())
    }
}

fn length(field: &str, v: f64) -> CellResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(CellError::validation(format!(
            "{field} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn ratio(field: &str, v: f64) -> CellResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(CellError::validation(format!(
            "{field} must be finite and > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/metrics.rs"]
mod tests;
