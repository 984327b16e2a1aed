//! Cellheight sizes heterogeneous feed cells before they are laid out in a virtualized list.
//!
//! Some content (rich text, notification bodies, header copy) only has a height once it has been
//! laid out, so sizing runs through per-family [`Calculator`]s:
//!
//! - Build a calculator around a [`MeasurementSurface`] it owns exclusively
//! - Submit batches of [`SizeableItem`]s with [`Calculator::process_cells`]
//! - Pump it from the host event loop until the completion fires with heights written
//!
//! Jobs run strictly in submission order and never fail; unmeasurable content falls back to a
//! zero height that is reported as [`Resolution::ResolvedWithDefault`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod calc;
pub(crate) mod config;
pub(crate) mod item;
pub(crate) mod load;
pub(crate) mod measure;
pub(crate) mod queue;

pub use crate::foundation::core::{ItemKey, Size, aspect_ratio, height_for_ratio, non_negative};
pub use crate::foundation::error::{CellError, CellResult};

pub use crate::calc::Calculator;
pub use crate::calc::announcement::{AnnouncementCalculator, AnnouncementRules};
pub use crate::calc::artist_invite::{ArtistInviteCalculator, ArtistInviteRules};
pub use crate::calc::feed::FeedSizer;
pub use crate::calc::header::{HeaderCalculator, HeaderRules};
pub use crate::calc::image::{ImageCalculator, ImageRules};
pub use crate::calc::notification::{NotificationCalculator, NotificationRules};
pub use crate::calc::text::{TextCalculator, TextRules};
pub use crate::config::metrics::{
    AnnouncementMetrics, ArtistInviteMetrics, HeaderMetrics, ImageMetrics, NotificationMetrics,
    SizingConfig, TextMetrics,
};
pub use crate::item::context::LayoutContext;
pub use crate::item::model::{
    AnnouncementContent, ArtistInviteContent, CellHeights, EmbedContent, ExpandState,
    HeaderContent, ImageContent, NotificationContent, Payload, SizeableItem, TextContent, TypeTag,
};
pub use crate::load::notifications::{
    LoadOutcome, LoadStage, Notification, NotificationFilter, NotificationKind,
    NotificationsPipeline,
};
pub use crate::load::token::{GenerationGuard, Ticket};
pub use crate::measure::markup::{plain_text, wrap_fragment};
pub use crate::measure::surface::{
    MeasurementSurface, NullSurface, RenderId, RenderOutcome, RenderReporter, RenderRequest,
    SurfaceEvent,
};
pub use crate::measure::text::{
    EstimatedTextMeasurer, ParleyTextMeasurer, TextMeasurer, TextStyle, TextSurface,
};
pub use crate::queue::job::{
    Completion, DefaultReason, HeightMismatch, ItemReport, JobId, JobOutput, Resolution,
};
pub use crate::queue::rules::{Fragment, HeightRules, MeasurePlan};
pub use crate::queue::runner::JobQueue;
