use crate::foundation::core::ItemKey;
use crate::item::model::{CellHeights, SizeableItem};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
/// Identifier of a submitted job. Monotonic per queue.
pub struct JobId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Why a sub-measurement fell back to a height of `0`.
pub enum DefaultReason {
    /// The surface did not report within the render timeout, or the host abandoned the render.
    RenderTimedOut,
    /// The surface refused to start the render or dropped it unreported.
    RenderFailed,
    /// The render finished without a measurable height.
    NoMeasurableHeight,
    /// The payload does not match the type tag.
    MalformedItem,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Outcome of resolving one item.
pub enum Resolution {
    /// Every measurement succeeded.
    Resolved(CellHeights),
    /// At least one measurement fell back to `0`; `reason` is the first fallback.
    ResolvedWithDefault {
        /// Heights computed with the fallback values.
        heights: CellHeights,
        /// First fallback encountered.
        reason: DefaultReason,
    },
}

impl Resolution {
    /// Heights written to the item.
    pub fn heights(&self) -> CellHeights {
        match self {
            Self::Resolved(h) => *h,
            Self::ResolvedWithDefault { heights, .. } => *heights,
        }
    }

    /// Fallback reason, if any measurement was defaulted.
    pub fn default_reason(&self) -> Option<DefaultReason> {
        match self {
            Self::Resolved(_) => None,
            Self::ResolvedWithDefault { reason, .. } => Some(*reason),
        }
    }

    /// Return `true` when a fallback was applied.
    pub fn is_default(&self) -> bool {
        self.default_reason().is_some()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Per-item record delivered with a job's completion.
pub struct ItemReport {
    /// Item the record belongs to.
    pub key: ItemKey,
    /// How the item was resolved.
    pub resolution: Resolution,
}

#[derive(Clone, Debug, PartialEq)]
/// Everything a job hands back when it completes.
pub struct JobOutput {
    /// Job that completed.
    pub id: JobId,
    /// Items in submission order, heights written.
    pub items: Vec<SizeableItem>,
    /// One report per item, in submission order.
    pub reports: Vec<ItemReport>,
}

impl JobOutput {
    /// Number of items resolved with a fallback.
    pub fn defaulted(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.resolution.is_default())
            .count()
    }
}

/// Continuation invoked exactly once when a job's last item is resolved.
pub type Completion = Box<dyn FnOnce(JobOutput)>;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Published when a resolution changes heights a layout may already be using.
///
/// Fired when a re-submitted item's new heights differ from the placeholder it carried, and when a
/// render that had timed out reports after its item was resolved with a fallback.
pub struct HeightMismatch {
    /// Item whose cell must be laid out again.
    pub key: ItemKey,
    /// Heights the layout was using.
    pub previous: CellHeights,
    /// Heights it should use now.
    pub current: CellHeights,
}
