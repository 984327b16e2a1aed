use crate::item::context::LayoutContext;
use crate::item::model::{CellHeights, SizeableItem};

#[derive(Clone, Debug, PartialEq)]
/// One render needed to size an item.
pub struct Fragment {
    /// Markup handed to the surface.
    pub markup: String,
    /// Width to lay it out at.
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// What a family needs before it can size an item.
pub enum MeasurePlan {
    /// Heights are pure geometry; no render needed.
    Ready(CellHeights),
    /// Render these fragments, in order, then call [`HeightRules::finish`].
    Render(Vec<Fragment>),
    /// Payload does not belong to this family or does not match its tag.
    Malformed,
}

/// Family-specific height arithmetic driven by a [`crate::JobQueue`].
pub trait HeightRules {
    /// Short family name used in logs.
    fn family(&self) -> &'static str;

    /// Decide whether `item` needs renders, and which.
    fn plan(&mut self, item: &SizeableItem, ctx: &LayoutContext) -> MeasurePlan;

    /// Compute final heights from one measured height per planned fragment.
    ///
    /// Fragments that could not be measured contribute `0.0`.
    fn finish(&mut self, item: &SizeableItem, ctx: &LayoutContext, measured: &[f64])
    -> CellHeights;
}
