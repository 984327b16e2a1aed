use crate::calc::Calculator;
use crate::config::metrics::{AnnouncementMetrics, SizingConfig};
use crate::item::context::LayoutContext;
use crate::item::model::{AnnouncementContent, CellHeights, Payload, SizeableItem, TypeTag};
use crate::measure::surface::NullSurface;
use crate::measure::text::TextMeasurer;
use crate::queue::rules::{HeightRules, MeasurePlan};

/// Calculator for announcement rows; pure styled-text arithmetic, never renders.
pub type AnnouncementCalculator = Calculator<AnnouncementRules, NullSurface>;

/// Title, body and call-to-action measured beside the announcement image.
pub struct AnnouncementRules {
    metrics: AnnouncementMetrics,
    column_spacing: f64,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for AnnouncementRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnouncementRules")
            .field("metrics", &self.metrics)
            .field("column_spacing", &self.column_spacing)
            .finish_non_exhaustive()
    }
}

impl AnnouncementRules {
    /// Rules using the announcement metrics of `config`, measuring text with `measurer`.
    pub fn from_config(config: &SizingConfig, measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            metrics: config.announcement.clone(),
            column_spacing: config.column_spacing,
            measurer: Box::new(measurer),
        }
    }

    /// Width of the text column in a cell `cell_width` wide.
    pub fn text_width(&self, cell_width: f64) -> f64 {
        let m = &self.metrics;
        (cell_width - m.side_margin * 2.0 - m.image_width - m.inner_margin).max(0.0)
    }

    fn height(&mut self, announcement: &AnnouncementContent, cell_width: f64) -> f64 {
        let tw = self.text_width(cell_width);
        let m = self.metrics.clone();
        let blocks = [
            (&announcement.title, m.title_style),
            (&announcement.body, m.body_style),
            (&announcement.call_to_action, m.action_style),
        ];
        let text: f64 = blocks
            .iter()
            .map(|(s, style)| self.measurer.height_for_width(s, style, tw))
            .sum();
        m.top_margin + text + m.bottom_margin
    }
}

impl HeightRules for AnnouncementRules {
    fn family(&self) -> &'static str {
        "announcement"
    }

    fn plan(&mut self, item: &SizeableItem, ctx: &LayoutContext) -> MeasurePlan {
        let (TypeTag::Announcement, Payload::Announcement(a)) = (item.tag, &item.payload) else {
            return MeasurePlan::Malformed;
        };
        MeasurePlan::Ready(CellHeights {
            one_column: self.height(a, ctx.one_column_width()),
            multi_column: self.height(a, ctx.multi_column_width(self.column_spacing)),
            measured_content: None,
        })
    }

    fn finish(
        &mut self,
        _item: &SizeableItem,
        _ctx: &LayoutContext,
        _measured: &[f64],
    ) -> CellHeights {
        CellHeights::zero()
    }
}

impl Calculator<AnnouncementRules, NullSurface> {
    /// Announcement calculator configured from `config`.
    pub fn announcement(config: &SizingConfig, measurer: impl TextMeasurer + 'static) -> Self {
        Self::new(
            AnnouncementRules::from_config(config, measurer),
            NullSurface,
            None,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calc/announcement.rs"]
mod tests;
