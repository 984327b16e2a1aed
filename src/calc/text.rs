use crate::calc::{Calculator, column_fragments, column_measurements};
use crate::config::metrics::{SizingConfig, TextMetrics};
use crate::item::context::LayoutContext;
use crate::item::model::{CellHeights, ExpandState, Payload, SizeableItem, TextContent, TypeTag};
use crate::measure::markup::plain_text;
use crate::measure::surface::MeasurementSurface;
use crate::queue::rules::{HeightRules, MeasurePlan};

/// Calculator for post and comment bodies.
pub type TextCalculator<S> = Calculator<TextRules, S>;

#[derive(Clone, Debug)]
/// Rendered body plus the created-at row, both side margins and expand chrome.
pub struct TextRules {
    metrics: TextMetrics,
    column_spacing: f64,
}

impl TextRules {
    /// Rules using the text metrics of `config`.
    pub fn from_config(config: &SizingConfig) -> Self {
        Self {
            metrics: config.text.clone(),
            column_spacing: config.column_spacing,
        }
    }

    fn render_widths(&self, ctx: &LayoutContext) -> (f64, f64) {
        let inset = self.metrics.side_inset * 2.0;
        (
            (ctx.one_column_width() - inset).max(0.0),
            (ctx.multi_column_width(self.column_spacing) - inset).max(0.0),
        )
    }

    fn chrome(&self, item: &SizeableItem, text: &TextContent) -> f64 {
        let m = &self.metrics;
        let comment = if item.tag == TypeTag::Comment {
            m.comment_margin
        } else {
            0.0
        };
        let expand = match item.state {
            ExpandState::Collapsed if text.collapsible => m.show_more_height,
            ExpandState::Loading => m.loading_height,
            ExpandState::Collapsed | ExpandState::Expanded => 0.0,
        };
        m.created_at_height + m.side_margin * 2.0 + comment + expand
    }
}

impl HeightRules for TextRules {
    fn family(&self) -> &'static str {
        "text"
    }

    fn plan(&mut self, item: &SizeableItem, ctx: &LayoutContext) -> MeasurePlan {
        let Payload::Text(text) = &item.payload else {
            return MeasurePlan::Malformed;
        };
        if !matches!(item.tag, TypeTag::Text | TypeTag::Comment) {
            return MeasurePlan::Malformed;
        }
        if plain_text(&text.html).is_empty() {
            let chrome = self.chrome(item, text);
            return MeasurePlan::Ready(CellHeights::uniform(chrome).with_measured(0.0));
        }
        let (one, multi) = self.render_widths(ctx);
        MeasurePlan::Render(column_fragments(&text.html, one, multi))
    }

    fn finish(
        &mut self,
        item: &SizeableItem,
        _ctx: &LayoutContext,
        measured: &[f64],
    ) -> CellHeights {
        let Payload::Text(text) = &item.payload else {
            return CellHeights::zero();
        };
        let (one, multi) = column_measurements(measured);
        let chrome = self.chrome(item, text);
        CellHeights {
            one_column: one + chrome,
            multi_column: multi + chrome,
            measured_content: Some(one),
        }
    }
}

impl<S: MeasurementSurface> Calculator<TextRules, S> {
    /// Text calculator configured from `config`, owning `surface`.
    pub fn text(config: &SizingConfig, surface: S) -> Self {
        Self::new(
            TextRules::from_config(config),
            surface,
            config.render_timeout(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calc/text.rs"]
mod tests;
