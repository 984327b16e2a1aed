use crate::calc::{Calculator, column_measurements};
use crate::config::metrics::{HeaderMetrics, SizingConfig};
use crate::foundation::core::height_for_ratio;
use crate::item::context::LayoutContext;
use crate::item::model::{CellHeights, HeaderContent, Payload, SizeableItem, TypeTag};
use crate::measure::markup::{plain_text, wrap_fragment};
use crate::measure::surface::MeasurementSurface;
use crate::measure::text::TextMeasurer;
use crate::queue::rules::{Fragment, HeightRules, MeasurePlan};

/// Calculator for category and promotional headers.
pub type HeaderCalculator<S> = Calculator<HeaderRules, S>;

/// Title, body and action blocks between fixed margins, never shorter than the banner ratio.
///
/// Headers span every column, so both layout modes share one height computed at the full width.
pub struct HeaderRules {
    metrics: HeaderMetrics,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for HeaderRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderRules")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl HeaderRules {
    /// Rules using the header metrics of `config`, measuring styled text with `measurer`.
    pub fn from_config(config: &SizingConfig, measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            metrics: config.header.clone(),
            measurer: Box::new(measurer),
        }
    }

    fn text_width(&self, width: f64) -> f64 {
        (width - self.metrics.side_margin * 2.0).max(0.0)
    }

    fn rendered_body(header: &HeaderContent) -> Option<&str> {
        header
            .body
            .as_deref()
            .filter(|body| header.rich_body && !plain_text(body).is_empty())
    }

    fn styled_body_height(&mut self, header: &HeaderContent, text_width: f64) -> f64 {
        match header.body.as_deref() {
            Some(body) if !header.rich_body => {
                let style = self.metrics.body_style;
                self.measurer.height_for_width(body, &style, text_width)
            }
            _ => 0.0,
        }
    }

    fn actions_height(&mut self, header: &HeaderContent, text_width: f64) -> f64 {
        let style = self.metrics.action_style;
        let labels: Vec<&str> = [header.call_to_action.as_deref(), header.posted_by.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        match labels.as_slice() {
            [] => 0.0,
            [one] => self.measurer.height_for_width(one, &style, text_width),
            [cta, posted, ..] => {
                let spacing = self.metrics.action_spacing;
                let cta_h = self.measurer.height_for_width(cta, &style, text_width);
                let posted_h = self.measurer.height_for_width(posted, &style, text_width);
                let side_by_side = self.measurer.single_line_width(cta, &style)
                    + spacing
                    + self.measurer.single_line_width(posted, &style);
                if side_by_side > text_width {
                    cta_h + spacing + posted_h
                } else {
                    cta_h.max(posted_h)
                }
            }
        }
    }

    /// Total height at `width` given the body block height.
    fn total(&mut self, header: &HeaderContent, width: f64, body_height: f64) -> f64 {
        let tw = self.text_width(width);
        let title_style = self.metrics.title_style;
        let title = self
            .measurer
            .height_for_width(&header.title, &title_style, tw);
        let actions = self.actions_height(header, tw);

        let m = &self.metrics;
        let mut height = m.top_margin + title;
        if body_height > 0.0 {
            height += m.block_spacing + body_height;
        }
        if actions > 0.0 {
            height += m.block_spacing + actions;
        }
        height += m.bottom_margin;
        height.max(height_for_ratio(width, m.min_aspect_ratio))
    }
}

impl HeightRules for HeaderRules {
    fn family(&self) -> &'static str {
        "header"
    }

    fn plan(&mut self, item: &SizeableItem, ctx: &LayoutContext) -> MeasurePlan {
        let (TypeTag::CategoryHeader | TypeTag::PromotionalHeader, Payload::Header(header)) =
            (item.tag, &item.payload)
        else {
            return MeasurePlan::Malformed;
        };
        let width = ctx.one_column_width();
        let tw = self.text_width(width);
        if let Some(body) = Self::rendered_body(header) {
            return MeasurePlan::Render(vec![Fragment {
                markup: wrap_fragment(body, tw),
                width: tw,
            }]);
        }
        let body = self.styled_body_height(header, tw);
        MeasurePlan::Ready(CellHeights::uniform(self.total(header, width, body)))
    }

    fn finish(
        &mut self,
        item: &SizeableItem,
        ctx: &LayoutContext,
        measured: &[f64],
    ) -> CellHeights {
        let Payload::Header(header) = &item.payload else {
            return CellHeights::zero();
        };
        let (body, _) = column_measurements(measured);
        CellHeights::uniform(self.total(header, ctx.one_column_width(), body)).with_measured(body)
    }
}

impl<S: MeasurementSurface> Calculator<HeaderRules, S> {
    /// Header calculator configured from `config`, owning `surface` for rich bodies.
    pub fn header(
        config: &SizingConfig,
        measurer: impl TextMeasurer + 'static,
        surface: S,
    ) -> Self {
        Self::new(
            HeaderRules::from_config(config, measurer),
            surface,
            config.render_timeout(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calc/header.rs"]
mod tests;
