use crate::calc::image::image_height;
use crate::calc::{Calculator, column_fragments, column_measurements};
use crate::config::metrics::{NotificationMetrics, SizingConfig};
use crate::item::context::LayoutContext;
use crate::item::model::{CellHeights, NotificationContent, Payload, SizeableItem, TypeTag};
use crate::measure::markup::plain_text;
use crate::measure::surface::MeasurementSurface;
use crate::queue::rules::{HeightRules, MeasurePlan};

/// Calculator for notification rows.
pub type NotificationCalculator<S> = Calculator<NotificationRules, S>;

#[derive(Clone, Debug)]
/// Rendered text beside an optional image, plus created-at row, controls and margins.
pub struct NotificationRules {
    metrics: NotificationMetrics,
    default_image_ratio: f64,
    column_spacing: f64,
}

impl NotificationRules {
    /// Rules using the notification metrics of `config`.
    pub fn from_config(config: &SizingConfig) -> Self {
        Self {
            metrics: config.notification.clone(),
            default_image_ratio: config.image.default_image_ratio,
            column_spacing: config.column_spacing,
        }
    }

    /// Width left for the text column in a cell `cell_width` wide.
    pub fn text_width(&self, cell_width: f64, has_image: bool) -> f64 {
        let m = &self.metrics;
        let mut w = cell_width - m.horizontal_margin * 2.0 - m.avatar_width - m.inner_margin;
        if has_image {
            w -= m.inner_margin + m.image_width;
        }
        w.max(0.0)
    }

    fn total(&self, n: &NotificationContent, ctx: &LayoutContext, text_height: f64) -> f64 {
        let m = &self.metrics;
        let image = n
            .image
            .map(|i| image_height(i.size, m.image_width, self.default_image_ratio))
            .unwrap_or(0.0);
        let controls = if ctx.authenticated() && n.has_controls() {
            m.controls_height
        } else {
            0.0
        };
        text_height.max(image) + m.created_at_height + controls + m.side_margin * 2.0
    }
}

impl HeightRules for NotificationRules {
    fn family(&self) -> &'static str {
        "notification"
    }

    fn plan(&mut self, item: &SizeableItem, ctx: &LayoutContext) -> MeasurePlan {
        let (TypeTag::Notification, Payload::Notification(n)) = (item.tag, &item.payload) else {
            return MeasurePlan::Malformed;
        };
        if plain_text(&n.html).is_empty() {
            let h = self.total(n, ctx, 0.0);
            return MeasurePlan::Ready(CellHeights::uniform(h).with_measured(0.0));
        }
        let has_image = n.image.is_some();
        let one = self.text_width(ctx.one_column_width(), has_image);
        let multi = self.text_width(ctx.multi_column_width(self.column_spacing), has_image);
        MeasurePlan::Render(column_fragments(&n.html, one, multi))
    }

    fn finish(
        &mut self,
        item: &SizeableItem,
        ctx: &LayoutContext,
        measured: &[f64],
    ) -> CellHeights {
        let Payload::Notification(n) = &item.payload else {
            return CellHeights::zero();
        };
        let (one, multi) = column_measurements(measured);
        CellHeights {
            one_column: self.total(n, ctx, one),
            multi_column: self.total(n, ctx, multi),
            measured_content: Some(one),
        }
    }
}

impl<S: MeasurementSurface> Calculator<NotificationRules, S> {
    /// Notification calculator configured from `config`, owning `surface`.
    pub fn notification(config: &SizingConfig, surface: S) -> Self {
        Self::new(
            NotificationRules::from_config(config),
            surface,
            config.render_timeout(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calc/notification.rs"]
mod tests;
