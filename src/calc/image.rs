use crate::calc::Calculator;
use crate::config::metrics::{ImageMetrics, SizingConfig};
use crate::foundation::core::{Size, aspect_ratio, height_for_ratio};
use crate::item::context::LayoutContext;
use crate::item::model::{CellHeights, EmbedContent, Payload, SizeableItem, TypeTag};
use crate::measure::surface::NullSurface;
use crate::queue::rules::{HeightRules, MeasurePlan};

/// Calculator for image regions and embeds. Pure geometry, so it never renders.
pub type ImageCalculator = Calculator<ImageRules, NullSurface>;

#[derive(Clone, Debug)]
/// Aspect-ratio sizing at the available column width.
pub struct ImageRules {
    metrics: ImageMetrics,
    column_spacing: f64,
}

/// Height of an image of (optionally known) `size` drawn `width` wide.
pub(crate) fn image_height(size: Option<Size>, width: f64, default_ratio: f64) -> f64 {
    let ratio = size.and_then(aspect_ratio).unwrap_or(default_ratio);
    height_for_ratio(width, ratio)
}

impl ImageRules {
    /// Rules using the image metrics of `config`.
    pub fn from_config(config: &SizingConfig) -> Self {
        Self {
            metrics: config.image.clone(),
            column_spacing: config.column_spacing,
        }
    }

    /// `width / height` an embed is drawn with.
    pub fn embed_ratio(&self, embed: &EmbedContent) -> f64 {
        let square = embed.is_audio
            || self
                .metrics
                .square_services
                .iter()
                .any(|s| s.eq_ignore_ascii_case(embed.service.trim()));
        if square {
            1.0
        } else {
            self.metrics.default_embed_ratio
        }
    }

    fn heights(&self, ctx: &LayoutContext, ratio_height: impl Fn(f64) -> f64) -> CellHeights {
        let bottom = self.metrics.bottom_margin;
        CellHeights {
            one_column: bottom + ratio_height(ctx.one_column_width()),
            multi_column: bottom + ratio_height(ctx.multi_column_width(self.column_spacing)),
            measured_content: None,
        }
    }
}

impl HeightRules for ImageRules {
    fn family(&self) -> &'static str {
        "image"
    }

    fn plan(&mut self, item: &SizeableItem, ctx: &LayoutContext) -> MeasurePlan {
        match (item.tag, &item.payload) {
            (TypeTag::Image, Payload::Image(image)) => {
                let default_ratio = self.metrics.default_image_ratio;
                MeasurePlan::Ready(
                    self.heights(ctx, |w| image_height(image.size, w, default_ratio)),
                )
            }
            (TypeTag::Embed, Payload::Embed(embed)) => {
                let ratio = self.embed_ratio(embed);
                MeasurePlan::Ready(self.heights(ctx, |w| height_for_ratio(w, ratio)))
            }
            _ => MeasurePlan::Malformed,
        }
    }

    fn finish(
        &mut self,
        _item: &SizeableItem,
        _ctx: &LayoutContext,
        _measured: &[f64],
    ) -> CellHeights {
        // Every plan is `Ready`; the queue never asks for a finish.
        CellHeights::zero()
    }
}

impl Calculator<ImageRules, NullSurface> {
    /// Image calculator configured from `config`.
    pub fn image(config: &SizingConfig) -> Self {
        Self::new(ImageRules::from_config(config), NullSurface, None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calc/image.rs"]
mod tests;
