use crate::calc::{Calculator, column_fragments, column_measurements};
use crate::config::metrics::{ArtistInviteMetrics, SizingConfig};
use crate::foundation::core::height_for_ratio;
use crate::item::context::LayoutContext;
use crate::item::model::{ArtistInviteContent, CellHeights, Payload, SizeableItem, TypeTag};
use crate::measure::markup::plain_text;
use crate::measure::surface::MeasurementSurface;
use crate::measure::text::TextMeasurer;
use crate::queue::rules::{HeightRules, MeasurePlan};

/// Calculator for artist-invite cards.
pub type ArtistInviteCalculator<S> = Calculator<ArtistInviteRules, S>;

/// Header image, title and info blocks stacked above a rendered description.
pub struct ArtistInviteRules {
    metrics: ArtistInviteMetrics,
    column_spacing: f64,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for ArtistInviteRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtistInviteRules")
            .field("metrics", &self.metrics)
            .field("column_spacing", &self.column_spacing)
            .finish_non_exhaustive()
    }
}

impl ArtistInviteRules {
    /// Rules using the artist-invite metrics of `config`, measuring styled text with `measurer`.
    pub fn from_config(config: &SizingConfig, measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            metrics: config.artist_invite.clone(),
            column_spacing: config.column_spacing,
            measurer: Box::new(measurer),
        }
    }

    fn text_width(&self, width: f64) -> f64 {
        (width - self.metrics.side_margin * 2.0).max(0.0)
    }

    /// Height of everything above the description at cell `width`.
    fn stacked_sections(&mut self, invite: &ArtistInviteContent, width: f64) -> f64 {
        let tw = self.text_width(width);
        let (title_style, info_style) = (self.metrics.title_style, self.metrics.info_style);
        let title = self
            .measurer
            .height_for_width(&invite.title, &title_style, tw);
        let info = self
            .measurer
            .height_for_width(&invite.info_lines().join("\n"), &info_style, tw);

        let m = &self.metrics;
        height_for_ratio(width, m.header_image_ratio)
            + m.title_top_margin
            + title
            + m.info_top_margin
            + info
    }

    fn description(&self, measured: f64) -> f64 {
        let m = &self.metrics;
        let bottom = if measured > 0.0 {
            m.content_bottom_margin
        } else {
            0.0
        };
        m.content_top_margin + measured + bottom
    }
}

impl HeightRules for ArtistInviteRules {
    fn family(&self) -> &'static str {
        "artist_invite"
    }

    fn plan(&mut self, item: &SizeableItem, ctx: &LayoutContext) -> MeasurePlan {
        let (TypeTag::ArtistInvite, Payload::ArtistInvite(invite)) = (item.tag, &item.payload)
        else {
            return MeasurePlan::Malformed;
        };
        let one = ctx.one_column_width();
        let multi = ctx.multi_column_width(self.column_spacing);
        if plain_text(&invite.description_html).is_empty() {
            return MeasurePlan::Ready(
                CellHeights {
                    one_column: self.stacked_sections(invite, one),
                    multi_column: self.stacked_sections(invite, multi),
                    measured_content: None,
                }
                .with_measured(0.0),
            );
        }
        MeasurePlan::Render(column_fragments(
            &invite.description_html,
            self.text_width(one),
            self.text_width(multi),
        ))
    }

    fn finish(
        &mut self,
        item: &SizeableItem,
        ctx: &LayoutContext,
        measured: &[f64],
    ) -> CellHeights {
        let Payload::ArtistInvite(invite) = &item.payload else {
            return CellHeights::zero();
        };
        let (one, multi) = column_measurements(measured);
        let one_width = ctx.one_column_width();
        let multi_width = ctx.multi_column_width(self.column_spacing);
        CellHeights {
            one_column: self.stacked_sections(invite, one_width) + self.description(one),
            multi_column: self.stacked_sections(invite, multi_width) + self.description(multi),
            measured_content: Some(one),
        }
    }
}

impl<S: MeasurementSurface> Calculator<ArtistInviteRules, S> {
    /// Artist-invite calculator configured from `config`, owning `surface`.
    pub fn artist_invite(
        config: &SizingConfig,
        measurer: impl TextMeasurer + 'static,
        surface: S,
    ) -> Self {
        Self::new(
            ArtistInviteRules::from_config(config, measurer),
            surface,
            config.render_timeout(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calc/artist_invite.rs"]
mod tests;
