use crate::foundation::core::Size;
use crate::foundation::error::{CellError, CellResult};
use crate::measure::markup::plain_text;
use crate::measure::surface::{MeasurementSurface, RenderReporter, RenderRequest};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Font size and line spacing of a styled text block.
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Line height as a multiple of `font_size`.
    pub line_height: f32,
}

impl TextStyle {
    /// Build a style.
    pub const fn new(font_size: f32, line_height: f32) -> Self {
        Self {
            font_size,
            line_height,
        }
    }

    /// Height of one line in pixels.
    pub fn line_px(&self) -> f64 {
        f64::from(self.font_size) * f64::from(self.line_height)
    }

    pub(crate) fn validate(&self, field: &str) -> CellResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(CellError::validation(format!(
                "{field}.font_size must be finite and > 0"
            )));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(CellError::validation(format!(
                "{field}.line_height must be finite and > 0"
            )));
        }
        Ok(())
    }

    fn is_usable(&self) -> bool {
        self.validate("style").is_ok()
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(14.0, 1.4)
    }
}

/// Styled-text measurement: the size of `text` laid out with `style`, wrapped at `max_width`.
///
/// Empty or whitespace-only text measures as [`Size::ZERO`].
pub trait TextMeasurer {
    /// Lay out `text` and return its bounding size.
    fn measure(&mut self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size;

    /// Height of `text` wrapped at `width`, rounded up to whole pixels.
    fn height_for_width(&mut self, text: &str, style: &TextStyle, width: f64) -> f64 {
        self.measure(text, style, Some(width)).height.ceil()
    }

    /// Unwrapped width of `text`, rounded up to whole pixels.
    fn single_line_width(&mut self, text: &str, style: &TextStyle) -> f64 {
        self.measure(text, style, None).width.ceil()
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Box<M> {
    fn measure(&mut self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size {
        (**self).measure(text, style, max_width)
    }
}

#[derive(Clone, Copy, Debug)]
/// Deterministic measurer that assumes a fixed advance per character and greedy word wrap.
///
/// Useful wherever no font is available, and as a stable reference in tests.
pub struct EstimatedTextMeasurer {
    /// Advance of one character as a fraction of the font size.
    pub advance_em: f64,
}

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl EstimatedTextMeasurer {
    fn wrap_paragraph(&self, paragraph: &str, char_w: f64, max_width: Option<f64>) -> Vec<f64> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            return vec![0.0];
        }
        let limit = max_width.filter(|w| w.is_finite() && *w > 0.0);
        let per_line = limit.map(|w| ((w / char_w).floor() as usize).max(1));

        let mut lines = Vec::new();
        let mut current = 0usize;
        for word in words {
            let mut len = word.chars().count();
            let Some(max) = per_line else {
                current += if current == 0 { len } else { len + 1 };
                continue;
            };
            let needed = if current == 0 { len } else { current + 1 + len };
            if needed <= max {
                current = needed;
                continue;
            }
            if current > 0 {
                lines.push(current);
                current = 0;
            }
            // Words longer than a line are broken at the line boundary.
            while len > max {
                lines.push(max);
                len -= max;
            }
            current = len;
        }
        lines.push(current);
        lines.into_iter().map(|n| n as f64 * char_w).collect()
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&mut self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size {
        if text.trim().is_empty() || !style.is_usable() || self.advance_em <= 0.0 {
            return Size::ZERO;
        }
        let char_w = f64::from(style.font_size) * self.advance_em;
        let mut widths = Vec::new();
        for paragraph in text.split('\n') {
            widths.extend(self.wrap_paragraph(paragraph, char_w, max_width));
        }
        let width = widths.iter().copied().fold(0.0, f64::max);
        Size::new(width, widths.len() as f64 * style.line_px())
    }
}

/// Parley-backed measurer shaping text with one registered font.
pub struct ParleyTextMeasurer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
}

impl std::fmt::Debug for ParleyTextMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyTextMeasurer")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl ParleyTextMeasurer {
    /// Register `font_bytes` and measure every text block with its first family.
    pub fn from_font_bytes(font_bytes: &[u8]) -> CellResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CellError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CellError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Name of the family used for every layout.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

impl TextMeasurer for ParleyTextMeasurer {
    fn measure(&mut self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size {
        if text.trim().is_empty() || !style.is_usable() {
            return Size::ZERO;
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.font_size));

        let mut layout: parley::Layout<()> = builder.build(text);
        let wrap = max_width.filter(|w| w.is_finite() && *w > 0.0).map(|w| w as f32);
        layout.break_all_lines(wrap);

        // Line pitch follows the style, not the font's own metrics, so both measurers agree on
        // vertical rhythm.
        let lines = layout.lines().count();
        Size::new(f64::from(layout.width()), lines as f64 * style.line_px())
    }
}

/// Synchronous [`MeasurementSurface`] that lays out the visible text of a fragment.
#[derive(Debug)]
pub struct TextSurface<M> {
    measurer: M,
    style: TextStyle,
}

impl<M: TextMeasurer> TextSurface<M> {
    /// Build a surface that measures fragments with `style`.
    pub fn new(measurer: M, style: TextStyle) -> Self {
        Self { measurer, style }
    }
}

impl<M: TextMeasurer> MeasurementSurface for TextSurface<M> {
    fn render(&mut self, request: RenderRequest, reporter: RenderReporter) -> CellResult<()> {
        if !request.width.is_finite() || request.width <= 0.0 {
            return Err(CellError::surface("render width must be finite and > 0"));
        }
        let text = plain_text(&request.fragment);
        if text.is_empty() {
            reporter.no_measurable_height();
            return Ok(());
        }
        let height = self
            .measurer
            .height_for_width(&text, &self.style, request.width);
        reporter.finished(height);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/text.rs"]
mod tests;
