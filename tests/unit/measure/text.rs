use std::sync::mpsc;

use super::*;
use crate::measure::surface::{RenderId, RenderOutcome};

const STYLE: TextStyle = TextStyle::new(10.0, 1.0);

#[test]
fn estimated_wraps_on_word_boundaries() {
    let mut m = EstimatedTextMeasurer::default();
    let size = m.measure("hello world", &STYLE, Some(30.0));
    assert_eq!(size, Size::new(25.0, 20.0));
}

#[test]
fn estimated_single_line_without_limit() {
    let mut m = EstimatedTextMeasurer::default();
    assert_eq!(m.single_line_width("hello world", &STYLE), 55.0);
    assert_eq!(m.measure("hello world", &STYLE, None).height, 10.0);
}

#[test]
fn estimated_breaks_long_words() {
    let mut m = EstimatedTextMeasurer::default();
    // 13 characters at 5px each in a 6-character line.
    let size = m.measure("abcdefghijklm", &STYLE, Some(30.0));
    assert_eq!(size.height, 30.0);
    assert_eq!(size.width, 30.0);
}

#[test]
fn estimated_keeps_blank_paragraphs() {
    let mut m = EstimatedTextMeasurer::default();
    assert_eq!(m.measure("a\n\nb", &STYLE, Some(100.0)).height, 30.0);
}

#[test]
fn empty_text_measures_zero() {
    let mut m = EstimatedTextMeasurer::default();
    assert_eq!(m.measure("   ", &STYLE, Some(100.0)), Size::ZERO);
    assert_eq!(
        m.measure("x", &TextStyle::new(0.0, 1.0), Some(100.0)),
        Size::ZERO
    );
}

#[test]
fn height_for_width_rounds_up() {
    let mut m = EstimatedTextMeasurer::default();
    let style = TextStyle::new(10.0, 1.25);
    assert_eq!(m.height_for_width("x", &style, 100.0), 13.0);
}

#[test]
fn style_validation_names_field() {
    let err = TextStyle::new(12.0, f32::NAN)
        .validate("header.body_style")
        .unwrap_err();
    assert!(err.to_string().contains("header.body_style.line_height"));
}

#[test]
fn text_surface_reports_synchronously() {
    let (tx, rx) = mpsc::channel();
    let mut surface = TextSurface::new(EstimatedTextMeasurer::default(), STYLE);
    surface
        .render(
            RenderRequest {
                id: RenderId(1),
                fragment: "<p>hello world</p>".to_string(),
                width: 30.0,
            },
            RenderReporter::new(RenderId(1), tx),
        )
        .unwrap();
    assert_eq!(rx.try_recv().unwrap().outcome, RenderOutcome::Measured(20.0));
}

#[test]
fn text_surface_reports_no_height_for_empty_markup() {
    let (tx, rx) = mpsc::channel();
    let mut surface = TextSurface::new(EstimatedTextMeasurer::default(), STYLE);
    surface
        .render(
            RenderRequest {
                id: RenderId(2),
                fragment: "<div></div>".to_string(),
                width: 30.0,
            },
            RenderReporter::new(RenderId(2), tx),
        )
        .unwrap();
    assert_eq!(rx.try_recv().unwrap().outcome, RenderOutcome::NoHeight);
}

#[test]
fn parley_measurer_rejects_garbage_font_bytes() {
    assert!(ParleyTextMeasurer::from_font_bytes(b"not a font").is_err());
}

#[test]
fn parley_measurer_smoke_with_local_font_if_present() {
    let Ok(font_bytes) = std::fs::read("assets/fonts/measure.ttf") else {
        return;
    };
    let mut m = ParleyTextMeasurer::from_font_bytes(&font_bytes).unwrap();
    let one = m.measure("hello", &STYLE, None);
    let wrapped = m.measure("hello hello hello hello", &STYLE, Some(20.0));
    assert!(one.width > 0.0);
    assert!(wrapped.height > one.height);
}
