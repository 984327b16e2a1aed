use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::item::model::ImageContent;
use crate::queue::job::{JobOutput, Resolution};

fn image(size: Option<Size>) -> SizeableItem {
    SizeableItem::new("i", TypeTag::Image, Payload::Image(ImageContent { size }))
}

fn embed(service: &str, is_audio: bool) -> SizeableItem {
    SizeableItem::new(
        "e",
        TypeTag::Embed,
        Payload::Embed(EmbedContent {
            service: service.to_string(),
            is_audio,
        }),
    )
}

fn plan(item: &SizeableItem, ctx: &LayoutContext) -> CellHeights {
    let mut rules = ImageRules::from_config(&SizingConfig::default());
    match rules.plan(item, ctx) {
        MeasurePlan::Ready(h) => h,
        other => panic!("expected ready plan, got {other:?}"),
    }
}

#[test]
fn unknown_dimensions_fall_back_to_four_by_three() {
    let ctx = LayoutContext::new(154.0, 1, false).unwrap();
    let bottom = SizingConfig::default().image.bottom_margin;
    let h = plan(&image(None), &ctx);
    assert_eq!(h.one_column, bottom + (154.0_f64 / (4.0 / 3.0)).ceil());
    assert_eq!(h.one_column, 126.0);
}

#[test]
fn known_dimensions_set_the_ratio() {
    let ctx = LayoutContext::new(300.0, 1, false).unwrap();
    let h = plan(&image(Some(Size::new(600.0, 900.0))), &ctx);
    assert_eq!(h.one_column, 10.0 + 450.0);
}

#[test]
fn degenerate_dimensions_use_default_ratio() {
    let ctx = LayoutContext::new(154.0, 1, false).unwrap();
    assert_eq!(plan(&image(Some(Size::new(0.0, 10.0))), &ctx).one_column, 126.0);
}

#[test]
fn multi_column_uses_column_width() {
    let ctx = LayoutContext::new(320.0, 2, false).unwrap();
    let h = plan(&image(None), &ctx);
    assert_eq!(h.multi_column, 126.0);
    assert_eq!(h.one_column, 10.0 + 240.0);
}

#[test]
fn embed_ratios() {
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    assert_eq!(plan(&embed("youtube", false), &ctx).one_column, 10.0 + 180.0);
    assert_eq!(plan(&embed("soundcloud", true), &ctx).one_column, 10.0 + 320.0);
    assert_eq!(plan(&embed("UStream", false), &ctx).one_column, 10.0 + 320.0);
}

#[test]
fn calculator_resolves_without_a_surface() {
    let mut calc = ImageCalculator::image(&SizingConfig::default());
    let ctx = LayoutContext::new(154.0, 1, false).unwrap();
    let slot: Rc<RefCell<Option<JobOutput>>> = Rc::default();
    let sink = slot.clone();
    calc.process_cells(vec![image(None), embed("vimeo", false)], ctx, move |out| {
        *sink.borrow_mut() = Some(out)
    });
    let out = slot.borrow_mut().take().expect("completes inline");
    assert_eq!(out.items[0].heights.map(|h| h.one_column), Some(126.0));
    assert!(matches!(out.reports[1].resolution, Resolution::Resolved(_)));
    assert!(calc.is_idle());
}

#[test]
fn text_payload_under_image_tag_is_malformed() {
    let mut rules = ImageRules::from_config(&SizingConfig::default());
    let ctx = LayoutContext::new(154.0, 1, false).unwrap();
    let item = SizeableItem::new(
        "x",
        TypeTag::Image,
        Payload::Embed(EmbedContent::default()),
    );
    assert_eq!(rules.plan(&item, &ctx), MeasurePlan::Malformed);
}
