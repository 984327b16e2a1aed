use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::item::model::ImageContent;
use crate::measure::text::{EstimatedTextMeasurer, TextStyle, TextSurface};
use crate::queue::job::JobOutput;

fn note(html: &str, image: bool, controls: bool) -> SizeableItem {
    SizeableItem::new(
        "n",
        TypeTag::Notification,
        Payload::Notification(NotificationContent {
            html: html.to_string(),
            image: image.then(ImageContent::default),
            can_reply: controls,
            can_follow_back: false,
        }),
    )
}

fn run(items: Vec<SizeableItem>, ctx: LayoutContext) -> JobOutput {
    let surface = TextSurface::new(EstimatedTextMeasurer::default(), TextStyle::new(10.0, 1.0));
    let mut calc = NotificationCalculator::notification(&SizingConfig::default(), surface);
    let slot: Rc<RefCell<Option<JobOutput>>> = Rc::default();
    let sink = slot.clone();
    calc.process_cells(items, ctx, move |out| *sink.borrow_mut() = Some(out));
    slot.borrow_mut().take().expect("synchronous surface completes inline")
}

#[test]
fn text_only_row_adds_created_at_and_margins() {
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    let out = run(vec![note("<p>hello world</p>", false, false)], ctx);
    assert_eq!(
        out.items[0].heights,
        Some(CellHeights {
            one_column: 10.0 + 12.0 + 15.0 * 2.0,
            multi_column: 52.0,
            measured_content: Some(10.0),
        })
    );
}

#[test]
fn controls_only_count_when_authenticated() {
    let anon = LayoutContext::new(320.0, 1, false).unwrap();
    let signed_in = LayoutContext::new(320.0, 1, true).unwrap();
    let a = run(vec![note("hi", false, true)], anon);
    let b = run(vec![note("hi", false, true)], signed_in);
    assert_eq!(a.items[0].heights.map(|h| h.one_column), Some(52.0));
    assert_eq!(b.items[0].heights.map(|h| h.one_column), Some(88.0));
}

#[test]
fn image_taller_than_text_wins() {
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    let out = run(vec![note("hi", true, false)], ctx);
    let h = out.items[0].heights.unwrap();
    assert_eq!(h.one_column, 66.0 + 12.0 + 30.0);
    assert_eq!(h.measured_content, Some(10.0));
    assert!(h.is_consistent());
}

#[test]
fn text_width_shrinks_for_image_column() {
    let rules = NotificationRules::from_config(&SizingConfig::default());
    assert_eq!(rules.text_width(320.0, false), 250.0);
    assert_eq!(rules.text_width(320.0, true), 153.0);
    assert_eq!(rules.text_width(10.0, true), 0.0);
}

#[test]
fn empty_text_is_ready_without_render() {
    let mut rules = NotificationRules::from_config(&SizingConfig::default());
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    assert_eq!(
        rules.plan(&note("<br>", false, false), &ctx),
        MeasurePlan::Ready(CellHeights::uniform(42.0).with_measured(0.0))
    );
}

#[test]
fn mismatched_payload_is_malformed() {
    let mut rules = NotificationRules::from_config(&SizingConfig::default());
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    let item = SizeableItem::new(
        "n",
        TypeTag::Text,
        Payload::Notification(NotificationContent::default()),
    );
    assert_eq!(rules.plan(&item, &ctx), MeasurePlan::Malformed);
}
