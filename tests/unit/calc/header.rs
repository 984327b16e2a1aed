use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::measure::text::{EstimatedTextMeasurer, TextStyle, TextSurface};
use crate::queue::job::JobOutput;

fn header(body: Option<&str>, rich: bool, cta: Option<&str>, posted: Option<&str>) -> SizeableItem {
    SizeableItem::new(
        "h",
        TypeTag::PromotionalHeader,
        Payload::Header(HeaderContent {
            title: "Hello".to_string(),
            body: body.map(str::to_string),
            rich_body: rich,
            call_to_action: cta.map(str::to_string),
            posted_by: posted.map(str::to_string),
        }),
    )
}

fn rules() -> HeaderRules {
    HeaderRules::from_config(&SizingConfig::default(), EstimatedTextMeasurer::default())
}

fn ready(item: &SizeableItem, width: f64) -> CellHeights {
    let ctx = LayoutContext::new(width, 1, false).unwrap();
    match rules().plan(item, &ctx) {
        MeasurePlan::Ready(h) => h,
        other => panic!("expected ready plan, got {other:?}"),
    }
}

#[test]
fn narrow_header_stacks_actions() {
    // title 39 + body 20 + stacked actions 16 + 15 + 16, plus margins and block spacing
    let item = header(Some("Body text"), false, Some("Shop now"), Some("Posted by ello"));
    assert_eq!(ready(&item, 150.0), CellHeights::uniform(186.0));
}

#[test]
fn wide_header_is_clamped_to_banner_ratio() {
    let item = header(Some("Body text"), false, Some("Shop now"), Some("Posted by ello"));
    assert_eq!(ready(&item, 320.0), CellHeights::uniform(214.0));
}

#[test]
fn side_by_side_actions_use_taller_label() {
    let mut r = rules();
    let item = header(None, false, Some("Shop now"), Some("Posted by ello"));
    let Payload::Header(h) = &item.payload else {
        unreachable!()
    };
    assert_eq!(r.actions_height(h, 290.0), 16.0);
    assert_eq!(r.actions_height(h, 120.0), 47.0);
}

#[test]
fn missing_blocks_drop_their_spacing() {
    // top 25 + title 39 + bottom 25; the 100px banner minimum wins at width 150
    let item = header(None, false, None, None);
    assert_eq!(ready(&item, 150.0), CellHeights::uniform(100.0));
    let item = header(None, false, None, None);
    assert_eq!(ready(&item, 110.0), CellHeights::uniform(89.0));
}

#[test]
fn rich_body_is_rendered_once_at_text_width() {
    let mut r = rules();
    let ctx = LayoutContext::new(150.0, 3, false).unwrap();
    let item = header(Some("<p>hello</p>"), true, None, None);
    let MeasurePlan::Render(fragments) = r.plan(&item, &ctx) else {
        panic!("expected a render plan");
    };
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].width, 120.0);
}

#[test]
fn rich_body_heights_come_from_the_surface() {
    let surface = TextSurface::new(EstimatedTextMeasurer::default(), TextStyle::new(10.0, 1.0));
    let mut calc = HeaderCalculator::header(
        &SizingConfig::default(),
        EstimatedTextMeasurer::default(),
        surface,
    );
    let slot: Rc<RefCell<Option<JobOutput>>> = Rc::default();
    let sink = slot.clone();
    let ctx = LayoutContext::new(150.0, 2, false).unwrap();
    let item = header(Some("<p>hello</p>"), true, Some("Shop now"), Some("Posted by ello"));
    calc.process_cells(vec![item], ctx, move |out| *sink.borrow_mut() = Some(out));
    let out = slot.borrow_mut().take().expect("synchronous surface completes inline");
    assert_eq!(
        out.items[0].heights,
        Some(CellHeights::uniform(176.0).with_measured(10.0))
    );
}

#[test]
fn height_never_drops_below_banner_ratio() {
    let mut r = rules();
    let bodies = [None, Some("short"), Some("a much longer body that wraps over lines")];
    for width in (1..=120).map(|i| f64::from(i) * 7.5) {
        let ctx = LayoutContext::new(width, 1, false).unwrap();
        for body in bodies {
            let item = header(body, false, Some("Shop now"), Some("Posted by ello"));
            let MeasurePlan::Ready(h) = r.plan(&item, &ctx) else {
                panic!("plain headers never render");
            };
            let floor = (width / 1.5).ceil();
            assert!(h.one_column >= floor, "width {width}: {} < {floor}", h.one_column);
            assert_eq!(h.one_column, h.multi_column);
        }
    }
}

#[test]
fn non_header_payload_is_malformed() {
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    let item = SizeableItem::new("h", TypeTag::CategoryHeader, Payload::Image(Default::default()));
    assert_eq!(rules().plan(&item, &ctx), MeasurePlan::Malformed);
}
