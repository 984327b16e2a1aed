use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::measure::text::EstimatedTextMeasurer;
use crate::queue::job::{JobOutput, Resolution};

fn announcement(body: &str) -> SizeableItem {
    SizeableItem::new(
        "a1",
        TypeTag::Announcement,
        Payload::Announcement(AnnouncementContent {
            id: "a1".to_string(),
            title: "New feature".to_string(),
            body: body.to_string(),
            call_to_action: "Learn more".to_string(),
        }),
    )
}

#[test]
fn three_blocks_between_margins() {
    let mut calc =
        AnnouncementCalculator::announcement(&SizingConfig::default(), EstimatedTextMeasurer::default());
    let slot: Rc<RefCell<Option<JobOutput>>> = Rc::default();
    let sink = slot.clone();
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    calc.process_cells(vec![announcement("Try it today")], ctx, move |out| {
        *sink.borrow_mut() = Some(out)
    });
    let out = slot.borrow_mut().take().expect("ready plans complete inline");
    assert_eq!(
        out.reports[0].resolution,
        Resolution::Resolved(CellHeights::uniform(15.0 + 19.0 + 20.0 + 16.0 + 15.0))
    );
}

#[test]
fn empty_body_measures_as_zero() {
    let mut rules =
        AnnouncementRules::from_config(&SizingConfig::default(), EstimatedTextMeasurer::default());
    let ctx = LayoutContext::new(320.0, 1, false).unwrap();
    assert_eq!(
        rules.plan(&announcement(""), &ctx),
        MeasurePlan::Ready(CellHeights::uniform(65.0))
    );
}

#[test]
fn text_column_excludes_image_and_margins() {
    let rules =
        AnnouncementRules::from_config(&SizingConfig::default(), EstimatedTextMeasurer::default());
    assert_eq!(rules.text_width(320.0), 235.0);
    assert_eq!(rules.text_width(50.0), 0.0);
}

#[test]
fn narrow_columns_wrap_longer() {
    let mut rules =
        AnnouncementRules::from_config(&SizingConfig::default(), EstimatedTextMeasurer::default());
    let ctx = LayoutContext::new(320.0, 3, false).unwrap();
    let body = "a body long enough to wrap when the column is narrow";
    let MeasurePlan::Ready(h) = rules.plan(&announcement(body), &ctx) else {
        panic!("announcements never render");
    };
    assert!(h.multi_column > h.one_column);
}
