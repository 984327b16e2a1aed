use super::*;

fn text(html: &str) -> Payload {
    Payload::Text(TextContent {
        html: html.to_string(),
        collapsible: false,
    })
}

#[test]
fn tags_accept_their_own_family_only() {
    assert!(TypeTag::Text.accepts(&text("hi")));
    assert!(TypeTag::Comment.accepts(&text("hi")));
    assert!(!TypeTag::Image.accepts(&text("hi")));
    assert!(TypeTag::PromotionalHeader.accepts(&Payload::Header(HeaderContent::default())));
    assert!(TypeTag::CategoryHeader.accepts(&Payload::Header(HeaderContent::default())));
    assert!(!TypeTag::Announcement.accepts(&Payload::Header(HeaderContent::default())));
}

#[test]
fn malformed_items_are_detected() {
    let item = SizeableItem::new("a", TypeTag::Embed, text("oops"));
    assert!(!item.is_well_formed());
}

#[test]
fn heights_consistency_rules() {
    assert!(CellHeights::uniform(10.0).is_consistent());
    assert!(CellHeights::uniform(10.0).with_measured(10.0).is_consistent());
    assert!(!CellHeights::uniform(10.0).with_measured(11.0).is_consistent());
    assert!(!CellHeights::uniform(-1.0).is_consistent());
    let mixed = CellHeights {
        one_column: 40.0,
        multi_column: 20.0,
        measured_content: Some(30.0),
    };
    assert!(!mixed.is_consistent());
}

#[test]
fn expand_state_transitions() {
    let s = ExpandState::Collapsed.request_more();
    assert_eq!(s, ExpandState::Loading);
    assert_eq!(s.settle(true), ExpandState::Expanded);
    assert_eq!(s.settle(false), ExpandState::Collapsed);
    assert_eq!(ExpandState::Expanded.request_more(), ExpandState::Expanded);
    assert_eq!(ExpandState::Collapsed.settle(true), ExpandState::Collapsed);
}

#[test]
fn info_lines_skip_blank_fields() {
    let invite = ArtistInviteContent {
        title: "t".to_string(),
        invite_type: "Exhibition".to_string(),
        status: " ".to_string(),
        dates: Some("May 1 - May 30".to_string()),
        description_html: String::new(),
    };
    assert_eq!(invite.info_lines(), vec!["Exhibition", "May 1 - May 30"]);
}

#[test]
fn items_deserialize_from_json() {
    let item: SizeableItem = serde_json::from_str(
        r#"{
            "key": "n1",
            "tag": "notification",
            "payload": { "notification": { "html": "<p>hi</p>", "can_reply": true } }
        }"#,
    )
    .unwrap();
    assert_eq!(item.key.as_str(), "n1");
    assert_eq!(item.state, ExpandState::Collapsed);
    assert!(item.heights.is_none());
    let Payload::Notification(n) = &item.payload else {
        panic!("expected notification payload");
    };
    assert!(n.has_controls());
    assert!(n.image.is_none());
}

#[test]
fn sanitized_enforces_invariant() {
    let h = CellHeights {
        one_column: -5.0,
        multi_column: 30.0,
        measured_content: Some(50.0),
    }
    .sanitized();
    assert_eq!(h.one_column, 0.0);
    assert_eq!(h.measured_content, Some(0.0));
    assert!(h.is_consistent());

    let h = CellHeights {
        one_column: 40.0,
        multi_column: 60.0,
        measured_content: Some(50.0),
    }
    .sanitized();
    assert_eq!(h.measured_content, Some(40.0));
}

#[test]
fn same_totals_ignores_content() {
    let a = CellHeights::uniform(10.0).with_measured(4.0);
    let b = CellHeights::uniform(10.0);
    assert!(a.same_totals(&b));
    assert!(!a.same_totals(&CellHeights::uniform(11.0)));
}
