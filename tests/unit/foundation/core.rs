use super::*;

#[test]
fn ratio_height_rounds_up() {
    assert_eq!(height_for_ratio(154.0, 4.0 / 3.0), 116.0);
    assert_eq!(height_for_ratio(101.0, 2.0), 51.0);
    assert_eq!(height_for_ratio(100.0, 1.0), 100.0);
}

#[test]
fn ratio_height_rejects_degenerate_inputs() {
    assert_eq!(height_for_ratio(0.0, 1.0), 0.0);
    assert_eq!(height_for_ratio(100.0, 0.0), 0.0);
    assert_eq!(height_for_ratio(f64::NAN, 1.0), 0.0);
    assert_eq!(height_for_ratio(100.0, f64::INFINITY), 0.0);
}

#[test]
fn aspect_ratio_requires_positive_sides() {
    assert_eq!(aspect_ratio(Size::new(400.0, 300.0)), Some(400.0 / 300.0));
    assert_eq!(aspect_ratio(Size::new(0.0, 300.0)), None);
    assert_eq!(aspect_ratio(Size::new(400.0, -1.0)), None);
}

#[test]
fn non_negative_maps_garbage_to_zero() {
    assert_eq!(non_negative(12.5), 12.5);
    assert_eq!(non_negative(-3.0), 0.0);
    assert_eq!(non_negative(f64::NAN), 0.0);
}

#[test]
fn item_key_displays_raw_value() {
    let key = ItemKey::new("post-42");
    assert_eq!(key.to_string(), "post-42");
    assert_eq!(key.as_str(), "post-42");
}
