use super::*;

#[test]
fn equal_widths_share_one_fragment() {
    let f = column_fragments("<p>x</p>", 290.0, 290.0);
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].width, 290.0);
    assert!(f[0].markup.contains("width:290px"));
}

#[test]
fn distinct_widths_render_twice() {
    let f = column_fragments("<p>x</p>", 290.0, 124.0);
    assert_eq!(f.len(), 2);
    assert_eq!(f[1].width, 124.0);
}

#[test]
fn measurements_split_by_mode() {
    assert_eq!(column_measurements(&[10.0]), (10.0, 10.0));
    assert_eq!(column_measurements(&[10.0, 30.0]), (10.0, 30.0));
    assert_eq!(column_measurements(&[]), (0.0, 0.0));
}
