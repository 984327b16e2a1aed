use super::*;

#[test]
fn rejects_degenerate_width_and_columns() {
    assert!(LayoutContext::new(0.0, 1, false).is_err());
    assert!(LayoutContext::new(f64::NAN, 1, false).is_err());
    assert!(LayoutContext::new(320.0, 0, false).is_err());
}

#[test]
fn single_column_uses_full_width() {
    let ctx = LayoutContext::new(320.0, 1, true).unwrap();
    assert_eq!(ctx.one_column_width(), 320.0);
    assert_eq!(ctx.multi_column_width(12.0), 320.0);
    assert!(ctx.authenticated());
}

#[test]
fn multi_column_subtracts_gaps() {
    let ctx = LayoutContext::new(320.0, 2, false).unwrap();
    assert_eq!(ctx.multi_column_width(12.0), 154.0);
    let ctx = LayoutContext::new(10.0, 3, false).unwrap();
    assert_eq!(ctx.multi_column_width(12.0), 0.0);
}
