use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CellError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CellError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(
        CellError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CellError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
