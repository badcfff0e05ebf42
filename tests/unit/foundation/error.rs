use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StickyError::usage("x")
            .to_string()
            .contains("usage error:")
    );
    assert!(
        StickyError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StickyError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StickyError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
