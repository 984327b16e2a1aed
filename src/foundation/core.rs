pub use kurbo::Size;

/// Stable identifier of a feed row, assigned by the feed-assembly stage.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ItemKey(pub String);

impl ItemKey {
    /// Build a key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Height of a box of `width` with the given `width / height` ratio, rounded up to whole pixels.
///
/// Degenerate inputs (non-finite, non-positive) yield `0.0`.
pub fn height_for_ratio(width: f64, ratio: f64) -> f64 {
    if !width.is_finite() || width <= 0.0 || !ratio.is_finite() || ratio <= 0.0 {
        return 0.0;
    }
    (width / ratio).ceil()
}

/// `width / height` of an asset, or `None` when either side is unusable.
pub fn aspect_ratio(size: Size) -> Option<f64> {
    if size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
    {
        Some(size.width / size.height)
    } else {
        None
    }
}

/// Clamp a measured length into `[0, +inf)`, mapping non-finite values to `0.0`.
pub fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
