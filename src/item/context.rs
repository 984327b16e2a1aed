use crate::foundation::error::{CellError, CellResult};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Immutable layout context shared by every item of a job.
pub struct LayoutContext {
    /// Available cell width in one-column mode.
    width: f64,
    /// Number of columns in multi-column mode.
    column_count: u32,
    /// Whether the viewer has an authenticated session (controls are only shown when signed in).
    authenticated: bool,
}

impl LayoutContext {
    /// Build a validated context.
    pub fn new(width: f64, column_count: u32, authenticated: bool) -> CellResult<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(CellError::validation("layout width must be finite and > 0"));
        }
        if column_count == 0 {
            return Err(CellError::validation("column count must be >= 1"));
        }
        Ok(Self {
            width,
            column_count,
            authenticated,
        })
    }

    /// Available width in one-column mode.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Column count in multi-column mode.
    pub fn column_count(&self) -> u32 {
        self.column_count
    }

    /// Whether the viewer is signed in.
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Width of one column in one-column mode.
    pub fn one_column_width(&self) -> f64 {
        self.width
    }

    /// Width of one column in multi-column mode, given the gap between columns.
    pub fn multi_column_width(&self, column_spacing: f64) -> f64 {
        if self.column_count <= 1 {
            return self.width;
        }
        let columns = f64::from(self.column_count);
        let gaps = column_spacing.max(0.0) * (columns - 1.0);
        ((self.width - gaps) / columns).max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/item/context.rs"]
mod tests;
