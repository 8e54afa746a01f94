use serde::{Deserialize, Serialize};

use crate::layout::error::{require_positive, LayoutError};

/// Physical page and margin, in millimetres.
///
/// Defaults to A4 portrait with a 20 mm margin on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
        }
    }
}

impl PageGeometry {
    /// Same page with a different margin.
    pub fn with_margin(self, margin_mm: f64) -> Self {
        PageGeometry { margin_mm, ..self }
    }

    /// Printable `(width, height)` inside the margins.
    pub fn printable_area(&self) -> Result<(f64, f64), LayoutError> {
        require_positive("page width", self.width_mm)?;
        require_positive("page height", self.height_mm)?;
        if !self.margin_mm.is_finite() || self.margin_mm < 0.0 {
            return Err(LayoutError::invalid(format!(
                "margin must be zero or a positive number, got {}",
                self.margin_mm
            )));
        }

        let width = self.width_mm - 2.0 * self.margin_mm;
        let height = self.height_mm - 2.0 * self.margin_mm;
        if width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::invalid(format!(
                "margin of {} mm leaves no printable area on a {} × {} mm page",
                self.margin_mm, self.width_mm, self.height_mm
            )));
        }
        Ok((width, height))
    }

    /// Height/width of the printable area. This is the target ratio images
    /// stacked at full printable width are sliced against.
    pub fn relative_page_height(&self) -> Result<f64, LayoutError> {
        let (width, height) = self.printable_area()?;
        Ok(height / width)
    }
}
