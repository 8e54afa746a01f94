//! Turns a partition into concrete image rectangles on printed pages.
//!
//! Each slice becomes one page. Images span the printable width; a page whose
//! stack is taller than the printable height is scaled down uniformly and
//! centered horizontally. Optionally, spare height on an underfull page is
//! spread evenly between keep-with-next groups.

use serde::Serialize;

use crate::layout::error::LayoutError;
use crate::layout::geometry::PageGeometry;
use crate::layout::image::{normalize, Image};
use crate::layout::partition::Partition;

/// An image's rectangle on its page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedImage {
    /// Index into the original image sequence.
    pub index: usize,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// All placements on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlacement {
    pub page_index: usize,
    /// Uniform scale applied to the stack (1.0 unless the page overflowed).
    pub scale: f64,
    /// Vertical gap inserted after each keep-with-next group.
    pub padding_mm: f64,
    pub images: Vec<PlacedImage>,
}

pub fn place_pages(
    images: &[Image],
    partition: &Partition,
    geometry: &PageGeometry,
    pad_groups: bool,
) -> Result<Vec<PagePlacement>, LayoutError> {
    let (width, height) = geometry.printable_area()?;
    let margin = geometry.margin_mm;
    let normalized = normalize(images)?;
    let pages = partition.group(&normalized)?;

    let mut placements = Vec::with_capacity(pages.len());
    for (page_index, (page, range)) in pages.iter().zip(partition.slices()).enumerate() {
        let stack_height: f64 = page.iter().map(|img| img.aspect_ratio * width).sum();
        let scale = if stack_height < height {
            1.0
        } else {
            height / stack_height
        };
        let x_offset = 0.5 * (width - width * scale);

        let last = page.len() - 1;
        let group_count = page
            .iter()
            .enumerate()
            .filter(|(i, img)| !img.keep_with_next || *i == last)
            .count();
        let padding_mm = if pad_groups && stack_height < height && group_count > 1 {
            (height - stack_height) / (group_count - 1) as f64
        } else {
            0.0
        };

        let mut y = 0.0;
        let mut placed = Vec::with_capacity(page.len());
        for (offset, img) in page.iter().enumerate() {
            let scaled_height = width * img.aspect_ratio * scale;
            placed.push(PlacedImage {
                index: range.start + offset,
                x_mm: margin + x_offset,
                y_mm: margin + y,
                width_mm: width * scale,
                height_mm: scaled_height,
            });
            y += scaled_height;
            if !img.keep_with_next {
                y += padding_mm;
            }
        }

        placements.push(PagePlacement {
            page_index,
            scale,
            padding_mm,
            images: placed,
        });
    }

    Ok(placements)
}
