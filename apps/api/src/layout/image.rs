//! Input images and their unit-width normalization.
#![allow(dead_code)]
//!
//! Only the relative height of an image matters for slicing: every image is
//! scaled to the same width, so an image of `w × h` pixels contributes
//! `h / w` to the height of whatever slice it lands in.

use serde::{Deserialize, Serialize};

use crate::layout::error::{require_positive, LayoutError};

/// An image supplied by the caller, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub width: f64,
    pub height: f64,
    /// Forbid a slice boundary between this image and the next one.
    /// Ignored on the last image of a sequence.
    #[serde(default)]
    pub keep_with_next: bool,
}

impl Image {
    pub fn new(width: f64, height: f64) -> Self {
        Image {
            width,
            height,
            keep_with_next: false,
        }
    }

    /// Same image, glued to its successor.
    pub fn kept_with_next(self) -> Self {
        Image {
            keep_with_next: true,
            ..self
        }
    }
}

/// An image scaled to width 1. Width is implicit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedImage {
    /// `height / width` of the source image.
    pub aspect_ratio: f64,
    pub keep_with_next: bool,
}

/// Validates and normalizes a sequence of images.
///
/// Fails on an empty sequence, on any non-positive or non-finite dimension,
/// and on ratios that overflow or underflow `f64`, alone or stacked.
/// The last image's `keep_with_next` is cleared.
pub fn normalize(images: &[Image]) -> Result<Vec<NormalizedImage>, LayoutError> {
    if images.is_empty() {
        return Err(LayoutError::invalid("image sequence is empty"));
    }

    let last = images.len() - 1;
    let normalized = images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let width = require_positive(&format!("images[{i}].width"), image.width)?;
            let height = require_positive(&format!("images[{i}].height"), image.height)?;
            let aspect_ratio =
                require_positive(&format!("images[{i}] aspect ratio"), height / width)?;
            Ok(NormalizedImage {
                aspect_ratio,
                keep_with_next: image.keep_with_next && i != last,
            })
        })
        .collect::<Result<Vec<_>, LayoutError>>()?;

    let stacked: f64 = normalized.iter().map(|image| image.aspect_ratio).sum();
    require_positive("combined aspect ratio of all images", stacked)?;

    Ok(normalized)
}

/// A run of images that must share a slice.
///
/// The optimizer cuts between units, never inside one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Unit {
    /// Index of the first image in the run.
    pub start: usize,
    /// Summed aspect ratio of the run.
    pub height: f64,
}

/// Collapses keep-with-next chains into indivisible units.
pub(crate) fn group_units(images: &[NormalizedImage]) -> Vec<Unit> {
    let mut units = Vec::with_capacity(images.len());
    let mut start = 0;
    let mut height = 0.0;

    for (i, image) in images.iter().enumerate() {
        height += image.aspect_ratio;
        if !image.keep_with_next {
            units.push(Unit { start, height });
            start = i + 1;
            height = 0.0;
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uses_height_over_width() {
        let images = [Image::new(500.0, 300.0), Image::new(200.0, 100.0)];
        let normalized = normalize(&images).unwrap();
        assert_eq!(normalized.len(), 2);
        assert!((normalized[0].aspect_ratio - 0.6).abs() < 1e-12);
        assert!((normalized[1].aspect_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_empty_is_invalid() {
        assert!(matches!(normalize(&[]), Err(LayoutError::InvalidInput(_))));
    }

    #[test]
    fn test_normalize_zero_width_is_invalid() {
        let err = normalize(&[Image::new(0.0, 300.0)]).unwrap_err();
        assert!(err.to_string().contains("images[0].width"));
    }

    #[test]
    fn test_normalize_negative_height_is_invalid() {
        let images = [Image::new(10.0, 10.0), Image::new(10.0, -5.0)];
        let err = normalize(&images).unwrap_err();
        assert!(err.to_string().contains("images[1].height"));
    }

    #[test]
    fn test_normalize_rejects_ratio_that_overflows() {
        let images = [Image::new(1e-300, 1e300), Image::new(1.0, 1.0)];
        let err = normalize(&images).unwrap_err();
        assert!(err.to_string().contains("images[0] aspect ratio"));
    }

    #[test]
    fn test_normalize_rejects_ratio_that_underflows() {
        let images = [Image::new(1e300, 1e-300)];
        assert!(matches!(normalize(&images), Err(LayoutError::InvalidInput(_))));
    }

    #[test]
    fn test_normalize_rejects_stack_that_overflows() {
        let images = [Image::new(1.0, 1e308), Image::new(1.0, 1e308)];
        let err = normalize(&images).unwrap_err();
        assert!(err.to_string().contains("combined aspect ratio"));
    }

    #[test]
    fn test_normalize_clears_glue_on_last_image() {
        let images = [Image::new(1.0, 1.0).kept_with_next()];
        let normalized = normalize(&images).unwrap();
        assert!(!normalized[0].keep_with_next);
    }

    #[test]
    fn test_group_units_without_glue_is_one_per_image() {
        let images = [
            Image::new(1.0, 1.0),
            Image::new(1.0, 2.0),
            Image::new(2.0, 1.0),
        ];
        let units = group_units(&normalize(&images).unwrap());
        assert_eq!(units.len(), 3);
        assert_eq!(units[1].start, 1);
        assert_eq!(units[2].start, 2);
        assert!((units[2].height - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_group_units_merges_glued_chain() {
        let images = [
            Image::new(1.0, 1.0).kept_with_next(),
            Image::new(1.0, 2.0).kept_with_next(),
            Image::new(1.0, 0.5),
            Image::new(1.0, 1.0),
        ];
        let units = group_units(&normalize(&images).unwrap());
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].start, 0);
        assert!((units[0].height - 3.5).abs() < 1e-12);
        assert_eq!(units[1].start, 3);
    }

    #[test]
    fn test_image_deserializes_without_glue_flag() {
        let image: Image = serde_json::from_str(r#"{"width": 4, "height": 3}"#).unwrap();
        assert_eq!(image, Image::new(4.0, 3.0));
    }
}
