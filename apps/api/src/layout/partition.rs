//! Ordered division of an image sequence into contiguous slices.
#![allow(dead_code)]

use std::ops::Range;

use serde::Serialize;

use crate::layout::error::LayoutError;

/// Contiguous, non-empty, non-overlapping ranges covering `0..len` in order.
///
/// Constructed only through checked constructors, so every `Partition` upholds
/// the cover invariant for the sequence length it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    slices: Vec<Range<usize>>,
}

impl Partition {
    /// Builds a partition from slice sizes, e.g. `[2, 1]` → `[0..2, 2..3]`.
    ///
    /// Fails if any count is zero or the counts do not sum to `len`.
    pub fn from_counts(counts: &[usize], len: usize) -> Result<Self, LayoutError> {
        if counts.is_empty() {
            return Err(LayoutError::invalid("partition has no slices"));
        }

        let mut slices = Vec::with_capacity(counts.len());
        let mut start = 0usize;
        for (i, &count) in counts.iter().enumerate() {
            if count == 0 {
                return Err(LayoutError::invalid(format!("slice {i} is empty")));
            }
            let end = start
                .checked_add(count)
                .filter(|&end| end <= len)
                .ok_or_else(|| {
                    LayoutError::invalid(format!(
                        "slice {i} of {count} images runs past the {len} images given"
                    ))
                })?;
            slices.push(start..end);
            start = end;
        }

        if start != len {
            return Err(LayoutError::invalid(format!(
                "partition covers {start} images, expected {len}"
            )));
        }

        Ok(Partition { slices })
    }

    /// Builds a partition from ascending cut positions strictly inside `0..len`.
    pub(crate) fn from_cuts(cuts: &[usize], len: usize) -> Result<Self, LayoutError> {
        let mut counts = Vec::with_capacity(cuts.len() + 1);
        let mut previous = 0;
        for &cut in cuts.iter().chain(std::iter::once(&len)) {
            if cut <= previous {
                return Err(LayoutError::invalid(format!(
                    "cut {cut} does not advance past {previous}"
                )));
            }
            counts.push(cut - previous);
            previous = cut;
        }
        Self::from_counts(&counts, len)
    }

    /// Every image in its own slice.
    pub fn singletons(len: usize) -> Result<Self, LayoutError> {
        Self::from_counts(&vec![1; len], len)
    }

    /// All images in one slice.
    pub fn single(len: usize) -> Result<Self, LayoutError> {
        Self::from_counts(&[len], len)
    }

    pub fn slices(&self) -> &[Range<usize>] {
        &self.slices
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Number of images covered.
    pub fn image_count(&self) -> usize {
        self.slices.last().map(|r| r.end).unwrap_or(0)
    }

    /// Images per slice, e.g. `[0..2, 2..3]` → `[2, 1]`.
    pub fn counts(&self) -> Vec<usize> {
        self.slices.iter().map(|r| r.len()).collect()
    }

    /// Splits `items` along this partition.
    ///
    /// Fails if `items` is not exactly as long as the partitioned sequence.
    pub fn group<'a, T>(&self, items: &'a [T]) -> Result<Vec<&'a [T]>, LayoutError> {
        if items.len() != self.image_count() {
            return Err(LayoutError::invalid(format!(
                "partition covers {} items, got {}",
                self.image_count(),
                items.len()
            )));
        }
        Ok(self.slices.iter().map(|r| &items[r.clone()]).collect())
    }

    /// Returns true if no slice boundary falls right after an index in `glued`.
    pub fn respects_glue(&self, glued: impl IntoIterator<Item = usize>) -> bool {
        glued
            .into_iter()
            .all(|i| !self.slices.iter().any(|r| r.end == i + 1 && r.end != self.image_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts_builds_contiguous_ranges() {
        let p = Partition::from_counts(&[2, 1, 3], 6).unwrap();
        assert_eq!(p.slices(), &[0..2, 2..3, 3..6]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.image_count(), 6);
        assert_eq!(p.counts(), vec![2, 1, 3]);
    }

    #[test]
    fn test_from_counts_rejects_empty_slice() {
        assert!(Partition::from_counts(&[2, 0, 1], 3).is_err());
    }

    #[test]
    fn test_from_counts_rejects_wrong_total() {
        assert!(Partition::from_counts(&[2, 2], 3).is_err());
        assert!(Partition::from_counts(&[1], 3).is_err());
        assert!(Partition::from_counts(&[], 0).is_err());
    }

    #[test]
    fn test_from_counts_rejects_overflowing_counts() {
        let err = Partition::from_counts(&[usize::MAX, 2], 1).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput(_)));
        assert!(Partition::from_counts(&[1, usize::MAX], 3).is_err());
        assert!(Partition::from_counts(&[4], 3).is_err());
    }

    #[test]
    fn test_from_cuts() {
        let p = Partition::from_cuts(&[1, 3], 4).unwrap();
        assert_eq!(p.slices(), &[0..1, 1..3, 3..4]);
        assert_eq!(Partition::from_cuts(&[], 2).unwrap().slices(), &[0..2]);
        assert!(Partition::from_cuts(&[2, 2], 4).is_err());
        assert!(Partition::from_cuts(&[4], 4).is_err());
    }

    #[test]
    fn test_single_and_singletons() {
        assert_eq!(Partition::single(3).unwrap().slices(), &[0..3]);
        assert_eq!(Partition::singletons(3).unwrap().counts(), vec![1, 1, 1]);
        assert!(Partition::single(0).is_err());
    }

    #[test]
    fn test_group_splits_items() {
        let p = Partition::from_counts(&[1, 2], 3).unwrap();
        let items = ["a", "b", "c"];
        let groups = p.group(&items).unwrap();
        assert_eq!(groups, vec![&["a"][..], &["b", "c"][..]]);
        assert!(p.group(&items[..2]).is_err());
    }

    #[test]
    fn test_respects_glue() {
        let p = Partition::from_counts(&[2, 1], 3).unwrap();
        assert!(p.respects_glue([0]));
        assert!(!p.respects_glue([1]));
        // A glue flag on the last image never constrains anything.
        assert!(p.respects_glue([2]));
    }

    #[test]
    fn test_serializes_as_ranges() {
        let p = Partition::from_counts(&[1, 1], 2).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"slices": [{"start": 0, "end": 1}, {"start": 1, "end": 2}]})
        );
    }
}
