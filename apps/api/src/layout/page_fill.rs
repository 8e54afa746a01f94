//! Page Fill Analysis — checks how well each page of a layout is used.
//!
//! The optimizer only minimizes a cost; this module reports what that cost
//! means on paper, one verdict per page.
//!
//! # Page fill rules
//! - Whitespace > 8%        → too much whitespace
//! - Overflow ≤ 5%          → minor overflow (slight scale-down)
//! - Overflow > 5%          → major overflow

use serde::{Deserialize, Serialize};

use crate::layout::optimizer::PartitionCost;
use crate::layout::partition::Partition;

const MAX_WHITESPACE: f64 = 0.08;
const MAX_MINOR_OVERFLOW: f64 = 0.05;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Fill verdict for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    /// 92–100% fill.
    Acceptable,
    /// < 92% fill.
    TooMuchWhitespace,
    /// 100–105% fill — the page is scaled down slightly.
    MinorOverflow,
    /// > 105% fill — the page is scaled down noticeably.
    MajorOverflow,
}

/// Fill analysis of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFillAnalysis {
    pub page_index: usize,
    pub image_count: usize,
    /// Stacked height divided by the target ratio.
    pub fill_ratio: f64,
    pub whitespace_fraction: f64,
    pub overflow_fraction: f64,
    pub verdict: PageFillVerdict,
}

/// Fill analysis of a whole layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFillReport {
    pub pages: Vec<PageFillAnalysis>,
    pub mean_fill_ratio: f64,
    /// Page whose fill is furthest from 1.0.
    pub worst_page_index: usize,
    pub acceptable_pages: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Classifies a page whose images stack to `height` against `dest_ratio`.
pub fn analyze_page_fill(
    page_index: usize,
    image_count: usize,
    height: f64,
    dest_ratio: f64,
) -> PageFillAnalysis {
    let fill_ratio = height / dest_ratio;
    let whitespace_fraction = (1.0 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0).max(0.0);

    let verdict = if overflow_fraction > MAX_MINOR_OVERFLOW {
        PageFillVerdict::MajorOverflow
    } else if overflow_fraction > 0.0 {
        PageFillVerdict::MinorOverflow
    } else if whitespace_fraction > MAX_WHITESPACE {
        PageFillVerdict::TooMuchWhitespace
    } else {
        PageFillVerdict::Acceptable
    };

    PageFillAnalysis {
        page_index,
        image_count,
        fill_ratio,
        whitespace_fraction,
        overflow_fraction,
        verdict,
    }
}

/// Analyzes every page of `partition`, reading slice heights from an
/// already computed `cost` of that same partition.
pub fn analyze_layout(
    partition: &Partition,
    cost: &PartitionCost,
    dest_ratio: f64,
) -> LayoutFillReport {
    let pages: Vec<PageFillAnalysis> = cost
        .heights
        .iter()
        .zip(partition.slices())
        .enumerate()
        .map(|(i, (&height, range))| analyze_page_fill(i, range.len(), height, dest_ratio))
        .collect();

    summarize(pages)
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn summarize(pages: Vec<PageFillAnalysis>) -> LayoutFillReport {
    let mean_fill_ratio = if pages.is_empty() {
        0.0
    } else {
        pages.iter().map(|p| p.fill_ratio).sum::<f64>() / pages.len() as f64
    };

    let worst_page_index = pages
        .iter()
        .max_by(|a, b| {
            let da = (a.fill_ratio - 1.0).abs();
            let db = (b.fill_ratio - 1.0).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|p| p.page_index)
        .unwrap_or(0);

    let acceptable_pages = pages
        .iter()
        .filter(|p| p.verdict == PageFillVerdict::Acceptable)
        .count();

    LayoutFillReport {
        pages,
        mean_fill_ratio,
        worst_page_index,
        acceptable_pages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
