//! Optimal slicing by dynamic programming over prefix positions.
#![allow(dead_code)]
//!
//! # Model
//! Images are stacked at unit width; a slice's height is the sum of its
//! members' aspect ratios and is scored against the target ratio by
//! [`SliceCost`]. `dp[i]` holds the best cost of slicing the first `i` units,
//! where a unit is a keep-with-next chain (usually a single image).
//!
//! # Complexity
//! - Unlimited pages: O(n²) time, O(n) space.
//! - With a page limit of `m`: O(n²·m) time, O(n·m) space. Only run when the
//!   unlimited optimum uses more than `m` pages.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::cost::{CostModel, Objective, SliceCost};
use crate::layout::error::{require_positive, LayoutError};
use crate::layout::image::{group_units, normalize, Image, Unit};
use crate::layout::partition::Partition;

/// Height/width of an A4 page.
pub const DEFAULT_DEST_RATIO: f64 = std::f64::consts::SQRT_2;

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// Tuning knobs for a slicing run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Target height/width ratio of a slice.
    pub dest_ratio: f64,
    pub cost_model: CostModel,
    pub objective: Objective,
    /// Largest allowed scale-down factor for an overfull slice. 0 = unlimited.
    pub max_scaling: f64,
    /// Maximum number of slices. 0 = unlimited. Overrides `max_scaling` when
    /// it has to be enforced.
    pub page_limit: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            dest_ratio: DEFAULT_DEST_RATIO,
            cost_model: CostModel::default(),
            objective: Objective::default(),
            max_scaling: 0.0,
            page_limit: 0,
        }
    }
}

impl LayoutOptions {
    /// Validates the options and returns the slice cost function they describe.
    pub fn slice_cost(&self) -> Result<SliceCost, LayoutError> {
        let dest_ratio = require_positive("dest_ratio", self.dest_ratio)?;
        if !self.max_scaling.is_finite() || self.max_scaling < 0.0 {
            return Err(LayoutError::invalid(format!(
                "max_scaling must be zero or a positive number, got {}",
                self.max_scaling
            )));
        }
        Ok(SliceCost {
            dest_ratio,
            model: self.cost_model,
            max_scaling: self.max_scaling,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Slices `images` into contiguous groups minimizing the summed blank-space
/// cost against `dest_ratio`.
pub fn optimal_slices(images: &[Image], dest_ratio: f64) -> Result<Partition, LayoutError> {
    optimal_slices_with(
        images,
        &LayoutOptions {
            dest_ratio,
            ..LayoutOptions::default()
        },
    )
}

/// Slices `images` under the full option set.
///
/// Ties between equally good cut points go to the earlier cut, so the result
/// is deterministic for a given input.
pub fn optimal_slices_with(
    images: &[Image],
    options: &LayoutOptions,
) -> Result<Partition, LayoutError> {
    let slice_cost = options.slice_cost()?;
    let normalized = normalize(images)?;
    let units = group_units(&normalized);

    let table = DpTable::build(&units, &slice_cost, options.objective);
    let mut unit_cuts = table.cuts();
    let mut cost = table.best_cost();

    if options.page_limit > 0 && unit_cuts.len() + 1 > options.page_limit {
        let limited = PagedDpTable::build(
            &units,
            &slice_cost.without_scaling_limit(),
            options.objective,
            options.page_limit,
        );
        debug!(
            unlimited_pages = unit_cuts.len() + 1,
            page_limit = options.page_limit,
            "Enforcing page limit"
        );
        unit_cuts = limited.cuts();
        cost = limited.best_cost();
    }

    debug!(
        images = images.len(),
        units = units.len(),
        pages = unit_cuts.len() + 1,
        cost,
        "Computed optimal slices"
    );

    let image_cuts: Vec<usize> = unit_cuts.iter().map(|&u| units[u].start).collect();
    Partition::from_cuts(&image_cuts, images.len())
}

/// Cost breakdown of a partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionCost {
    /// Partition cost under the chosen objective.
    pub total: f64,
    /// Cost of each slice, in order.
    pub slices: Vec<f64>,
    /// Stacked height of each slice at unit width.
    pub heights: Vec<f64>,
}

/// Scores an arbitrary partition of `images` under `options`.
///
/// Fails if the partition does not cover `images` or splits a keep-with-next
/// pair.
pub fn partition_cost(
    images: &[Image],
    partition: &Partition,
    options: &LayoutOptions,
) -> Result<PartitionCost, LayoutError> {
    let slice_cost = options.slice_cost()?;
    let normalized = normalize(images)?;
    let groups = partition.group(&normalized)?;

    let glued = normalized
        .iter()
        .enumerate()
        .filter(|(_, image)| image.keep_with_next)
        .map(|(i, _)| i);
    if !partition.respects_glue(glued) {
        return Err(LayoutError::invalid(
            "partition separates an image from the one it is kept with",
        ));
    }

    let heights: Vec<f64> = groups
        .iter()
        .map(|group| group.iter().map(|image| image.aspect_ratio).sum())
        .collect();
    let slices: Vec<f64> = heights.iter().map(|&h| slice_cost.cost(h)).collect();
    let total = slices
        .iter()
        .fold(0.0, |acc, &cost| options.objective.combine(acc, cost));

    Ok(PartitionCost {
        total,
        slices,
        heights,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// DP tables
// ────────────────────────────────────────────────────────────────────────────

/// `cost[i]`: best cost for the first `i` units. `back[i]`: start of the last
/// slice in that optimum.
struct DpTable {
    cost: Vec<f64>,
    back: Vec<usize>,
}

impl DpTable {
    fn build(units: &[Unit], slice_cost: &SliceCost, objective: Objective) -> Self {
        let m = units.len();
        let mut cost = vec![f64::INFINITY; m + 1];
        let mut back = vec![0usize; m + 1];
        cost[0] = 0.0;

        for i in 1..=m {
            let mut height = 0.0;
            // Walk j downwards so the slice height accumulates incrementally;
            // `<=` lets the smallest j win ties.
            for j in (0..i).rev() {
                height += units[j].height;
                let candidate = objective.combine(cost[j], slice_cost.cost(height));
                if candidate <= cost[i] {
                    cost[i] = candidate;
                    back[i] = j;
                }
            }
        }

        DpTable { cost, back }
    }

    fn best_cost(&self) -> f64 {
        self.cost.last().copied().unwrap_or(0.0)
    }

    /// Unit indices where a new slice starts, excluding 0.
    fn cuts(&self) -> Vec<usize> {
        let mut cuts = Vec::new();
        let mut i = self.back.len() - 1;
        while i > 0 {
            let j = self.back[i];
            if j > 0 {
                cuts.push(j);
            }
            i = j;
        }
        cuts.reverse();
        cuts
    }
}

/// `cost[k][i]`: best cost for the first `i` units in exactly `k` slices.
struct PagedDpTable {
    cost: Vec<Vec<f64>>,
    back: Vec<Vec<usize>>,
    /// Slice count of the best layout within the limit.
    best_pages: usize,
}

impl PagedDpTable {
    fn build(
        units: &[Unit],
        slice_cost: &SliceCost,
        objective: Objective,
        page_limit: usize,
    ) -> Self {
        let m = units.len();
        let max_pages = page_limit.min(m);
        let mut cost = vec![vec![f64::INFINITY; m + 1]; max_pages + 1];
        let mut back = vec![vec![0usize; m + 1]; max_pages + 1];
        cost[0][0] = 0.0;

        for k in 1..=max_pages {
            for i in k..=m {
                let mut height = 0.0;
                for j in (k - 1..i).rev() {
                    height += units[j].height;
                    let previous = cost[k - 1][j];
                    if previous.is_infinite() {
                        continue;
                    }
                    let candidate = objective.combine(previous, slice_cost.cost(height));
                    if candidate <= cost[k][i] {
                        cost[k][i] = candidate;
                        back[k][i] = j;
                    }
                }
            }
        }

        // Fewest pages wins ties.
        let mut best_pages = 1;
        for k in 2..=max_pages {
            if cost[k][m] < cost[best_pages][m] {
                best_pages = k;
            }
        }

        PagedDpTable {
            cost,
            back,
            best_pages,
        }
    }

    fn best_cost(&self) -> f64 {
        self.cost[self.best_pages]
            .last()
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    fn cuts(&self) -> Vec<usize> {
        let mut cuts = Vec::new();
        let mut i = self.cost[0].len() - 1;
        let mut k = self.best_pages;
        while k > 0 {
            let j = self.back[k][i];
            if j > 0 {
                cuts.push(j);
            }
            i = j;
            k -= 1;
        }
        cuts.reverse();
        cuts
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
