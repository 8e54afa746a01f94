//! Slice badness.
//!
//! A slice stacks its images at unit width, so its combined ratio is the sum
//! of member aspect ratios. That sum is compared against the target ratio of
//! the page.

use serde::{Deserialize, Serialize};

/// Added to a slice's cost when it would need more scale-down than allowed.
pub const SCALING_PENALTY: f64 = 1_000_000.0;

/// How a single slice is scored against the target ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    /// Fraction of the page left blank, or of the content lost to scale-down
    /// when the slice is taller than the page.
    #[default]
    BlankSpace,
    /// Relative difference between slice height and page height. Penalizes
    /// overflow more steeply than `BlankSpace`.
    HeightDifference,
}

/// How slice costs combine into the cost of a whole partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Minimize the summed cost over all slices.
    #[default]
    Sum,
    /// Minimize the cost of the worst slice.
    WorstPage,
}

impl Objective {
    /// Folds one more slice cost into an accumulated partition cost.
    pub fn combine(self, accumulated: f64, slice: f64) -> f64 {
        match self {
            Objective::Sum => accumulated + slice,
            Objective::WorstPage => accumulated.max(slice),
        }
    }
}

/// Parameters of the per-slice cost function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceCost {
    pub dest_ratio: f64,
    pub model: CostModel,
    /// Largest allowed `slice_height / dest_ratio`. 0 disables the limit.
    pub max_scaling: f64,
}

impl SliceCost {
    /// Cost of a slice whose stacked images sum to `height` (at unit width).
    pub fn cost(&self, height: f64) -> f64 {
        let target = self.dest_ratio;
        let too_large = height > target;

        let base = match self.model {
            CostModel::BlankSpace => {
                if too_large {
                    1.0 - target / height
                } else {
                    1.0 - height / target
                }
            }
            CostModel::HeightDifference => (target - height).abs() / target,
        };

        let over_limit = too_large && self.max_scaling > 0.0 && height / target > self.max_scaling;
        if over_limit {
            base + SCALING_PENALTY
        } else {
            base
        }
    }

    /// Copy of this cost function with the scaling limit switched off.
    pub fn without_scaling_limit(self) -> Self {
        SliceCost {
            max_scaling: 0.0,
            ..self
        }
    }
}
