//! Axum route handlers for the Layout API.

use std::ops::Range;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::cost::{CostModel, Objective};
use crate::layout::error::LayoutError;
use crate::layout::geometry::PageGeometry;
use crate::layout::image::Image;
use crate::layout::optimizer::{optimal_slices_with, partition_cost, LayoutOptions};
use crate::layout::page_fill::{analyze_layout, LayoutFillReport, PageFillAnalysis};
use crate::layout::partition::Partition;
use crate::layout::placement::{place_pages, PagePlacement};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Options accepted on the wire. Unset fields fall back to the server's page
/// geometry and the optimizer defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Explicit target ratio. Derived from the page and margin when absent.
    pub dest_ratio: Option<f64>,
    pub margin_mm: Option<f64>,
    pub cost_model: CostModel,
    pub objective: Objective,
    pub max_scaling: f64,
    pub page_limit: usize,
    /// Spread spare height between keep-with-next groups.
    pub pad_groups: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions {
            dest_ratio: None,
            margin_mm: None,
            cost_model: CostModel::default(),
            objective: Objective::default(),
            max_scaling: 0.0,
            page_limit: 0,
            pad_groups: true,
        }
    }
}

impl RequestOptions {
    /// Resolves wire options against the server's default page.
    pub fn resolve(&self, page: PageGeometry) -> Result<(LayoutOptions, PageGeometry), LayoutError> {
        let geometry = match self.margin_mm {
            Some(margin) => page.with_margin(margin),
            None => page,
        };
        let dest_ratio = match self.dest_ratio {
            Some(ratio) => ratio,
            None => geometry.relative_page_height()?,
        };

        let options = LayoutOptions {
            dest_ratio,
            cost_model: self.cost_model,
            objective: self.objective,
            max_scaling: self.max_scaling,
            page_limit: self.page_limit,
        };
        Ok((options, geometry))
    }
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub images: Vec<Image>,
    #[serde(default)]
    pub options: RequestOptions,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub index: usize,
    pub range: Range<usize>,
    pub cost: f64,
    pub fill: PageFillAnalysis,
    pub placement: PagePlacement,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub layout_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub dest_ratio: f64,
    pub page_count: usize,
    /// Images per page, in order.
    pub counts: Vec<usize>,
    /// Image index range of each page, in order.
    pub slices: Vec<Range<usize>>,
    pub total_cost: f64,
    pub mean_fill_ratio: f64,
    pub worst_page_index: usize,
    pub pages: Vec<PageResponse>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub images: Vec<Image>,
    /// Images per page of the layout to score.
    pub counts: Vec<usize>,
    #[serde(default)]
    pub options: RequestOptions,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub dest_ratio: f64,
    pub total_cost: f64,
    pub page_costs: Vec<f64>,
    pub fill: LayoutFillReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/layout
///
/// Computes the optimal slicing of the submitted images and places them on pages.
/// The DP is CPU-bound, so it runs on the blocking pool.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    check_image_count(request.images.len(), state.config.max_images)?;

    let (options, geometry) = request.options.resolve(state.page)?;
    let pad_groups = request.options.pad_groups;
    let images = request.images;

    let response = tokio::task::spawn_blocking(move || {
        compute_layout(&images, &options, &geometry, pad_groups)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))??;

    info!(
        layout_id = %response.layout_id,
        pages = response.page_count,
        total_cost = response.total_cost,
        "Layout computed"
    );

    Ok(Json(response))
}

/// POST /api/v1/layout/evaluate
///
/// Scores a caller-supplied page split, e.g. to compare a hand-made layout
/// against the optimum.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    check_image_count(request.images.len(), state.config.max_images)?;

    let (options, _) = request.options.resolve(state.page)?;
    let partition = Partition::from_counts(&request.counts, request.images.len())?;
    let cost = partition_cost(&request.images, &partition, &options)?;
    let fill = analyze_layout(&partition, &cost, options.dest_ratio);

    Ok(Json(EvaluateResponse {
        dest_ratio: options.dest_ratio,
        total_cost: cost.total,
        page_costs: cost.slices,
        fill,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn check_image_count(count: usize, max_images: usize) -> Result<(), AppError> {
    if count > max_images {
        return Err(AppError::Validation(format!(
            "at most {max_images} images per request, got {count}"
        )));
    }
    Ok(())
}

/// Runs the full pipeline: slice, score, analyze, place.
fn compute_layout(
    images: &[Image],
    options: &LayoutOptions,
    geometry: &PageGeometry,
    pad_groups: bool,
) -> Result<LayoutResponse, LayoutError> {
    let partition = optimal_slices_with(images, options)?;
    let cost = partition_cost(images, &partition, options)?;
    let fill = analyze_layout(&partition, &cost, options.dest_ratio);
    let placements = place_pages(images, &partition, geometry, pad_groups)?;

    let pages = partition
        .slices()
        .iter()
        .cloned()
        .zip(cost.slices.iter().copied())
        .zip(fill.pages.iter().cloned().zip(placements))
        .enumerate()
        .map(|(index, ((range, cost), (fill, placement)))| PageResponse {
            index,
            range,
            cost,
            fill,
            placement,
        })
        .collect();

    Ok(LayoutResponse {
        layout_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        dest_ratio: options.dest_ratio,
        page_count: partition.len(),
        counts: partition.counts(),
        total_cost: cost.total,
        mean_fill_ratio: fill.mean_fill_ratio,
        worst_page_index: fill.worst_page_index,
        slices: partition.slices().to_vec(),
        pages,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
