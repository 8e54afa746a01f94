// Image slicing: splits an ordered image sequence into pages by dynamic programming.
// Implements: unit-width normalization, slice cost models, optimal partitioning,
// page fill analysis, and placement on physical pages.
// The optimizer is CPU-bound; handlers run it inside tokio::task::spawn_blocking.

pub mod cost;
pub mod error;
pub mod geometry;
pub mod handlers;
pub mod image;
pub mod optimizer;
pub mod page_fill;
pub mod partition;
pub mod placement;

// Re-export the public API consumed by other modules (config, state, errors).
pub use error::LayoutError;
pub use geometry::PageGeometry;
