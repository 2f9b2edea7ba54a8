//! Imposition and production-cost engine for a print-shop quoting app.
//!
//! Pure, synchronous computations: classify a product's shape, impose it
//! on a press sheet, plan how parent stock is cut down, pick the cheapest
//! parent-sheet candidate and price the job for digital or offset
//! printing. All inputs are immutable values; callers own caching and
//! any reactive recomputation.

pub mod candidates;
pub mod cost;
pub mod cutting;
pub mod error;
pub mod estimator;
pub mod packer;
pub mod render;
pub mod shape;
pub mod types;
