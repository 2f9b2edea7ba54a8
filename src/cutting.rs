use serde::{Deserialize, Serialize};

use crate::types::{CuttingResult, PlacedPiece, Size};

const DIM_EPS: f64 = 1e-9;

/// Tunables for the parent-to-press-sheet cutting plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingRules {
    /// Rotating the target must beat the given orientation AND exceed this
    /// efficiency before it is selected. The bias keeps marginal gains
    /// from flip-flopping the shop's cut layouts.
    pub rotation_efficiency_gate: f64,
}

impl Default for CuttingRules {
    fn default() -> Self {
        Self {
            rotation_efficiency_gate: 0.99,
        }
    }
}

fn grid_count(span: f64, step: f64) -> u32 {
    if span <= 0.0 || step <= 0.0 {
        return 0;
    }
    (span / step + DIM_EPS).floor() as u32
}

/// Plans past this size are nonsense inputs (a target orders of
/// magnitude smaller than the parent); they come back as an empty plan
/// instead of materializing the grid.
const MAX_PLAN_PIECES: u64 = 10_000;

fn yield_of(parent: Size, piece: Size) -> (u32, u32, f64) {
    let per_row = grid_count(parent.width, piece.width);
    let per_col = grid_count(parent.height, piece.height);
    let total = per_row as u64 * per_col as u64;
    let efficiency = if parent.area() > 0.0 {
        total as f64 * piece.area() / parent.area()
    } else {
        0.0
    };
    (per_row, per_col, efficiency)
}

/// Plans how `target` press sheets are guillotined out of `parent`.
///
/// Both orientations are tiled by floor division; the swapped orientation
/// is taken only when its efficiency is strictly higher than the given
/// orientation's and strictly above the rotation gate.
pub fn cut(parent: Size, target: Size, rules: &CuttingRules) -> CuttingResult {
    if !parent.is_valid() || !target.is_valid() {
        return CuttingResult::empty();
    }

    let (per_row_n, per_col_n, eff_n) = yield_of(parent, target);
    let swapped = target.rotated();
    let (per_row_s, per_col_s, eff_s) = yield_of(parent, swapped);

    let rotate = eff_s > eff_n && eff_s > rules.rotation_efficiency_gate;
    let (piece, per_row, per_col) = if rotate {
        (swapped, per_row_s, per_col_s)
    } else {
        (target, per_row_n, per_col_n)
    };

    let total = per_row as u64 * per_col as u64;
    if total > MAX_PLAN_PIECES {
        tracing::warn!(total, "cut plan rejected: piece count past the plan ceiling");
        return CuttingResult::empty();
    }
    let total = total as u32;
    let mut pieces = Vec::with_capacity(total as usize);
    for row in 0..per_col {
        for col in 0..per_row {
            pieces.push(PlacedPiece {
                x: col as f64 * piece.width,
                y: row as f64 * piece.height,
                width: piece.width,
                height: piece.height,
            });
        }
    }

    let vertical_cuts = (1..per_row).map(|i| i as f64 * piece.width).collect();
    let horizontal_cuts = (1..per_col).map(|i| i as f64 * piece.height).collect();

    CuttingResult {
        pieces,
        pieces_per_row: per_row,
        pieces_per_col: per_col,
        total_pieces: total,
        rotated: rotate,
        vertical_cuts,
        horizontal_cuts,
    }
}
