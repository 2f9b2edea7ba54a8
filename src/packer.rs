use serde::{Deserialize, Serialize};

use crate::shape::ShapeCategory;
use crate::types::{LayoutResult, Orientation, PackTier, SheetConstraints, Size};

/// Tolerance added before flooring so exact fits (e.g. 99 / 9.9) are not
/// lost to binary rounding.
const DIM_EPS: f64 = 1e-9;

/// Per-category packing policy constants, in centimeters / item counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PackRules {
    /// Business cards never get more than this much spacing.
    pub card_gap_cap: f64,
    /// Containers below this yield escalate to the next tier.
    pub container_min_yield: u32,
    /// Cap for the forced single-column container stack.
    pub container_max_stack: u32,
    /// Bags at or under this width are laid out 1x3, wider ones 1x2.
    pub bag_narrow_width: f64,
}

impl Default for PackRules {
    fn default() -> Self {
        Self {
            card_gap_cap: 0.2,
            container_min_yield: 4,
            container_max_stack: 8,
            bag_narrow_width: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tiling {
    cols: u32,
    rows: u32,
}

impl Tiling {
    /// Saturating: micro-sized items against a full sheet can push the
    /// grid product past `u32`.
    fn count(&self) -> u32 {
        (self.cols as u64 * self.rows as u64).min(u32::MAX as u64) as u32
    }
}

/// How many `step`-sized cells fit along `span`. Zero when either side is
/// non-positive, so callers never divide by zero.
fn grid_count(span: f64, step: f64) -> u32 {
    if span <= 0.0 || step <= 0.0 {
        return 0;
    }
    (span / step + DIM_EPS).floor() as u32
}

/// Printable area after margins. The gripper strip sits on the leading
/// (longest-feed) edge: when the sheet is wider than tall it eats into the
/// height, otherwise into the width.
fn printable_area(sheet: Size, c: &SheetConstraints) -> (f64, f64, bool) {
    if sheet.width >= sheet.height {
        (
            sheet.width - 2.0 * c.edge_margin,
            sheet.height - c.gripper_width - c.edge_margin,
            true,
        )
    } else {
        (
            sheet.width - c.gripper_width - c.edge_margin,
            sheet.height - 2.0 * c.edge_margin,
            false,
        )
    }
}

/// Floor-division tilings for both orientations; returns the winner and
/// its orientation. Ties favor Normal.
fn best_tiling(pw: f64, ph: f64, item: Size, gap: f64) -> (Tiling, Orientation) {
    let normal = Tiling {
        cols: grid_count(pw, item.width + gap),
        rows: grid_count(ph, item.height + gap),
    };
    let rotated = Tiling {
        cols: grid_count(pw, item.height + gap),
        rows: grid_count(ph, item.width + gap),
    };
    if rotated.count() > normal.count() {
        (rotated, Orientation::Rotated)
    } else {
        (normal, Orientation::Normal)
    }
}

/// Imposes `item` on `sheet` and returns the best grid layout for its
/// category. Degenerate inputs produce a zero-yield result, never a panic.
pub fn pack(
    sheet: Size,
    constraints: &SheetConstraints,
    item: Size,
    category: ShapeCategory,
    rules: &PackRules,
) -> LayoutResult {
    let (pw, ph, gripper_long) = printable_area(sheet, constraints);

    if !item.is_valid() || pw <= 0.0 || ph <= 0.0 {
        return LayoutResult::no_fit(pw, ph, gripper_long);
    }

    let gap = constraints.gap_width.max(0.0);
    let (tiling, orientation, tier) = match category {
        ShapeCategory::Rectangular => {
            let (t, o) = best_tiling(pw, ph, item, gap);
            (t, o, PackTier::Baseline)
        }
        ShapeCategory::BusinessCardLike => {
            let clamped = gap.min(rules.card_gap_cap);
            let (t, o) = best_tiling(pw, ph, item, clamped);
            let tier = if clamped < gap {
                PackTier::TightGap
            } else {
                PackTier::Baseline
            };
            (t, o, tier)
        }
        ShapeCategory::SmallContainer => pack_container(pw, ph, item, gap, rules),
        ShapeCategory::LargeGussetedBag => pack_bag(pw, ph, item, gap, rules),
    };

    let items = tiling.count();
    let sheet_area = sheet.area();
    let efficiency = if sheet_area > 0.0 {
        (items as f64 * item.area() / sheet_area * 100.0).min(100.0)
    } else {
        0.0
    };

    LayoutResult {
        usable_width: pw,
        usable_height: ph,
        items_per_row: tiling.cols,
        items_per_col: tiling.rows,
        items_per_sheet: items,
        orientation,
        efficiency_percent: efficiency,
        gripper_on_long_side: gripper_long,
        tier,
    }
}

/// Escalation ladder for small cup-like packaging: baseline tiling, then
/// halved gap, then a forced single column clamped to [min_yield, max].
/// The forced rung guarantees a viable yield instead of reporting the
/// near-zero count a naive fit would give.
fn pack_container(
    pw: f64,
    ph: f64,
    item: Size,
    gap: f64,
    rules: &PackRules,
) -> (Tiling, Orientation, PackTier) {
    let (t, o) = best_tiling(pw, ph, item, gap);
    if t.count() >= rules.container_min_yield {
        return (t, o, PackTier::Baseline);
    }

    let half_gap = gap * 0.5;
    let (t, o) = best_tiling(pw, ph, item, half_gap);
    if t.count() >= rules.container_min_yield {
        return (t, o, PackTier::HalvedGap);
    }

    let raw = grid_count(ph, item.height + half_gap);
    let rows = raw.clamp(rules.container_min_yield, rules.container_max_stack);
    (
        Tiling { cols: 1, rows },
        Orientation::Normal,
        PackTier::ForcedColumn,
    )
}

/// Large flattened bag dielines are run as a single column of 2 or 3,
/// regardless of what area math would allow. Only a strictly better
/// rotated tiling displaces the forced target.
fn pack_bag(
    pw: f64,
    ph: f64,
    item: Size,
    gap: f64,
    rules: &PackRules,
) -> (Tiling, Orientation, PackTier) {
    let forced_rows = if item.width <= rules.bag_narrow_width {
        3
    } else {
        2
    };
    let forced = Tiling {
        cols: 1,
        rows: forced_rows,
    };

    let rotated = Tiling {
        cols: grid_count(pw, item.height + gap),
        rows: grid_count(ph, item.width + gap),
    };
    if rotated.count() > forced.count() {
        (rotated, Orientation::Rotated, PackTier::Baseline)
    } else {
        (forced, Orientation::Normal, PackTier::ForcedBag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ShapeRules, classify};

    fn pack_default(sheet: Size, item: Size, category: ShapeCategory) -> LayoutResult {
        pack(
            sheet,
            &SheetConstraints::default(),
            item,
            category,
            &PackRules::default(),
        )
    }

    #[test]
    fn test_end_to_end_rectangular() {
        // 100x70 sheet, defaults: gripper on the long side, printable
        // 99 x 68.6 (70 - gripper 0.9 - edge 0.5). Item 20x14 + 0.5 gap:
        // normal 4x4 = 16, rotated 6x3 = 18 -> rotated wins.
        let layout = pack_default(
            Size::new(100.0, 70.0),
            Size::new(20.0, 14.0),
            ShapeCategory::Rectangular,
        );
        assert!((layout.usable_width - 99.0).abs() < 1e-9);
        assert!((layout.usable_height - 68.6).abs() < 1e-9);
        assert!(layout.gripper_on_long_side);
        assert_eq!(layout.orientation, Orientation::Rotated);
        assert_eq!(layout.items_per_row, 6);
        assert_eq!(layout.items_per_col, 3);
        assert_eq!(layout.items_per_sheet, 18);
        assert_eq!(layout.tier, PackTier::Baseline);
        let expected_eff = 18.0 * 280.0 / 7000.0 * 100.0;
        assert!((layout.efficiency_percent - expected_eff).abs() < 1e-9);
    }

    #[test]
    fn test_tie_breaks_to_normal() {
        // Square item: both orientations tile identically.
        let layout = pack_default(
            Size::new(100.0, 70.0),
            Size::new(10.0, 10.0),
            ShapeCategory::Rectangular,
        );
        assert_eq!(layout.orientation, Orientation::Normal);
        assert!(layout.items_per_sheet > 0);
    }

    #[test]
    fn test_zero_width_item_yields_nothing() {
        let layout = pack_default(
            Size::new(100.0, 70.0),
            Size::new(0.0, 14.0),
            ShapeCategory::Rectangular,
        );
        assert_eq!(layout.items_per_sheet, 0);
        assert_eq!(layout.efficiency_percent, 0.0);
    }

    #[test]
    fn test_margins_larger_than_sheet() {
        let constraints = SheetConstraints {
            gripper_width: 3.0,
            edge_margin: 2.0,
            ..SheetConstraints::default()
        };
        let layout = pack(
            Size::new(4.0, 3.0),
            &constraints,
            Size::new(1.0, 1.0),
            ShapeCategory::Rectangular,
            &PackRules::default(),
        );
        assert_eq!(layout.items_per_sheet, 0);
        assert_eq!(layout.usable_width, 0.0);
    }

    #[test]
    fn test_gripper_side_follows_sheet_aspect() {
        let tall = pack_default(
            Size::new(70.0, 100.0),
            Size::new(20.0, 14.0),
            ShapeCategory::Rectangular,
        );
        assert!(!tall.gripper_on_long_side);
        // Printable: 70 - 0.9 - 0.5 = 68.6 wide, 100 - 1.0 = 99 tall.
        assert!((tall.usable_width - 68.6).abs() < 1e-9);
        assert!((tall.usable_height - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_capped_at_100() {
        // Item with zero effective spacing filling the sheet exactly.
        let constraints = SheetConstraints {
            gripper_width: 0.0,
            edge_margin: 0.0,
            gap_width: 0.0,
            bleed_width: 0.0,
        };
        let layout = pack(
            Size::new(100.0, 70.0),
            &constraints,
            Size::new(50.0, 70.0),
            ShapeCategory::Rectangular,
            &PackRules::default(),
        );
        assert_eq!(layout.items_per_sheet, 2);
        assert!(layout.efficiency_percent <= 100.0);
        assert!((layout.efficiency_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_business_card_gap_clamp_improves_density() {
        let sheet = Size::new(100.0, 70.0);
        let card = Size::new(9.0, 5.0);
        assert_eq!(
            classify(card, &ShapeRules::default()),
            ShapeCategory::BusinessCardLike
        );
        let clamped = pack_default(sheet, card, ShapeCategory::BusinessCardLike);
        let unclamped = pack_default(sheet, card, ShapeCategory::Rectangular);
        assert_eq!(clamped.tier, PackTier::TightGap);
        // With gap 0.2 instead of 0.5 the rotated grid reaches 19x7 = 133
        // instead of 18x7 = 126.
        assert!(clamped.items_per_sheet > unclamped.items_per_sheet);
        assert_eq!(clamped.items_per_sheet, 133);
        assert_eq!(clamped.orientation, Orientation::Rotated);
    }

    #[test]
    fn test_business_card_tier_reflects_actual_clamping() {
        // A caller gap already at or under the cap was never tightened,
        // so the layout reports the baseline tier.
        let constraints = SheetConstraints {
            gap_width: 0.1,
            ..SheetConstraints::default()
        };
        let layout = pack(
            Size::new(100.0, 70.0),
            &constraints,
            Size::new(9.0, 5.0),
            ShapeCategory::BusinessCardLike,
            &PackRules::default(),
        );
        assert_eq!(layout.tier, PackTier::Baseline);
        assert!(layout.items_per_sheet > 0);
    }

    #[test]
    fn test_small_container_regression_minimum_yield() {
        // Historical regression: a 22x8.5 cup wrap on a 25x35 sheet must
        // not come back with fewer than 4 per sheet.
        let constraints = SheetConstraints {
            gripper_width: 0.9,
            edge_margin: 0.5,
            gap_width: 0.2,
            bleed_width: 0.3,
        };
        let layout = pack(
            Size::new(25.0, 35.0),
            &constraints,
            Size::new(22.0, 8.5),
            ShapeCategory::SmallContainer,
            &PackRules::default(),
        );
        assert!(layout.items_per_sheet >= 4);
        assert_eq!(layout.tier, PackTier::ForcedColumn);
        assert_eq!(layout.items_per_row, 1);
        assert_eq!(layout.items_per_sheet, 4);
    }

    #[test]
    fn test_small_container_baseline_when_it_fits() {
        // Plenty of room: the ladder never escalates.
        let layout = pack_default(
            Size::new(100.0, 70.0),
            Size::new(10.0, 6.5),
            ShapeCategory::SmallContainer,
        );
        assert_eq!(layout.tier, PackTier::Baseline);
        assert!(layout.items_per_sheet >= 4);
    }

    #[test]
    fn test_container_forced_column_caps_at_eight() {
        // Too wide to tile in either orientation, but so short that the
        // forced column would raw-count 15 rows. The cap holds it at 8.
        let layout = pack_default(
            Size::new(15.0, 18.0),
            Size::new(20.0, 1.0),
            ShapeCategory::SmallContainer,
        );
        assert_eq!(layout.tier, PackTier::ForcedColumn);
        assert_eq!(layout.items_per_row, 1);
        assert_eq!(layout.items_per_sheet, 8);
    }

    #[test]
    fn test_bag_narrow_forced_one_by_three() {
        let layout = pack_default(
            Size::new(60.0, 130.0),
            Size::new(55.0, 35.0),
            ShapeCategory::LargeGussetedBag,
        );
        assert_eq!(layout.tier, PackTier::ForcedBag);
        assert_eq!(layout.items_per_row, 1);
        assert_eq!(layout.items_per_col, 3);
        assert_eq!(layout.orientation, Orientation::Normal);
    }

    #[test]
    fn test_bag_wide_forced_one_by_two() {
        let layout = pack_default(
            Size::new(80.0, 90.0),
            Size::new(70.0, 40.0),
            ShapeCategory::LargeGussetedBag,
        );
        assert_eq!(layout.tier, PackTier::ForcedBag);
        assert_eq!(layout.items_per_col, 2);
        assert_eq!(layout.items_per_sheet, 2);
    }

    #[test]
    fn test_bag_rotation_dominates_forced_target() {
        // Rotated the 35-wide dieline tiles 2x4 = 8 on this sheet, well
        // past the forced 3.
        let layout = pack_default(
            Size::new(80.0, 230.0),
            Size::new(55.0, 35.0),
            ShapeCategory::LargeGussetedBag,
        );
        assert_eq!(layout.orientation, Orientation::Rotated);
        assert_eq!(layout.tier, PackTier::Baseline);
        assert!(layout.items_per_sheet > 3);
    }

    #[test]
    fn test_micro_item_saturates_instead_of_overflowing() {
        // A dust-sized item with no spacing would tile billions of cells;
        // the count saturates rather than wrapping.
        let constraints = SheetConstraints {
            gripper_width: 0.0,
            edge_margin: 0.0,
            gap_width: 0.0,
            bleed_width: 0.0,
        };
        let layout = pack(
            Size::new(100.0, 70.0),
            &constraints,
            Size::new(0.001, 0.001),
            ShapeCategory::Rectangular,
            &PackRules::default(),
        );
        assert_eq!(layout.items_per_sheet, u32::MAX);
        assert!(layout.efficiency_percent >= 0.0);
        assert!(layout.efficiency_percent <= 100.0);
    }

    #[test]
    fn test_counts_never_negative_over_sweep() {
        let sheet = Size::new(100.0, 70.0);
        for w in [0.5_f64, 3.3, 12.0, 33.0, 68.0, 101.0] {
            for h in [0.5_f64, 4.7, 15.0, 40.0, 71.0] {
                let layout = pack_default(sheet, Size::new(w, h), ShapeCategory::Rectangular);
                assert!(layout.efficiency_percent >= 0.0);
                assert!(layout.efficiency_percent <= 100.0);
                assert_eq!(
                    layout.items_per_sheet,
                    layout.items_per_row * layout.items_per_col
                );
            }
        }
    }
}
