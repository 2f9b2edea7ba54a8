use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::packer::{PackRules, pack};
use crate::shape::ShapeCategory;
use crate::types::{CostBreakdown, LayoutResult, ProductionParams, SheetConstraints, Size};

/// Shop price constants. Named fields instead of literals so a product
/// line with different press contracts can override them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRates {
    /// Offset plate price, per plate (one plate per color per side).
    pub plate_price: f64,
    /// Fixed offset make-ready charge per job.
    pub offset_makeready: f64,
    /// Digital click band price per 1000 impressions, single-class color.
    pub click_per_1000_simple: f64,
    /// Digital click band price per 1000 impressions, full color.
    pub click_per_1000_color: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            plate_price: 40.0,
            offset_makeready: 150.0,
            click_per_1000_simple: 90.0,
            click_per_1000_color: 350.0,
        }
    }
}

/// Digital click pricing only distinguishes "simple" from "full color":
/// anything up to 3 colors bills as 1, anything past that as 4. Offset
/// never collapses; plate count needs the true color count.
pub fn collapse_digital_colors(count: u32) -> u32 {
    if count <= 3 { 1 } else { 4 }
}

/// Offset price for a chosen candidate row.
///
/// Press sheets come from the imposition yield, parent sheets from the
/// row's precomputed cut yield, plates from the true color count times
/// sides. A non-positive total is reported as a failure, never returned
/// as a usable breakdown.
pub fn offset_cost(
    params: &ProductionParams,
    items_per_press_sheet: u32,
    cut_pieces_per_parent: u32,
    paper_cost_per_sheet: f64,
    rates: &CostRates,
) -> Result<CostBreakdown, QuoteError> {
    if items_per_press_sheet == 0 || cut_pieces_per_parent == 0 {
        return Err(QuoteError::NoValidPricingOption);
    }

    let press_sheets = params.quantity.div_ceil(items_per_press_sheet);
    let parent_sheets = press_sheets.div_ceil(cut_pieces_per_parent);

    let plates = params.color_count * params.sides.count();
    let plate_cost = plates as f64 * rates.plate_price;
    let paper_cost = parent_sheets as f64 * paper_cost_per_sheet;
    let total = paper_cost + plate_cost + rates.offset_makeready;

    if total <= 0.0 {
        return Err(QuoteError::NoValidPricingOption);
    }

    Ok(CostBreakdown {
        sheets_needed: parent_sheets,
        unit_price: unit_price(total, params.quantity),
        plate_or_click_cost: plate_cost,
        paper_cost,
        total_cost: total,
    })
}

/// One internally generated digital pricing option: the stock sheet split
/// into `parts` equal press sheets, with the item re-imposed on the part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalOption {
    pub parts: u32,
    pub press_sheet: Size,
    pub layout: LayoutResult,
    pub breakdown: CostBreakdown,
}

/// Halves the longer side until the sheet is split into `parts` pieces.
fn subdivide(sheet: Size, parts: u32) -> Size {
    let mut sub = sheet;
    let mut remaining = parts;
    while remaining > 1 {
        if sub.width >= sub.height {
            sub.width /= 2.0;
        } else {
            sub.height /= 2.0;
        }
        remaining /= 2;
    }
    sub
}

/// Digital price: enumerates whole/half/quarter sheet subdivisions,
/// prices each, and keeps the cheapest positive option. Clicks are billed
/// per started band of 1000 impressions (quantity x sides) at the
/// collapsed-color rate; ties between options go to the fewest parts.
pub fn digital_cost(
    item: Size,
    stock_sheet: Size,
    constraints: &SheetConstraints,
    category: ShapeCategory,
    pack_rules: &PackRules,
    params: &ProductionParams,
    paper_cost_per_sheet: f64,
    rates: &CostRates,
) -> Result<DigitalOption, QuoteError> {
    let click_rate = if collapse_digital_colors(params.color_count) == 1 {
        rates.click_per_1000_simple
    } else {
        rates.click_per_1000_color
    };
    let impressions = params.quantity * params.sides.count();
    let click_cost = impressions.div_ceil(1000) as f64 * click_rate;

    let mut best: Option<DigitalOption> = None;
    for parts in [1u32, 2, 4] {
        let press_sheet = subdivide(stock_sheet, parts);
        let layout = pack(press_sheet, constraints, item, category, pack_rules);
        if layout.items_per_sheet == 0 {
            tracing::debug!(parts, %press_sheet, "digital option rejected: no fit");
            continue;
        }

        let items_per_stock_sheet = layout.items_per_sheet * parts;
        let sheets = params.quantity.div_ceil(items_per_stock_sheet);
        let paper_cost = sheets as f64 * paper_cost_per_sheet;
        let total = paper_cost + click_cost;
        if total <= 0.0 {
            tracing::debug!(parts, total, "digital option rejected: non-positive total");
            continue;
        }

        let option = DigitalOption {
            parts,
            press_sheet,
            layout,
            breakdown: CostBreakdown {
                sheets_needed: sheets,
                unit_price: unit_price(total, params.quantity),
                plate_or_click_cost: click_cost,
                paper_cost,
                total_cost: total,
            },
        };
        if best
            .as_ref()
            .is_none_or(|b| option.breakdown.total_cost < b.breakdown.total_cost)
        {
            best = Some(option);
        }
    }

    best.ok_or(QuoteError::NoValidPricingOption)
}

fn unit_price(total: f64, quantity: u32) -> f64 {
    if quantity > 0 {
        total / quantity as f64
    } else {
        0.0
    }
}
