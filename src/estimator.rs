use serde::{Deserialize, Serialize};

use crate::candidates::{CandidateParentSheet, select};
use crate::cost::{CostRates, DigitalOption, digital_cost, offset_cost};
use crate::cutting::{CuttingRules, cut};
use crate::error::QuoteError;
use crate::packer::{PackRules, pack};
use crate::shape::{ShapeCategory, ShapeRules, classify};
use crate::types::{
    CostBreakdown, CuttingResult, LayoutResult, PrintingMethod, ProductionParams, SheetConstraints,
    Size,
};

/// Full offset quote: the imposed layout, the parent sheet the selector
/// chose, how that parent is cut down, and the money.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetQuote {
    pub layout: LayoutResult,
    pub parent: CandidateParentSheet,
    /// Cut plan for rendering. Costing uses the row's curated yield, not
    /// this plan.
    pub cutting: CuttingResult,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum Quote {
    Offset(OffsetQuote),
    Digital(DigitalOption),
}

impl Quote {
    pub fn breakdown(&self) -> &CostBreakdown {
        match self {
            Quote::Offset(q) => &q.breakdown,
            Quote::Digital(q) => &q.breakdown,
        }
    }

    pub fn layout(&self) -> &LayoutResult {
        match self {
            Quote::Offset(q) => &q.layout,
            Quote::Digital(q) => &q.layout,
        }
    }
}

/// Stateless quoting pipeline: classify, impose, select, price. Every
/// call is a pure function of its inputs; the estimator only carries
/// policy tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator {
    pub constraints: SheetConstraints,
    pub shape_rules: ShapeRules,
    pub pack_rules: PackRules,
    pub cutting_rules: CuttingRules,
    pub rates: CostRates,
}

impl Estimator {
    pub fn classify(&self, item: Size) -> ShapeCategory {
        classify(item, &self.shape_rules)
    }

    /// Imposes `item` on `sheet` under the estimator's policy tables.
    pub fn impose(&self, sheet: Size, item: Size) -> LayoutResult {
        let category = self.classify(item);
        let layout = pack(sheet, &self.constraints, item, category, &self.pack_rules);
        tracing::debug!(
            %item,
            %sheet,
            category = ?category,
            ups = layout.items_per_sheet,
            orientation = ?layout.orientation,
            tier = ?layout.tier,
            efficiency = layout.efficiency_percent,
            "imposition computed"
        );
        layout
    }

    pub fn cut_plan(&self, parent: Size, press: Size) -> CuttingResult {
        cut(parent, press, &self.cutting_rules)
    }

    /// Offset quote against a candidate parent-sheet table.
    ///
    /// Candidate ranking is priced with `reference_paper_cost` so a manual
    /// per-sheet price never retroactively changes which parent size was
    /// chosen; `manual_paper_cost` is applied only to the final breakdown.
    pub fn quote_offset(
        &self,
        item: Size,
        press_sheet: Size,
        params: &ProductionParams,
        table: &[CandidateParentSheet],
        pinned: Option<(f64, f64)>,
        reference_paper_cost: f64,
        manual_paper_cost: Option<f64>,
    ) -> Result<OffsetQuote, QuoteError> {
        let layout = self.impose(press_sheet, item);
        if layout.items_per_sheet == 0 {
            return Err(QuoteError::NoValidPricingOption);
        }
        let ups = layout.items_per_sheet;

        let chosen = select(table, pinned, |row| {
            offset_cost(
                params,
                ups,
                row.cut_pieces_per_parent,
                reference_paper_cost,
                &self.rates,
            )
            .map(|b| b.total_cost)
            .unwrap_or(0.0)
        })?;

        let paper_cost = manual_paper_cost.unwrap_or(reference_paper_cost);
        let breakdown = offset_cost(
            params,
            ups,
            chosen.cut_pieces_per_parent,
            paper_cost,
            &self.rates,
        )?;
        tracing::info!(
            parent = %chosen.size(),
            sheets = breakdown.sheets_needed,
            total = breakdown.total_cost,
            "offset quote computed"
        );

        Ok(OffsetQuote {
            layout,
            parent: *chosen,
            cutting: self.cut_plan(chosen.size(), press_sheet),
            breakdown,
        })
    }

    /// Digital quote; candidate tables do not apply, subdivision options
    /// are generated internally.
    pub fn quote_digital(
        &self,
        item: Size,
        stock_sheet: Size,
        params: &ProductionParams,
        paper_cost_per_sheet: f64,
    ) -> Result<DigitalOption, QuoteError> {
        let option = digital_cost(
            item,
            stock_sheet,
            &self.constraints,
            self.classify(item),
            &self.pack_rules,
            params,
            paper_cost_per_sheet,
            &self.rates,
        )?;
        tracing::info!(
            parts = option.parts,
            sheets = option.breakdown.sheets_needed,
            total = option.breakdown.total_cost,
            "digital quote computed"
        );
        Ok(option)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn quote(
        &self,
        method: PrintingMethod,
        item: Size,
        sheet: Size,
        params: &ProductionParams,
        table: &[CandidateParentSheet],
        pinned: Option<(f64, f64)>,
        reference_paper_cost: f64,
        manual_paper_cost: Option<f64>,
    ) -> Result<Quote, QuoteError> {
        match method {
            PrintingMethod::Offset => self
                .quote_offset(
                    item,
                    sheet,
                    params,
                    table,
                    pinned,
                    reference_paper_cost,
                    manual_paper_cost,
                )
                .map(Quote::Offset),
            PrintingMethod::Digital => {
                let paper = manual_paper_cost.unwrap_or(reference_paper_cost);
                self.quote_digital(item, sheet, params, paper)
                    .map(Quote::Digital)
            }
        }
    }
}
