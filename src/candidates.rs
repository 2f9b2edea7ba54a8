use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::types::{Size, deserialize_u32_from_number};

/// Tolerance for matching a user-pinned parent size against table rows.
const PIN_MATCH_EPS: f64 = 1e-6;

/// One row of the curated parent-sheet table: a purchasable stock size
/// and its precomputed press-sheet yield. The yield is a domain constant
/// maintained alongside the table, not derived at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateParentSheet {
    pub width: f64,
    pub height: f64,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub cut_pieces_per_parent: u32,
}

impl CandidateParentSheet {
    pub fn new(width: f64, height: f64, cut_pieces_per_parent: u32) -> Self {
        Self {
            width,
            height,
            cut_pieces_per_parent,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn matches(&self, width: f64, height: f64) -> bool {
        (self.width - width).abs() < PIN_MATCH_EPS && (self.height - height).abs() < PIN_MATCH_EPS
    }
}

/// Stock sizes the shop actually buys, with their press-sheet yields.
/// Binaries use this as the default table; library callers supply their
/// own curated list.
pub fn standard_candidates() -> Vec<CandidateParentSheet> {
    vec![
        CandidateParentSheet::new(100.0, 70.0, 4),
        CandidateParentSheet::new(90.0, 64.0, 4),
        CandidateParentSheet::new(70.0, 50.0, 2),
        CandidateParentSheet::new(64.0, 45.0, 2),
        CandidateParentSheet::new(50.0, 35.0, 1),
    ]
}

/// Picks the cheapest valid parent sheet, honoring an exact pinned size.
///
/// A pinned size that matches a row short-circuits ranking entirely. A
/// pinned size absent from the table is recoverable: it logs a warning
/// and falls through to normal ranking. Rows pricing to a non-positive
/// total are invalid; if none survive the caller gets
/// [`QuoteError::NoValidCandidate`], never a zero-cost row.
pub fn select<'a, F>(
    table: &'a [CandidateParentSheet],
    pinned: Option<(f64, f64)>,
    mut price: F,
) -> Result<&'a CandidateParentSheet, QuoteError>
where
    F: FnMut(&CandidateParentSheet) -> f64,
{
    if let Some((w, h)) = pinned {
        if let Some(row) = table.iter().find(|row| row.matches(w, h)) {
            tracing::debug!(width = w, height = h, "pinned parent sheet matched");
            return Ok(row);
        }
        tracing::warn!(
            width = w,
            height = h,
            "pinned parent sheet not in candidate table, falling back to ranking"
        );
    }

    let mut best: Option<(&CandidateParentSheet, f64)> = None;
    for row in table {
        let total = price(row);
        if total <= 0.0 {
            tracing::debug!(
                width = row.width,
                height = row.height,
                total,
                "candidate rejected: non-positive total"
            );
            continue;
        }
        if best.is_none_or(|(_, cheapest)| total < cheapest) {
            best = Some((row, total));
        }
    }

    match best {
        Some((row, total)) => {
            tracing::debug!(
                width = row.width,
                height = row.height,
                total,
                "candidate selected"
            );
            Ok(row)
        }
        None => Err(QuoteError::NoValidCandidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<CandidateParentSheet> {
        vec![
            CandidateParentSheet::new(100.0, 70.0, 4),
            CandidateParentSheet::new(90.0, 64.0, 4),
            CandidateParentSheet::new(70.0, 50.0, 2),
        ]
    }

    #[test]
    fn test_cheapest_row_wins() {
        let table = table();
        // Price by area: the smallest sheet is cheapest.
        let chosen = select(&table, None, |row| row.size().area()).unwrap();
        assert_eq!(chosen.width, 70.0);
        assert_eq!(chosen.height, 50.0);
    }

    #[test]
    fn test_pinned_row_beats_cheaper_alternatives() {
        let table = table();
        let chosen = select(&table, Some((100.0, 70.0)), |row| row.size().area()).unwrap();
        assert_eq!(chosen.width, 100.0);
        assert_eq!(chosen.height, 70.0);
    }

    #[test]
    fn test_unmatched_pin_falls_through_to_ranking() {
        let table = table();
        let chosen = select(&table, Some((120.0, 80.0)), |row| row.size().area()).unwrap();
        assert_eq!(chosen.width, 70.0);
    }

    #[test]
    fn test_zero_cost_rows_are_never_selected() {
        let table = table();
        let err = select(&table, None, |_| 0.0).unwrap_err();
        assert_eq!(err, QuoteError::NoValidCandidate);
        let err = select(&table, None, |_| -5.0).unwrap_err();
        assert_eq!(err, QuoteError::NoValidCandidate);
    }

    #[test]
    fn test_zero_cost_rows_are_skipped_not_fatal() {
        let table = table();
        let chosen = select(&table, None, |row| {
            if row.width == 70.0 { 0.0 } else { row.size().area() }
        })
        .unwrap();
        assert_eq!(chosen.width, 90.0);
    }

    #[test]
    fn test_empty_table() {
        let err = select(&[], None, |row| row.size().area()).unwrap_err();
        assert_eq!(err, QuoteError::NoValidCandidate);
    }

    #[test]
    fn test_tie_keeps_first_row() {
        let table = table();
        let chosen = select(&table, None, |_| 10.0).unwrap();
        assert_eq!(chosen.width, 100.0);
    }

    #[test]
    fn test_pinned_zero_cost_row_is_still_returned() {
        // Pinning bypasses pricing entirely; the caller asked for it.
        let table = table();
        let chosen = select(&table, Some((90.0, 64.0)), |_| 0.0).unwrap();
        assert_eq!(chosen.width, 90.0);
    }

    #[test]
    fn test_standard_table_is_nonempty_and_positive() {
        for row in standard_candidates() {
            assert!(row.size().is_valid());
            assert!(row.cut_pieces_per_parent >= 1);
        }
    }
}
