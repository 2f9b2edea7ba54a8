use thiserror::Error;

/// Failures the quoting pipeline reports to the caller.
///
/// Degenerate geometry is not an error: a layout that fits nothing comes
/// back as a zero-yield [`crate::types::LayoutResult`]. These variants
/// cover the cases where no usable price exists at all, which the caller
/// must surface instead of falling back to a zero-cost row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("no candidate parent sheet produced a valid price")]
    NoValidCandidate,
    #[error("no pricing option produced a positive total")]
    NoValidPricingOption,
}
