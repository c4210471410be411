//! Strategy seam between the Markov core and whatever consumes its output.

use crate::emission::Emission;
use crate::error::Result;

/// Turns a raw emission sequence into a structured result.
///
/// Implementations report layout problems as
/// [`PlanError::FormatterFailure`](crate::error::PlanError::FormatterFailure).
pub trait EmissionFormatter {
    type Output;

    fn format_emissions(&self, emissions: Vec<Emission>) -> Result<Self::Output>;
}

/// Returns the sequence untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFormatter;

impl EmissionFormatter for RawFormatter {
    type Output = Vec<Emission>;

    fn format_emissions(&self, emissions: Vec<Emission>) -> Result<Self::Output> {
        Ok(emissions)
    }
}
