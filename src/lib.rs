//! Personal carbon footprint estimation.
//!
//! A caller loads an [`EmissionFactorTable`] once and hands it by reference to
//! [`compute_total`] for every [`ActivityInput`]. The table is immutable, so
//! it can be shared across threads without locking, and a calculation does no
//! I/O.
//!
//! ```
//! use carbon_footprint::{compute_total, ActivityInput, EmissionFactorTable};
//!
//! let table = EmissionFactorTable::embedded()?;
//! let input = ActivityInput {
//!     electricity_kwh: 100.0,
//!     ..ActivityInput::default()
//! };
//! let breakdown = compute_total(&input, &table)?;
//! assert_eq!(breakdown.electricity, 82.0);
//! # Ok::<(), carbon_footprint::FootprintError>(())
//! ```
#![forbid(unsafe_code)]

use tracing::debug;

pub mod activity;
pub mod breakdown;
pub mod calculators;
pub mod config;
pub mod error;
pub mod factors;

pub use activity::ActivityInput;
pub use breakdown::{round2, Category, EmissionBreakdown};
pub use calculators::{
    compute_cooking, compute_electricity, compute_food, compute_transport, compute_waste,
    CategoryCalculator, TransportExtras, CALCULATORS,
};
pub use error::{DataError, FootprintError};
pub use factors::{EmissionFactorTable, FactorSource};

/// Validate `input` and run every category calculator, failing on the first
/// error. No partial breakdown is ever returned.
pub fn compute_total(
    input: &ActivityInput,
    table: &EmissionFactorTable,
) -> Result<EmissionBreakdown, FootprintError> {
    input.validate()?;

    let mut raw = [0.0; 5];
    for (slot, calculator) in raw.iter_mut().zip(CALCULATORS) {
        let value = calculator.compute(input, table)?;
        if !value.is_finite() {
            return Err(out_of_range(calculator.category().as_str()));
        }
        *slot = value;
    }
    if !raw.iter().sum::<f64>().is_finite() {
        return Err(out_of_range("total"));
    }

    let breakdown = EmissionBreakdown::from_raw(raw);
    debug!(total = breakdown.total, "Computed emission breakdown");
    Ok(breakdown)
}

fn out_of_range(field: &'static str) -> FootprintError {
    FootprintError::InvalidInput {
        field,
        message: "quantities are too large to produce a finite estimate".to_string(),
    }
}
