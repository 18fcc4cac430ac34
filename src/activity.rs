use serde::{Deserialize, Serialize};

use crate::error::FootprintError;

pub const DEFAULT_DAYS: u32 = 30;

/// One user's activity data for a reporting period.
///
/// Fields missing from a serialized record take the defaults the web form
/// has always assumed: zero quantities, LPG cooking, bus travel, a
/// non-vegetarian diet and a 30 day period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityInput {
    pub electricity_kwh: f64,
    pub renewable: bool,

    pub cooking_fuel: String,
    pub cooking_amount: f64,

    pub transport_km: f64,
    pub mode: String,
    pub fuel_type: Option<String>,
    /// Liters per 100 km.
    pub fuel_consumption: Option<f64>,
    pub flights_per_year: Option<u32>,
    pub public_transports: Option<u32>,

    pub days: u32,
    #[serde(alias = "diet_type")]
    pub food_type: String,
    pub food_waste_kg: f64,
    /// Red meat meals per week.
    #[serde(alias = "red_meat_freq_per_week")]
    pub red_meat_freq: Option<u32>,

    pub waste_kg: f64,
    pub is_segregated: bool,
    #[serde(alias = "waste_disposal")]
    pub waste_method: Option<String>,
}

impl Default for ActivityInput {
    fn default() -> Self {
        Self {
            electricity_kwh: 0.0,
            renewable: false,
            cooking_fuel: "lpg".to_string(),
            cooking_amount: 0.0,
            transport_km: 0.0,
            mode: "bus".to_string(),
            fuel_type: None,
            fuel_consumption: None,
            flights_per_year: None,
            public_transports: None,
            days: DEFAULT_DAYS,
            food_type: "non_vegetarian".to_string(),
            food_waste_kg: 0.0,
            red_meat_freq: None,
            waste_kg: 0.0,
            is_segregated: false,
            waste_method: None,
        }
    }
}

impl ActivityInput {
    /// Shape checks that do not need the factor table.
    pub fn validate(&self) -> Result<(), FootprintError> {
        for (field, value) in [
            ("electricity_kwh", self.electricity_kwh),
            ("cooking_amount", self.cooking_amount),
            ("transport_km", self.transport_km),
            ("food_waste_kg", self.food_waste_kg),
            ("waste_kg", self.waste_kg),
        ] {
            non_negative(field, value)?;
        }
        if let Some(consumption) = self.fuel_consumption {
            if !consumption.is_finite() {
                return Err(FootprintError::invalid(
                    "fuel_consumption",
                    format!("must be a finite number, got {consumption}"),
                ));
            }
        }
        if self.days == 0 {
            return Err(FootprintError::invalid("days", "must be greater than zero"));
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), FootprintError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FootprintError::invalid(
            field,
            format!("must be a non-negative number, got {value}"),
        ))
    }
}
