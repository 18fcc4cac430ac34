use crate::activity::ActivityInput;
use crate::breakdown::Category;
use crate::error::FootprintError;
use crate::factors::{
    EmissionFactorTable, COOKING, DIET_BASELINE, ENERGY, FOOD, FUELS, TRANSPORT, WASTE,
};

pub const DAYS_PER_YEAR: f64 = 365.0;
pub const WEEKS_PER_YEAR: f64 = 52.0;
/// Average trip length assumed for each public transport trip.
pub const PUBLIC_TRANSPORT_TRIP_KM: f64 = 10.0;
/// Modes costed from fuel burnt rather than a per-km factor.
pub const FUEL_MODES: [&str; 2] = ["car", "bike"];

/// Optional yearly travel terms added on top of the main trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportExtras {
    pub flights_per_year: Option<u32>,
    pub public_transports: Option<u32>,
}

fn positive(count: Option<u32>) -> Option<f64> {
    count.filter(|&n| n > 0).map(f64::from)
}

/// kWh times the grid or renewable factor.
pub fn compute_electricity(
    kwh: f64,
    renewable: bool,
    table: &EmissionFactorTable,
) -> Result<f64, FootprintError> {
    let key = if renewable { "renewable" } else { "electricity" };
    Ok(kwh * table.factor(ENERGY, key)?)
}

pub fn compute_cooking(
    fuel_type: &str,
    amount: f64,
    table: &EmissionFactorTable,
) -> Result<f64, FootprintError> {
    let factor = table.lookup(COOKING, fuel_type).ok_or_else(|| {
        FootprintError::invalid(
            "cooking_fuel",
            format!("unknown cooking fuel type: {fuel_type}"),
        )
    })?;
    Ok(amount * factor)
}

/// Transport emissions for one trip plus the yearly extras.
///
/// A mode with its own per-km factor wins over the fuel path, so a table
/// that prices `car` directly never asks for fuel details.
pub fn compute_transport(
    distance_km: f64,
    mode: &str,
    fuel_type: Option<&str>,
    fuel_consumption: Option<f64>,
    table: &EmissionFactorTable,
    extras: TransportExtras,
) -> Result<f64, FootprintError> {
    let mut emissions = if let Some(per_km) = table.lookup(TRANSPORT, mode) {
        distance_km * per_km
    } else if FUEL_MODES.iter().any(|&m| m == mode) {
        let fuel = fuel_type.unwrap_or_default();
        let per_liter = table.lookup(FUELS, fuel).ok_or_else(|| {
            FootprintError::invalid(
                "fuel_type",
                format!("invalid or missing fuel type: {fuel:?}"),
            )
        })?;
        let consumption = fuel_consumption.filter(|&c| c > 0.0).ok_or_else(|| {
            FootprintError::invalid(
                "fuel_consumption",
                format!(
                    "a positive L/100km value is required for {mode}, got {fuel_consumption:?}"
                ),
            )
        })?;
        let liters = distance_km * (consumption / 100.0);
        liters * per_liter
    } else {
        return Err(FootprintError::invalid(
            "mode",
            format!("unknown transport mode: {mode}"),
        ));
    };

    if let Some(trips) = positive(extras.public_transports) {
        emissions += trips * table.factor(TRANSPORT, "bus")? * PUBLIC_TRANSPORT_TRIP_KM;
    }
    if let Some(flights) = positive(extras.flights_per_year) {
        emissions += flights * table.factor(TRANSPORT, "flight")?;
    }
    Ok(emissions)
}

/// Yearly diet baseline pro-rated to `days`, plus food waste and red meat.
///
/// Red meat is given in meals per week; it is annualized and pro-rated by the
/// same day fraction as the baseline.
pub fn compute_food(
    days: u32,
    diet_type: &str,
    waste_kg: f64,
    red_meat_freq: Option<u32>,
    table: &EmissionFactorTable,
) -> Result<f64, FootprintError> {
    let yearly = table.lookup(DIET_BASELINE, diet_type).ok_or_else(|| {
        FootprintError::invalid("food_type", format!("unknown diet type: {diet_type}"))
    })?;
    let period = f64::from(days) / DAYS_PER_YEAR;

    let mut emissions = yearly * period + waste_kg * table.factor(FOOD, "waste")?;
    if let Some(meals) = positive(red_meat_freq) {
        emissions += meals * WEEKS_PER_YEAR * table.factor(FOOD, "red_meat")? * period;
    }
    Ok(emissions)
}

/// Unknown disposal methods fall back to the segregated/landfill factor.
pub fn compute_waste(
    kg: f64,
    is_segregated: bool,
    method: Option<&str>,
    table: &EmissionFactorTable,
) -> Result<f64, FootprintError> {
    let factor = match method.and_then(|m| table.lookup(WASTE, m)) {
        Some(factor) => factor,
        None if is_segregated => table.factor(WASTE, "segregated")?,
        None => table.factor(WASTE, "landfill")?,
    };
    Ok(kg * factor)
}

/// One category's share of an activity record.
pub trait CategoryCalculator {
    fn category(&self) -> Category;

    fn compute(
        &self,
        input: &ActivityInput,
        table: &EmissionFactorTable,
    ) -> Result<f64, FootprintError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ElectricityCalculator;

impl CategoryCalculator for ElectricityCalculator {
    fn category(&self) -> Category {
        Category::Electricity
    }

    fn compute(
        &self,
        input: &ActivityInput,
        table: &EmissionFactorTable,
    ) -> Result<f64, FootprintError> {
        compute_electricity(input.electricity_kwh, input.renewable, table)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CookingCalculator;

impl CategoryCalculator for CookingCalculator {
    fn category(&self) -> Category {
        Category::Cooking
    }

    fn compute(
        &self,
        input: &ActivityInput,
        table: &EmissionFactorTable,
    ) -> Result<f64, FootprintError> {
        compute_cooking(&input.cooking_fuel, input.cooking_amount, table)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransportCalculator;

impl CategoryCalculator for TransportCalculator {
    fn category(&self) -> Category {
        Category::Transport
    }

    fn compute(
        &self,
        input: &ActivityInput,
        table: &EmissionFactorTable,
    ) -> Result<f64, FootprintError> {
        compute_transport(
            input.transport_km,
            &input.mode,
            input.fuel_type.as_deref(),
            input.fuel_consumption,
            table,
            TransportExtras {
                flights_per_year: input.flights_per_year,
                public_transports: input.public_transports,
            },
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FoodCalculator;

impl CategoryCalculator for FoodCalculator {
    fn category(&self) -> Category {
        Category::Food
    }

    fn compute(
        &self,
        input: &ActivityInput,
        table: &EmissionFactorTable,
    ) -> Result<f64, FootprintError> {
        compute_food(
            input.days,
            &input.food_type,
            input.food_waste_kg,
            input.red_meat_freq,
            table,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WasteCalculator;

impl CategoryCalculator for WasteCalculator {
    fn category(&self) -> Category {
        Category::Waste
    }

    fn compute(
        &self,
        input: &ActivityInput,
        table: &EmissionFactorTable,
    ) -> Result<f64, FootprintError> {
        compute_waste(
            input.waste_kg,
            input.is_segregated,
            input.waste_method.as_deref(),
            table,
        )
    }
}

/// The canonical calculator set, in `Category::ALL` order.
pub const CALCULATORS: [&(dyn CategoryCalculator + Sync); 5] = [
    &ElectricityCalculator,
    &CookingCalculator,
    &TransportCalculator,
    &FoodCalculator,
    &WasteCalculator,
];
