use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};

use crate::breakdown::round2;
use crate::error::DataError;

/// Reference dataset compiled into the crate.
pub const EMBEDDED_FACTORS: &str = include_str!("../data/emission_factors.json");

pub const ENERGY: &str = "energy";
pub const COOKING: &str = "cooking";
pub const TRANSPORT: &str = "transport";
pub const FUELS: &str = "fuels";
pub const FOOD: &str = "food";
pub const DIET_BASELINE: &str = "food.diet_baseline";
pub const WASTE: &str = "waste";

/// Subcategory key -> kg CO2e per unit.
pub type FactorMap = BTreeMap<String, f64>;

/// Where the factor table is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactorSource {
    /// The dataset compiled in from `data/emission_factors.json`.
    Embedded,
    /// A JSON document on disk.
    File(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct FoodFactors {
    #[serde(default)]
    diet_baseline: FactorMap,
    #[serde(flatten)]
    flat: FactorMap,
}

/// Immutable emission factor table, loaded once and shared by reference.
///
/// Categories absent from the source deserialize as empty, so a missing
/// category is reported as a missing factor at the point of use.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionFactorTable {
    #[serde(default)]
    energy: FactorMap,
    #[serde(default)]
    cooking: FactorMap,
    #[serde(default)]
    transport: FactorMap,
    #[serde(default)]
    fuels: FactorMap,
    #[serde(default)]
    food: FoodFactors,
    #[serde(default)]
    waste: FactorMap,
}

impl EmissionFactorTable {
    /// Read, parse and validate the table from `source`.
    pub fn load(source: &FactorSource) -> Result<Self, DataError> {
        let table = match source {
            FactorSource::Embedded => Self::from_json_str(EMBEDDED_FACTORS)?,
            FactorSource::File(path) => {
                let raw = read_to_string(path).map_err(|source| DataError::Unreadable {
                    path: path.clone(),
                    source,
                })?;
                Self::from_json_str(&raw)?
            }
        };

        info!(
            ?source,
            factors = table.sections().map(|(_, map)| map.len()).sum::<usize>(),
            "Loaded emission factor table"
        );
        Ok(table)
    }

    /// Shorthand for loading [`FactorSource::Embedded`].
    pub fn embedded() -> Result<Self, DataError> {
        Self::load(&FactorSource::Embedded)
    }

    /// Parse and validate a JSON factor document.
    pub fn from_json_str(raw: &str) -> Result<Self, DataError> {
        let table: Self = serde_json::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), DataError> {
        for (category, map) in self.sections() {
            for (key, &value) in map {
                if !value.is_finite() || value < 0.0 {
                    return Err(DataError::InvalidFactor {
                        path: format!("{category}.{key}"),
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    fn sections(&self) -> impl Iterator<Item = (&'static str, &FactorMap)> {
        [
            (ENERGY, &self.energy),
            (COOKING, &self.cooking),
            (TRANSPORT, &self.transport),
            (FUELS, &self.fuels),
            (FOOD, &self.food.flat),
            (DIET_BASELINE, &self.food.diet_baseline),
            (WASTE, &self.waste),
        ]
        .into_iter()
    }

    fn section(&self, category: &str) -> Option<&FactorMap> {
        self.sections()
            .find(|(name, _)| *name == category)
            .map(|(_, map)| map)
    }

    /// Factor for a caller-chosen key; `None` when the key is unknown.
    pub fn lookup(&self, category: &str, key: &str) -> Option<f64> {
        self.section(category)?.get(key).copied()
    }

    /// Factor the formulas rely on being present.
    pub fn factor(&self, category: &str, key: &str) -> Result<f64, DataError> {
        self.lookup(category, key)
            .ok_or_else(|| DataError::missing(category, key))
    }

    /// Known subcategory keys of `category`, sorted; empty when absent.
    pub fn keys<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.section(category)
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Single-factor estimate `amount * factor`, rounded to cents.
    pub fn estimate(&self, category: &str, key: &str, amount: f64) -> Result<f64, DataError> {
        let factor = self.factor(category, key)?;
        debug!(category, key, amount, factor, "Single factor estimate");
        Ok(round2(amount * factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_has_every_fixed_key() {
        let table = EmissionFactorTable::embedded().unwrap();
        for (category, key) in [
            (ENERGY, "electricity"),
            (ENERGY, "renewable"),
            (TRANSPORT, "bus"),
            (TRANSPORT, "flight"),
            (FOOD, "waste"),
            (FOOD, "red_meat"),
            (WASTE, "landfill"),
            (WASTE, "segregated"),
        ] {
            assert!(table.factor(category, key).is_ok(), "{category}.{key}");
        }
        assert!(table.keys(DIET_BASELINE).any(|k| k == "vegetarian"));
        assert!(table.lookup(COOKING, "coal").is_none());
    }

    #[test]
    fn missing_category_surfaces_on_lookup() {
        let table = EmissionFactorTable::from_json_str(r#"{"energy": {"electricity": 0.5}}"#)
            .unwrap();
        match table.factor(ENERGY, "renewable") {
            Err(DataError::MissingFactor { path }) => assert_eq!(path, "energy.renewable"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(table.lookup(WASTE, "landfill").is_none());
    }

    #[test]
    fn rejects_non_numeric_and_negative_factors() {
        let err = EmissionFactorTable::from_json_str(r#"{"energy": {"electricity": "high"}}"#)
            .unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));

        let err = EmissionFactorTable::from_json_str(r#"{"fuels": {"petrol": -2.3}}"#)
            .unwrap_err();
        match err {
            DataError::InvalidFactor { path, value } => {
                assert_eq!(path, "fuels.petrol");
                assert_eq!(value, -2.3);
            }
            other => panic!("unexpected: {other:?}"),
        }

        let err = EmissionFactorTable::from_json_str(r#"{"food": {"waste": [1, 2]}}"#)
            .unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }

    #[test]
    fn rejects_unknown_categories() {
        let err = EmissionFactorTable::from_json_str(r#"{"shipping": {"ferry": 0.1}}"#)
            .unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }

    #[test]
    fn estimate_rounds_single_factor() {
        let table = EmissionFactorTable::embedded().unwrap();
        assert_eq!(table.estimate(ENERGY, "electricity", 50.0).unwrap(), 41.0);
        assert!(table.estimate(TRANSPORT, "car_petrol", 100.0).is_err());
    }
}
