use serde::{Deserialize, Serialize};

/// The five dimensions summed into a footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electricity,
    Cooking,
    Transport,
    Food,
    Waste,
}

impl Category {
    /// Calculation and presentation order.
    pub const ALL: [Category; 5] = [
        Category::Electricity,
        Category::Cooking,
        Category::Transport,
        Category::Food,
        Category::Waste,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Cooking => "cooking",
            Self::Transport => "transport",
            Self::Food => "food",
            Self::Waste => "waste",
        }
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-category kg CO2e plus total, all rounded to cents.
///
/// `total` is rounded from the sum of the unrounded category values, so it
/// may differ by a cent from the sum of the displayed categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionBreakdown {
    pub electricity: f64,
    pub cooking: f64,
    pub transport: f64,
    pub food: f64,
    pub waste: f64,
    pub total: f64,
}

impl EmissionBreakdown {
    /// Build from unrounded values given in `Category::ALL` order.
    pub fn from_raw(raw: [f64; 5]) -> Self {
        let total: f64 = raw.iter().sum();
        let [electricity, cooking, transport, food, waste] = raw.map(round2);
        Self {
            electricity,
            cooking,
            transport,
            food,
            waste,
            total: round2(total),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Electricity => self.electricity,
            Category::Cooking => self.cooking,
            Category::Transport => self.transport,
            Category::Food => self.food,
            Category::Waste => self.waste,
        }
    }
}
