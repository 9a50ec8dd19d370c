//! Catalog record types: materials, price quotes, consumption rates, and
//! per-room application details.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog-assigned material identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A material definition.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": 3,
///   "name": "Tile",
///   "category": "Floor Covering",
///   "unit": "m2",
///   "waste_fraction": 0.10,
///   "description": "Standard ceramic tile"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    pub id: MaterialId,
    /// Unique material name
    pub name: String,
    pub category: String,
    /// Unit of measure the material is priced in (m2, liter, piece, ...)
    pub unit: String,
    /// Installation loss, applied as `1 + waste_fraction`
    #[serde(default)]
    pub waste_fraction: f64,
    #[serde(default)]
    pub description: String,
}

impl MaterialDef {
    /// Multiplier applied to net quantities
    pub fn waste_factor(&self) -> f64 {
        1.0 + self.waste_fraction
    }
}

/// A dated unit price for one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub material_id: MaterialId,
    pub unit_price: f64,
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub supplier: Option<String>,
}

/// Coverage rate for materials consumed per unit area (paint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRate {
    pub material_id: MaterialId,
    /// Application surface tag, e.g. "Wall"
    pub surface: String,
    pub rate: f64,
    /// Rate unit, e.g. "liter/m2"
    pub rate_unit: String,
}

impl ConsumptionRate {
    /// The quantity part of the rate unit ("liter/m2" → "liter").
    pub fn quantity_unit(&self) -> &str {
        self.rate_unit
            .split('/')
            .next()
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .unwrap_or(self.rate_unit.as_str())
    }
}

/// Surface a covering is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    #[serde(alias = "Zemin")]
    Floor,
    #[serde(alias = "Duvar")]
    Wall,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Floor => "Floor",
            Surface::Wall => "Wall",
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Room-type specific application parameters.
///
/// `properties` is kept as raw JSON text because the store does not
/// guarantee it parses; see [`PropertyBag::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDetail {
    /// Room-type label, matched exactly against room names
    pub room_type: String,
    pub surface: Surface,
    #[serde(default)]
    pub properties: Option<String>,
}

/// Parsed application-detail properties (a JSON object).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag(Map<String, Value>);

impl PropertyBag {
    /// Parse raw property text.
    ///
    /// Blank text is an empty bag. Anything that is not a JSON object is an
    /// error.
    pub fn parse(raw: &str) -> Result<PropertyBag, String> {
        if raw.trim().is_empty() {
            return Ok(PropertyBag::default());
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(PropertyBag(map)),
            Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
            Err(e) => Err(e.to_string()),
        }
    }

    /// First numeric value found under any of `keys`, tried in order.
    pub fn number(&self, keys: &[String]) -> Option<f64> {
        keys.iter().find_map(|key| self.0.get(key).and_then(Value::as_f64))
    }

    /// Like [`number`](Self::number) but only strictly positive values.
    pub fn positive_number(&self, keys: &[String]) -> Option<f64> {
        self.number(keys).filter(|v| *v > 0.0)
    }

    /// First of `keys` that is present but does not hold a number.
    pub fn non_numeric_key<'a>(&self, keys: &'a [String]) -> Option<&'a str> {
        keys.iter()
            .find(|key| self.0.get(key.as_str()).is_some_and(|value| !value.is_number()))
            .map(String::as_str)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
