//! Estimator configuration.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes:
//!
//! ```json
//! { "overhead_rate": 0.2, "materials": { "window": "Aluminium Window" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Tunable inputs for one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    /// Catalog identifiers (name or category) for the fixed needs
    pub materials: NeedMaterials,

    /// Floor material priced per piece when a tile size is known
    pub tile_material: String,

    /// Wall material priced through its coverage rate
    pub paint_material: String,

    /// Property keys holding the tile unit area (m²), tried in order
    pub tile_area_keys: Vec<String>,

    /// Property keys holding the number of paint coats, tried in order
    pub coats_keys: Vec<String>,

    /// Consumption-rate surface tags that count as wall application
    pub paint_surface_tags: Vec<String>,

    /// Installation and fastener overhead as a fraction of material cost
    pub overhead_rate: f64,

    /// Unit label on the overhead line
    pub currency: String,

    /// Unit label for counted items (tiles, windows, doors)
    pub piece_unit: String,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        EstimatorSettings {
            materials: NeedMaterials::default(),
            tile_material: "Tile".to_string(),
            paint_material: "Paint".to_string(),
            tile_area_keys: vec!["tile_unit_area_m2".to_string(), "fayans_boyut_m2".to_string()],
            coats_keys: vec!["coats".to_string(), "kat_sayisi".to_string()],
            paint_surface_tags: vec!["Wall".to_string(), "Duvar".to_string()],
            overhead_rate: 0.15,
            currency: "TL".to_string(),
            piece_unit: "piece".to_string(),
        }
    }
}

impl EstimatorSettings {
    /// Set the overhead rate and return self (builder pattern)
    pub fn with_overhead_rate(mut self, rate: f64) -> Self {
        self.overhead_rate = rate;
        self
    }

    /// Set the currency label and return self (builder pattern)
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !self.overhead_rate.is_finite() || self.overhead_rate < 0.0 {
            return Err(CalcError::invalid_input(
                "overhead_rate",
                self.overhead_rate.to_string(),
                "Overhead rate must be a non-negative number",
            ));
        }
        if self.tile_area_keys.is_empty() {
            return Err(CalcError::missing_field("tile_area_keys"));
        }
        if self.coats_keys.is_empty() {
            return Err(CalcError::missing_field("coats_keys"));
        }
        if self.paint_surface_tags.is_empty() {
            return Err(CalcError::missing_field("paint_surface_tags"));
        }
        Ok(())
    }
}

/// Catalog identifiers for needs that are not chosen per room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedMaterials {
    pub wall_panel: String,
    pub roof_panel: String,
    pub window: String,
    pub exterior_door: String,
    pub interior_door: String,
}

impl Default for NeedMaterials {
    fn default() -> Self {
        NeedMaterials {
            wall_panel: "Wall Panel".to_string(),
            roof_panel: "Roof Panel".to_string(),
            window: "PVC Window".to_string(),
            exterior_door: "Exterior Door".to_string(),
            interior_door: "Interior Door".to_string(),
        }
    }
}
