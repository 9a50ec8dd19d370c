//! In-memory catalog implementation.
//!
//! Holds materials, price quotes, consumption rates, and application details
//! in insertion order. It can be exported to and rebuilt from a versioned
//! [`CatalogSnapshot`], which is how the CLI loads catalogs from JSON.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{ApplicationDetail, ConsumptionRate, MaterialDef, MaterialId, PriceQuote, Surface};
use super::CatalogLookup;
use crate::errors::{CalcError, CalcResult};
use crate::file_io::validate_version;

/// Current schema version for catalog snapshots
pub const SNAPSHOT_VERSION: &str = "0.1.0";

/// Serializable catalog contents.
///
/// ## JSON Example
///
/// ```json
/// {
///   "version": "0.1.0",
///   "materials": [
///     { "id": 1, "name": "Wall Panel", "category": "Structural", "unit": "m2",
///       "waste_fraction": 0.05, "description": "Prefab wall panel" }
///   ],
///   "prices": [
///     { "material_id": 1, "unit_price": 120.0, "effective_date": "2025-01-01", "supplier": "A Panel" }
///   ],
///   "consumption_rates": [],
///   "application_details": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub version: String,
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
    /// Price quotes in insertion order (later entries win same-date ties)
    #[serde(default)]
    pub prices: Vec<PriceQuote>,
    #[serde(default)]
    pub consumption_rates: Vec<ConsumptionRate>,
    #[serde(default)]
    pub application_details: Vec<ApplicationDetail>,
}

/// One row of the price listing: a material and its current price, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListEntry {
    pub material: MaterialDef,
    pub current_price: Option<PriceQuote>,
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    materials: Vec<MaterialDef>,
    prices: Vec<PriceQuote>,
    rates: Vec<ConsumptionRate>,
    details: Vec<ApplicationDetail>,
    next_id: u32,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Add a material definition and return its assigned id.
    ///
    /// Names are unique; adding a second material with the same name fails.
    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        unit: impl Into<String>,
        waste_fraction: f64,
        description: impl Into<String>,
    ) -> CalcResult<MaterialId> {
        let name = name.into();
        if self.materials.iter().any(|m| m.name == name) {
            return Err(CalcError::invalid_input("name", name, "Material name already exists"));
        }
        check_waste(&name, waste_fraction)?;

        let id = MaterialId(self.next_id.max(1));
        self.next_id = next_material_id(id.0)?;
        self.materials.push(MaterialDef {
            id,
            name,
            category: category.into(),
            unit: unit.into(),
            waste_fraction,
            description: description.into(),
        });
        Ok(id)
    }

    /// Record a price quote for an existing material.
    pub fn add_price(
        &mut self,
        material_id: MaterialId,
        unit_price: f64,
        effective_date: NaiveDate,
        supplier: Option<&str>,
    ) -> CalcResult<()> {
        self.require_material(material_id)?;
        check_price(unit_price)?;
        self.prices.push(PriceQuote {
            material_id,
            unit_price,
            effective_date,
            supplier: supplier.map(str::to_string),
        });
        Ok(())
    }

    /// Record a consumption rate for an existing material.
    pub fn add_consumption_rate(
        &mut self,
        material_id: MaterialId,
        surface: impl Into<String>,
        rate: f64,
        rate_unit: impl Into<String>,
    ) -> CalcResult<()> {
        self.require_material(material_id)?;
        check_rate(rate)?;
        self.rates.push(ConsumptionRate {
            material_id,
            surface: surface.into(),
            rate,
            rate_unit: rate_unit.into(),
        });
        Ok(())
    }

    /// Record application details for a room type and surface.
    ///
    /// `properties` is stored as given (blank text is stored as none); it is
    /// only parsed when an estimate reads it.
    pub fn add_application_detail(
        &mut self,
        room_type: impl Into<String>,
        surface: Surface,
        properties: &str,
    ) {
        let properties = if properties.trim().is_empty() {
            None
        } else {
            Some(properties.to_string())
        };
        self.details.push(ApplicationDetail {
            room_type: room_type.into(),
            surface,
            properties,
        });
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Every material with its current price, sorted by material name.
    pub fn price_list(&self) -> Vec<PriceListEntry> {
        let mut entries: Vec<PriceListEntry> = self
            .materials
            .iter()
            .map(|m| PriceListEntry {
                material: m.clone(),
                current_price: self.current_price(m.id),
            })
            .collect();
        entries.sort_by(|a, b| a.material.name.cmp(&b.material.name));
        entries
    }

    /// Sorted, de-duplicated names of materials in any of `categories`.
    ///
    /// Used to offer floor and wall covering choices.
    pub fn coverage_options(&self, categories: &[String]) -> Vec<String> {
        let mut names: Vec<String> = self
            .materials
            .iter()
            .filter(|m| categories.iter().any(|c| *c == m.category))
            .map(|m| m.name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Export the catalog contents.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            materials: self.materials.clone(),
            prices: self.prices.clone(),
            consumption_rates: self.rates.clone(),
            application_details: self.details.clone(),
        }
    }

    /// Rebuild a catalog from a snapshot.
    ///
    /// # Returns
    ///
    /// * `Ok(InMemoryCatalog)` - Snapshot is compatible and consistent
    /// * `Err(CalcError::VersionMismatch)` - Snapshot version is incompatible
    /// * `Err(CalcError::InvalidInput)` - Duplicate ids/names or invalid numbers
    /// * `Err(CalcError::MaterialNotFound)` - A price or rate references an unknown material
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> CalcResult<Self> {
        validate_version(&snapshot.version, SNAPSHOT_VERSION)?;

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for material in &snapshot.materials {
            if !ids.insert(material.id) {
                return Err(CalcError::invalid_input(
                    "materials.id",
                    material.id.to_string(),
                    "Duplicate material id",
                ));
            }
            if !names.insert(material.name.as_str()) {
                return Err(CalcError::invalid_input(
                    "materials.name",
                    material.name.clone(),
                    "Duplicate material name",
                ));
            }
            check_waste(&material.name, material.waste_fraction)?;
        }

        for price in &snapshot.prices {
            if !ids.contains(&price.material_id) {
                return Err(CalcError::material_not_found(price.material_id.to_string()));
            }
            check_price(price.unit_price)?;
        }
        for rate in &snapshot.consumption_rates {
            if !ids.contains(&rate.material_id) {
                return Err(CalcError::material_not_found(rate.material_id.to_string()));
            }
            check_rate(rate.rate)?;
        }

        let next_id = next_material_id(snapshot.materials.iter().map(|m| m.id.0).max().unwrap_or(0))?;
        Ok(InMemoryCatalog {
            materials: snapshot.materials,
            prices: snapshot.prices,
            rates: snapshot.consumption_rates,
            details: snapshot.application_details,
            next_id,
        })
    }

    fn require_material(&self, id: MaterialId) -> CalcResult<()> {
        if self.materials.iter().any(|m| m.id == id) {
            Ok(())
        } else {
            Err(CalcError::material_not_found(id.to_string()))
        }
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn material_by_name(&self, name: &str) -> Option<MaterialDef> {
        self.materials.iter().find(|m| m.name == name).cloned()
    }

    fn material_by_category(&self, category: &str) -> Option<MaterialDef> {
        self.materials.iter().find(|m| m.category == category).cloned()
    }

    fn current_price(&self, material_id: MaterialId) -> Option<PriceQuote> {
        // max_by_key keeps the last maximum, so same-date ties go to the later insertion
        self.prices
            .iter()
            .filter(|p| p.material_id == material_id)
            .max_by_key(|p| p.effective_date)
            .cloned()
    }

    fn consumption_rates(&self, material_id: MaterialId) -> Vec<ConsumptionRate> {
        self.rates
            .iter()
            .filter(|r| r.material_id == material_id)
            .cloned()
            .collect()
    }

    fn application_detail(&self, room_label: &str, surface: Surface) -> Option<String> {
        self.details
            .iter()
            .find(|d| d.room_type == room_label && d.surface == surface)
            .and_then(|d| d.properties.clone())
    }
}

fn check_waste(name: &str, waste_fraction: f64) -> CalcResult<()> {
    if !waste_fraction.is_finite() || waste_fraction < 0.0 {
        return Err(CalcError::invalid_input(
            format!("{}.waste_fraction", name),
            waste_fraction.to_string(),
            "Waste fraction must be a non-negative number",
        ));
    }
    Ok(())
}

fn check_rate(rate: f64) -> CalcResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(CalcError::invalid_input("rate", rate.to_string(), "Rate must be a non-negative number"));
    }
    Ok(())
}

fn next_material_id(last: u32) -> CalcResult<u32> {
    last.checked_add(1)
        .ok_or_else(|| CalcError::invalid_input("materials.id", last.to_string(), "Material ids exhausted"))
}

fn check_price(unit_price: f64) -> CalcResult<()> {
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(CalcError::invalid_input(
            "unit_price",
            unit_price.to_string(),
            "Price must be a non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut catalog = InMemoryCatalog::new();
        let a = catalog.add_material("A", "X", "m2", 0.0, "").unwrap();
        let b = catalog.add_material("B", "X", "m2", 0.0, "").unwrap();
        assert_eq!(a, MaterialId(1));
        assert_eq!(b, MaterialId(2));
    }

    #[test]
    fn test_default_catalog_starts_at_one() {
        let mut catalog = InMemoryCatalog::default();
        assert_eq!(catalog.add_material("A", "X", "m2", 0.0, "").unwrap(), MaterialId(1));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        let err = catalog.add_material("Tile", "Wall Covering", "m2", 0.1, "").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(catalog.material_count(), 1);
    }

    #[test]
    fn test_negative_waste_rejected() {
        let mut catalog = InMemoryCatalog::new();
        assert!(catalog.add_material("Tile", "Floor Covering", "m2", -0.1, "").is_err());
    }

    #[test]
    fn test_price_for_unknown_material() {
        let mut catalog = InMemoryCatalog::new();
        let err = catalog.add_price(MaterialId(9), 10.0, date(2025, 1, 1), None).unwrap_err();
        assert_eq!(err, CalcError::material_not_found("#9"));
    }

    #[test]
    fn test_current_price_latest_date_wins() {
        let mut catalog = InMemoryCatalog::new();
        let id = catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        catalog.add_price(id, 55.0, date(2025, 3, 1), None).unwrap();
        catalog.add_price(id, 50.0, date(2025, 1, 1), None).unwrap();
        assert_eq!(catalog.current_price(id).unwrap().unit_price, 55.0);
    }

    #[test]
    fn test_current_price_same_date_latest_insert_wins() {
        let mut catalog = InMemoryCatalog::new();
        let id = catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        catalog.add_price(id, 50.0, date(2025, 1, 1), Some("C Yapı")).unwrap();
        catalog.add_price(id, 52.0, date(2025, 1, 1), Some("D Zemin")).unwrap();
        let price = catalog.current_price(id).unwrap();
        assert_eq!(price.unit_price, 52.0);
        assert_eq!(price.supplier.as_deref(), Some("D Zemin"));
    }

    #[test]
    fn test_no_price() {
        let mut catalog = InMemoryCatalog::new();
        let id = catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        assert!(catalog.current_price(id).is_none());
    }

    #[test]
    fn test_application_detail_exact_match() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add_application_detail("Bathroom", Surface::Floor, r#"{"tile_unit_area_m2": 0.09}"#);
        catalog.add_application_detail("Living Room", Surface::Floor, "");

        assert!(catalog.application_detail("Bathroom", Surface::Floor).is_some());
        assert!(catalog.application_detail("bathroom", Surface::Floor).is_none());
        assert!(catalog.application_detail("Bathroom", Surface::Wall).is_none());
        assert!(catalog.application_detail("Living Room", Surface::Floor).is_none());
    }

    #[test]
    fn test_price_list_sorted_with_missing_prices() {
        let mut catalog = InMemoryCatalog::new();
        let tile = catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        catalog.add_material("Paint", "Wall Covering", "liter", 0.05, "").unwrap();
        catalog.add_price(tile, 50.0, date(2025, 1, 1), None).unwrap();

        let list = catalog.price_list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].material.name, "Paint");
        assert!(list[0].current_price.is_none());
        assert_eq!(list[1].current_price.as_ref().unwrap().unit_price, 50.0);
    }

    #[test]
    fn test_coverage_options() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        catalog.add_material("Paint", "Wall Covering", "liter", 0.05, "").unwrap();
        catalog.add_material("Laminate Flooring", "Floor Covering", "m2", 0.07, "").unwrap();
        catalog.add_material("Wall Panel", "Structural", "m2", 0.05, "").unwrap();

        let categories = vec!["Floor Covering".to_string(), "Wall Covering".to_string()];
        assert_eq!(
            catalog.coverage_options(&categories),
            vec!["Laminate Flooring", "Paint", "Tile"]
        );
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut catalog = InMemoryCatalog::new();
        let paint = catalog.add_material("Paint", "Wall Covering", "liter", 0.05, "").unwrap();
        catalog.add_price(paint, 50.0, date(2025, 1, 1), Some("E Boya")).unwrap();
        catalog.add_consumption_rate(paint, "Wall", 0.15, "liter/m2").unwrap();
        catalog.add_application_detail("Living Room", Surface::Wall, r#"{"coats": 2}"#);

        let json = serde_json::to_string_pretty(&catalog.snapshot()).unwrap();
        let snapshot: CatalogSnapshot = serde_json::from_str(&json).unwrap();
        let mut restored = InMemoryCatalog::from_snapshot(snapshot).unwrap();

        assert_eq!(restored.current_price(paint).unwrap().unit_price, 50.0);
        assert_eq!(restored.consumption_rates(paint).len(), 1);
        // New ids continue after the highest restored id
        let next = restored.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        assert_eq!(next, MaterialId(2));
    }

    #[test]
    fn test_snapshot_rejects_dangling_price() {
        let snapshot = CatalogSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            materials: Vec::new(),
            prices: vec![PriceQuote {
                material_id: MaterialId(4),
                unit_price: 10.0,
                effective_date: date(2025, 1, 1),
                supplier: None,
            }],
            consumption_rates: Vec::new(),
            application_details: Vec::new(),
        };
        assert_eq!(
            InMemoryCatalog::from_snapshot(snapshot).unwrap_err().error_code(),
            "MATERIAL_NOT_FOUND"
        );
    }

    #[test]
    fn test_snapshot_rejects_negative_rate() {
        let mut catalog = InMemoryCatalog::new();
        let paint = catalog.add_material("Paint", "Wall Covering", "liter", 0.05, "").unwrap();
        catalog.add_consumption_rate(paint, "Wall", 0.15, "liter/m2").unwrap();
        let mut snapshot = catalog.snapshot();
        snapshot.consumption_rates[0].rate = -0.15;

        let err = InMemoryCatalog::from_snapshot(snapshot).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_snapshot_rejects_nan_rate() {
        let mut catalog = InMemoryCatalog::new();
        let paint = catalog.add_material("Paint", "Wall Covering", "liter", 0.05, "").unwrap();
        catalog.add_consumption_rate(paint, "Wall", 0.15, "liter/m2").unwrap();
        let mut snapshot = catalog.snapshot();
        snapshot.consumption_rates[0].rate = f64::NAN;
        assert!(InMemoryCatalog::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn test_snapshot_with_max_id_is_rejected() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        let mut snapshot = catalog.snapshot();
        snapshot.materials[0].id = MaterialId(u32::MAX);

        let err = InMemoryCatalog::from_snapshot(snapshot).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_snapshot_rejects_duplicate_names() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add_material("Tile", "Floor Covering", "m2", 0.1, "").unwrap();
        let mut snapshot = catalog.snapshot();
        let mut dup = snapshot.materials[0].clone();
        dup.id = MaterialId(2);
        snapshot.materials.push(dup);
        assert!(InMemoryCatalog::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn test_snapshot_rejects_newer_minor_version() {
        let mut snapshot = InMemoryCatalog::new().snapshot();
        snapshot.version = "0.2.0".to_string();
        assert_eq!(
            InMemoryCatalog::from_snapshot(snapshot).unwrap_err().error_code(),
            "VERSION_MISMATCH"
        );
    }
}
