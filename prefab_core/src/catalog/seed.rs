//! Sample catalog data.
//!
//! Eight materials with one price each, a paint coverage rate, and the
//! application details for the standard room types. Used by the CLI when no
//! catalog file is given, and by the integration tests.

use chrono::NaiveDate;
use tracing::debug;

use super::memory::InMemoryCatalog;
use super::types::Surface;
use crate::errors::CalcResult;

/// (name, category, unit, waste fraction, description, unit price, supplier)
type SeedMaterial = (&'static str, &'static str, &'static str, f64, &'static str, f64, &'static str);

const SEED_MATERIALS: [SeedMaterial; 8] = [
    ("Wall Panel", "Structural", "m2", 0.05, "Prefab wall panel", 120.0, "A Panel"),
    ("Roof Panel", "Structural", "m2", 0.07, "Prefab roof panel", 150.0, "B Roof"),
    ("Tile", "Floor Covering", "m2", 0.10, "Standard ceramic tile", 50.0, "C Build"),
    ("Laminate Flooring", "Floor Covering", "m2", 0.07, "8mm laminate flooring", 80.0, "D Floor"),
    ("Paint", "Wall Covering", "liter", 0.05, "Water-based interior paint", 50.0, "E Paint"),
    ("PVC Window", "Joinery", "piece", 0.0, "Double-glazed PVC window", 1500.0, "F Window"),
    ("Interior Door", "Joinery", "piece", 0.0, "Panel interior door", 800.0, "G Door"),
    ("Exterior Door", "Joinery", "piece", 0.0, "Steel exterior door", 2000.0, "G Door"),
];

const SEED_DETAILS: [(&str, Surface, &str); 5] = [
    ("Bathroom", Surface::Floor, r#"{"tile_unit_area_m2": 0.09}"#),
    ("Kitchen", Surface::Floor, r#"{"tile_unit_area_m2": 0.09}"#),
    ("Living Room", Surface::Wall, r#"{"coats": 2}"#),
    ("Bedroom", Surface::Wall, r#"{"coats": 2}"#),
    ("Living Room", Surface::Floor, "{}"),
];

/// Build the sample catalog with every price effective on `effective`.
pub fn seed_catalog(effective: NaiveDate) -> CalcResult<InMemoryCatalog> {
    let mut catalog = InMemoryCatalog::new();

    for (name, category, unit, waste, description, price, supplier) in SEED_MATERIALS {
        let id = catalog.add_material(name, category, unit, waste, description)?;
        catalog.add_price(id, price, effective, Some(supplier))?;
        if name == "Paint" {
            catalog.add_consumption_rate(id, "Wall", 0.15, "liter/m2")?;
        }
    }

    for (room_type, surface, properties) in SEED_DETAILS {
        catalog.add_application_detail(room_type, surface, properties);
    }

    debug!(materials = catalog.material_count(), "seeded catalog");
    Ok(catalog)
}
