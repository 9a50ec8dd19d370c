//! # Material Estimator
//!
//! Prices a resolved house against a catalog. The result is an ordered ledger
//! of [`MaterialNeedLine`]s, a grand total, and the warnings for every line
//! that could not be priced.
//!
//! ## Ledger Steps
//!
//! 1. Wall panels over the net wall area (gross minus all openings)
//! 2. Roof covering over the roof area
//! 3. Per room, in input order: floor covering, then wall covering
//! 4. One line per window group with a non-zero count
//! 5. One line per door group with a non-zero count, exterior or interior by name
//! 6. Installation and fastener overhead as a fraction of everything above
//!
//! A step that cannot be priced (material missing, no current price, no paint
//! coverage rate) is skipped with a [`EstimateWarning`]. Only invalid input
//! aborts a run.
//!
//! ## Quantity Rules
//!
//! | Need | Required quantity | Unit |
//! |------|-------------------|------|
//! | Area material | net × (1 + waste) | material unit |
//! | Tile with known tile size | net ÷ tile area × (1 + waste) | piece |
//! | Paint | net wall × rate × coats × (1 + waste) | rate numerator |
//! | Window, door | count | piece |
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use prefab_core::catalog::seed_catalog;
//! use prefab_core::estimate::estimate_with_defaults;
//! use prefab_core::house::{HouseSpec, RoomSpec};
//!
//! let catalog = seed_catalog(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
//! let house = HouseSpec::new("Cabin", 1)
//!     .with_room(RoomSpec::new("Bathroom", 3.0, 3.0, 2.5, "Tile", "Paint"));
//!
//! let estimate = estimate_with_defaults(&house, &catalog).unwrap();
//!
//! // 9 m² of 0.09 m² tiles plus 10% waste
//! let floor = estimate.line("Bathroom Floor (Tile)").unwrap();
//! assert!((floor.required_quantity.unwrap() - 110.0).abs() < 1e-9);
//! assert_eq!(floor.unit, "piece");
//! assert!(estimate.passes_invariants());
//! ```

pub mod settings;

pub use settings::{EstimatorSettings, NeedMaterials};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogLookup, MaterialRecord, PropertyBag, Surface};
use crate::errors::{CalcResult, EstimateWarning, Severity};
use crate::geometry::{resolve, HouseGeometry, RoomArea};
use crate::house::{DoorClass, HouseSpec, RoomSpec};
use crate::units::SquareMeters;

/// Ledger label of the wall panel line
pub const WALL_PANELS_LABEL: &str = "Wall Panels (Total)";

/// Ledger label of the roof covering line
pub const ROOF_COVERING_LABEL: &str = "Roof Covering (Total)";

/// Ledger label of the overhead line
pub const OVERHEAD_LABEL: &str = "Installation & Fasteners (Estimated)";

/// Tolerance used when checking `cost = required × unit price`
const COST_TOLERANCE: f64 = 1e-9;

/// Which ledger step produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeedKind {
    WallPanels,
    RoofCovering,
    FloorCovering,
    WallCovering,
    Window,
    Door,
    Overhead,
}

impl NeedKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            NeedKind::WallPanels => "Wall Panels",
            NeedKind::RoofCovering => "Roof Covering",
            NeedKind::FloorCovering => "Floor Covering",
            NeedKind::WallCovering => "Wall Covering",
            NeedKind::Window => "Window",
            NeedKind::Door => "Door",
            NeedKind::Overhead => "Overhead",
        }
    }
}

/// One priced line of the estimate.
///
/// Quantities are `None` on the overhead line, which has no physical quantity.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Bathroom Floor (Tile)",
///   "kind": "FloorCovering",
///   "material": "Tile",
///   "net_quantity": 9.0,
///   "required_quantity": 110.0,
///   "unit": "piece",
///   "unit_price": 50.0,
///   "cost": 5500.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialNeedLine {
    /// Unique label within one estimate
    pub label: String,
    pub kind: NeedKind,
    /// Resolved catalog material name
    pub material: Option<String>,
    /// Quantity before waste or rate adjustment
    pub net_quantity: Option<f64>,
    /// Quantity to purchase
    pub required_quantity: Option<f64>,
    pub unit: String,
    pub unit_price: f64,
    pub cost: f64,
}

impl MaterialNeedLine {
    fn priced(
        label: String,
        kind: NeedKind,
        material: &PricedMaterial,
        net_quantity: f64,
        required_quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        MaterialNeedLine {
            label,
            kind,
            material: Some(material.record.definition.name.clone()),
            net_quantity: Some(net_quantity),
            required_quantity: Some(required_quantity),
            unit: unit.into(),
            unit_price: material.unit_price,
            cost: required_quantity * material.unit_price,
        }
    }

    fn overhead(amount: f64, currency: &str) -> Self {
        MaterialNeedLine {
            label: OVERHEAD_LABEL.to_string(),
            kind: NeedKind::Overhead,
            material: None,
            net_quantity: None,
            required_quantity: None,
            unit: currency.to_string(),
            unit_price: 1.0,
            cost: amount,
        }
    }

    /// Check `cost = required × unit price`. Lines without a quantity pass.
    pub fn cost_is_consistent(&self) -> bool {
        match self.required_quantity {
            Some(required) => (self.cost - required * self.unit_price).abs() < COST_TOLERANCE,
            None => true,
        }
    }
}

/// Result of one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Ledger lines in insertion order, labels unique
    pub lines: Vec<MaterialNeedLine>,
    /// Sum of every line cost, overhead included
    pub total_cost: f64,
    /// Skipped steps and other recoverable problems, in the order they occurred
    pub warnings: Vec<EstimateWarning>,
    /// Areas the ledger was computed from
    pub geometry: HouseGeometry,
}

impl Estimate {
    /// Line with exactly this label
    pub fn line(&self, label: &str) -> Option<&MaterialNeedLine> {
        self.lines.iter().find(|line| line.label == label)
    }

    pub fn overhead(&self) -> Option<&MaterialNeedLine> {
        self.lines.iter().find(|line| line.kind == NeedKind::Overhead)
    }

    /// Total cost of every line except overhead
    pub fn material_cost(&self) -> f64 {
        self.lines
            .iter()
            .filter(|line| line.kind != NeedKind::Overhead)
            .map(|line| line.cost)
            .sum()
    }

    /// Warnings with `Severity::Warning` (skipped or degraded lines)
    pub fn skipped_steps(&self) -> impl Iterator<Item = &EstimateWarning> {
        self.warnings
            .iter()
            .filter(|warning| warning.severity == Severity::Warning)
    }

    /// Verify the ledger's structural guarantees:
    ///
    /// - every line's cost equals required quantity × unit price
    /// - the total equals the sum of all line costs
    /// - labels are unique and exactly one overhead line exists
    /// - no quantity is negative
    pub fn passes_invariants(&self) -> bool {
        let sum: f64 = self.lines.iter().map(|line| line.cost).sum();
        let total_ok = (self.total_cost - sum).abs() <= COST_TOLERANCE * sum.abs().max(1.0);

        let overhead_count = self
            .lines
            .iter()
            .filter(|line| line.kind == NeedKind::Overhead)
            .count();

        let labels_unique = self
            .lines
            .iter()
            .enumerate()
            .all(|(i, line)| self.lines[..i].iter().all(|other| other.label != line.label));

        let non_negative = self.lines.iter().all(|line| {
            line.net_quantity.map_or(true, |q| q >= 0.0)
                && line.required_quantity.map_or(true, |q| q >= 0.0)
        });

        total_ok
            && overhead_count == 1
            && labels_unique
            && non_negative
            && self.lines.iter().all(MaterialNeedLine::cost_is_consistent)
    }
}

/// Estimate materials and cost for a house.
///
/// # Returns
///
/// * `Ok(Estimate)` - The ledger; skipped steps are listed in `warnings`
/// * `Err(CalcError::InvalidInput)` - A house dimension or setting is malformed
/// * `Err(CalcError::MissingField)` - A room has no name
pub fn estimate<C>(house: &HouseSpec, catalog: &C, settings: &EstimatorSettings) -> CalcResult<Estimate>
where
    C: CatalogLookup + ?Sized,
{
    settings.validate()?;
    let geometry = resolve(house)?;
    let mut ledger = Ledger::default();

    // 1. Wall panels
    let outcome = area_line(
        catalog,
        &settings.materials.wall_panel,
        "Wall Panels",
        WALL_PANELS_LABEL,
        NeedKind::WallPanels,
        geometry.net_wall_area_for_panels(),
    );
    ledger.record(outcome);

    // 2. Roof covering
    let outcome = area_line(
        catalog,
        &settings.materials.roof_panel,
        "Roof Covering",
        ROOF_COVERING_LABEL,
        NeedKind::RoofCovering,
        geometry.roof_area,
    );
    ledger.record(outcome);

    // 3. Rooms
    for (room, area) in house.rooms.iter().zip(&geometry.rooms) {
        let outcome = floor_line(catalog, settings, room, area, &mut ledger);
        ledger.record(outcome);

        let net_wall = geometry.room_net_wall_area(area);
        let outcome = wall_line(catalog, settings, room, net_wall, &mut ledger);
        ledger.record(outcome);
    }

    // 4. Windows
    for (i, window) in house.windows.iter().enumerate() {
        if window.count == 0 {
            continue;
        }
        let step = format!("Window {}", i + 1);
        let label = format!("{} ({}x{}m)", step, window.width_m, window.height_m);
        let outcome = priced_material(catalog, &settings.materials.window, &step)
            .map(|material| count_line(label, NeedKind::Window, &material, window.count, settings));
        ledger.record(outcome);
    }

    // 5. Doors
    for (i, door) in house.doors.iter().enumerate() {
        if door.count == 0 {
            continue;
        }
        let identifier = match door.class() {
            DoorClass::Exterior => &settings.materials.exterior_door,
            DoorClass::Interior => &settings.materials.interior_door,
        };
        let step = format!("Door {}", i + 1);
        let label = format!("{} ({}x{}m)", step, door.width_m, door.height_m);
        let outcome = priced_material(catalog, identifier, &step)
            .map(|material| count_line(label, NeedKind::Door, &material, door.count, settings));
        ledger.record(outcome);
    }

    // 6. Overhead
    let overhead = settings.overhead_rate * ledger.running_total;
    ledger.push(MaterialNeedLine::overhead(overhead, &settings.currency));

    info!(
        house = %house.house_type,
        lines = ledger.lines.len(),
        warnings = ledger.warnings.len(),
        total = ledger.running_total,
        "estimate complete"
    );

    Ok(Estimate {
        lines: ledger.lines,
        total_cost: ledger.running_total,
        warnings: ledger.warnings,
        geometry,
    })
}

/// [`estimate`] with [`EstimatorSettings::default`].
pub fn estimate_with_defaults<C>(house: &HouseSpec, catalog: &C) -> CalcResult<Estimate>
where
    C: CatalogLookup + ?Sized,
{
    estimate(house, catalog, &EstimatorSettings::default())
}

/// Ordered lines plus the running total, built up during one run.
#[derive(Default)]
struct Ledger {
    lines: Vec<MaterialNeedLine>,
    running_total: f64,
    warnings: Vec<EstimateWarning>,
}

impl Ledger {
    fn record(&mut self, outcome: Result<MaterialNeedLine, EstimateWarning>) {
        match outcome {
            Ok(line) => self.push(line),
            Err(warning) => self.warn(warning),
        }
    }

    /// Append a line, or replace an existing line with the same label in place.
    fn push(&mut self, line: MaterialNeedLine) {
        debug!(label = %line.label, cost = line.cost, "ledger line");

        match self.lines.iter().position(|existing| existing.label == line.label) {
            Some(index) => {
                let replaced = std::mem::replace(&mut self.lines[index], line);
                // Rebuild in insertion order so the total stays the sum of the lines
                self.running_total = self.lines.iter().map(|l| l.cost).sum();
                self.warn(EstimateWarning::duplicate_label(
                    replaced.label.clone(),
                    format!("Replaced earlier line costing {:.2}", replaced.cost),
                ));
            }
            None => {
                self.running_total += line.cost;
                self.lines.push(line);
            }
        }
    }

    fn warn(&mut self, warning: EstimateWarning) {
        match warning.severity {
            Severity::Warning => warn!(step = %warning.step, kind = warning.kind.code(), "{}", warning.message),
            Severity::Info => info!(step = %warning.step, kind = warning.kind.code(), "{}", warning.message),
        }
        self.warnings.push(warning);
    }
}

/// A material that resolved and has a current price.
struct PricedMaterial {
    record: MaterialRecord,
    unit_price: f64,
}

fn priced_material<C>(catalog: &C, identifier: &str, step: &str) -> Result<PricedMaterial, EstimateWarning>
where
    C: CatalogLookup + ?Sized,
{
    let record = catalog.find_material(identifier).ok_or_else(|| {
        EstimateWarning::catalog_miss(step, format!("Material '{}' not found in catalog", identifier))
    })?;
    let unit_price = record.price.as_ref().map(|price| price.unit_price).ok_or_else(|| {
        EstimateWarning::catalog_miss(
            step,
            format!("No current price for material '{}'", record.definition.name),
        )
    })?;
    Ok(PricedMaterial { record, unit_price })
}

/// Positive number stored under `keys` in a room surface's application detail.
///
/// Malformed property text, or a key holding something other than a number,
/// is recorded as a warning and read as absent.
fn property_number<C>(
    catalog: &C,
    room: &str,
    surface: Surface,
    keys: &[String],
    step: &str,
    ledger: &mut Ledger,
) -> Option<f64>
where
    C: CatalogLookup + ?Sized,
{
    let raw = catalog.application_detail(room, surface)?;
    let bag = match PropertyBag::parse(&raw) {
        Ok(bag) => bag,
        Err(reason) => {
            ledger.warn(EstimateWarning::malformed_bag(
                step,
                format!("Ignoring {} properties for '{}': {}", surface, room, reason),
            ));
            return None;
        }
    };

    if bag.number(keys).is_none() {
        if let Some(key) = bag.non_numeric_key(keys) {
            ledger.warn(EstimateWarning::malformed_bag(
                step,
                format!("Ignoring non-numeric '{}' in {} properties for '{}'", key, surface, room),
            ));
        }
    }
    bag.positive_number(keys)
}

fn area_line<C>(
    catalog: &C,
    identifier: &str,
    step: &str,
    label: &str,
    kind: NeedKind,
    net: SquareMeters,
) -> Result<MaterialNeedLine, EstimateWarning>
where
    C: CatalogLookup + ?Sized,
{
    let material = priced_material(catalog, identifier, step)?;
    let required = net.0 * material.record.definition.waste_factor();
    let unit = material.record.definition.unit.clone();
    Ok(MaterialNeedLine::priced(label.to_string(), kind, &material, net.0, required, unit))
}

fn floor_line<C>(
    catalog: &C,
    settings: &EstimatorSettings,
    room: &RoomSpec,
    area: &RoomArea,
    ledger: &mut Ledger,
) -> Result<MaterialNeedLine, EstimateWarning>
where
    C: CatalogLookup + ?Sized,
{
    let step = format!("{} Floor", room.name);
    let material = priced_material(catalog, &room.floor_covering, &step)?;
    let label = format!("{} ({})", step, material.record.definition.name);
    let net = area.floor_area.0;
    let waste_factor = material.record.definition.waste_factor();

    if material.record.definition.name == settings.tile_material {
        let tile_area = property_number(
            catalog,
            &room.name,
            Surface::Floor,
            &settings.tile_area_keys,
            &step,
            ledger,
        );
        if let Some(tile_area) = tile_area {
            let pieces = net / tile_area * waste_factor;
            return Ok(MaterialNeedLine::priced(
                label,
                NeedKind::FloorCovering,
                &material,
                net,
                pieces,
                settings.piece_unit.as_str(),
            ));
        }
    }

    let unit = material.record.definition.unit.clone();
    Ok(MaterialNeedLine::priced(
        label,
        NeedKind::FloorCovering,
        &material,
        net,
        net * waste_factor,
        unit,
    ))
}

fn wall_line<C>(
    catalog: &C,
    settings: &EstimatorSettings,
    room: &RoomSpec,
    net_wall: SquareMeters,
    ledger: &mut Ledger,
) -> Result<MaterialNeedLine, EstimateWarning>
where
    C: CatalogLookup + ?Sized,
{
    let step = format!("{} Wall", room.name);
    let material = priced_material(catalog, &room.wall_covering, &step)?;
    let label = format!("{} ({})", step, material.record.definition.name);
    let net = net_wall.0;
    let waste_factor = material.record.definition.waste_factor();

    if material.record.definition.name != settings.paint_material {
        let unit = material.record.definition.unit.clone();
        return Ok(MaterialNeedLine::priced(
            label,
            NeedKind::WallCovering,
            &material,
            net,
            net * waste_factor,
            unit,
        ));
    }

    let rate = material
        .record
        .rate_for_surface(&settings.paint_surface_tags)
        .cloned()
        .ok_or_else(|| {
            EstimateWarning::catalog_miss(
                &step,
                format!(
                    "Material '{}' has no consumption rate for wall application",
                    material.record.definition.name
                ),
            )
        })?;

    let coats = property_number(catalog, &room.name, Surface::Wall, &settings.coats_keys, &step, ledger)
        .unwrap_or(1.0);
    let volume = net * rate.rate * coats * waste_factor;

    Ok(MaterialNeedLine::priced(
        label,
        NeedKind::WallCovering,
        &material,
        net,
        volume,
        rate.quantity_unit(),
    ))
}

fn count_line(
    label: String,
    kind: NeedKind,
    material: &PricedMaterial,
    count: u32,
    settings: &EstimatorSettings,
) -> MaterialNeedLine {
    let count = f64::from(count);
    MaterialNeedLine::priced(label, kind, material, count, count, settings.piece_unit.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{seed_catalog, InMemoryCatalog};
    use crate::errors::WarningKind;
    use crate::house::{DoorSpec, RoofType, WindowSpec};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn seeded() -> InMemoryCatalog {
        seed_catalog(date()).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_tile_pieces() {
        // 9 m² ÷ 0.09 m² × 1.10 = 110 pieces
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Bathroom", 3.0, 3.0, 2.5, "Tile", "Paint"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let line = estimate.line("Bathroom Floor (Tile)").unwrap();
        assert_eq!(line.net_quantity, Some(9.0));
        assert!(approx(line.required_quantity.unwrap(), 110.0));
        assert_eq!(line.unit, "piece");
        assert!(approx(line.cost, 5500.0));
    }

    #[test]
    fn test_tile_alias_key() {
        let mut catalog = seeded();
        catalog.add_application_detail("Banyo", Surface::Floor, r#"{"fayans_boyut_m2": 0.09}"#);
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Banyo", 3.0, 3.0, 2.5, "Tile", "Paint"));
        let estimate = estimate_with_defaults(&house, &catalog).unwrap();
        assert_eq!(estimate.line("Banyo Floor (Tile)").unwrap().unit, "piece");
    }

    #[test]
    fn test_tile_without_detail_uses_area() {
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Hall", 3.0, 3.0, 2.5, "Tile", "Paint"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let line = estimate.line("Hall Floor (Tile)").unwrap();
        assert!(approx(line.required_quantity.unwrap(), 9.9));
        assert_eq!(line.unit, "m2");
        assert!(estimate.skipped_steps().next().is_none());
    }

    #[test]
    fn test_paint_liters() {
        // 2 × (2.5 + 2.5) × 2.0 = 20 m² net, 0.15 L/m² × 2 coats × 1.05 = 6.3 L
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Living Room", 2.5, 2.5, 2.0, "Laminate Flooring", "Paint"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let line = estimate.line("Living Room Wall (Paint)").unwrap();
        assert!(approx(line.net_quantity.unwrap(), 20.0));
        assert!(approx(line.required_quantity.unwrap(), 6.3));
        assert_eq!(line.unit, "liter");
        assert!(approx(line.cost, 315.0));
    }

    #[test]
    fn test_paint_defaults_to_one_coat() {
        let mut catalog = seeded();
        catalog.add_application_detail("Office", Surface::Wall, r#"{"coats": -3}"#);
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Office", 2.5, 2.5, 2.0, "Laminate Flooring", "Paint"));
        let estimate = estimate_with_defaults(&house, &catalog).unwrap();

        let line = estimate.line("Office Wall (Paint)").unwrap();
        assert!(approx(line.required_quantity.unwrap(), 3.15));
    }

    #[test]
    fn test_paint_without_rate_is_skipped() {
        let mut catalog = InMemoryCatalog::new();
        let paint = catalog.add_material("Paint", "Wall Covering", "liter", 0.05, "").unwrap();
        catalog.add_price(paint, 50.0, date(), None).unwrap();

        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Office", 2.5, 2.5, 2.0, "Laminate Flooring", "Paint"));
        let estimate = estimate_with_defaults(&house, &catalog).unwrap();

        assert!(estimate.line("Office Wall (Paint)").is_none());
        assert!(estimate
            .warnings
            .iter()
            .any(|w| w.step == "Office Wall" && w.kind == WarningKind::CatalogMiss));
    }

    #[test]
    fn test_non_paint_wall_covering_uses_area() {
        // 20 m² wall, Tile has 10% waste
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Bathroom", 2.5, 2.5, 2.0, "Tile", "Tile"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let line = estimate.line("Bathroom Wall (Tile)").unwrap();
        assert!(approx(line.required_quantity.unwrap(), 22.0));
        assert_eq!(line.unit, "m2");
    }

    #[test]
    fn test_wall_cost_added_once() {
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Bathroom", 2.5, 2.5, 2.0, "Tile", "Tile"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();
        assert!(approx(estimate.material_cost() * 1.15, estimate.total_cost));
        assert!(estimate.passes_invariants());
    }

    #[test]
    fn test_category_identifier_uses_resolved_name_in_label() {
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Hall", 2.0, 2.0, 2.5, "Floor Covering", "Wall Covering"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        // First "Floor Covering" material is Tile; first "Wall Covering" is Paint
        assert!(estimate.line("Hall Floor (Tile)").is_some());
        assert!(estimate.line("Hall Wall (Paint)").is_some());
    }

    #[test]
    fn test_wall_panels_and_roof() {
        // gross 45, openings 1.2 + 2.0 → net 41.8 m²
        let house = HouseSpec::new("Test", 1)
            .with_roof(RoofType::Gable, 60.0)
            .with_room(RoomSpec::new("Salon", 5.0, 4.0, 2.5, "Laminate Flooring", "Paint"))
            .with_window(WindowSpec::new(1.2, 1.0, 1))
            .with_door(DoorSpec::new("Main Entrance", 1.0, 2.0, 1));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let panels = estimate.line(WALL_PANELS_LABEL).unwrap();
        assert!(approx(panels.net_quantity.unwrap(), 41.8));
        assert!(approx(panels.required_quantity.unwrap(), 41.8 * 1.05));
        assert_eq!(panels.unit_price, 120.0);

        // 20 m² footprint at 60° → 40 m²
        let roof = estimate.line(ROOF_COVERING_LABEL).unwrap();
        assert!(approx(roof.net_quantity.unwrap(), 40.0));
        assert!(approx(roof.required_quantity.unwrap(), 40.0 * 1.07));
    }

    #[test]
    fn test_windows_and_doors() {
        let house = HouseSpec::new("Test", 1)
            .with_window(WindowSpec::new(1.2, 1.4, 3))
            .with_window(WindowSpec::new(0.6, 0.6, 0))
            .with_door(DoorSpec::new("Ana Giriş", 1.0, 2.1, 1))
            .with_door(DoorSpec::new("Bedroom", 0.9, 2.0, 2));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let window = estimate.line("Window 1 (1.2x1.4m)").unwrap();
        assert_eq!(window.required_quantity, Some(3.0));
        assert!(approx(window.cost, 4500.0));
        assert!(!estimate.lines.iter().any(|l| l.label.starts_with("Window 2")));

        let exterior = estimate.line("Door 1 (1x2.1m)").unwrap();
        assert_eq!(exterior.material.as_deref(), Some("Exterior Door"));
        assert!(approx(exterior.cost, 2000.0));

        let interior = estimate.line("Door 2 (0.9x2m)").unwrap();
        assert_eq!(interior.material.as_deref(), Some("Interior Door"));
        assert!(approx(interior.cost, 1600.0));
    }

    #[test]
    fn test_overhead_is_fifteen_percent_of_others() {
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Bathroom", 3.0, 3.0, 2.5, "Tile", "Paint"))
            .with_window(WindowSpec::new(1.2, 1.4, 2));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let overheads: Vec<_> = estimate
            .lines
            .iter()
            .filter(|l| l.kind == NeedKind::Overhead)
            .collect();
        assert_eq!(overheads.len(), 1);

        let overhead = overheads[0];
        assert_eq!(overhead.label, OVERHEAD_LABEL);
        assert_eq!(overhead.unit, "TL");
        assert_eq!(overhead.unit_price, 1.0);
        assert!(overhead.required_quantity.is_none());
        assert!(approx(overhead.cost, 0.15 * estimate.material_cost()));
        assert_eq!(estimate.lines.last().unwrap().kind, NeedKind::Overhead);
    }

    #[test]
    fn test_every_cost_matches_quantity_times_price() {
        let house = HouseSpec::new("Test", 2)
            .with_roof(RoofType::Hip, 30.0)
            .with_room(RoomSpec::new("Bathroom", 3.0, 2.0, 2.5, "Tile", "Tile"))
            .with_room(RoomSpec::new("Living Room", 6.0, 4.0, 2.7, "Laminate Flooring", "Paint"))
            .with_room(RoomSpec::new("Bedroom", 4.0, 3.5, 2.7, "Laminate Flooring", "Paint"))
            .with_window(WindowSpec::new(1.2, 1.4, 4))
            .with_door(DoorSpec::new("Main Entrance", 1.0, 2.1, 1));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        for line in &estimate.lines {
            if let Some(required) = line.required_quantity {
                assert!((line.cost - required * line.unit_price).abs() < 1e-9, "{}", line.label);
            }
        }
        assert!(estimate.passes_invariants());
        assert!(estimate.warnings.is_empty());
    }

    #[test]
    fn test_empty_house_empty_catalog() {
        let estimate = estimate_with_defaults(&HouseSpec::new("Empty", 1), &InMemoryCatalog::new()).unwrap();

        assert_eq!(estimate.lines.len(), 1);
        assert_eq!(estimate.overhead().unwrap().cost, 0.0);
        assert_eq!(estimate.total_cost, 0.0);

        let steps: Vec<&str> = estimate.warnings.iter().map(|w| w.step.as_str()).collect();
        assert_eq!(steps, vec!["Wall Panels", "Roof Covering"]);
        assert!(estimate.passes_invariants());
    }

    #[test]
    fn test_missing_price_warns_per_room() {
        let mut catalog = seeded();
        catalog.add_material("Granite", "Floor Covering", "m2", 0.05, "").unwrap();

        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Kitchen", 3.0, 3.0, 2.5, "Granite", "Paint"))
            .with_room(RoomSpec::new("Hall", 2.0, 3.0, 2.5, "Granite", "Paint"));
        let estimate = estimate_with_defaults(&house, &catalog).unwrap();

        let misses: Vec<&EstimateWarning> = estimate
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::CatalogMiss)
            .collect();
        assert_eq!(misses.len(), 2);
        assert_eq!(misses[0].step, "Kitchen Floor");
        assert_eq!(misses[1].step, "Hall Floor");
        assert!(misses[0].message.contains("Granite"));

        // Wall lines for both rooms are unaffected
        assert!(estimate.line("Kitchen Wall (Paint)").is_some());
        assert!(estimate.line("Hall Wall (Paint)").is_some());
    }

    #[test]
    fn test_duplicate_room_overwrites_in_place() {
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Bedroom", 3.0, 3.0, 2.5, "Laminate Flooring", "Paint"))
            .with_room(RoomSpec::new("Kitchen", 2.0, 2.0, 2.5, "Tile", "Paint"))
            .with_room(RoomSpec::new("Bedroom", 4.0, 4.0, 2.5, "Laminate Flooring", "Paint"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let floors: Vec<&MaterialNeedLine> = estimate
            .lines
            .iter()
            .filter(|l| l.kind == NeedKind::FloorCovering)
            .collect();
        assert_eq!(floors.len(), 2);
        // Position of the first Bedroom is kept, values come from the second
        assert_eq!(floors[0].label, "Bedroom Floor (Laminate Flooring)");
        assert_eq!(floors[0].net_quantity, Some(16.0));

        let notices: Vec<&EstimateWarning> = estimate
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::DuplicateLabel)
            .collect();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|w| w.severity == Severity::Info));
        assert!(estimate.skipped_steps().next().is_none());
        assert!(estimate.passes_invariants());
    }

    #[test]
    fn test_malformed_bag_warns_and_falls_back() {
        let mut catalog = seeded();
        catalog.add_application_detail("Laundry", Surface::Floor, "{tile: 0.09");
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Laundry", 3.0, 3.0, 2.5, "Tile", "Paint"));
        let estimate = estimate_with_defaults(&house, &catalog).unwrap();

        let line = estimate.line("Laundry Floor (Tile)").unwrap();
        assert_eq!(line.unit, "m2");
        assert!(estimate
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::MalformedPropertyBag && w.step == "Laundry Floor"));
    }

    #[test]
    fn test_non_numeric_property_warns_and_falls_back() {
        let mut catalog = seeded();
        catalog.add_application_detail("Laundry", Surface::Floor, r#"{"tile_unit_area_m2": "0.09"}"#);
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Laundry", 3.0, 3.0, 2.5, "Tile", "Paint"));
        let estimate = estimate_with_defaults(&house, &catalog).unwrap();

        // Priced by area, not by tile count
        let line = estimate.line("Laundry Floor (Tile)").unwrap();
        assert_eq!(line.unit, "m2");
        assert!(approx(line.required_quantity.unwrap(), 9.0 * 1.10));

        let warning = estimate
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::MalformedPropertyBag)
            .unwrap();
        assert_eq!(warning.step, "Laundry Floor");
        assert!(warning.message.contains("tile_unit_area_m2"));
        assert!(estimate.passes_invariants());
    }

    #[test]
    fn test_custom_settings() {
        let settings = EstimatorSettings::default()
            .with_overhead_rate(0.2)
            .with_currency("EUR");
        let house = HouseSpec::new("Test", 1).with_window(WindowSpec::new(1.0, 1.0, 1));
        let estimate = estimate(&house, &seeded(), &settings).unwrap();

        let overhead = estimate.overhead().unwrap();
        assert_eq!(overhead.unit, "EUR");
        assert!(approx(overhead.cost, 0.2 * estimate.material_cost()));
    }

    #[test]
    fn test_invalid_settings_abort() {
        let settings = EstimatorSettings::default().with_overhead_rate(f64::NAN);
        assert!(estimate(&HouseSpec::new("Test", 1), &seeded(), &settings).is_err());
    }

    #[test]
    fn test_invalid_house_aborts() {
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Hall", -3.0, 3.0, 2.5, "Tile", "Paint"));
        let err = estimate_with_defaults(&house, &seeded()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_dyn_catalog() {
        let catalog: Box<dyn CatalogLookup> = Box::new(seeded());
        let estimate = estimate_with_defaults(&HouseSpec::new("Test", 1), catalog.as_ref()).unwrap();
        assert!(estimate.passes_invariants());
    }

    #[test]
    fn test_estimate_serialization() {
        let house = HouseSpec::new("Test", 1)
            .with_room(RoomSpec::new("Bathroom", 3.0, 3.0, 2.5, "Tile", "Paint"));
        let estimate = estimate_with_defaults(&house, &seeded()).unwrap();

        let json = serde_json::to_string(&estimate).unwrap();
        assert!(json.contains("\"net_quantity\":null"));
        let roundtrip: Estimate = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.lines.len(), estimate.lines.len());
        assert!(approx(roundtrip.total_cost, estimate.total_cost));
    }
}
