//! Plain-text rendering of estimates and catalog listings.

use std::fmt::Write;

use prefab_core::catalog::InMemoryCatalog;
use prefab_core::errors::Severity;
use prefab_core::estimate::{Estimate, NeedKind};
use prefab_core::house::HouseSpec;

/// Categories offered as room coverings
const COVERING_CATEGORIES: [&str; 2] = ["Floor Covering", "Wall Covering"];

const NOT_APPLICABLE: &str = "N/A";

fn quantity(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_APPLICABLE.to_string(), |v| format!("{:.2}", v))
}

pub fn render_estimate(house: &HouseSpec, estimate: &Estimate) -> String {
    let geometry = &estimate.geometry;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{} ({} floor(s), {} roof)", house.house_type, house.floor_count, house.roof_type);
    let _ = writeln!(
        out,
        "Floor {:.2} m2 | Walls {:.2} m2 | Windows {:.2} m2 | Doors {:.2} m2 | Roof {:.2} m2",
        geometry.total_floor_area.0,
        geometry.total_gross_wall_area.0,
        geometry.total_window_area.0,
        geometry.total_door_area.0,
        geometry.roof_area.0,
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<44} {:>10} {:>10} {:<6} {:>10} {:>12}",
        "Item", "Net", "Required", "Unit", "Price", "Cost"
    );
    let _ = writeln!(out, "{}", "-".repeat(97));

    for line in &estimate.lines {
        let _ = writeln!(
            out,
            "{:<44} {:>10} {:>10} {:<6} {:>10.2} {:>12.2}",
            line.label,
            quantity(line.net_quantity),
            quantity(line.required_quantity),
            line.unit,
            line.unit_price,
            line.cost,
        );
    }

    let _ = writeln!(out, "{}", "-".repeat(97));
    let _ = writeln!(out, "{:<84} {:>12.2}", "TOTAL", estimate.total_cost);

    let _ = writeln!(out);
    let _ = writeln!(out, "By kind:");
    for (kind, cost) in cost_by_kind(estimate) {
        let _ = writeln!(out, "  {:<20} {:>12.2}", kind.display_name(), cost);
    }

    if !estimate.warnings.is_empty() {
        let _ = writeln!(out);
        for warning in &estimate.warnings {
            let tag = match warning.severity {
                Severity::Warning => "warning",
                Severity::Info => "note",
            };
            let _ = writeln!(out, "{}: {}", tag, warning);
        }
    }

    out
}

/// Line costs summed per kind, in order of first appearance.
fn cost_by_kind(estimate: &Estimate) -> Vec<(NeedKind, f64)> {
    let mut totals: Vec<(NeedKind, f64)> = Vec::new();
    for line in &estimate.lines {
        match totals.iter_mut().find(|(kind, _)| *kind == line.kind) {
            Some((_, cost)) => *cost += line.cost,
            None => totals.push((line.kind, line.cost)),
        }
    }
    totals
}

pub fn render_materials(catalog: &InMemoryCatalog) -> String {
    let categories: Vec<String> = COVERING_CATEGORIES.iter().map(|c| c.to_string()).collect();
    let mut out = String::new();

    let _ = writeln!(out, "Covering options:");
    for name in catalog.coverage_options(&categories) {
        let _ = writeln!(out, "  {}", name);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<24} {:<16} {:<6} {:>6} {:>10} {:<12}", "Material", "Category", "Unit", "Waste", "Price", "Since");
    for entry in catalog.price_list() {
        let material = &entry.material;
        let (price, since) = match &entry.current_price {
            Some(quote) => (format!("{:.2}", quote.unit_price), quote.effective_date.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let _ = writeln!(
            out,
            "{:<24} {:<16} {:<6} {:>5.0}% {:>10} {:<12}",
            material.name,
            material.category,
            material.unit,
            material.waste_fraction * 100.0,
            price,
            since,
        );
    }

    out
}
