//! # Geometry Resolver
//!
//! Turns a [`HouseSpec`] into the area quantities the estimator prices:
//! per-room floor and gross wall areas, opening totals, and roof area.
//!
//! ## Formulas
//!
//! - Floor area = length × width
//! - Gross wall area = 2 × (length + width) × height (closed rectangular footprint)
//! - Window/door area = Σ width × height × count
//! - Roof footprint = total floor area ÷ floor count (floor count < 1 ⇒ ÷ 1)
//! - Roof area = footprint ÷ cos(pitch) for pitched roofs; footprint × 2 when
//!   |cos(pitch)| < 0.001
//!
//! ## Example
//!
//! ```rust
//! use prefab_core::geometry::resolve;
//! use prefab_core::house::{HouseSpec, RoofType, RoomSpec};
//!
//! let house = HouseSpec::new("Cabin", 1)
//!     .with_roof(RoofType::Gable, 60.0)
//!     .with_room(RoomSpec::new("Salon", 10.0, 10.0, 2.5, "Laminate Flooring", "Paint"));
//!
//! let geometry = resolve(&house).unwrap();
//! assert_eq!(geometry.total_floor_area.0, 100.0);
//! assert!((geometry.roof_area.0 - 200.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::house::{HouseSpec, RoomSpec};
use crate::units::{Degrees, Meters, SquareMeters};

/// Below this cosine magnitude the pitch is treated as vertical.
pub(crate) const MIN_PITCH_COSINE: f64 = 0.001;

/// Roof area multiplier used when the pitch is effectively vertical.
const VERTICAL_ROOF_FACTOR: f64 = 2.0;

/// Areas for a single room, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomArea {
    pub name: String,
    pub floor_area: SquareMeters,
    pub gross_wall_area: SquareMeters,
}

impl RoomArea {
    pub fn from_room(room: &RoomSpec) -> Self {
        let length = Meters(room.length_m);
        let width = Meters(room.width_m);
        let height = Meters(room.height_m);
        RoomArea {
            name: room.name.clone(),
            floor_area: length * width,
            gross_wall_area: (length + width) * 2.0 * height,
        }
    }
}

/// Resolved area quantities for a whole house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseGeometry {
    /// Per-room areas, aligned with `HouseSpec::rooms`
    pub rooms: Vec<RoomArea>,
    pub total_floor_area: SquareMeters,
    pub total_gross_wall_area: SquareMeters,
    pub total_window_area: SquareMeters,
    pub total_door_area: SquareMeters,
    /// Floor area of one storey; the roof's plan area
    pub footprint_per_floor: SquareMeters,
    /// Sloped roof surface area
    pub roof_area: SquareMeters,
}

impl HouseGeometry {
    /// Combined window and door area.
    pub fn opening_area(&self) -> SquareMeters {
        self.total_window_area + self.total_door_area
    }

    /// Wall area left for panels after subtracting all openings, clamped at zero.
    pub fn net_wall_area_for_panels(&self) -> SquareMeters {
        (self.total_gross_wall_area - self.total_window_area - self.total_door_area).clamp_non_negative()
    }

    /// Net wall area of one room.
    ///
    /// Openings are not assigned to rooms, so each room absorbs a share of the
    /// total opening area proportional to its share of the gross wall area.
    pub fn room_net_wall_area(&self, room: &RoomArea) -> SquareMeters {
        let deduction = if self.total_gross_wall_area.0 > 0.0 {
            self.opening_area() * (room.gross_wall_area.0 / self.total_gross_wall_area.0)
        } else {
            SquareMeters::ZERO
        };
        (room.gross_wall_area - deduction).clamp_non_negative()
    }
}

/// Validate the house and resolve its geometry.
///
/// # Returns
///
/// * `Ok(HouseGeometry)` - Resolved areas
/// * `Err(CalcError::InvalidInput)` - A dimension is malformed
pub fn resolve(house: &HouseSpec) -> CalcResult<HouseGeometry> {
    house.validate()?;

    let total_window_area: SquareMeters = house
        .windows
        .iter()
        .map(|w| Meters(w.width_m) * Meters(w.height_m) * f64::from(w.count))
        .sum();
    let total_door_area: SquareMeters = house
        .doors
        .iter()
        .map(|d| Meters(d.width_m) * Meters(d.height_m) * f64::from(d.count))
        .sum();

    let rooms: Vec<RoomArea> = house.rooms.iter().map(RoomArea::from_room).collect();
    let mut total_floor_area = SquareMeters::ZERO;
    let mut total_gross_wall_area = SquareMeters::ZERO;
    for room in &rooms {
        total_floor_area = total_floor_area + room.floor_area;
        total_gross_wall_area = total_gross_wall_area + room.gross_wall_area;
    }

    let footprint_per_floor = if house.floor_count > 0 {
        total_floor_area / f64::from(house.floor_count)
    } else {
        total_floor_area
    };

    let roof_area = roof_area(footprint_per_floor, house);

    debug!(
        rooms = rooms.len(),
        floor_m2 = total_floor_area.0,
        wall_m2 = total_gross_wall_area.0,
        window_m2 = total_window_area.0,
        door_m2 = total_door_area.0,
        roof_m2 = roof_area.0,
        "resolved house geometry"
    );

    Ok(HouseGeometry {
        rooms,
        total_floor_area,
        total_gross_wall_area,
        total_window_area,
        total_door_area,
        footprint_per_floor,
        roof_area,
    })
}

fn roof_area(footprint: SquareMeters, house: &HouseSpec) -> SquareMeters {
    if house.roof_type.is_flat() || house.roof_pitch_deg <= 0.0 {
        return footprint;
    }

    let cos_pitch = Degrees(house.roof_pitch_deg).cos();
    if cos_pitch.abs() < MIN_PITCH_COSINE {
        footprint * VERTICAL_ROOF_FACTOR
    } else {
        footprint / cos_pitch
    }
}
