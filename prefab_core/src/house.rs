//! # House Description
//!
//! `HouseSpec` is the immutable input to one estimation run: floor count, roof
//! shape, and ordered lists of rooms, windows, and doors. Dimensions are in
//! meters.
//!
//! ## Example
//!
//! ```rust
//! use prefab_core::house::{DoorSpec, HouseSpec, RoofType, RoomSpec, WindowSpec};
//!
//! let house = HouseSpec::new("Bungalow", 1)
//!     .with_roof(RoofType::Gable, 30.0)
//!     .with_room(RoomSpec::new("Salon", 5.0, 4.0, 2.7, "Laminate Flooring", "Paint"))
//!     .with_window(WindowSpec::new(1.2, 1.4, 3))
//!     .with_door(DoorSpec::new("Main Entrance", 1.0, 2.1, 1));
//!
//! assert!(house.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::geometry::MIN_PITCH_COSINE;
use crate::units::Degrees;

/// Roof shape.
///
/// Every non-flat variant is treated as pitched: its area is the footprint
/// divided by the cosine of the pitch angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoofType {
    #[default]
    #[serde(alias = "Düz")]
    Flat,
    Gable,
    Hip,
    Shed,
}

impl RoofType {
    pub fn display_name(&self) -> &'static str {
        match self {
            RoofType::Flat => "Flat",
            RoofType::Gable => "Gable",
            RoofType::Hip => "Hip",
            RoofType::Shed => "Shed",
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, RoofType::Flat)
    }
}

impl std::fmt::Display for RoofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A rectangular room.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Banyo",
///   "length_m": 3.0,
///   "width_m": 3.0,
///   "height_m": 2.5,
///   "floor_covering": "Tile",
///   "wall_covering": "Paint"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Room name. Also used as the room-type key for application details.
    pub name: String,
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    /// Catalog name (or category) of the floor covering
    pub floor_covering: String,
    /// Catalog name (or category) of the wall covering
    pub wall_covering: String,
}

impl RoomSpec {
    pub fn new(
        name: impl Into<String>,
        length_m: f64,
        width_m: f64,
        height_m: f64,
        floor_covering: impl Into<String>,
        wall_covering: impl Into<String>,
    ) -> Self {
        RoomSpec {
            name: name.into(),
            length_m,
            width_m,
            height_m,
            floor_covering: floor_covering.into(),
            wall_covering: wall_covering.into(),
        }
    }
}

/// A group of identical windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub width_m: f64,
    pub height_m: f64,
    pub count: u32,
}

impl WindowSpec {
    pub fn new(width_m: f64, height_m: f64, count: u32) -> Self {
        WindowSpec {
            width_m,
            height_m,
            count,
        }
    }
}

/// Door classification, used to pick the door material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorClass {
    Exterior,
    Interior,
}

/// Name fragments that mark a door as the exterior entrance (matched case-insensitively)
const EXTERIOR_DOOR_MARKERS: [&str; 2] = ["main entrance", "ana giriş"];

/// A group of identical doors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSpec {
    /// Free-text name, e.g. "Main Entrance" or "Bedroom Door"
    pub name: String,
    pub width_m: f64,
    pub height_m: f64,
    pub count: u32,
}

impl DoorSpec {
    pub fn new(name: impl Into<String>, width_m: f64, height_m: f64, count: u32) -> Self {
        DoorSpec {
            name: name.into(),
            width_m,
            height_m,
            count,
        }
    }

    /// Classify the door by its name.
    ///
    /// ```rust
    /// use prefab_core::house::{DoorClass, DoorSpec};
    ///
    /// assert_eq!(DoorSpec::new("Ana Giriş", 1.0, 2.1, 1).class(), DoorClass::Exterior);
    /// assert_eq!(DoorSpec::new("MAIN ENTRANCE", 1.0, 2.1, 1).class(), DoorClass::Exterior);
    /// assert_eq!(DoorSpec::new("Bedroom", 0.9, 2.0, 1).class(), DoorClass::Interior);
    /// ```
    pub fn class(&self) -> DoorClass {
        let name = self.name.to_lowercase();
        if EXTERIOR_DOOR_MARKERS.iter().any(|marker| name.contains(marker)) {
            DoorClass::Exterior
        } else {
            DoorClass::Interior
        }
    }
}

/// Full house description for one estimation run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "house_type": "Bungalow",
///   "floor_count": 1,
///   "roof_type": "Gable",
///   "roof_pitch_deg": 30.0,
///   "rooms": [
///     { "name": "Salon", "length_m": 5.0, "width_m": 4.0, "height_m": 2.7,
///       "floor_covering": "Laminate Flooring", "wall_covering": "Paint" }
///   ],
///   "windows": [ { "width_m": 1.2, "height_m": 1.4, "count": 3 } ],
///   "doors": [ { "name": "Main Entrance", "width_m": 1.0, "height_m": 2.1, "count": 1 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseSpec {
    /// Free-text house type label (e.g. "Bungalow", "Duplex")
    pub house_type: String,

    /// Number of floors. Values below 1 fall back to a single floor in the
    /// roof footprint calculation.
    pub floor_count: i32,

    #[serde(default)]
    pub roof_type: RoofType,

    /// Roof pitch in degrees; ignored for flat roofs
    #[serde(default)]
    pub roof_pitch_deg: f64,

    #[serde(default)]
    pub rooms: Vec<RoomSpec>,

    #[serde(default)]
    pub windows: Vec<WindowSpec>,

    #[serde(default)]
    pub doors: Vec<DoorSpec>,
}

impl HouseSpec {
    /// Create an empty house with a flat roof.
    pub fn new(house_type: impl Into<String>, floor_count: i32) -> Self {
        HouseSpec {
            house_type: house_type.into(),
            floor_count,
            roof_type: RoofType::Flat,
            roof_pitch_deg: 0.0,
            rooms: Vec::new(),
            windows: Vec::new(),
            doors: Vec::new(),
        }
    }

    /// Set roof type and pitch and return self (builder pattern)
    pub fn with_roof(mut self, roof_type: RoofType, pitch_deg: f64) -> Self {
        self.roof_type = roof_type;
        self.roof_pitch_deg = pitch_deg;
        self
    }

    /// Add a room and return self (builder pattern)
    pub fn with_room(mut self, room: RoomSpec) -> Self {
        self.rooms.push(room);
        self
    }

    /// Add a window group and return self (builder pattern)
    pub fn with_window(mut self, window: WindowSpec) -> Self {
        self.windows.push(window);
        self
    }

    /// Add a door group and return self (builder pattern)
    pub fn with_door(mut self, door: DoorSpec) -> Self {
        self.doors.push(door);
        self
    }

    /// Validate geometry inputs.
    ///
    /// Fails on the first malformed field, naming it with its list index
    /// (e.g. `rooms[2].height_m`).
    pub fn validate(&self) -> CalcResult<()> {
        require_finite("roof_pitch_deg", self.roof_pitch_deg)?;
        if !self.roof_type.is_flat()
            && self.roof_pitch_deg > 0.0
            && Degrees(self.roof_pitch_deg).cos() <= -MIN_PITCH_COSINE
        {
            return Err(CalcError::invalid_input(
                "roof_pitch_deg",
                self.roof_pitch_deg.to_string(),
                "Pitch past vertical would produce a negative roof area",
            ));
        }

        for (i, room) in self.rooms.iter().enumerate() {
            if room.name.trim().is_empty() {
                return Err(CalcError::missing_field(format!("rooms[{}].name", i)));
            }
            require_positive(&format!("rooms[{}].length_m", i), room.length_m)?;
            require_positive(&format!("rooms[{}].width_m", i), room.width_m)?;
            require_positive(&format!("rooms[{}].height_m", i), room.height_m)?;
        }

        for (i, window) in self.windows.iter().enumerate() {
            require_non_negative(&format!("windows[{}].width_m", i), window.width_m)?;
            require_non_negative(&format!("windows[{}].height_m", i), window.height_m)?;
        }

        for (i, door) in self.doors.iter().enumerate() {
            require_non_negative(&format!("doors[{}].width_m", i), door.width_m)?;
            require_non_negative(&format!("doors[{}].height_m", i), door.height_m)?;
        }

        Ok(())
    }
}

fn require_finite(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"));
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Dimension must be positive"));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Dimension cannot be negative"));
    }
    Ok(())
}
