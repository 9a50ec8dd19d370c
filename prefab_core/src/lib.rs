//! # prefab_core - Prefabricated House Estimation Engine
//!
//! `prefab_core` turns a geometric house description into a priced bill of
//! materials. It resolves room, opening, and roof areas, looks each need up in
//! a materials catalog, and builds an ordered cost ledger with a grand total.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `resolve` and `estimate` are pure functions over an immutable house
//! - **Catalog as a contract**: the estimator only reads through [`catalog::CatalogLookup`]
//! - **Rich Errors**: invalid input is a structured [`CalcError`]; unpriceable
//!   lines are structured warnings returned with the result
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use prefab_core::catalog::seed_catalog;
//! use prefab_core::estimate::estimate_with_defaults;
//! use prefab_core::house::{DoorSpec, HouseSpec, RoofType, RoomSpec, WindowSpec};
//!
//! let catalog = seed_catalog(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
//!
//! let house = HouseSpec::new("Bungalow", 1)
//!     .with_roof(RoofType::Gable, 30.0)
//!     .with_room(RoomSpec::new("Living Room", 5.0, 4.0, 2.7, "Laminate Flooring", "Paint"))
//!     .with_room(RoomSpec::new("Bathroom", 2.5, 2.0, 2.5, "Tile", "Paint"))
//!     .with_window(WindowSpec::new(1.2, 1.4, 3))
//!     .with_door(DoorSpec::new("Main Entrance", 1.0, 2.1, 1));
//!
//! let estimate = estimate_with_defaults(&house, &catalog).unwrap();
//! for line in &estimate.lines {
//!     println!("{}: {:.2}", line.label, line.cost);
//! }
//! println!("Total: {:.2}", estimate.total_cost);
//! assert!(estimate.passes_invariants());
//! ```
//!
//! ## Modules
//!
//! - [`house`] - House, room, window, and door descriptions
//! - [`geometry`] - Area resolution (floors, walls, openings, roof)
//! - [`catalog`] - Catalog lookup contract, in-memory catalog, seed data
//! - [`estimate`] - Material estimator and its settings
//! - [`report`] - Versioned, saved estimation runs
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error and warning types
//! - [`file_io`] - JSON loading and atomic saves

pub mod catalog;
pub mod errors;
pub mod estimate;
pub mod file_io;
pub mod geometry;
pub mod house;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catalog::{CatalogLookup, InMemoryCatalog};
pub use errors::{CalcError, CalcResult, EstimateWarning};
pub use estimate::{estimate, estimate_with_defaults, Estimate, EstimatorSettings, MaterialNeedLine};
pub use geometry::{resolve, HouseGeometry};
pub use house::HouseSpec;
pub use report::EstimateReport;
