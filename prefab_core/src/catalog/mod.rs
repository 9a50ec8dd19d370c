//! # Materials Catalog
//!
//! The estimator never owns the catalog. It reads it through the
//! [`CatalogLookup`] trait, which any store (SQL, HTTP, in-memory) can
//! implement. [`InMemoryCatalog`] is the bundled implementation used by the
//! CLI and tests.
//!
//! ## Material Resolution
//!
//! A need is resolved from a single identifier in two steps:
//!
//! 1. Exact material name (`material_by_name`)
//! 2. Category name (`material_by_category`), first material in that category
//!
//! The current price is the quote with the latest effective date; among
//! quotes on the same date the most recently inserted wins.
//!
//! ## Example
//!
//! ```rust
//! use prefab_core::catalog::{seed_catalog, CatalogLookup};
//! use chrono::NaiveDate;
//!
//! let catalog = seed_catalog(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
//!
//! // "Structural" is a category, resolved to its first material
//! let record = catalog.find_material("Structural").unwrap();
//! assert_eq!(record.definition.name, "Wall Panel");
//! assert_eq!(record.price.unwrap().unit_price, 120.0);
//! ```

pub mod memory;
pub mod seed;
pub mod types;

pub use memory::{CatalogSnapshot, InMemoryCatalog, PriceListEntry, SNAPSHOT_VERSION};
pub use seed::seed_catalog;
pub use types::{
    ApplicationDetail, ConsumptionRate, MaterialDef, MaterialId, PriceQuote, PropertyBag, Surface,
};

use serde::{Deserialize, Serialize};

/// Read-only catalog access used by the estimator.
///
/// Implementations may be backed by a shared store. The estimator makes no
/// assumption that two lookups in the same run observe the same snapshot.
pub trait CatalogLookup {
    /// Material with exactly this name
    fn material_by_name(&self, name: &str) -> Option<MaterialDef>;

    /// First material (in catalog order) whose category equals `category`
    fn material_by_category(&self, category: &str) -> Option<MaterialDef>;

    /// Current price quote for a material
    fn current_price(&self, material_id: MaterialId) -> Option<PriceQuote>;

    /// All consumption rates recorded for a material
    fn consumption_rates(&self, material_id: MaterialId) -> Vec<ConsumptionRate>;

    /// Raw property text for a (room label, surface) pair.
    ///
    /// `None` when no application detail exists or it carries no properties.
    fn application_detail(&self, room_label: &str, surface: Surface) -> Option<String>;

    /// Resolve an identifier: exact name first, then category.
    fn lookup_material(&self, identifier: &str) -> Option<MaterialDef> {
        self.material_by_name(identifier)
            .or_else(|| self.material_by_category(identifier))
    }

    /// Resolve an identifier and bundle its current price and consumption rates.
    fn find_material(&self, identifier: &str) -> Option<MaterialRecord> {
        let definition = self.lookup_material(identifier)?;
        let price = self.current_price(definition.id);
        let rates = self.consumption_rates(definition.id);
        Some(MaterialRecord {
            definition,
            price,
            rates,
        })
    }
}

/// A resolved material with its current price and consumption rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub definition: MaterialDef,
    pub price: Option<PriceQuote>,
    pub rates: Vec<ConsumptionRate>,
}

impl MaterialRecord {
    /// First consumption rate whose surface tag matches any of `tags`.
    pub fn rate_for_surface(&self, tags: &[String]) -> Option<&ConsumptionRate> {
        self.rates
            .iter()
            .find(|rate| tags.iter().any(|tag| rate.surface == *tag))
    }
}
