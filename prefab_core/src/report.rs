//! # Estimate Reports
//!
//! An [`EstimateReport`] is what gets written to disk after a run: the house
//! that was estimated, the settings used, and the resulting ledger, under a
//! versioned header.
//!
//! ## Structure
//!
//! ```text
//! EstimateReport
//! ├── meta: ReportMetadata (version, id, prepared_by, created)
//! ├── house: HouseSpec
//! ├── settings: EstimatorSettings
//! └── estimate: Estimate (lines, total, warnings, geometry)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use prefab_core::catalog::seed_catalog;
//! use prefab_core::estimate::{estimate, EstimatorSettings};
//! use prefab_core::house::HouseSpec;
//! use prefab_core::report::EstimateReport;
//!
//! let catalog = seed_catalog(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
//! let house = HouseSpec::new("Cabin", 1);
//! let settings = EstimatorSettings::default();
//! let result = estimate(&house, &catalog, &settings).unwrap();
//!
//! let report = EstimateReport::new(house, settings, result).with_prepared_by("Site Office");
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! assert!(json.contains("Site Office"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::estimate::{Estimate, EstimatorSettings};
use crate::house::HouseSpec;

/// Current schema version for saved reports
pub const REPORT_VERSION: &str = "0.1.0";

/// A saved estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub meta: ReportMetadata,
    pub house: HouseSpec,
    pub settings: EstimatorSettings,
    pub estimate: Estimate,
}

impl EstimateReport {
    /// Wrap a finished estimate with a fresh id and timestamp.
    pub fn new(house: HouseSpec, settings: EstimatorSettings, estimate: Estimate) -> Self {
        EstimateReport {
            meta: ReportMetadata {
                version: REPORT_VERSION.to_string(),
                id: Uuid::new_v4(),
                prepared_by: String::new(),
                created: Utc::now(),
            },
            house,
            settings,
            estimate,
        }
    }

    /// Set who prepared the report and return self (builder pattern)
    pub fn with_prepared_by(mut self, prepared_by: impl Into<String>) -> Self {
        self.meta.prepared_by = prepared_by.into();
        self
    }

    pub fn total_cost(&self) -> f64 {
        self.estimate.total_cost
    }
}

/// Report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Unique id of this run
    pub id: Uuid,

    /// Person or office that ran the estimate
    #[serde(default)]
    pub prepared_by: String,

    /// When the estimate was produced
    pub created: DateTime<Utc>,
}
