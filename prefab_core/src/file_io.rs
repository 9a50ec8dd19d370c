//! # File I/O Module
//!
//! JSON file operations for house descriptions, catalog snapshots, settings,
//! and estimate reports.
//!
//! - **Atomic saves**: write to `<file>.tmp`, sync, rename over the target
//! - **Version validation**: catalog snapshots and reports are checked on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use prefab_core::catalog::seed_catalog;
//! use prefab_core::file_io::{load_catalog, save_catalog};
//! use std::path::Path;
//!
//! let catalog = seed_catalog(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())?;
//! save_catalog(&catalog, Path::new("catalog.json"))?;
//!
//! let restored = load_catalog(Path::new("catalog.json"))?;
//! assert_eq!(restored.material_count(), 8);
//! # Ok::<(), prefab_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{CatalogSnapshot, InMemoryCatalog};
use crate::errors::{CalcError, CalcResult};
use crate::estimate::EstimatorSettings;
use crate::house::HouseSpec;
use crate::report::{EstimateReport, REPORT_VERSION};

/// Serialize `value` as pretty JSON and write it atomically.
///
/// The save process:
/// 1. Serialize to JSON
/// 2. Write to `<path>.tmp`
/// 3. Sync to disk (fsync)
/// 4. Rename over `path` (atomic on most filesystems)
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "saved json");
    Ok(())
}

/// Read and parse a JSON file.
///
/// # Returns
///
/// * `Ok(T)` - Parsed value
/// * `Err(CalcError::SerializationError)` - Invalid JSON or wrong shape
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Load a house description. Dimensions are validated when it is estimated.
pub fn load_house(path: &Path) -> CalcResult<HouseSpec> {
    load_json(path)
}

/// Load estimator settings; missing fields take their defaults.
pub fn load_settings(path: &Path) -> CalcResult<EstimatorSettings> {
    let settings: EstimatorSettings = load_json(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Load a catalog snapshot and rebuild the catalog.
///
/// # Returns
///
/// * `Ok(InMemoryCatalog)` - Successfully loaded catalog
/// * `Err(CalcError::VersionMismatch)` - Snapshot version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_catalog(path: &Path) -> CalcResult<InMemoryCatalog> {
    let snapshot: CatalogSnapshot = load_json(path)?;
    InMemoryCatalog::from_snapshot(snapshot)
}

/// Save a catalog as a versioned snapshot.
pub fn save_catalog(catalog: &InMemoryCatalog, path: &Path) -> CalcResult<()> {
    save_json(&catalog.snapshot(), path)
}

/// Save an estimate report with atomic write semantics.
pub fn save_report(report: &EstimateReport, path: &Path) -> CalcResult<()> {
    save_json(report, path)
}

/// Load a saved estimate report.
///
/// # Returns
///
/// * `Ok(EstimateReport)` - Successfully loaded report
/// * `Err(CalcError::VersionMismatch)` - Report version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_report(path: &Path) -> CalcResult<EstimateReport> {
    let report: EstimateReport = load_json(path)?;
    validate_version(&report.meta.version, REPORT_VERSION)?;
    Ok(report)
}

/// Validate that a file version is compatible with the current schema.
pub(crate) fn validate_version(file_version: &str, current_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: current_version.to_string(),
    };

    // Parse semver-style versions
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = current_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
