//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use energy_invest::invest::{AllocationParams, GenerationSource, Project};
use energy_invest::profiles::{self, SeriesShape};

/// Three days of quarter-hour intervals.
pub fn default_shape() -> SeriesShape {
    SeriesShape::from_interval_hours(0.25, 3)
}

/// Seeded household consumption for [`default_shape`].
pub fn default_consumption(seed: u64) -> Vec<f64> {
    profiles::household_consumption(default_shape(), 0.8, seed)
}

/// Seeded demo catalog aligned with [`default_consumption`].
pub fn default_catalog(seed: u64) -> Vec<Project> {
    profiles::demo_catalog(default_shape(), seed)
}

/// Solar production for `kw_peak` kW of panels, aligned with [`default_shape`].
pub fn default_solar(kw_peak: f64, seed: u64) -> Vec<f64> {
    profiles::solar_per_kw(default_shape(), seed)
        .into_iter()
        .map(|v| v * kw_peak)
        .collect()
}

/// A constant-output solar project.
pub fn flat_solar(id: &str, kw: f64, len: usize, price: f64) -> Project {
    Project::generation(id, id, GenerationSource::Solar, vec![kw; len], 1.0, price)
}

/// Default parameters with a smaller share cap to keep runs quick.
pub fn quick_params() -> AllocationParams {
    AllocationParams {
        max_shares_per_project: 20,
        ..AllocationParams::default()
    }
}

/// Fresh scratch directory under the system temp dir, unique per test name.
pub fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("energy-invest-{}-{test}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Asserts two floats agree within `tol`.
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}
