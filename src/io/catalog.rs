//! Loaders for consumption curves, the project catalog, and production curves.
//!
//! On-disk layout:
//! - consumption: CSV with a header row, then `timestamp,value` rows (kW).
//! - catalog: JSON array of project entries (`list.json`).
//! - production: one JSON array of `{ timestamp, value }` per project, named
//!   `<project id>.json`, inside a production directory.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::invest::{EnergyType, GenerationSource, Project};

/// Share price assumed when the catalog omits it.
const DEFAULT_PRICE_PER_SHARE: f64 = 1000.0;
/// Capacity per share assumed when the catalog omits it.
const DEFAULT_CAPACITY_PER_SHARE: f64 = 1.0;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A numeric value that may be stored as a JSON number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Sample {
    #[serde(default)]
    value: Option<Numeric>,
}

#[derive(Debug, Default, Deserialize)]
struct Quantity {
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ShareTerms {
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    available: Option<u32>,
}

/// One entry of `list.json`. Unknown keys (location, images, ...) are ignored.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    energy: Option<String>,
    #[serde(default)]
    capacity: Option<Quantity>,
    #[serde(default)]
    capacity_per_share: Option<Quantity>,
    #[serde(default)]
    shares: Option<ShareTerms>,
}

impl CatalogEntry {
    fn energy_type(&self) -> Option<EnergyType> {
        match self.energy.as_deref()?.trim().to_ascii_lowercase().as_str() {
            "solar" | "pv" => Some(EnergyType::Solar),
            "wind" => Some(EnergyType::Wind),
            "battery" => Some(EnergyType::Battery),
            _ => None,
        }
    }

    /// Per-share capacity, falling back to the plant capacity, then to 1.0.
    fn capacity_per_share(&self) -> f64 {
        self.capacity_per_share
            .as_ref()
            .and_then(|q| q.value)
            .or_else(|| self.capacity.as_ref().and_then(|q| q.value))
            .unwrap_or(DEFAULT_CAPACITY_PER_SHARE)
    }

    fn price_per_share(&self) -> f64 {
        self.shares
            .as_ref()
            .and_then(|s| s.price)
            .unwrap_or(DEFAULT_PRICE_PER_SHARE)
    }

    fn available_shares(&self) -> Option<u32> {
        self.shares.as_ref().and_then(|s| s.available)
    }

    fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.clone())
    }
}

/// Parses a `timestamp,value` CSV body; rows with a missing or non-numeric value are skipped.
///
/// # Errors
///
/// Returns a `csv::Error` if the input is not readable CSV.
pub fn parse_series_csv(reader: impl Read) -> Result<Vec<f64>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut series = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(v) = record.get(1).and_then(|s| s.trim().parse::<f64>().ok()) {
            series.push(v);
        }
    }
    Ok(series)
}

/// Reads a consumption curve from a CSV file.
///
/// # Errors
///
/// Returns a `CatalogError` if the file cannot be opened or parsed.
pub fn read_series_csv(path: &Path) -> Result<Vec<f64>, CatalogError> {
    let file = open(path)?;
    parse_series_csv(BufReader::new(file)).map_err(|source| CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a production curve from a JSON array of `{ timestamp, value }`.
///
/// Missing or non-numeric values count as 0 so the curve stays aligned.
///
/// # Errors
///
/// Returns a `serde_json::Error` if the input is not such an array.
pub fn parse_production_json(reader: impl Read) -> Result<Vec<f64>, serde_json::Error> {
    let samples: Vec<Sample> = serde_json::from_reader(reader)?;
    Ok(samples
        .iter()
        .map(|s| s.value.as_ref().and_then(Numeric::as_f64).unwrap_or(0.0))
        .collect())
}

/// Reads a production curve from a JSON file.
///
/// # Errors
///
/// Returns a `CatalogError` if the file cannot be opened or parsed.
pub fn read_production_json(path: &Path) -> Result<Vec<f64>, CatalogError> {
    let file = open(path)?;
    parse_production_json(BufReader::new(file)).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the catalog and attaches production curves from `production_dir`.
///
/// Only solar and wind entries read `<production_dir>/<id>.json`. Battery
/// entries are loaded from the catalog alone: no production file is required
/// for them, and one that exists is neither read nor length-checked. This is
/// looser than a layout that expects a production file for every project.
///
/// Generation projects without a production file, and entries with an unknown
/// energy type, are skipped with a warning. Curves longer than
/// `consumption_len` are truncated to it.
///
/// # Errors
///
/// Returns a `CatalogError` if the catalog or an existing production file
/// cannot be read or parsed.
pub fn load_catalog(
    catalog_path: &Path,
    production_dir: &Path,
    consumption_len: usize,
) -> Result<Vec<Project>, CatalogError> {
    let file = open(catalog_path)?;
    let entries: Vec<CatalogEntry> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CatalogError::Json {
            path: catalog_path.to_path_buf(),
            source,
        })?;

    let mut projects = Vec::with_capacity(entries.len());
    for entry in &entries {
        let Some(energy_type) = entry.energy_type() else {
            warn!(project = %entry.id, energy = ?entry.energy, "skipping project: unknown energy type");
            continue;
        };

        let project = match energy_type {
            EnergyType::Battery => Project::storage(
                entry.id.clone(),
                entry.display_name(),
                entry.capacity_per_share(),
                entry.price_per_share(),
            ),
            EnergyType::Solar | EnergyType::Wind => {
                let path = production_dir.join(format!("{}.json", entry.id));
                if !path.exists() {
                    warn!(project = %entry.id, path = %path.display(), "production file not found");
                    continue;
                }
                let mut production = read_production_json(&path)?;
                if production.len() > consumption_len {
                    warn!(
                        project = %entry.id,
                        production_len = production.len(),
                        consumption_len,
                        "truncating production to consumption length"
                    );
                    production.truncate(consumption_len);
                }
                let source = if energy_type == EnergyType::Wind {
                    GenerationSource::Wind
                } else {
                    GenerationSource::Solar
                };
                Project::generation(
                    entry.id.clone(),
                    entry.display_name(),
                    source,
                    production,
                    entry.capacity_per_share(),
                    entry.price_per_share(),
                )
            }
        };

        let project = match entry.available_shares() {
            Some(n) => project.with_available_shares(n),
            None => project,
        };
        info!(
            project = %project.id,
            energy = %energy_type,
            price_per_share = project.price_per_share,
            "loaded project"
        );
        projects.push(project);
    }

    Ok(projects)
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}
