//! Projects, allocation parameters, and allocation results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::EnergyFlowReport;

/// Payback reported for a project whose estimated benefit is not positive.
pub const NEVER_PAYS_BACK_YEARS: f64 = 999.0;

/// Interval length of the source load curves (15 minutes).
pub const QUARTER_HOUR: f64 = 0.25;

/// Kind of energy a project sells shares of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Solar,
    Wind,
    Battery,
}

impl EnergyType {
    /// Unit of `capacity_per_share` for this type.
    pub fn capacity_unit(self) -> &'static str {
        match self {
            Self::Battery => "kWh",
            Self::Solar | Self::Wind => "kW",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Solar => "solar",
            Self::Wind => "wind",
            Self::Battery => "battery",
        };
        f.pad(s)
    }
}

/// Generating technology of a [`ProjectKind::Generation`] project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Solar,
    Wind,
}

/// What one share of a project delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProjectKind {
    /// A plant with a production curve, in kW per share, aligned to consumption.
    Generation {
        source: GenerationSource,
        production: Vec<f64>,
    },
    /// Battery storage; a share is `capacity_per_share` kWh.
    Storage,
}

/// A project open for share investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: ProjectKind,
    /// Nameplate capacity of one share (kW for generation, kWh for storage).
    pub capacity_per_share: f64,
    /// Price of one share.
    pub price_per_share: f64,
    /// Shares still for sale, when the catalog declares it.
    #[serde(default)]
    pub available_shares: Option<u32>,
}

impl Project {
    /// Creates a generation project.
    pub fn generation(
        id: impl Into<String>,
        name: impl Into<String>,
        source: GenerationSource,
        production: Vec<f64>,
        capacity_per_share: f64,
        price_per_share: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ProjectKind::Generation { source, production },
            capacity_per_share,
            price_per_share,
            available_shares: None,
        }
    }

    /// Creates a battery storage project.
    pub fn storage(
        id: impl Into<String>,
        name: impl Into<String>,
        capacity_per_share: f64,
        price_per_share: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ProjectKind::Storage,
            capacity_per_share,
            price_per_share,
            available_shares: None,
        }
    }

    /// Sets the declared share inventory.
    pub fn with_available_shares(mut self, shares: u32) -> Self {
        self.available_shares = Some(shares);
        self
    }

    pub fn energy_type(&self) -> EnergyType {
        match &self.kind {
            ProjectKind::Generation {
                source: GenerationSource::Solar,
                ..
            } => EnergyType::Solar,
            ProjectKind::Generation {
                source: GenerationSource::Wind,
                ..
            } => EnergyType::Wind,
            ProjectKind::Storage => EnergyType::Battery,
        }
    }

    /// Production curve per share, `None` for storage.
    pub fn production(&self) -> Option<&[f64]> {
        match &self.kind {
            ProjectKind::Generation { production, .. } => Some(production),
            ProjectKind::Storage => None,
        }
    }
}

/// Closed-form battery benefit estimate.
///
/// A share of `capacity` kWh is assumed to run `cycles_per_year` full cycles
/// at `round_trip_efficiency`; only `grid_displacement_factor` of the shifted
/// energy is counted as avoided grid purchase. These are tunable heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageHeuristic {
    pub cycles_per_year: f64,
    pub round_trip_efficiency: f64,
    pub grid_displacement_factor: f64,
}

impl StorageHeuristic {
    pub const DEFAULT_CYCLES_PER_YEAR: f64 = 365.0;
    pub const DEFAULT_ROUND_TRIP_EFFICIENCY: f64 = 0.8;
    pub const DEFAULT_GRID_DISPLACEMENT_FACTOR: f64 = 0.5;

    /// Energy moved through `capacity_kwh` of storage in one year (kWh).
    pub fn energy_shifted_kwh(&self, capacity_kwh: f64) -> f64 {
        capacity_kwh * self.cycles_per_year * self.round_trip_efficiency
    }

    /// Estimated yearly saving of `capacity_kwh` of storage.
    pub fn annual_benefit(&self, capacity_kwh: f64, electricity_price: f64) -> f64 {
        self.energy_shifted_kwh(capacity_kwh) * self.grid_displacement_factor * electricity_price
    }
}

impl Default for StorageHeuristic {
    fn default() -> Self {
        Self {
            cycles_per_year: Self::DEFAULT_CYCLES_PER_YEAR,
            round_trip_efficiency: Self::DEFAULT_ROUND_TRIP_EFFICIENCY,
            grid_displacement_factor: Self::DEFAULT_GRID_DISPLACEMENT_FACTOR,
        }
    }
}

/// Tariffs and constraints for one allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationParams {
    /// Grid purchase price per kWh.
    pub electricity_price: f64,
    /// Revenue per exported kWh.
    pub feed_in_tariff: f64,
    /// Upper bound on total investment, unbounded when `None`.
    pub budget: Option<f64>,
    /// Largest share count considered per project (>= 1).
    pub max_shares_per_project: u32,
    /// Duration of one series interval in hours.
    pub interval_hours: f64,
    pub storage: StorageHeuristic,
    /// Clamp the share search to a project's declared `available_shares`.
    pub enforce_available_shares: bool,
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            electricity_price: 0.30,
            feed_in_tariff: 0.05,
            budget: None,
            max_shares_per_project: 100,
            interval_hours: QUARTER_HOUR,
            storage: StorageHeuristic::default(),
            enforce_available_shares: false,
        }
    }
}

/// One-share score of a project, used to order the greedy search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub project_id: String,
    pub project_name: String,
    pub energy_type: EnergyType,
    pub price_per_share: f64,
    pub annual_benefit: f64,
    pub payback_years: f64,
    /// Zero for storage projects.
    pub self_consumption_rate_pct: f64,
    /// Zero for storage projects.
    pub autarky_rate_pct: f64,
}

/// Recommended purchase for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub project_id: String,
    pub project_name: String,
    pub energy_type: EnergyType,
    pub recommended_shares: u32,
    /// `recommended_shares * price_per_share`.
    pub investment_amount: f64,
    pub annual_benefit: f64,
    pub payback_years: f64,
    /// `recommended_shares * capacity_per_share`.
    pub capacity: f64,
    pub capacity_unit: &'static str,
}

/// Share and capacity totals for one energy type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeTotals {
    pub shares: u32,
    pub capacity: f64,
    pub unit: &'static str,
}

/// Counts across all recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_shares: u32,
    pub projects_count: usize,
    pub by_type: BTreeMap<EnergyType, TypeTotals>,
}

/// Complete output of [`super::allocate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    /// Recommendations in greedy order.
    pub recommendations: Vec<Recommendation>,
    /// Every scored project, best payback first.
    pub ranking: Vec<Candidate>,
    pub total_investment: f64,
    /// `baseline - grid cost + export revenue` for the whole portfolio.
    pub annual_savings: f64,
    /// `total_investment / annual_savings`, absent when savings are not positive.
    pub payback_period_years: Option<f64>,
    /// Yearly grid cost without any investment.
    pub baseline_annual_cost: f64,
    /// Grid cost minus export revenue with the portfolio in place.
    pub new_annual_cost: f64,
    /// Flows of the combined portfolio against the original consumption.
    pub energy_metrics: EnergyFlowReport,
    pub summary: PortfolioSummary,
}
