//! API request and error types.

use serde::{Deserialize, Serialize};

use crate::invest::{AllocationParams, Project};

/// Body of `POST /optimize`.
///
/// Optional fields fall back to the server configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizeRequest {
    /// Consumption in kW per interval.
    pub consumption: Vec<f64>,
    pub projects: Vec<Project>,
    #[serde(default)]
    pub electricity_price: Option<f64>,
    #[serde(default)]
    pub feed_in_tariff: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub max_shares_per_project: Option<u32>,
}

impl OptimizeRequest {
    /// Applies the request overrides on top of `base`.
    pub fn params(&self, base: AllocationParams) -> AllocationParams {
        AllocationParams {
            electricity_price: self.electricity_price.unwrap_or(base.electricity_price),
            feed_in_tariff: self.feed_in_tariff.unwrap_or(base.feed_in_tariff),
            budget: self.budget.or(base.budget),
            max_shares_per_project: self
                .max_shares_per_project
                .unwrap_or(base.max_shares_per_project),
            ..base
        }
    }
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
