//! One-share scoring and benefit evaluation for a single project.

use tracing::{debug, warn};

use super::types::{AllocationParams, Candidate, NEVER_PAYS_BACK_YEARS, Project, ProjectKind};
use crate::error::Result;
use crate::sim::{EnergyFlowReport, simulate};

/// Yearly monetary value of a generation flow: avoided purchase plus export revenue.
pub fn generation_benefit(flow: &EnergyFlowReport, params: &AllocationParams) -> f64 {
    flow.self_consumed_kwh * params.electricity_price + flow.grid_export_kwh * params.feed_in_tariff
}

/// Years to recover `cost` from `annual_benefit`, or the sentinel when it never pays back.
pub fn payback_years(cost: f64, annual_benefit: f64) -> f64 {
    if annual_benefit > 0.0 {
        cost / annual_benefit
    } else {
        NEVER_PAYS_BACK_YEARS
    }
}

/// A scored project, still pointing into the caller's project slice.
#[derive(Debug, Clone)]
pub(crate) struct Scored<'a> {
    pub project: &'a Project,
    pub candidate: Candidate,
}

/// Scores every usable project with one share.
///
/// Generation projects whose production length differs from `consumption`
/// are skipped with a warning. The returned list keeps input order.
pub(crate) fn score_projects<'a>(
    consumption: &[f64],
    projects: &'a [Project],
    params: &AllocationParams,
) -> Result<Vec<Scored<'a>>> {
    let mut scored = Vec::with_capacity(projects.len());

    for project in projects {
        let (annual_benefit, self_consumption_rate_pct, autarky_rate_pct) = match &project.kind {
            ProjectKind::Generation { production, .. } => {
                if production.len() != consumption.len() {
                    warn!(
                        project = %project.id,
                        production_len = production.len(),
                        consumption_len = consumption.len(),
                        "skipping project: production length does not match consumption"
                    );
                    continue;
                }
                let flow = simulate(consumption, production, 0.0, params.interval_hours)?;
                (
                    generation_benefit(&flow, params),
                    flow.self_consumption_rate_pct,
                    flow.autarky_rate_pct,
                )
            }
            ProjectKind::Storage => (
                params
                    .storage
                    .annual_benefit(project.capacity_per_share, params.electricity_price),
                0.0,
                0.0,
            ),
        };

        let payback = payback_years(project.price_per_share, annual_benefit);
        debug!(
            project = %project.id,
            energy = %project.energy_type(),
            annual_benefit,
            payback_years = payback,
            "scored project"
        );

        scored.push(Scored {
            project,
            candidate: Candidate {
                project_id: project.id.clone(),
                project_name: project.name.clone(),
                energy_type: project.energy_type(),
                price_per_share: project.price_per_share,
                annual_benefit,
                payback_years: payback,
                self_consumption_rate_pct,
                autarky_rate_pct,
            },
        });
    }

    Ok(scored)
}

/// Orders candidates by payback, best first; ties keep input order.
pub(crate) fn rank(scored: &mut [Scored<'_>]) {
    scored.sort_by(|a, b| a.candidate.payback_years.total_cmp(&b.candidate.payback_years));
}
