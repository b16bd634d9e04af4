//! Greedy share allocation against a shrinking residual consumption series.

use tracing::{debug, info};

use super::portfolio::{combined_production, summarize};
use super::scoring::{generation_benefit, payback_years, rank, score_projects};
use super::types::{AllocationParams, AllocationResult, Project, ProjectKind, Recommendation};
use crate::error::{OptimizeError, Result};
use crate::sim::simulate;

/// Best share count found for one project.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ShareChoice {
    shares: u32,
    annual_benefit: f64,
}

/// Recommends share purchases that lower the consumer's net electricity cost.
///
/// Projects are ranked by one-share payback (best first, stable on ties) and
/// then visited once each. For every project the search tries each share
/// count from 1 up to the cap, stops as soon as the cumulative investment
/// would exceed the budget, and keeps the count with the highest annual
/// benefit. Generation projects are evaluated against the consumption that
/// earlier picks left uncovered; storage projects use the closed-form
/// [`StorageHeuristic`](super::StorageHeuristic) estimate.
///
/// Portfolio metrics come from one final simulation of the combined
/// generation against the original consumption.
///
/// # Errors
///
/// - `InvalidParameter` for negative prices or tariffs, a zero share cap, a
///   negative budget, a non-positive interval, or a negative project price.
/// - `NoEligibleProjects` if `projects` is empty or every project was skipped
///   for a production length mismatch.
pub fn allocate(
    consumption: &[f64],
    projects: &[Project],
    params: &AllocationParams,
) -> Result<AllocationResult> {
    validate(projects, params)?;
    if projects.is_empty() {
        return Err(OptimizeError::NoEligibleProjects);
    }

    let baseline_kwh = consumption.iter().sum::<f64>() * params.interval_hours;
    let baseline_annual_cost = baseline_kwh * params.electricity_price;

    let mut scored = score_projects(consumption, projects, params)?;
    if scored.is_empty() {
        return Err(OptimizeError::NoEligibleProjects);
    }
    rank(&mut scored);

    let mut residual = consumption.to_vec();
    let mut scaled = vec![0.0; consumption.len()];
    let mut accepted: Vec<(&Project, u32)> = Vec::new();
    let mut recommendations = Vec::new();
    let mut total_investment = 0.0_f64;

    for entry in &scored {
        if params.budget.is_some_and(|b| total_investment >= b) {
            debug!(total_investment, "budget exhausted, stopping allocation");
            break;
        }

        let project = entry.project;
        let max_shares = share_cap(project, params);

        let choice = match &project.kind {
            ProjectKind::Generation { production, .. } => best_share_count(
                project.price_per_share,
                max_shares,
                total_investment,
                params.budget,
                |shares| {
                    scale_into(&mut scaled, production, shares);
                    let flow = simulate(&residual, &scaled, 0.0, params.interval_hours)?;
                    Ok(generation_benefit(&flow, params))
                },
            )?,
            ProjectKind::Storage => best_share_count(
                project.price_per_share,
                max_shares,
                total_investment,
                params.budget,
                |shares| {
                    let capacity = project.capacity_per_share * f64::from(shares);
                    Ok(params
                        .storage
                        .annual_benefit(capacity, params.electricity_price))
                },
            )?,
        };

        let Some(choice) = choice else {
            debug!(project = %project.id, "no share count with positive benefit");
            continue;
        };

        if let Some(production) = project.production() {
            subtract_floored(&mut residual, production, choice.shares);
        }

        let investment_amount = f64::from(choice.shares) * project.price_per_share;
        let energy_type = project.energy_type();
        debug!(
            project = %project.id,
            shares = choice.shares,
            investment_amount,
            annual_benefit = choice.annual_benefit,
            "accepted project"
        );

        recommendations.push(Recommendation {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            energy_type,
            recommended_shares: choice.shares,
            investment_amount,
            annual_benefit: choice.annual_benefit,
            payback_years: payback_years(investment_amount, choice.annual_benefit),
            capacity: project.capacity_per_share * f64::from(choice.shares),
            capacity_unit: energy_type.capacity_unit(),
        });
        accepted.push((project, choice.shares));
        total_investment += investment_amount;
    }

    let portfolio = combined_production(consumption.len(), &accepted);
    let energy_metrics = simulate(consumption, &portfolio, 0.0, params.interval_hours)?;

    let annual_grid_cost = energy_metrics.grid_import_kwh * params.electricity_price;
    let annual_export_revenue = energy_metrics.grid_export_kwh * params.feed_in_tariff;
    let annual_savings = baseline_annual_cost - annual_grid_cost + annual_export_revenue;
    let payback_period_years = (annual_savings > 0.0).then(|| total_investment / annual_savings);

    info!(
        recommended = recommendations.len(),
        total_investment,
        annual_savings,
        "allocation complete"
    );

    Ok(AllocationResult {
        summary: summarize(&recommendations),
        recommendations,
        ranking: scored.into_iter().map(|s| s.candidate).collect(),
        total_investment,
        annual_savings,
        payback_period_years,
        baseline_annual_cost,
        new_annual_cost: annual_grid_cost - annual_export_revenue,
        energy_metrics,
    })
}

/// Tries every share count in `1..=max_shares` within budget and keeps the best.
///
/// Only a strictly higher benefit replaces the current best, so a plateau
/// keeps the smallest share count. Returns `None` when no count has a
/// positive benefit.
fn best_share_count(
    price_per_share: f64,
    max_shares: u32,
    spent: f64,
    budget: Option<f64>,
    mut benefit_of: impl FnMut(u32) -> Result<f64>,
) -> Result<Option<ShareChoice>> {
    let mut best: Option<ShareChoice> = None;
    let mut best_benefit = 0.0_f64;

    for shares in 1..=max_shares {
        let investment = f64::from(shares) * price_per_share;
        if budget.is_some_and(|b| spent + investment > b) {
            break;
        }

        let annual_benefit = benefit_of(shares)?;
        if annual_benefit > best_benefit {
            best_benefit = annual_benefit;
            best = Some(ShareChoice {
                shares,
                annual_benefit,
            });
        }
    }

    Ok(best)
}

fn share_cap(project: &Project, params: &AllocationParams) -> u32 {
    match project.available_shares {
        Some(available) if params.enforce_available_shares => {
            params.max_shares_per_project.min(available)
        }
        _ => params.max_shares_per_project,
    }
}

fn scale_into(out: &mut [f64], production: &[f64], shares: u32) {
    let k = f64::from(shares);
    for (o, p) in out.iter_mut().zip(production) {
        *o = p * k;
    }
}

fn subtract_floored(residual: &mut [f64], production: &[f64], shares: u32) {
    let k = f64::from(shares);
    for (r, p) in residual.iter_mut().zip(production) {
        *r = (*r - p * k).max(0.0);
    }
}

fn validate(projects: &[Project], params: &AllocationParams) -> Result<()> {
    non_negative("electricity_price", params.electricity_price)?;
    non_negative("feed_in_tariff", params.feed_in_tariff)?;
    if let Some(budget) = params.budget {
        non_negative("budget", budget)?;
    }
    if params.max_shares_per_project == 0 {
        return Err(OptimizeError::invalid("max_shares_per_project", "must be >= 1"));
    }
    if !(params.interval_hours.is_finite() && params.interval_hours > 0.0) {
        return Err(OptimizeError::invalid("interval_hours", "must be > 0"));
    }
    non_negative("storage.cycles_per_year", params.storage.cycles_per_year)?;
    non_negative("storage.round_trip_efficiency", params.storage.round_trip_efficiency)?;
    non_negative("storage.grid_displacement_factor", params.storage.grid_displacement_factor)?;

    for project in projects {
        if !(project.price_per_share.is_finite() && project.price_per_share >= 0.0) {
            return Err(OptimizeError::invalid(
                "price_per_share",
                format!("project `{}` has price {}", project.id, project.price_per_share),
            ));
        }
        if !(project.capacity_per_share.is_finite() && project.capacity_per_share >= 0.0) {
            return Err(OptimizeError::invalid(
                "capacity_per_share",
                format!("project `{}` has capacity {}", project.id, project.capacity_per_share),
            ));
        }
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OptimizeError::invalid(name, format!("must be >= 0, got {value}")))
    }
}
