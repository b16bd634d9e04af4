//! Integration tests for the greedy allocator.

mod common;

use common::assert_close;
use energy_invest::invest::{AllocationParams, EnergyType, NEVER_PAYS_BACK_YEARS, Project};
use energy_invest::{OptimizeError, allocate, simulate};

#[test]
fn flat_solar_fills_share_cap_when_export_pays() {
    let projects = [common::flat_solar("pv", 4.0, 4, 100.0)];
    let params = AllocationParams {
        max_shares_per_project: 5,
        ..AllocationParams::default()
    };
    let result = allocate(&[4.0; 4], &projects, &params).unwrap();

    assert_close(result.ranking[0].annual_benefit, 1.2, 1e-9);
    let rec = &result.recommendations[0];
    assert_eq!(rec.recommended_shares, 5);
    assert_close(rec.annual_benefit, 2.0, 1e-9);
    assert_close(result.total_investment, 500.0, 1e-9);
    assert_close(result.energy_metrics.autarky_rate_pct, 100.0, 1e-9);
}

#[test]
fn flat_solar_stops_at_first_share_without_feed_in() {
    let projects = [common::flat_solar("pv", 4.0, 4, 100.0)];
    let params = AllocationParams {
        max_shares_per_project: 5,
        feed_in_tariff: 0.0,
        ..AllocationParams::default()
    };
    let result = allocate(&[4.0; 4], &projects, &params).unwrap();
    assert_eq!(result.recommendations[0].recommended_shares, 1);
    assert_close(result.annual_savings, 1.2, 1e-9);
}

#[test]
fn battery_heuristic_matches_closed_form() {
    let projects = [Project::storage("bat", "Pack", 10.0, 2000.0)];
    let params = AllocationParams {
        max_shares_per_project: 1,
        ..AllocationParams::default()
    };
    let result = allocate(&[1.0; 8], &projects, &params).unwrap();

    let candidate = &result.ranking[0];
    assert_eq!(candidate.energy_type, EnergyType::Battery);
    assert_close(candidate.annual_benefit, 438.0, 1e-9);
    assert_close(candidate.payback_years, 2000.0 / 438.0, 1e-9);
    assert_eq!(result.recommendations[0].capacity_unit, "kWh");
}

#[test]
fn ranking_is_sorted_by_payback() {
    let consumption = common::default_consumption(42);
    let projects = common::default_catalog(42);
    let result = allocate(&consumption, &projects, &common::quick_params()).unwrap();

    assert_eq!(result.ranking.len(), projects.len());
    for pair in result.ranking.windows(2) {
        assert!(pair[0].payback_years <= pair[1].payback_years);
    }
}

#[test]
fn budget_is_never_exceeded() {
    let consumption = common::default_consumption(42);
    let projects = common::default_catalog(42);

    for budget in [0.0, 500.0, 3_000.0, 12_345.0] {
        let params = AllocationParams {
            budget: Some(budget),
            ..common::quick_params()
        };
        let result = allocate(&consumption, &projects, &params).unwrap();
        assert!(
            result.total_investment <= budget + 1e-9,
            "budget {budget} exceeded: {}",
            result.total_investment
        );
        let sum: f64 = result
            .recommendations
            .iter()
            .map(|r| r.investment_amount)
            .sum();
        assert_close(sum, result.total_investment, 1e-6);
    }
}

#[test]
fn zero_budget_recommends_nothing() {
    let consumption = common::default_consumption(3);
    let projects = common::default_catalog(3);
    let params = AllocationParams {
        budget: Some(0.0),
        ..common::quick_params()
    };
    let result = allocate(&consumption, &projects, &params).unwrap();
    assert!(result.recommendations.is_empty());
    assert_eq!(result.total_investment, 0.0);
    assert_eq!(result.payback_period_years, None);
}

#[test]
fn portfolio_metrics_match_a_direct_simulation() {
    let consumption = common::default_consumption(42);
    let projects = common::default_catalog(42);
    let params = common::quick_params();
    let result = allocate(&consumption, &projects, &params).unwrap();

    let mut combined = vec![0.0; consumption.len()];
    for rec in &result.recommendations {
        let project = projects.iter().find(|p| p.id == rec.project_id).unwrap();
        if let Some(production) = project.production() {
            for (c, p) in combined.iter_mut().zip(production) {
                *c += p * f64::from(rec.recommended_shares);
            }
        }
    }
    let direct = simulate(&consumption, &combined, 0.0, params.interval_hours).unwrap();
    assert_eq!(result.energy_metrics, direct);

    assert_close(
        result.baseline_annual_cost - result.new_annual_cost,
        result.annual_savings,
        1e-6,
    );
}

#[test]
fn summary_totals_match_recommendations() {
    let consumption = common::default_consumption(5);
    let projects = common::default_catalog(5);
    let result = allocate(&consumption, &projects, &common::quick_params()).unwrap();

    let shares: u32 = result
        .recommendations
        .iter()
        .map(|r| r.recommended_shares)
        .sum();
    assert_eq!(result.summary.total_shares, shares);
    assert_eq!(result.summary.projects_count, result.recommendations.len());
    let by_type: u32 = result.summary.by_type.values().map(|t| t.shares).sum();
    assert_eq!(by_type, shares);
}

#[test]
fn allocation_is_deterministic() {
    let consumption = common::default_consumption(11);
    let projects = common::default_catalog(11);
    let a = allocate(&consumption, &projects, &common::quick_params()).unwrap();
    let b = allocate(&consumption, &projects, &common::quick_params()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn recommendations_all_pay_back() {
    let consumption = common::default_consumption(42);
    let projects = common::default_catalog(42);
    let result = allocate(&consumption, &projects, &common::quick_params()).unwrap();
    for rec in &result.recommendations {
        assert!(rec.recommended_shares >= 1);
        assert!(rec.annual_benefit > 0.0);
        assert!(rec.payback_years < NEVER_PAYS_BACK_YEARS);
    }
}

#[test]
fn mismatched_projects_only_is_an_error() {
    let projects = [common::flat_solar("short", 1.0, 3, 100.0)];
    let err = allocate(&[1.0; 4], &projects, &AllocationParams::default()).unwrap_err();
    assert_eq!(err, OptimizeError::NoEligibleProjects);
}
