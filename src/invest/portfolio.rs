//! Whole-portfolio aggregation of accepted projects.

use super::types::{PortfolioSummary, Project, Recommendation, TypeTotals};

/// Sums the scaled production of every accepted generation project.
///
/// Storage projects contribute nothing. Profiles shorter than `len` only add
/// to their own indices.
pub fn combined_production(len: usize, accepted: &[(&Project, u32)]) -> Vec<f64> {
    let mut total = vec![0.0; len];
    for (project, shares) in accepted {
        let Some(production) = project.production() else {
            continue;
        };
        let k = f64::from(*shares);
        for (t, p) in total.iter_mut().zip(production) {
            *t += p * k;
        }
    }
    total
}

/// Share and capacity totals, overall and per energy type.
pub fn summarize(recommendations: &[Recommendation]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        projects_count: recommendations.len(),
        ..PortfolioSummary::default()
    };

    for rec in recommendations {
        summary.total_shares += rec.recommended_shares;
        let entry = summary
            .by_type
            .entry(rec.energy_type)
            .or_insert_with(|| TypeTotals {
                unit: rec.capacity_unit,
                ..TypeTotals::default()
            });
        entry.shares += rec.recommended_shares;
        entry.capacity += rec.capacity;
    }

    summary
}
