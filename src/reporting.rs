//! Human-readable rendering of allocation results.

use std::fmt;

use crate::invest::AllocationResult;

impl fmt::Display for AllocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Project Ranking (1 share) ---")?;
        for (i, c) in self.ranking.iter().enumerate() {
            writeln!(
                f,
                "{:>2}. {:<28} {:<8} payback={:>7.2} y  benefit={:>9.2}/y",
                i + 1,
                c.project_name,
                c.energy_type,
                c.payback_years,
                c.annual_benefit,
            )?;
        }

        writeln!(f)?;
        writeln!(f, "--- Recommendations ---")?;
        if self.recommendations.is_empty() {
            writeln!(f, "(none)")?;
        }
        for r in &self.recommendations {
            writeln!(
                f,
                "{:<28} {:>4} shares  {:>10.2} invested  {:>8.2}/y  payback={:.2} y  {:.2} {}",
                r.project_name,
                r.recommended_shares,
                r.investment_amount,
                r.annual_benefit,
                r.payback_years,
                r.capacity,
                r.capacity_unit,
            )?;
        }

        writeln!(f)?;
        writeln!(f, "--- Portfolio ---")?;
        writeln!(f, "Total investment:      {:.2}", self.total_investment)?;
        writeln!(f, "Baseline annual cost:  {:.2}", self.baseline_annual_cost)?;
        writeln!(f, "New annual cost:       {:.2}", self.new_annual_cost)?;
        writeln!(f, "Annual savings:        {:.2}", self.annual_savings)?;
        match self.payback_period_years {
            Some(years) => writeln!(f, "Payback period:        {years:.2} years")?,
            None => writeln!(f, "Payback period:        never")?,
        }
        writeln!(
            f,
            "Shares:                {} across {} projects",
            self.summary.total_shares, self.summary.projects_count
        )?;
        for (energy, totals) in &self.summary.by_type {
            writeln!(
                f,
                "  {:<8} {:>4} shares  {:.2} {}",
                energy, totals.shares, totals.capacity, totals.unit
            )?;
        }

        writeln!(f)?;
        write!(f, "{}", self.energy_metrics)
    }
}
