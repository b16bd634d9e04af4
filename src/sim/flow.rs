//! Interval-by-interval energy-flow replay: self-consumption, export, import.

use std::fmt;

use serde::Serialize;

use super::storage::StorageBuffer;
use crate::error::{OptimizeError, Result};

/// Aggregate energy flows for one consumption/production pairing.
///
/// All energies are in kWh; rates are percentages in `[0, 100]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnergyFlowReport {
    /// Total consumed energy (kWh).
    pub total_consumption_kwh: f64,
    /// Total produced energy (kWh).
    pub total_production_kwh: f64,
    /// Energy consumed from own production, directly or via storage (kWh).
    pub self_consumed_kwh: f64,
    /// Energy bought from the grid (kWh).
    pub grid_import_kwh: f64,
    /// Energy fed into the grid (kWh).
    pub grid_export_kwh: f64,
    /// `self_consumed / total_production`, in percent.
    pub self_consumption_rate_pct: f64,
    /// `self_consumed / total_consumption`, in percent.
    pub autarky_rate_pct: f64,
    /// Energy absorbed by the battery over the pass (kWh).
    pub battery_charged_kwh: f64,
    /// Energy delivered by the battery over the pass (kWh).
    pub battery_discharged_kwh: f64,
    /// Energy left in the battery after the last interval (kWh).
    pub final_battery_kwh: f64,
}

/// Replays `consumption` against `production` and reports the energy flows.
///
/// Both series hold interval-average power in kW and must be aligned
/// index-for-index. Sums are accumulated in kW and converted to kWh at the end
/// by multiplying with `interval_hours`.
///
/// The battery works in the same accumulated units: each interval it charges
/// `min(surplus, capacity - level)` or discharges `min(deficit, level)`, with
/// `battery_capacity_kwh` compared directly against the level. A capacity of
/// zero disables storage. The battery totals in the report are scaled by
/// `interval_hours` like the other energies.
///
/// # Errors
///
/// - `LengthMismatch` if the series lengths differ.
/// - `InvalidParameter` if `interval_hours` is not a positive finite number or
///   `battery_capacity_kwh` is negative or not finite.
///
/// # Examples
///
/// ```
/// use energy_invest::sim::simulate;
///
/// let r = simulate(&[4.0; 4], &[4.0; 4], 0.0, 0.25).unwrap();
/// assert_eq!(r.self_consumed_kwh, 4.0);
/// assert_eq!(r.autarky_rate_pct, 100.0);
/// ```
pub fn simulate(
    consumption: &[f64],
    production: &[f64],
    battery_capacity_kwh: f64,
    interval_hours: f64,
) -> Result<EnergyFlowReport> {
    if consumption.len() != production.len() {
        return Err(OptimizeError::LengthMismatch {
            consumption: consumption.len(),
            production: production.len(),
        });
    }
    if !(interval_hours.is_finite() && interval_hours > 0.0) {
        return Err(OptimizeError::invalid("interval_hours", "must be > 0"));
    }
    if !(battery_capacity_kwh.is_finite() && battery_capacity_kwh >= 0.0) {
        return Err(OptimizeError::invalid("battery_capacity_kwh", "must be >= 0"));
    }

    let mut battery = StorageBuffer::empty(battery_capacity_kwh);
    let mut total_consumption = 0.0_f64;
    let mut total_production = 0.0_f64;
    let mut self_consumed = 0.0_f64;
    let mut grid_import = 0.0_f64;
    let mut grid_export = 0.0_f64;

    for (&cons, &prod) in consumption.iter().zip(production) {
        total_consumption += cons;
        total_production += prod;

        let net = prod - cons;
        if net >= 0.0 {
            self_consumed += cons;
            let charged = battery.charge(net);
            grid_export += net - charged;
        } else {
            self_consumed += prod;
            let deficit = -net;
            let discharged = battery.discharge(deficit);
            self_consumed += discharged;
            grid_import += deficit - discharged;
        }
    }

    let self_consumption_rate_pct = if total_production > 0.0 {
        self_consumed / total_production * 100.0
    } else {
        0.0
    };
    let autarky_rate_pct = if total_consumption > 0.0 {
        self_consumed / total_consumption * 100.0
    } else {
        0.0
    };

    Ok(EnergyFlowReport {
        total_consumption_kwh: total_consumption * interval_hours,
        total_production_kwh: total_production * interval_hours,
        self_consumed_kwh: self_consumed * interval_hours,
        grid_import_kwh: grid_import * interval_hours,
        grid_export_kwh: grid_export * interval_hours,
        self_consumption_rate_pct,
        autarky_rate_pct,
        battery_charged_kwh: battery.charged() * interval_hours,
        battery_discharged_kwh: battery.discharged() * interval_hours,
        final_battery_kwh: battery.level() * interval_hours,
    })
}

impl fmt::Display for EnergyFlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Consumption:        {:.2} kWh", self.total_consumption_kwh)?;
        writeln!(f, "Production:         {:.2} kWh", self.total_production_kwh)?;
        writeln!(f, "Self-consumed:      {:.2} kWh", self.self_consumed_kwh)?;
        writeln!(f, "Grid import:        {:.2} kWh", self.grid_import_kwh)?;
        writeln!(f, "Grid export:        {:.2} kWh", self.grid_export_kwh)?;
        writeln!(
            f,
            "Self-consumption:   {:.2}%",
            self.self_consumption_rate_pct
        )?;
        write!(f, "Autarky:            {:.2}%", self.autarky_rate_pct)
    }
}
