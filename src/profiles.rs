//! Seeded synthetic interval series for demos and tests.
//!
//! Every generator owns a `StdRng` seeded from its arguments, so the same
//! inputs always produce the same series.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::invest::{GenerationSource, Project};

/// Layout of a synthetic series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesShape {
    /// Number of intervals per day (96 for 15-minute data).
    pub steps_per_day: usize,
    /// Number of days.
    pub days: usize,
}

impl SeriesShape {
    /// Creates a shape from the interval length in hours.
    ///
    /// # Panics
    ///
    /// Panics if `interval_hours` does not divide a day into at least one step.
    pub fn from_interval_hours(interval_hours: f64, days: usize) -> Self {
        let steps_per_day = (24.0 / interval_hours).round() as usize;
        assert!(steps_per_day > 0, "interval_hours must be <= 24");
        Self {
            steps_per_day,
            days,
        }
    }

    pub fn len(&self) -> usize {
        self.steps_per_day * self.days
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position within the day in `[0, 1)` for interval `t`.
    fn day_pos(&self, t: usize) -> f64 {
        (t % self.steps_per_day) as f64 / self.steps_per_day as f64
    }
}

/// Gaussian noise via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    z0 * std_dev
}

/// Household consumption: sinusoidal daily swing around `base_kw` plus noise.
///
/// Values are clamped at zero. Peaks fall in the evening.
pub fn household_consumption(shape: SeriesShape, base_kw: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let amp_kw = base_kw * 0.8;
    let phase_rad = 1.2;

    (0..shape.len())
        .map(|t| {
            let angle = 2.0 * PI * shape.day_pos(t) + phase_rad;
            let kw = base_kw + amp_kw * angle.sin() + gaussian_noise(&mut rng, base_kw * 0.06);
            kw.max(0.0)
        })
        .collect()
}

/// Solar output per kW of capacity: half-cosine between 06:00 and 18:00.
pub fn solar_per_kw(shape: SeriesShape, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..shape.len())
        .map(|t| {
            let pos = shape.day_pos(t);
            let (sunrise, sunset) = (0.25, 0.75);
            if pos < sunrise || pos >= sunset {
                return 0.0;
            }
            let x = (pos - sunrise) / (sunset - sunrise);
            let frac = (PI * (x - 0.5)).cos();
            (frac * (1.0 + gaussian_noise(&mut rng, 0.05))).clamp(0.0, 1.0)
        })
        .collect()
}

/// Wind output per kW of capacity: AR(1) process around a mean capacity factor.
pub fn wind_per_kw(shape: SeriesShape, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mean = 0.3;
    let alpha = 0.95;
    let mut state = mean;

    (0..shape.len())
        .map(|_| {
            state = mean + alpha * (state - mean) + gaussian_noise(&mut rng, 0.05);
            state = state.clamp(0.0, 1.0);
            state
        })
        .collect()
}

/// A small demo catalog: two solar parks, one wind farm and one battery.
///
/// Production curves are per share and aligned to `shape`.
pub fn demo_catalog(shape: SeriesShape, seed: u64) -> Vec<Project> {
    let scale = |curve: Vec<f64>, kw: f64| curve.into_iter().map(|v| v * kw).collect::<Vec<_>>();

    vec![
        Project::generation(
            "solar-roof",
            "Rooftop Solar Cooperative",
            GenerationSource::Solar,
            scale(solar_per_kw(shape, seed), 0.5),
            0.5,
            450.0,
        )
        .with_available_shares(200),
        Project::generation(
            "solar-field",
            "Field Solar Park",
            GenerationSource::Solar,
            scale(solar_per_kw(shape, seed.wrapping_add(1)), 1.0),
            1.0,
            800.0,
        )
        .with_available_shares(500),
        Project::generation(
            "wind-ridge",
            "Ridge Wind Farm",
            GenerationSource::Wind,
            scale(wind_per_kw(shape, seed.wrapping_add(2)), 1.0),
            1.0,
            1200.0,
        )
        .with_available_shares(300),
        Project::storage("battery-hub", "Community Battery", 5.0, 2500.0).with_available_shares(50),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_hour_day() -> SeriesShape {
        SeriesShape::from_interval_hours(0.25, 1)
    }

    #[test]
    fn shape_from_interval() {
        let s = quarter_hour_day();
        assert_eq!(s.steps_per_day, 96);
        assert_eq!(s.len(), 96);
        assert_eq!(SeriesShape::from_interval_hours(24.0, 5).len(), 5);
    }

    #[test]
    fn consumption_is_non_negative() {
        let c = household_consumption(SeriesShape::from_interval_hours(0.25, 3), 0.8, 42);
        assert_eq!(c.len(), 288);
        assert!(c.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn solar_is_zero_at_night() {
        let s = solar_per_kw(quarter_hour_day(), 1);
        // 00:00–06:00 and 18:00–24:00
        assert!(s[..24].iter().all(|&v| v == 0.0));
        assert!(s[72..].iter().all(|&v| v == 0.0));
        assert!(s[48] > 0.8, "noon output should be near peak: {}", s[48]);
    }

    #[test]
    fn wind_stays_in_unit_range() {
        let w = wind_per_kw(SeriesShape::from_interval_hours(1.0, 30), 3);
        assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn same_seed_same_series() {
        let shape = quarter_hour_day();
        assert_eq!(
            household_consumption(shape, 1.0, 9),
            household_consumption(shape, 1.0, 9)
        );
        assert_ne!(solar_per_kw(shape, 1), solar_per_kw(shape, 2));
    }

    #[test]
    fn demo_catalog_is_aligned() {
        let shape = SeriesShape::from_interval_hours(0.25, 2);
        let catalog = demo_catalog(shape, 42);
        assert_eq!(catalog.len(), 4);
        for p in &catalog {
            if let Some(prod) = p.production() {
                assert_eq!(prod.len(), shape.len());
            }
        }
    }
}
