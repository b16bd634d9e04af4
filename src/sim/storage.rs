//! Lossless storage buffer used while replaying an interval series.

/// Battery state for a single simulation pass.
///
/// The buffer has no power limit and no conversion losses: it absorbs any
/// surplus up to its free headroom and returns any stored amount on demand.
/// Level, capacity and the running totals share the unit of the replayed
/// series (interval-average kW summed over intervals); the caller converts
/// them to kWh after the pass, like every other total.
///
/// # Power Flow Convention
/// - `charge` takes a surplus (production above consumption) and returns the
///   amount actually absorbed, `min(surplus, capacity - level)`.
/// - `discharge` takes a deficit (consumption above production) and returns
///   the amount actually delivered, `min(deficit, level)`.
#[derive(Debug, Clone)]
pub struct StorageBuffer {
    /// Usable capacity.
    pub capacity: f64,

    /// Current stored amount, within `[0, capacity]`.
    level: f64,

    /// Amount absorbed over the pass.
    charged: f64,

    /// Amount delivered over the pass.
    discharged: f64,
}

impl StorageBuffer {
    /// Creates an empty buffer; a capacity of 0 (or below) disables storage.
    pub fn empty(capacity: f64) -> Self {
        Self {
            capacity: capacity.max(0.0),
            level: 0.0,
            charged: 0.0,
            discharged: 0.0,
        }
    }

    /// Whether the buffer can hold anything at all.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0.0
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn charged(&self) -> f64 {
        self.charged
    }

    pub fn discharged(&self) -> f64 {
        self.discharged
    }

    /// Absorbs up to `surplus` and returns the absorbed amount.
    pub fn charge(&mut self, surplus: f64) -> f64 {
        if !self.is_enabled() || surplus <= 0.0 {
            return 0.0;
        }

        let headroom = (self.capacity - self.level).max(0.0);
        let absorbed = surplus.min(headroom);

        self.level = (self.level + absorbed).min(self.capacity);
        self.charged += absorbed;
        absorbed
    }

    /// Delivers up to `deficit` and returns the delivered amount.
    pub fn discharge(&mut self, deficit: f64) -> f64 {
        if self.level <= 0.0 || deficit <= 0.0 {
            return 0.0;
        }

        let delivered = deficit.min(self.level);

        self.level = (self.level - delivered).max(0.0);
        self.discharged += delivered;
        delivered
    }
}
