//! Share investment advisor for community solar, wind and battery projects.
//!
//! [`sim::simulate`] balances a consumption curve against a production curve
//! and an optional battery; [`invest::allocate`] greedily buys project shares
//! that lower the household's annual electricity cost.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod invest;
pub mod io;
pub mod profiles;
pub mod reporting;
/// Energy-flow simulation and battery buffer.
pub mod sim;

pub use error::{OptimizeError, Result};
pub use invest::allocate;
pub use sim::simulate;
