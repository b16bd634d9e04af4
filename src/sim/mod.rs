/// Energy-flow replay over aligned interval series.
pub mod flow;
/// Lossless battery buffer used by the replay.
pub mod storage;

pub use flow::{EnergyFlowReport, simulate};
