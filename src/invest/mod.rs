//! Greedy share allocation over a project catalog.

pub mod allocator;
pub mod portfolio;
pub mod scoring;
pub mod types;

pub use allocator::allocate;
pub use types::{
    AllocationParams, AllocationResult, Candidate, EnergyType, GenerationSource,
    NEVER_PAYS_BACK_YEARS, PortfolioSummary, Project, ProjectKind, QUARTER_HOUR, Recommendation,
    StorageHeuristic, TypeTotals,
};
