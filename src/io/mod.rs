/// Consumption, catalog and production loaders.
pub mod catalog;
/// CSV export of recommendations.
pub mod export;
