//! Precondition failures reported by the simulator and the allocator.

use thiserror::Error;

/// Errors returned by [`crate::sim::simulate`] and [`crate::invest::allocate`].
///
/// All variants are detected before any simulation work starts; a failed call
/// never yields a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("series length mismatch: consumption has {consumption} intervals, production has {production}")]
    LengthMismatch { consumption: usize, production: usize },

    #[error("no eligible projects: every project was empty or excluded")]
    NoEligibleProjects,

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl OptimizeError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let e = OptimizeError::LengthMismatch {
            consumption: 4,
            production: 3,
        };
        assert!(e.to_string().contains("4"));
        assert!(e.to_string().contains("3"));

        let e = OptimizeError::invalid("electricity_price", "must be >= 0");
        assert_eq!(
            e.to_string(),
            "invalid parameter `electricity_price`: must be >= 0"
        );
    }
}
