//! Margin arithmetic for gas limits
//!
//! The padded gas limit is computed in whole gas units with integer division
//! throughout; the execution layer rejects fractional gas, and floating-point
//! rounding must not leak into the ceiling.

use crate::error::{SubmitError, SubmitResult};

use ethers::types::U256;

const BASIS_POINT_DENOMINATOR: u64 = 10_000;

/// Safety margin applied on top of a gas estimate.
///
/// Stored as basis points (1 bp = 0.01%), so a margin is non-negative by
/// construction and applying it never involves floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    basis_points: u64,
}

impl Margin {
    /// Margin from basis points (e.g. 1000 = 10%).
    pub fn from_basis_points(basis_points: u64) -> Self {
        Self { basis_points }
    }

    /// Margin from whole percent (e.g. 10 = 10%).
    pub fn from_percent(percent: u64) -> Self {
        Self {
            basis_points: percent * 100,
        }
    }

    /// Margin from a fraction (e.g. 0.1 = 10%), rounded to the nearest basis
    /// point. Rejects negative, NaN, and infinite input before any remote
    /// interaction can take place.
    pub fn try_from_fraction(fraction: f64) -> SubmitResult<Self> {
        if !fraction.is_finite() {
            return Err(SubmitError::InvalidConfiguration(format!(
                "margin must be a finite number, got {}",
                fraction
            )));
        }
        if fraction < 0.0 {
            return Err(SubmitError::InvalidConfiguration(format!(
                "margin must be non-negative, got {}",
                fraction
            )));
        }
        Ok(Self {
            basis_points: (fraction * BASIS_POINT_DENOMINATOR as f64).round() as u64,
        })
    }

    /// Margin in basis points.
    pub fn basis_points(&self) -> u64 {
        self.basis_points
    }

    /// Apply the margin to an estimate, producing the gas ceiling:
    /// `estimate + estimate * bps / 10_000`, truncating toward zero.
    ///
    /// The ceiling is always >= the estimate.
    pub fn pad(&self, estimate: U256) -> U256 {
        let headroom = estimate * U256::from(self.basis_points) / U256::from(BASIS_POINT_DENOMINATOR);
        estimate + headroom
    }
}

impl Default for Margin {
    /// 10% margin, the conventional buffer for contract calls.
    fn default() -> Self {
        Self::from_percent(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_never_below_estimate() {
        for estimate in [0u64, 1, 21_000, 999, 1_000_000_007] {
            for bps in [0u64, 1, 500, 1000, 5000, 10_000, 30_000] {
                let margin = Margin::from_basis_points(bps);
                assert!(margin.pad(U256::from(estimate)) >= U256::from(estimate));
            }
        }
    }

    #[test]
    fn test_zero_margin_is_identity() {
        let margin = Margin::from_basis_points(0);
        assert_eq!(margin.pad(U256::from(21_000u64)), U256::from(21_000u64));
    }

    #[test]
    fn test_zero_estimate_stays_zero() {
        for bps in [0u64, 1000, 10_000, 999_999] {
            assert_eq!(Margin::from_basis_points(bps).pad(U256::zero()), U256::zero());
        }
    }

    #[test]
    fn test_ten_percent_of_round_estimate() {
        let margin = Margin::try_from_fraction(0.1).unwrap();
        assert_eq!(margin.basis_points(), 1000);
        assert_eq!(margin.pad(U256::from(1000u64)), U256::from(1100u64));
    }

    #[test]
    fn test_headroom_truncates_toward_zero() {
        // 999 * 10% = 99.9 -> 99
        let margin = Margin::try_from_fraction(0.1).unwrap();
        assert_eq!(margin.pad(U256::from(999u64)), U256::from(1098u64));
    }

    #[test]
    fn test_negative_margin_rejected() {
        let err = Margin::try_from_fraction(-0.1).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_non_finite_margin_rejected() {
        assert!(Margin::try_from_fraction(f64::NAN).is_err());
        assert!(Margin::try_from_fraction(f64::INFINITY).is_err());
    }

    #[test]
    fn test_fraction_rounds_to_nearest_basis_point() {
        // 0.1 is not exactly representable in binary; conversion must still
        // land on 1000 bps, not 999 or 1001.
        assert_eq!(Margin::try_from_fraction(0.1).unwrap().basis_points(), 1000);
        assert_eq!(Margin::try_from_fraction(0.5).unwrap().basis_points(), 5000);
        assert_eq!(Margin::try_from_fraction(0.0).unwrap().basis_points(), 0);
    }

    #[test]
    fn test_default_margin_is_ten_percent() {
        assert_eq!(Margin::default().basis_points(), 1000);
    }
}
