use crate::error::OracleError;

/// Answers whether a parent-chain block is buried deeply enough.
///
/// Calls are blocking and are not retried by the validator; a failed query
/// rejects the claim.
pub trait ConfirmationOracle: Send + Sync {
    fn is_confirmed(&self, height: u64, min_depth: u64) -> Result<bool, OracleError>;
}

/// Judges confirmations against a known parent-chain tip height
#[derive(Debug, Clone, Copy)]
pub struct TipHeightOracle {
    pub tip_height: u64,
}

impl ConfirmationOracle for TipHeightOracle {
    fn is_confirmed(&self, height: u64, min_depth: u64) -> Result<bool, OracleError> {
        if height > self.tip_height {
            return Ok(false);
        }
        // a block at the tip has one confirmation
        Ok((self.tip_height - height).saturating_add(1) >= min_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_height_depth() {
        let oracle = TipHeightOracle { tip_height: 100 };
        assert!(oracle.is_confirmed(95, 6).unwrap());
        assert!(!oracle.is_confirmed(96, 6).unwrap());
        assert!(!oracle.is_confirmed(101, 0).unwrap());
    }

    #[test]
    fn test_tip_height_at_u64_max() {
        let oracle = TipHeightOracle { tip_height: u64::MAX };
        assert!(oracle.is_confirmed(0, u64::MAX).unwrap());
        assert!(oracle.is_confirmed(u64::MAX, 1).unwrap());
        assert!(!oracle.is_confirmed(u64::MAX, 2).unwrap());
    }
}
