use num_traits::ToPrimitive;

use crate::{ScanError, ScanResult, NS_MAX_INSTANT, NS_MIN_INSTANT, NS_PER_SECOND};

/// Nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct EpochNanoseconds(pub(crate) i128);

impl From<i128> for EpochNanoseconds {
    fn from(value: i128) -> Self {
        Self(value)
    }
}

impl EpochNanoseconds {
    pub fn as_i128(&self) -> i128 {
        self.0
    }

    /// The whole-second component, rounded toward negative infinity.
    pub(crate) fn as_seconds(&self) -> ScanResult<i64> {
        self.0
            .div_euclid(NS_PER_SECOND as i128)
            .to_i64()
            .ok_or_else(|| ScanError::provider("epoch seconds were not within a valid range"))
    }

    pub fn check_validity(&self) -> ScanResult<()> {
        if !is_valid_epoch_nanos(&self.0) {
            return Err(
                ScanError::invalid_field("epoch nanoseconds", 0).with_message(
                    "instant is outside the supported 0000-01-01 to 9999-12-31 span",
                ),
            );
        }
        Ok(())
    }
}

/// Utility for determining if the nanos are within a valid range.
#[inline]
#[must_use]
pub(crate) fn is_valid_epoch_nanos(nanos: &i128) -> bool {
    (NS_MIN_INSTANT..=NS_MAX_INSTANT).contains(nanos)
}
