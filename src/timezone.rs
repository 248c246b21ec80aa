//! The `TimeZone` value type and local-to-instant resolution.

use alloc::string::String;

use crate::{
    fmt::FormattableOffset,
    iso::IsoDateTime,
    provider::{CandidateOffsets, ZoneProvider},
    EpochNanoseconds, ScanResult, NS_PER_SECOND,
};

const NS_PER_MINUTE: i128 = 60 * NS_PER_SECOND as i128;

/// A scanned time zone: either a fixed offset from UTC or a named IANA
/// identifier whose offset varies by date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeZone {
    IanaIdentifier(String),
    OffsetMinutes(i16),
}

impl TimeZone {
    /// The fixed UTC zone. The scanner produces this for a lone `Z`
    /// designator without consulting any provider.
    pub const UTC: TimeZone = TimeZone::OffsetMinutes(0);

    /// Returns the canonical identifier text for this zone. Offsets format
    /// as `±HH:MM`.
    pub fn identifier(&self) -> String {
        match self {
            TimeZone::IanaIdentifier(identifier) => identifier.clone(),
            TimeZone::OffsetMinutes(minutes) => {
                use alloc::string::ToString;
                FormattableOffset::from_minutes(*minutes).to_string()
            }
        }
    }

    /// Resolves a local wall-clock value in this zone to an instant.
    ///
    /// Named zones can make a local time ambiguous or nonexistent around
    /// daylight-saving transitions; resolution is compatible with
    /// `java.time` and Temporal defaults: an ambiguous time takes the
    /// earlier instant, a skipped time is pushed forward by interpreting it
    /// with the offset in force before the transition.
    pub fn get_epoch_nanoseconds_for(
        &self,
        iso: IsoDateTime,
        provider: &impl ZoneProvider,
    ) -> ScanResult<EpochNanoseconds> {
        let local = iso.as_nanoseconds();
        let offset_seconds = match self {
            TimeZone::OffsetMinutes(minutes) => {
                return Ok(EpochNanoseconds(
                    local.as_i128() - i128::from(*minutes) * NS_PER_MINUTE,
                ));
            }
            TimeZone::IanaIdentifier(identifier) => {
                match provider.local_offsets_for(identifier, iso)? {
                    CandidateOffsets::Single(offset) => offset,
                    CandidateOffsets::Ambiguous { first, .. } => first,
                    CandidateOffsets::Empty(gap) => gap.before,
                }
            }
        };
        Ok(EpochNanoseconds(
            local.as_i128() - i128::from(offset_seconds.0) * NS_PER_SECOND as i128,
        ))
    }

    /// Returns the offset from UTC, in nanoseconds, in force in this zone
    /// at the given instant.
    pub fn get_offset_nanos_for(
        &self,
        epoch: EpochNanoseconds,
        provider: &impl ZoneProvider,
    ) -> ScanResult<i128> {
        match self {
            TimeZone::OffsetMinutes(minutes) => Ok(i128::from(*minutes) * NS_PER_MINUTE),
            TimeZone::IanaIdentifier(identifier) => provider
                .offset_seconds_for(identifier, epoch)
                .map(|offset| i128::from(offset.0) * NS_PER_SECOND as i128),
        }
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::UTC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iso::{IsoDate, IsoDateTime, IsoTime};
    use crate::provider::NeverProvider;

    fn noon(year: i32, month: u8, day: u8) -> IsoDateTime {
        IsoDateTime::new(
            IsoDate::new_unchecked(year, month, day),
            IsoTime::new_unchecked(12, 0, 0, 0),
        )
    }

    #[test]
    fn offset_zone_subtracts_the_offset() {
        let iso = noon(2023, 6, 15);
        let utc = TimeZone::UTC
            .get_epoch_nanoseconds_for(iso, &NeverProvider)
            .unwrap();
        let plus_two = TimeZone::OffsetMinutes(120)
            .get_epoch_nanoseconds_for(iso, &NeverProvider)
            .unwrap();
        assert_eq!(utc.as_i128() - plus_two.as_i128(), 7_200_000_000_000);
    }

    #[test]
    fn identifier_text() {
        assert_eq!(TimeZone::OffsetMinutes(-300).identifier(), "-05:00");
        assert_eq!(TimeZone::OffsetMinutes(0).identifier(), "+00:00");
        assert_eq!(
            TimeZone::IanaIdentifier("Europe/Stockholm".into()).identifier(),
            "Europe/Stockholm"
        );
    }
}
